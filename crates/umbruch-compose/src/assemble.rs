// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page assembly — groups one article's content elements into print-page
// buckets according to their authored page placements.
//
// The walk is a single pass that preserves original sequence order. Elements
// without a placement are skipped (counted, never an error), and placements
// with a non-positive, fractional, or non-finite page number are rejected
// (counted, logged, never coerced). Buckets come out strictly ascending by
// page number with insertion order preserved inside each bucket.

use std::collections::BTreeMap;

use tracing::warn;

use umbruch_core::types::{ContentElement, Division, ElementKind};

/// One content element placed into a page bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct PageElement {
    pub kind: ElementKind,
    pub content: String,
    /// Optional caption.
    pub name: Option<String>,
    /// Position of this element in the article's original content sequence.
    pub original_index: usize,
    /// Authored page-spanning annotation, carried through verbatim.
    pub division: Option<Division>,
}

/// The assembled set of content elements destined for one print page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageBucket {
    pub page_number: u32,
    pub elements: Vec<PageElement>,
}

/// Result of assembling one article.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledArticle {
    /// Buckets in strictly ascending page order; only pages that actually
    /// hold at least one element are present.
    pub pages: Vec<PageBucket>,
    /// Highest page number among accepted placements, 0 when none.
    pub total_pages: u32,
    /// Elements carrying no page placement at all.
    pub skipped_unassigned: usize,
    /// Placements rejected for an out-of-range page number.
    pub rejected_assignments: usize,
}

impl AssembledArticle {
    /// Whether assembly produced any printable page.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Group an article's content sequence into page buckets.
///
/// Pure and infallible — malformed placement metadata is absorbed here and
/// reported through the counters, so callers can opt into stricter
/// validation without changing the grouping semantics. Safe to call
/// concurrently, one invocation per article.
pub fn assemble_pages(elements: &[ContentElement]) -> AssembledArticle {
    let mut buckets: BTreeMap<u32, Vec<PageElement>> = BTreeMap::new();
    let mut skipped_unassigned = 0;
    let mut rejected_assignments = 0;

    for (index, element) in elements.iter().enumerate() {
        let Some(assignment) = &element.page else {
            skipped_unassigned += 1;
            continue;
        };

        let Some(page_number) = accepted_page_number(assignment.page_number) else {
            warn!(
                original_index = index,
                page_number = assignment.page_number,
                "rejecting page placement outside the valid range"
            );
            rejected_assignments += 1;
            continue;
        };

        buckets.entry(page_number).or_default().push(PageElement {
            kind: element.kind,
            content: element.content.clone(),
            name: element.name.clone(),
            original_index: index,
            division: assignment.division.clone(),
        });
    }

    // BTreeMap keys are already unique and ascending; the last key is the
    // highest accepted page number.
    let total_pages = buckets.keys().next_back().copied().unwrap_or(0);

    AssembledArticle {
        pages: buckets
            .into_iter()
            .map(|(page_number, elements)| PageBucket {
                page_number,
                elements,
            })
            .collect(),
        total_pages,
        skipped_unassigned,
        rejected_assignments,
    }
}

/// Validate an authored page number: a whole number ≥ 1.
///
/// Fractional and non-positive values are an authoring ambiguity — they are
/// rejected rather than rounded or clamped.
fn accepted_page_number(raw: f64) -> Option<u32> {
    if !raw.is_finite() || raw.fract() != 0.0 || raw < 1.0 || raw > f64::from(u32::MAX) {
        return None;
    }
    Some(raw as u32)
}
