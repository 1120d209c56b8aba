// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Umbruch print generator.
//
// These mirror the authoring store's JSON export format (camelCase wire
// names). Page placement metadata is authored, never computed here — the
// pipeline reads it verbatim and never mutates it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArticleId(pub Uuid);

impl ArticleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ArticleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ArticleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of an authored content block.
///
/// Unknown kinds from newer store versions deserialize as `Other` so an
/// unrecognised block never aborts a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Title,
    Paragraph,
    Image,
    #[serde(other)]
    Other,
}

/// Authoring annotation for content that visually spans two consecutive
/// print pages.
///
/// `content_for_current_page` renders inline on the element's own page;
/// `content_for_next_page` renders as a continuation annotation attached to
/// the same output block. It is never relocated into the next page's bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Division {
    pub content_for_current_page: String,
    pub content_for_next_page: String,
}

/// Authoring-time metadata pinning a content element to a print page.
///
/// `page_number` is kept as the raw authored number. The store does not
/// enforce integrality or positivity, so validation happens at assembly
/// time — non-positive or fractional values are rejected there, never
/// silently coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAssignment {
    pub page_number: f64,
    pub division: Option<Division>,
}

/// One authored block of article content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentElement {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Text content, or a media reference for image elements.
    pub content: String,
    /// Optional caption.
    pub name: Option<String>,
    /// Optional print page placement. Elements without one never appear in
    /// any page bucket.
    pub page: Option<PageAssignment>,
}

impl ContentElement {
    /// Convenience constructor for an unassigned element.
    pub fn new(kind: ElementKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            name: None,
            page: None,
        }
    }

    /// Attach a plain page assignment.
    pub fn on_page(mut self, page_number: f64) -> Self {
        self.page = Some(PageAssignment {
            page_number,
            division: None,
        });
        self
    }

    /// Attach a page assignment carrying a division.
    pub fn on_page_divided(
        mut self,
        page_number: f64,
        current: impl Into<String>,
        next: impl Into<String>,
    ) -> Self {
        self.page = Some(PageAssignment {
            page_number,
            division: Some(Division {
                content_for_current_page: current.into(),
                content_for_next_page: next.into(),
            }),
        });
        self
    }
}

/// One article of an issue, with its ordered content sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    /// Ordered list of author names.
    pub authors: Vec<String>,
    /// Section tag used for default inter-article ordering.
    pub section: String,
    pub summary: Option<String>,
    pub published_at: DateTime<Utc>,
    /// Ordered content sequence as authored.
    pub elements: Vec<ContentElement>,
}

/// A dated collection of articles assembled into one publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub title: String,
    pub number: u32,
    pub year: i32,
    /// Manual print generation must be explicitly enabled per issue.
    pub generation_enabled: bool,
    /// Explicit article ordering. When absent, articles order by section
    /// tag then ascending publication date.
    pub article_order: Option<Vec<ArticleId>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_kind_parses_known_and_unknown() {
        let known: ElementKind = serde_json::from_str("\"paragraph\"").expect("parse");
        assert_eq!(known, ElementKind::Paragraph);

        let unknown: ElementKind = serde_json::from_str("\"pull-quote\"").expect("parse");
        assert_eq!(unknown, ElementKind::Other);
    }

    #[test]
    fn page_assignment_uses_camel_case_wire_names() {
        let json = r#"{"pageNumber": 3, "division": {"contentForCurrentPage": "A", "contentForNextPage": "B"}}"#;
        let pa: PageAssignment = serde_json::from_str(json).expect("parse");
        assert_eq!(pa.page_number, 3.0);
        let div = pa.division.expect("division");
        assert_eq!(div.content_for_current_page, "A");
        assert_eq!(div.content_for_next_page, "B");
    }

    #[test]
    fn fractional_page_numbers_survive_deserialization_unchanged() {
        // Validation belongs to the assembler — the type must not round.
        let pa: PageAssignment = serde_json::from_str(r#"{"pageNumber": 2.5}"#).expect("parse");
        assert_eq!(pa.page_number, 2.5);
        assert!(pa.division.is_none());
    }

    #[test]
    fn element_without_page_deserializes() {
        let json = r#"{"type": "title", "content": "Headline"}"#;
        let el: ContentElement = serde_json::from_str(json).expect("parse");
        assert_eq!(el.kind, ElementKind::Title);
        assert!(el.page.is_none());
        assert!(el.name.is_none());
    }
}
