// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document composition — merges per-article page assemblies with issue
// metadata into one ordered document tree.
//
// Ordering: an explicit article-order list on the issue wins and is final
// (unknown identifiers are omitted, unlisted articles are excluded).
// Otherwise articles group by section tag in first-appearance order, with
// ascending publication date inside each group.
//
// The article header attaches to index 0 of the *emitted* page list, not to
// literal page 1 — an article whose first placed page is 3 carries its
// header there.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use umbruch_core::types::{Article, Issue};

use crate::assemble::{AssembledArticle, PageBucket};

/// Header block injected before an article's first emitted page.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleHeader {
    pub title: String,
    pub authors: Vec<String>,
    pub section: String,
    pub summary: Option<String>,
}

/// One article in the composed document.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedArticle {
    pub header: ArticleHeader,
    /// The article's emitted page buckets, ascending. Never empty — articles
    /// without any placed element are omitted from the document.
    pub pages: Vec<PageBucket>,
}

/// Cover sheet metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Cover {
    pub title: String,
    pub number: u32,
    pub year: i32,
}

/// The full composed document tree. Assembled fresh per generation request,
/// handed to the renderer, then discarded — never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedDocument {
    pub cover: Cover,
    pub articles: Vec<ComposedArticle>,
    pub generated_at: DateTime<Utc>,
    /// Aggregated over all input articles, including ones omitted for
    /// having no placed content.
    pub skipped_unassigned: usize,
    pub rejected_assignments: usize,
}

impl PaginatedDocument {
    /// Total number of sheets the renderer will emit (excluding the cover).
    pub fn sheet_count(&self) -> usize {
        self.articles.iter().map(|a| a.pages.len()).sum()
    }
}

/// Compose the document tree for one issue.
///
/// Pure function of its inputs — identical inputs always yield an identical
/// tree. `assembled` arrives in content-store order and must pair each
/// article with its own assembly result.
pub fn compose_document(
    issue: &Issue,
    assembled: Vec<(Article, AssembledArticle)>,
    generated_at: DateTime<Utc>,
) -> PaginatedDocument {
    let skipped_unassigned = assembled.iter().map(|(_, a)| a.skipped_unassigned).sum();
    let rejected_assignments = assembled.iter().map(|(_, a)| a.rejected_assignments).sum();

    let ordered = order_articles(issue, assembled);

    let articles = ordered
        .into_iter()
        .filter_map(|(article, assembly)| {
            if assembly.is_empty() {
                debug!(article_id = %article.id, title = %article.title,
                    "article has no placed content — omitting from document");
                return None;
            }
            Some(ComposedArticle {
                header: ArticleHeader {
                    title: article.title,
                    authors: article.authors,
                    section: article.section,
                    summary: article.summary,
                },
                pages: assembly.pages,
            })
        })
        .collect();

    PaginatedDocument {
        cover: Cover {
            title: issue.title.clone(),
            number: issue.number,
            year: issue.year,
        },
        articles,
        generated_at,
        skipped_unassigned,
        rejected_assignments,
    }
}

/// Apply the issue's ordering policy.
fn order_articles(
    issue: &Issue,
    assembled: Vec<(Article, AssembledArticle)>,
) -> Vec<(Article, AssembledArticle)> {
    match &issue.article_order {
        Some(order) => {
            let mut by_id: HashMap<_, _> = assembled
                .into_iter()
                .map(|pair| (pair.0.id, pair))
                .collect();

            let mut ordered = Vec::with_capacity(order.len());
            for id in order {
                match by_id.remove(id) {
                    Some(pair) => ordered.push(pair),
                    None => {
                        debug!(article_id = %id,
                            "explicit order names an unknown article — omitting");
                    }
                }
            }
            ordered
        }
        None => {
            // Section groups keep their first-appearance order from the
            // store; the sort is stable, so ties inside a group keep store
            // order too.
            let mut section_rank: HashMap<String, usize> = HashMap::new();
            for (article, _) in &assembled {
                let next = section_rank.len();
                section_rank.entry(article.section.clone()).or_insert(next);
            }

            let mut ordered = assembled;
            ordered.sort_by(|a, b| {
                section_rank[&a.0.section]
                    .cmp(&section_rank[&b.0.section])
                    .then(a.0.published_at.cmp(&b.0.published_at))
            });
            ordered
        }
    }
}
