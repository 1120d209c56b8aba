// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// umbruch-compose — The algorithmic core of the Umbruch print generator.
//
// Two pure functions: `assemble_pages` groups one article's content into
// page-ordered buckets honouring authored page placements, and
// `compose_document` merges the assembled articles with issue metadata into
// one ordered document tree. Both are side-effect free and deterministic;
// assembly is safe to fan out across articles.

pub mod assemble;
pub mod compose;

pub use assemble::{AssembledArticle, PageBucket, PageElement, assemble_pages};
pub use compose::{
    ArticleHeader, ComposedArticle, Cover, PaginatedDocument, compose_document,
};
