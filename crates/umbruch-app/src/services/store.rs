// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content store read adapter.
//
// The CMS is an external collaborator; this side only ever reads. The JSON
// adapter consumes per-issue export bundles laid out as
// `<root>/<number>/issue.json` and `<root>/<number>/articles.json`.

use std::path::PathBuf;

use tracing::debug;

use umbruch_core::error::{Result, UmbruchError};
use umbruch_core::types::{Article, Issue};

/// Read access to the upstream content store.
pub trait ContentStore {
    /// Retrieve an issue by number, including its generation-enabled flag
    /// and optional explicit article order. `None` when the issue does not
    /// exist.
    fn issue_by_number(&self, number: u32) -> Result<Option<Issue>>;

    /// Retrieve the issue's articles with their content sequences and
    /// ordering fields, in store order.
    fn articles_for_issue(&self, number: u32) -> Result<Vec<Article>>;
}

/// Store adapter over a directory of JSON export bundles.
pub struct JsonContentStore {
    root: PathBuf,
}

impl JsonContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn issue_dir(&self, number: u32) -> PathBuf {
        self.root.join(number.to_string())
    }
}

impl ContentStore for JsonContentStore {
    fn issue_by_number(&self, number: u32) -> Result<Option<Issue>> {
        let path = self.issue_dir(number).join("issue.json");
        if !path.exists() {
            debug!(path = %path.display(), "no issue bundle at path");
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| UmbruchError::Store(format!("read {}: {e}", path.display())))?;
        let issue = serde_json::from_str(&raw)
            .map_err(|e| UmbruchError::Store(format!("parse {}: {e}", path.display())))?;
        Ok(Some(issue))
    }

    fn articles_for_issue(&self, number: u32) -> Result<Vec<Article>> {
        let path = self.issue_dir(number).join("articles.json");
        if !path.exists() {
            // An issue bundle without articles is a valid (if empty) export.
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| UmbruchError::Store(format!("read {}: {e}", path.display())))?;
        let articles = serde_json::from_str(&raw)
            .map_err(|e| UmbruchError::Store(format!("parse {}: {e}", path.display())))?;
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use umbruch_core::types::{ArticleId, ContentElement, ElementKind};

    fn write_bundle(root: &std::path::Path, number: u32, issue: &Issue, articles: &[Article]) {
        let dir = root.join(number.to_string());
        std::fs::create_dir_all(&dir).expect("create bundle dir");
        std::fs::write(
            dir.join("issue.json"),
            serde_json::to_string(issue).expect("serialize issue"),
        )
        .expect("write issue.json");
        std::fs::write(
            dir.join("articles.json"),
            serde_json::to_string(articles).expect("serialize articles"),
        )
        .expect("write articles.json");
    }

    fn sample_issue(number: u32) -> Issue {
        Issue {
            title: "Herbst".into(),
            number,
            year: 2026,
            generation_enabled: true,
            article_order: None,
        }
    }

    fn sample_article() -> Article {
        Article {
            id: ArticleId::new(),
            title: "Leader".into(),
            authors: vec!["M. Brandt".into()],
            section: "opinion".into(),
            summary: None,
            published_at: Utc.with_ymd_and_hms(2026, 9, 1, 6, 0, 0).unwrap(),
            elements: vec![ContentElement::new(ElementKind::Paragraph, "text").on_page(1.0)],
        }
    }

    #[test]
    fn bundle_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let issue = sample_issue(3);
        let articles = vec![sample_article()];
        write_bundle(dir.path(), 3, &issue, &articles);

        let store = JsonContentStore::new(dir.path());
        let loaded = store.issue_by_number(3).expect("read").expect("found");
        assert_eq!(loaded, issue);

        let loaded_articles = store.articles_for_issue(3).expect("read");
        assert_eq!(loaded_articles, articles);
    }

    #[test]
    fn missing_issue_is_none_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonContentStore::new(dir.path());
        assert!(store.issue_by_number(99).expect("read").is_none());
    }

    #[test]
    fn missing_articles_file_yields_empty_list() {
        let dir = tempfile::tempdir().expect("tempdir");
        let issue_dir = dir.path().join("5");
        std::fs::create_dir_all(&issue_dir).expect("create dir");
        std::fs::write(
            issue_dir.join("issue.json"),
            serde_json::to_string(&sample_issue(5)).expect("serialize"),
        )
        .expect("write");

        let store = JsonContentStore::new(dir.path());
        assert!(store.articles_for_issue(5).expect("read").is_empty());
    }

    #[test]
    fn corrupt_bundle_is_a_store_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let issue_dir = dir.path().join("7");
        std::fs::create_dir_all(&issue_dir).expect("create dir");
        std::fs::write(issue_dir.join("issue.json"), "{not json").expect("write");

        let store = JsonContentStore::new(dir.path());
        let err = store.issue_by_number(7).unwrap_err();
        assert!(matches!(err, UmbruchError::Store(_)));
    }
}
