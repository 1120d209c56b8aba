// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Generation service — one request in, exactly one of {artifact path,
// structured error} out.
//
// Pipeline: read issue → check flag → read articles → fan out page assembly
// per article (pure, no shared state) → join in store order → compose →
// render markup → export. Structural failures are terminal for the request;
// malformed per-element page metadata never escalates past the assembler and
// is reported through the outcome counters instead.

use std::path::PathBuf;

use chrono::Utc;
use tracing::{info, instrument, warn};

use umbruch_compose::{assemble_pages, compose_document};
use umbruch_core::config::GeneratorConfig;
use umbruch_core::error::{Result, UmbruchError};
use umbruch_render::{ArtifactRenderer, render_html};

use super::store::ContentStore;

/// Result of a successful generation request.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Published artifact path.
    pub artifact: PathBuf,
    /// SHA-256 of the artifact bytes, hex encoded.
    pub sha256: String,
    /// Number of content sheets in the document (cover excluded).
    pub sheets: usize,
    /// Elements skipped for carrying no page placement. Callers wanting
    /// stricter validation can fail their request on a non-zero value.
    pub skipped_unassigned: usize,
    /// Placements rejected for out-of-range page numbers.
    pub rejected_assignments: usize,
}

/// Orchestrates one issue generation end to end.
pub struct GenerationService<S, R> {
    store: S,
    renderer: R,
    config: GeneratorConfig,
}

impl<S: ContentStore, R: ArtifactRenderer> GenerationService<S, R> {
    pub fn new(store: S, renderer: R, config: GeneratorConfig) -> Self {
        Self {
            store,
            renderer,
            config,
        }
    }

    /// Generate the print artifact for an issue.
    ///
    /// No internal retries anywhere — a failed request fails outright, with
    /// the renderer session and staging files released on every path.
    #[instrument(skip(self))]
    pub async fn generate(&self, issue_number: u32) -> Result<GenerationOutcome> {
        let issue = self
            .store
            .issue_by_number(issue_number)?
            .ok_or(UmbruchError::IssueNotFound(issue_number))?;

        if !issue.generation_enabled {
            return Err(UmbruchError::GenerationDisabled(issue_number));
        }

        let articles = self.store.articles_for_issue(issue_number)?;
        if articles.is_empty() {
            return Err(UmbruchError::NoContentFound(issue_number));
        }
        info!(articles = articles.len(), "assembling issue content");

        // Fan out per-article assembly; join preserves store order.
        let mut handles = Vec::with_capacity(articles.len());
        for article in articles {
            handles.push(tokio::task::spawn_blocking(move || {
                let assembly = assemble_pages(&article.elements);
                (article, assembly)
            }));
        }
        let mut assembled = Vec::with_capacity(handles.len());
        for handle in handles {
            assembled.push(
                handle
                    .await
                    .map_err(|e| UmbruchError::Internal(format!("assembly task: {e}")))?,
            );
        }

        let document = compose_document(&issue, assembled, Utc::now());
        if document.articles.is_empty() {
            // Nothing earned a page — the renderer is never launched.
            return Err(UmbruchError::NoContentFound(issue_number));
        }
        if document.rejected_assignments > 0 {
            warn!(
                rejected = document.rejected_assignments,
                "some page placements were rejected during assembly"
            );
        }

        let markup = render_html(&document, &self.config);
        let artifact = self.renderer.export(&markup, issue_number).await?;

        info!(
            path = %artifact.path.display(),
            sheets = document.sheet_count(),
            "issue generated"
        );
        Ok(GenerationOutcome {
            artifact: artifact.path,
            sha256: artifact.sha256,
            sheets: document.sheet_count(),
            skipped_unassigned: document.skipped_unassigned,
            rejected_assignments: document.rejected_assignments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{TimeZone, Utc};
    use umbruch_core::types::{Article, ArticleId, ContentElement, ElementKind, Issue};
    use umbruch_render::ExportedArtifact;

    struct FixtureStore {
        issue: Option<Issue>,
        articles: Vec<Article>,
    }

    impl ContentStore for FixtureStore {
        fn issue_by_number(&self, number: u32) -> Result<Option<Issue>> {
            Ok(self.issue.clone().filter(|i| i.number == number))
        }

        fn articles_for_issue(&self, _number: u32) -> Result<Vec<Article>> {
            Ok(self.articles.clone())
        }
    }

    /// Renderer double that records whether a session was ever started.
    #[derive(Default)]
    struct SpyRenderer {
        calls: AtomicUsize,
        last_markup: Mutex<Option<String>>,
    }

    impl ArtifactRenderer for &SpyRenderer {
        async fn export(&self, markup: &str, issue_number: u32) -> Result<ExportedArtifact> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_markup.lock().expect("markup lock") = Some(markup.to_string());
            Ok(ExportedArtifact {
                path: PathBuf::from(format!("/tmp/issue-{issue_number}.pdf")),
                sha256: "0".repeat(64),
            })
        }
    }

    fn issue(number: u32, enabled: bool) -> Issue {
        Issue {
            title: "Winter".into(),
            number,
            year: 2026,
            generation_enabled: enabled,
            article_order: None,
        }
    }

    fn placed_article(title: &str) -> Article {
        Article {
            id: ArticleId::new(),
            title: title.into(),
            authors: vec!["A. Author".into()],
            section: "news".into(),
            summary: None,
            published_at: Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap(),
            elements: vec![
                ContentElement::new(ElementKind::Paragraph, "placed body").on_page(1.0),
                ContentElement::new(ElementKind::Paragraph, "unplaced note"),
            ],
        }
    }

    fn service(
        store: FixtureStore,
        renderer: &SpyRenderer,
    ) -> GenerationService<FixtureStore, &SpyRenderer> {
        GenerationService::new(store, renderer, GeneratorConfig::default())
    }

    #[tokio::test]
    async fn unknown_issue_fails_without_launching_the_renderer() {
        let renderer = SpyRenderer::default();
        let svc = service(
            FixtureStore {
                issue: None,
                articles: vec![],
            },
            &renderer,
        );

        let err = svc.generate(12).await.unwrap_err();
        assert!(matches!(err, UmbruchError::IssueNotFound(12)));
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn disabled_issue_fails_without_launching_the_renderer() {
        let renderer = SpyRenderer::default();
        let svc = service(
            FixtureStore {
                issue: Some(issue(12, false)),
                articles: vec![placed_article("A")],
            },
            &renderer,
        );

        let err = svc.generate(12).await.unwrap_err();
        assert!(matches!(err, UmbruchError::GenerationDisabled(12)));
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn issue_without_articles_is_no_content_found() {
        let renderer = SpyRenderer::default();
        let svc = service(
            FixtureStore {
                issue: Some(issue(12, true)),
                articles: vec![],
            },
            &renderer,
        );

        let err = svc.generate(12).await.unwrap_err();
        assert!(matches!(err, UmbruchError::NoContentFound(12)));
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn issue_with_only_unplaced_content_is_no_content_found() {
        let renderer = SpyRenderer::default();
        let mut article = placed_article("Drafts only");
        article.elements = vec![ContentElement::new(ElementKind::Paragraph, "draft")];
        let svc = service(
            FixtureStore {
                issue: Some(issue(12, true)),
                articles: vec![article],
            },
            &renderer,
        );

        let err = svc.generate(12).await.unwrap_err();
        assert!(matches!(err, UmbruchError::NoContentFound(12)));
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_generation_returns_artifact_and_counts() {
        let renderer = SpyRenderer::default();
        let svc = service(
            FixtureStore {
                issue: Some(issue(12, true)),
                articles: vec![placed_article("Harbour piece"), placed_article("Second")],
            },
            &renderer,
        );

        let outcome = svc.generate(12).await.expect("generate");
        assert_eq!(outcome.artifact, PathBuf::from("/tmp/issue-12.pdf"));
        assert_eq!(outcome.sheets, 2);
        // One unplaced note per article surfaces in the counters.
        assert_eq!(outcome.skipped_unassigned, 2);
        assert_eq!(outcome.rejected_assignments, 0);

        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
        let markup = renderer
            .last_markup
            .lock()
            .expect("markup lock")
            .clone()
            .expect("markup recorded");
        assert!(markup.contains("Harbour piece"));
        assert!(markup.contains("placed body"));
        assert!(!markup.contains("unplaced note"));
    }
}
