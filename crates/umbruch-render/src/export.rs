// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print export — drives a headless Chromium session to turn print markup
// into the fixed-size PDF artifact.
//
// The renderer session is a scoped resource: the child process is killed on
// drop and explicitly on settle timeout, and the staging directory (markup
// plus any partial PDF) lives inside the output directory so the finished
// artifact can be published with a same-filesystem atomic rename. A
// half-written artifact is never visible at the final path.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use umbruch_core::config::GeneratorConfig;
use umbruch_core::error::{Result, UmbruchError};

/// Browser binaries probed on PATH when no explicit binary is configured.
const BROWSER_CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome-stable",
    "google-chrome",
    "chrome",
];

/// Virtual time granted to the page before printing, so layout and local
/// resource loads settle deterministically.
const VIRTUAL_TIME_BUDGET_MS: u32 = 10_000;

/// A published artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedArtifact {
    /// Final path of the PDF.
    pub path: PathBuf,
    /// SHA-256 of the artifact bytes, hex encoded.
    pub sha256: String,
}

/// Boundary seam for the print backend.
///
/// The generation service is generic over this trait so tests can observe
/// whether a renderer session was ever started.
pub trait ArtifactRenderer {
    /// Render markup into the final artifact for an issue and return the
    /// published path.
    fn export(
        &self,
        markup: &str,
        issue_number: u32,
    ) -> impl Future<Output = Result<ExportedArtifact>> + Send;
}

/// Headless-Chromium print exporter.
pub struct PdfExporter {
    config: GeneratorConfig,
}

impl PdfExporter {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Deterministic artifact path for an issue.
    pub fn artifact_path(&self, issue_number: u32) -> PathBuf {
        self.config
            .output_dir
            .join(format!("issue-{issue_number}.pdf"))
    }

    /// Resolve the browser binary: explicit config wins, otherwise probe
    /// well-known names on PATH.
    fn resolve_browser(&self) -> Result<PathBuf> {
        if let Some(binary) = &self.config.browser_binary {
            return Ok(binary.clone());
        }

        for candidate in BROWSER_CANDIDATES {
            if let Some(path) = find_on_path(candidate) {
                debug!(browser = %path.display(), "resolved render engine on PATH");
                return Ok(path);
            }
        }

        Err(UmbruchError::RenderProcessFailure(format!(
            "no browser binary found — tried {}",
            BROWSER_CANDIDATES.join(", ")
        )))
    }

    #[instrument(skip(self, markup), fields(issue = issue_number))]
    async fn export_issue(&self, markup: &str, issue_number: u32) -> Result<ExportedArtifact> {
        tokio::fs::create_dir_all(&self.config.output_dir)
            .await
            .map_err(|e| {
                UmbruchError::ArtifactWriteFailure(format!(
                    "create {}: {e}",
                    self.config.output_dir.display()
                ))
            })?;

        // Staging lives inside the output directory so the final rename
        // stays on one filesystem.
        let staging = tempfile::TempDir::new_in(&self.config.output_dir)
            .map_err(|e| UmbruchError::ArtifactWriteFailure(format!("staging dir: {e}")))?;
        let page_path = staging.path().join("issue.html");
        let pdf_path = staging.path().join("issue.pdf");

        tokio::fs::write(&page_path, markup)
            .await
            .map_err(|e| UmbruchError::ArtifactWriteFailure(format!("write markup: {e}")))?;

        let browser = self.resolve_browser()?;
        let mut command = Command::new(&browser);
        command
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-first-run")
            .arg(format!("--virtual-time-budget={VIRTUAL_TIME_BUDGET_MS}"))
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", pdf_path.display()))
            .arg(format!("file://{}", page_path.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        debug!(browser = %browser.display(), "launching render engine");
        let mut child = command.spawn().map_err(|e| {
            UmbruchError::RenderProcessFailure(format!("launch {}: {e}", browser.display()))
        })?;

        let seconds = self.config.settle_timeout_secs;
        let status = match tokio::time::timeout(Duration::from_secs(seconds), child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                return Err(UmbruchError::RenderProcessFailure(format!(
                    "waiting on renderer: {e}"
                )));
            }
            Err(_) => {
                if let Err(e) = child.start_kill() {
                    warn!("failed to kill stalled renderer: {e}");
                }
                let _ = child.wait().await;
                return Err(UmbruchError::RenderTimeout { seconds });
            }
        };

        if !status.success() {
            return Err(UmbruchError::RenderProcessFailure(format!(
                "renderer exited with {status}"
            )));
        }

        let bytes = tokio::fs::read(&pdf_path).await.map_err(|e| {
            UmbruchError::RenderProcessFailure(format!("renderer produced no output: {e}"))
        })?;
        if bytes.is_empty() {
            return Err(UmbruchError::RenderProcessFailure(
                "renderer produced an empty artifact".into(),
            ));
        }

        let sha256 = hex::encode(Sha256::digest(&bytes));
        let final_path = self.artifact_path(issue_number);
        tokio::fs::rename(&pdf_path, &final_path)
            .await
            .map_err(|e| {
                UmbruchError::ArtifactWriteFailure(format!(
                    "publish {}: {e}",
                    final_path.display()
                ))
            })?;

        info!(
            path = %final_path.display(),
            sha256 = %sha256,
            bytes = bytes.len(),
            "artifact published"
        );
        Ok(ExportedArtifact {
            path: final_path,
            sha256,
        })
        // `staging` drops here, removing the markup and any partial PDF.
    }
}

impl ArtifactRenderer for PdfExporter {
    async fn export(&self, markup: &str, issue_number: u32) -> Result<ExportedArtifact> {
        self.export_issue(markup, issue_number).await
    }
}

/// Look up an executable by name across PATH.
fn find_on_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> GeneratorConfig {
        GeneratorConfig {
            output_dir: dir.to_path_buf(),
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn artifact_path_is_keyed_by_issue_number() {
        let exporter = PdfExporter::new(config_in(Path::new("/var/umbruch")));
        assert_eq!(
            exporter.artifact_path(17),
            PathBuf::from("/var/umbruch/issue-17.pdf")
        );
    }

    #[test]
    fn find_on_path_rejects_unknown_names() {
        assert!(find_on_path("definitely-not-a-browser-umbruch").is_none());
    }

    #[test]
    fn configured_binary_overrides_path_probe() {
        let mut config = config_in(Path::new("/tmp"));
        config.browser_binary = Some(PathBuf::from("/opt/custom/chromium"));
        let exporter = PdfExporter::new(config);
        assert_eq!(
            exporter.resolve_browser().expect("resolve"),
            PathBuf::from("/opt/custom/chromium")
        );
    }

    #[tokio::test]
    async fn missing_browser_is_a_render_process_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = config_in(dir.path());
        config.browser_binary = Some(PathBuf::from("/nonexistent/browser"));

        let exporter = PdfExporter::new(config);
        let err = exporter.export("<html></html>", 1).await.unwrap_err();
        assert!(matches!(err, UmbruchError::RenderProcessFailure(_)));
        // No partial artifact may be visible at the final path.
        assert!(!dir.path().join("issue-1.pdf").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stalled_renderer_times_out_and_is_torn_down() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let sleeper = dir.path().join("sleeper.sh");
        std::fs::write(&sleeper, "#!/bin/sh\nsleep 60\n").expect("write script");
        std::fs::set_permissions(&sleeper, std::fs::Permissions::from_mode(0o755))
            .expect("chmod");

        let mut config = config_in(dir.path());
        config.browser_binary = Some(sleeper);
        config.settle_timeout_secs = 1;

        let exporter = PdfExporter::new(config);
        let err = exporter.export("<html></html>", 2).await.unwrap_err();
        assert!(matches!(err, UmbruchError::RenderTimeout { seconds: 1 }));
        assert!(!dir.path().join("issue-2.pdf").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_renderer_surfaces_exit_status() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let failer = dir.path().join("failer.sh");
        std::fs::write(&failer, "#!/bin/sh\nexit 3\n").expect("write script");
        std::fs::set_permissions(&failer, std::fs::Permissions::from_mode(0o755))
            .expect("chmod");

        let mut config = config_in(dir.path());
        config.browser_binary = Some(failer);

        let exporter = PdfExporter::new(config);
        let err = exporter.export("<html></html>", 3).await.unwrap_err();
        match err {
            UmbruchError::RenderProcessFailure(detail) => assert!(detail.contains("exited")),
            other => panic!("expected RenderProcessFailure, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_render_publishes_atomically_with_hash() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        // Fake renderer: writes a byte into the --print-to-pdf target.
        let faker = dir.path().join("faker.sh");
        let script = "#!/bin/sh\nfor arg in \"$@\"; do\n  case \"$arg\" in\n    --print-to-pdf=*) printf '%%PDF-1.7 fake' > \"${arg#--print-to-pdf=}\" ;;\n  esac\ndone\n";
        std::fs::write(&faker, script).expect("write script");
        std::fs::set_permissions(&faker, std::fs::Permissions::from_mode(0o755))
            .expect("chmod");

        let mut config = config_in(dir.path());
        config.browser_binary = Some(faker);

        let exporter = PdfExporter::new(config);
        let artifact = exporter.export("<html></html>", 4).await.expect("export");
        assert_eq!(artifact.path, dir.path().join("issue-4.pdf"));
        assert!(artifact.path.exists());
        assert_eq!(artifact.sha256.len(), 64);
        // Staging directory is gone once the artifact is published.
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read dir")
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .collect();
        assert!(leftovers.is_empty());
    }
}
