// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for editorial staff running generations.
//
// Every technical error is mapped to plain English with a clear suggestion,
// shown by the CLI when a generation request fails.

use crate::error::UmbruchError;

/// Severity of an error from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Renderer hiccup, slow machine — trying again may succeed.
    Transient,
    /// The operator must change something (flag, content, config).
    ActionRequired,
    /// Cannot be fixed by retrying — missing data or broken environment.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the operator should try.
    pub suggestion: String,
    /// Whether simply rerunning the command is worth it.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert an `UmbruchError` into operator-facing advice.
pub fn humanize_error(err: &UmbruchError) -> HumanError {
    match err {
        UmbruchError::IssueNotFound(number) => HumanError {
            message: format!("Issue {number} doesn't exist in the content store."),
            suggestion: "Check the issue number and the store path you passed.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        UmbruchError::GenerationDisabled(number) => HumanError {
            message: format!("Print generation is switched off for issue {number}."),
            suggestion: "Enable the manual generation flag on the issue in the CMS, then rerun."
                .into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        UmbruchError::NoContentFound(number) => HumanError {
            message: format!("Issue {number} has no articles with page placements."),
            suggestion: "Assign print pages to the issue's content in the CMS first.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        UmbruchError::RenderProcessFailure(detail) => HumanError {
            message: "The print rendering engine failed.".into(),
            suggestion: format!(
                "Make sure Chromium or Chrome is installed, or point --browser at a binary. ({detail})"
            ),
            retriable: true,
            severity: Severity::Transient,
        },

        UmbruchError::RenderTimeout { seconds } => HumanError {
            message: format!("Rendering didn't finish within {seconds} seconds."),
            suggestion: "Rerun, or raise the settle timeout in the config for large issues."
                .into(),
            retriable: true,
            severity: Severity::Transient,
        },

        UmbruchError::ArtifactWriteFailure(detail) => HumanError {
            message: "The finished PDF couldn't be written.".into(),
            suggestion: format!(
                "Check the output directory exists and has free space. ({detail})"
            ),
            retriable: true,
            severity: Severity::Transient,
        },

        UmbruchError::Store(detail) => HumanError {
            message: "The content store couldn't be read.".into(),
            suggestion: format!("Check the store export is complete and valid JSON. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        UmbruchError::Config(detail) => HumanError {
            message: "The configuration file is unusable.".into(),
            suggestion: format!("Fix the config file or drop it to use defaults. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        UmbruchError::Io(io_err) => HumanError {
            message: "A file couldn't be read or written.".into(),
            suggestion: format!("Check paths and permissions, then rerun. ({io_err})"),
            retriable: true,
            severity: Severity::Transient,
        },

        UmbruchError::Serialization(detail) => HumanError {
            message: "Some stored data couldn't be understood.".into(),
            suggestion: format!("The store export may be from an incompatible version. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        UmbruchError::Internal(detail) => HumanError {
            message: "Something went wrong inside the generator.".into(),
            suggestion: format!("Rerun. If this keeps happening, please report it. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}
