// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Umbruch.
//
// One generation request terminates in exactly one of {artifact path,
// structured error}. Malformed per-element page metadata is absorbed by the
// page assembler and never surfaces here; only structural failures do.

use thiserror::Error;

/// Top-level error type for all Umbruch operations.
#[derive(Debug, Error)]
pub enum UmbruchError {
    // -- Structural generation failures --
    #[error("issue {0} not found in the content store")]
    IssueNotFound(u32),

    #[error("manual print generation is disabled for issue {0}")]
    GenerationDisabled(u32),

    #[error("issue {0} has no printable content")]
    NoContentFound(u32),

    // -- Render engine --
    #[error("render engine failure: {0}")]
    RenderProcessFailure(String),

    #[error("render did not settle within {seconds}s")]
    RenderTimeout { seconds: u64 },

    // -- Artifact output --
    #[error("artifact write failed: {0}")]
    ArtifactWriteFailure(String),

    // -- Collaborators / ambient --
    #[error("content store read failed: {0}")]
    Store(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, UmbruchError>;
