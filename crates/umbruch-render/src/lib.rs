// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// umbruch-render — Turns a composed document tree into print-ready markup
// and drives a headless browser session to emit the fixed-size PDF artifact.

pub mod export;
pub mod template;

pub use export::{ArtifactRenderer, ExportedArtifact, PdfExporter};
pub use template::{RenderContext, render_html};
