// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Generator configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, UmbruchError};

/// Standard paper sizes for the print artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A5,
    Letter,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// CSS `@page size` descriptor value.
    pub fn css_size(&self) -> String {
        match self {
            Self::A4 => "A4".into(),
            Self::A5 => "A5".into(),
            Self::Letter => "letter".into(),
            Self::Custom {
                width_mm,
                height_mm,
            } => format!("{width_mm}mm {height_mm}mm"),
        }
    }
}

/// Print margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub top_mm: u32,
    pub right_mm: u32,
    pub bottom_mm: u32,
    pub left_mm: u32,
}

impl Margins {
    /// CSS shorthand `margin` value (top right bottom left).
    pub fn css(&self) -> String {
        format!(
            "{}mm {}mm {}mm {}mm",
            self.top_mm, self.right_mm, self.bottom_mm, self.left_mm
        )
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top_mm: 20,
            right_mm: 15,
            bottom_mm: 20,
            left_mm: 15,
        }
    }
}

/// Settings for one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Paper size of the artifact (default A4).
    pub paper_size: PaperSize,
    /// Print margins applied via `@page` CSS.
    pub margins: Margins,
    /// Directory the finished artifact is published into.
    pub output_dir: PathBuf,
    /// Explicit browser binary. When unset, well-known Chromium/Chrome
    /// names are probed on PATH.
    pub browser_binary: Option<PathBuf>,
    /// Maximum time the render engine may take to settle and emit the PDF.
    pub settle_timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            margins: Margins::default(),
            output_dir: PathBuf::from("artifacts"),
            browser_binary: None,
            settle_timeout_secs: 30,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| UmbruchError::Config(format!("read config: {e}")))?;
        serde_json::from_str(&raw).map_err(|e| UmbruchError::Config(format!("parse config: {e}")))
    }
}
