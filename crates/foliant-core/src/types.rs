// SPDX-License-Identifier: MIT
//
// Core domain types for Foliant.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{FoliantError, Result};

/// Roles an input file can be validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileRole {
    Pdf,
    Word,
    Image,
}

impl FileRole {
    /// Accepted file extensions, lower case, without the dot.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Pdf => &["pdf"],
            Self::Word => &["docx"],
            Self::Image => &["png", "jpg", "jpeg", "tiff", "bmp"],
        }
    }

    /// Short label used in error messages ("expected a PDF file: ...").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Word => "Word",
            Self::Image => "raster image",
        }
    }

    /// Whether `ext` (without the dot) is accepted for this role.
    /// Comparison is ASCII-case-insensitive.
    pub fn matches_extension(&self, ext: &str) -> bool {
        let lower = ext.to_ascii_lowercase();
        self.extensions().contains(&lower.as_str())
    }
}

/// Quarter-turn rotations accepted by the rotate operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationAngle {
    Cw90,
    Cw180,
    Cw270,
}

impl RotationAngle {
    /// The only constructor: rejects anything outside {90, 180, 270}.
    pub fn from_degrees(degrees: i64) -> Result<Self> {
        match degrees {
            90 => Ok(Self::Cw90),
            180 => Ok(Self::Cw180),
            270 => Ok(Self::Cw270),
            other => Err(FoliantError::InvalidAngle(other)),
        }
    }

    pub fn degrees(&self) -> i64 {
        match self {
            Self::Cw90 => 90,
            Self::Cw180 => 180,
            Self::Cw270 => 270,
        }
    }
}

impl std::fmt::Display for RotationAngle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// Standard paper sizes for documents Foliant creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

/// Successful outcome of a single user-facing operation.
///
/// Failures travel as [`FoliantError`]; this carries the success message and
/// the files the operation wrote, in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationReport {
    pub message: String,
    pub outputs: Vec<PathBuf>,
}

impl OperationReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            outputs: Vec::new(),
        }
    }

    /// Report for the common single-output case.
    pub fn single(message: impl Into<String>, output: PathBuf) -> Self {
        Self {
            message: message.into(),
            outputs: vec![output],
        }
    }
}
