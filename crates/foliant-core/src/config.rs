// SPDX-License-Identifier: MIT
//
// Application configuration.

use serde::{Deserialize, Serialize};

/// Runtime settings, built with defaults at startup and threaded through.
/// Nothing here is persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Paper size for documents Foliant creates from text or images.
    pub paper_size: crate::PaperSize,
    /// Dots per inch used when placing images onto PDF pages.
    pub image_dpi: f32,
    /// Target pixel width when rasterising PDF pages to images.
    pub raster_width: u32,
    /// Directory the sample-file generator writes into.
    pub sample_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            paper_size: crate::PaperSize::Letter,
            image_dpi: 150.0,
            raster_width: 2000,
            sample_dir: "sample_files".into(),
        }
    }
}
