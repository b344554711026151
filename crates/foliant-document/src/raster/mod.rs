// SPDX-License-Identifier: MIT
//
// PDF rasterisation — render pages to PNG images via `pdfium-render`.
//
// Pdfium is a native library resolved at runtime: the working directory is
// tried first, then the system library path. When neither holds a Pdfium
// build the operation fails with a conversion error rather than aborting,
// so the rest of the application keeps working without the library.

use crate::image::encode_png;
use foliant_core::error::{FoliantError, Result};
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{info, instrument};

fn bind_pdfium() -> Result<Pdfium> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|err| {
            FoliantError::Conversion(format!("Pdfium library not available: {:?}", err))
        })?;
    Ok(Pdfium::new(bindings))
}

/// Render every page of a PDF to a PNG image at the given pixel width.
///
/// Returns the encoded pages in document order.
#[instrument(skip_all, fields(path = %path.display(), target_width))]
pub fn rasterize_pages(path: &Path, target_width: u32) -> Result<Vec<Vec<u8>>> {
    let pdfium = bind_pdfium()?;
    let document = pdfium.load_pdf_from_file(path, None).map_err(|err| {
        FoliantError::Conversion(format!("failed to open {}: {:?}", path.display(), err))
    })?;

    let config = PdfRenderConfig::new().set_target_width(target_width as i32);

    let mut pages = Vec::new();
    for (index, page) in document.pages().iter().enumerate() {
        let bitmap = page.render_with_config(&config).map_err(|err| {
            FoliantError::Conversion(format!("failed to render page {}: {:?}", index + 1, err))
        })?;
        pages.push(encode_png(&bitmap.as_image())?);
    }

    info!(pages = pages.len(), "Rasterised document");
    Ok(pages)
}
