// SPDX-License-Identifier: MIT
//
// foliant-document — document processing for Foliant.
//
// Provides PDF operations (read, create, merge, split, rotate, password
// protection), Word conversions (PDF text to .docx and back), and sample
// image generation. PDF page rasterisation lives behind the "raster"
// feature because it binds the native Pdfium library at runtime.

pub mod image;
pub mod pdf;
pub mod word;

#[cfg(feature = "raster")]
pub mod raster;

// Re-export the primary structs so callers can use `foliant_document::PdfReader` etc.
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfWriter;
