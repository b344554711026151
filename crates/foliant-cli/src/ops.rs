// SPDX-License-Identifier: MIT
//
// Operation dispatcher — one entry point per user-facing action.
//
// Every entry point follows the same shape: validate the inputs, perform the
// operation through foliant-document, derive the output path, write the
// result, and return an `OperationReport`. Results are serialised to memory
// first and written in one step, so a failed operation never leaves a partial
// output file behind.

use std::fs;
use std::path::{Path, PathBuf};

use foliant_core::error::FoliantError;
use foliant_core::{
    AppConfig, FileRole, OperationReport, Result, RotationAngle, naming, validate,
};
use foliant_document::pdf::assemble;
use foliant_document::word;
use foliant_document::{PdfReader, PdfWriter};
use tracing::debug;

use crate::output::OutputSink;

/// Open a PDF whose content is about to be read or rewritten.
///
/// A still-encrypted document exposes no readable pages or metadata, so every
/// operation except decryption refuses it up front instead of producing empty
/// output and claiming success.
fn open_plain(input: &Path) -> Result<PdfReader> {
    let reader = PdfReader::open(input)?;
    if reader.is_encrypted() {
        return Err(FoliantError::PdfError(format!(
            "{} is encrypted; decrypt it first",
            input.display()
        )));
    }
    Ok(reader)
}

// -- Password protection ------------------------------------------------------

/// Encrypt a PDF with a password, writing `<stem>_encrypted.pdf`.
pub fn encrypt(sink: &dyn OutputSink, input: &Path, password: &str) -> Result<OperationReport> {
    validate(input, FileRole::Pdf)?;
    let _progress = sink.progress("Encrypting PDF...", None);

    let mut reader = open_plain(input)?;
    reader.encrypt(password)?;
    let bytes = reader.to_bytes()?;

    let output = naming::encrypted_output(input);
    fs::write(&output, bytes)?;

    Ok(OperationReport::single(
        format!("PDF encrypted successfully: {}", output.display()),
        output,
    ))
}

/// Decrypt a password-protected PDF, writing `<stem>_decrypted.pdf`.
pub fn decrypt(sink: &dyn OutputSink, input: &Path, password: &str) -> Result<OperationReport> {
    validate(input, FileRole::Pdf)?;
    let _progress = sink.progress("Decrypting PDF...", None);

    let mut reader = PdfReader::open(input)?;
    reader.decrypt(password)?;
    let bytes = reader.to_bytes()?;

    let output = naming::decrypted_output(input);
    fs::write(&output, bytes)?;

    Ok(OperationReport::single(
        format!("PDF decrypted successfully: {}", output.display()),
        output,
    ))
}

// -- Inspection ---------------------------------------------------------------

/// Show the PDF's /Info dictionary through the sink.
///
/// Writes nothing to disk; the report carries no message because the pairs
/// (or the "no metadata" notice) are already rendered.
pub fn extract_metadata(sink: &dyn OutputSink, input: &Path) -> Result<OperationReport> {
    validate(input, FileRole::Pdf)?;

    let reader = open_plain(input)?;
    let entries = reader.metadata();

    if entries.is_empty() {
        sink.notice("No metadata found in the PDF");
    } else {
        sink.plain("");
        sink.notice("PDF Metadata:");
        for (key, value) in &entries {
            sink.pair(key, value);
        }
    }

    Ok(OperationReport::new(""))
}

// -- Document assembly --------------------------------------------------------

/// Merge several PDFs into `output`, in the listed order.
///
/// Each path is validated as it is consumed, so the progress bar advances
/// file by file and the first bad path aborts before anything is written.
pub fn merge(sink: &dyn OutputSink, inputs: &[PathBuf], output: &Path) -> Result<OperationReport> {
    if inputs.is_empty() {
        return Err(FoliantError::EmptyInput("PDF files"));
    }

    let progress = sink.progress("Merging PDFs...", Some(inputs.len() as u64));

    let mut readers = Vec::with_capacity(inputs.len());
    for input in inputs {
        validate(input, FileRole::Pdf)?;
        readers.push(open_plain(input)?);
        progress.advance(1);
    }

    debug!(count = readers.len(), "All merge inputs opened");
    let bytes = assemble::merge_readers(readers)?;
    fs::write(output, bytes)?;

    Ok(OperationReport::single(
        format!("PDFs merged successfully: {}", output.display()),
        output.to_path_buf(),
    ))
}

/// Split a PDF into one single-page document per page, `page_<n>.pdf` under
/// `output_dir` (created if absent).
pub fn split(sink: &dyn OutputSink, input: &Path, output_dir: &Path) -> Result<OperationReport> {
    validate(input, FileRole::Pdf)?;
    fs::create_dir_all(output_dir)?;

    let reader = open_plain(input)?;
    let total = reader.page_count();
    let progress = sink.progress("Splitting PDF...", Some(total as u64));

    let mut outputs = Vec::with_capacity(total);
    for page_number in 1..=total as u32 {
        let bytes = assemble::extract_page_bytes(&reader, page_number)?;
        let path = naming::page_file(output_dir, page_number, "pdf");
        fs::write(&path, bytes)?;
        outputs.push(path);
        progress.advance(1);
    }

    Ok(OperationReport {
        message: format!("PDF split successfully into {}", output_dir.display()),
        outputs,
    })
}

/// Rotate one page (1-indexed) by 90, 180, or 270 degrees, writing
/// `<stem>_rotated_<angle>.pdf`.
pub fn rotate(
    sink: &dyn OutputSink,
    input: &Path,
    page_number: u32,
    degrees: i64,
) -> Result<OperationReport> {
    validate(input, FileRole::Pdf)?;
    let angle = RotationAngle::from_degrees(degrees)?;
    let _progress = sink.progress("Rotating page...", None);

    let mut reader = open_plain(input)?;
    reader.rotate_page(page_number, angle)?;
    let bytes = reader.to_bytes()?;

    let output = naming::rotated_output(input, angle);
    fs::write(&output, bytes)?;

    Ok(OperationReport::single(
        format!("Page {page_number} rotated successfully: {}", output.display()),
        output,
    ))
}

// -- Conversions --------------------------------------------------------------

/// Extract a PDF's text into an editable `.docx` next to it.
pub fn pdf_to_word(sink: &dyn OutputSink, input: &Path) -> Result<OperationReport> {
    validate(input, FileRole::Pdf)?;
    let _progress = sink.progress("Converting PDF to Word...", None);

    let reader = open_plain(input)?;
    let docx = word::pdf_to_docx(&reader)?;

    let output = naming::converted_output(input, "docx");
    fs::write(&output, docx)?;

    Ok(OperationReport::single(
        format!("PDF converted to Word successfully: {}", output.display()),
        output,
    ))
}

/// Render a Word document's text as a PDF next to it.
pub fn word_to_pdf(
    sink: &dyn OutputSink,
    input: &Path,
    config: &AppConfig,
) -> Result<OperationReport> {
    validate(input, FileRole::Word)?;
    let _progress = sink.progress("Converting Word to PDF...", None);

    let docx = fs::read(input)?;
    let writer = PdfWriter::new(config.paper_size);
    let pdf = word::docx_to_pdf(&docx, &writer)?;

    let output = naming::converted_output(input, "pdf");
    fs::write(&output, pdf)?;

    Ok(OperationReport::single(
        format!(
            "Word document converted to PDF successfully: {}",
            output.display()
        ),
        output,
    ))
}

/// Compose one PDF page per image, in the listed order.
pub fn images_to_pdf(
    sink: &dyn OutputSink,
    inputs: &[PathBuf],
    output: &Path,
    config: &AppConfig,
) -> Result<OperationReport> {
    if inputs.is_empty() {
        return Err(FoliantError::EmptyInput("image files"));
    }

    let progress = sink.progress("Converting images to PDF...", Some(inputs.len() as u64));

    let mut buffers = Vec::with_capacity(inputs.len());
    for input in inputs {
        validate(input, FileRole::Image)?;
        buffers.push(fs::read(input)?);
        progress.advance(1);
    }

    let mut writer = PdfWriter::new(config.paper_size);
    writer.set_image_dpi(config.image_dpi);
    let pdf = writer.create_from_images(&buffers)?;
    fs::write(output, pdf)?;

    Ok(OperationReport::single(
        format!("Images converted to PDF successfully: {}", output.display()),
        output.to_path_buf(),
    ))
}

/// Rasterise each PDF page to `page_<n>.png` under `output_dir` (created if
/// absent). Requires the Pdfium runtime library.
pub fn pdf_to_images(
    sink: &dyn OutputSink,
    input: &Path,
    output_dir: &Path,
    config: &AppConfig,
) -> Result<OperationReport> {
    validate(input, FileRole::Pdf)?;
    fs::create_dir_all(output_dir)?;

    let _progress = sink.progress("Converting PDF to images...", None);
    let pages = rasterize(input, config.raster_width)?;

    let mut outputs = Vec::with_capacity(pages.len());
    for (index, png) in pages.iter().enumerate() {
        let path = naming::page_file(output_dir, index as u32 + 1, "png");
        fs::write(&path, png)?;
        outputs.push(path);
    }

    Ok(OperationReport {
        message: format!(
            "PDF converted to images successfully in: {}",
            output_dir.display()
        ),
        outputs,
    })
}

#[cfg(feature = "raster")]
fn rasterize(input: &Path, target_width: u32) -> Result<Vec<Vec<u8>>> {
    foliant_document::raster::rasterize_pages(input, target_width)
}

#[cfg(not(feature = "raster"))]
fn rasterize(_input: &Path, _target_width: u32) -> Result<Vec<Vec<u8>>> {
    Err(FoliantError::Conversion(
        "built without PDF rasterisation support".into(),
    ))
}
