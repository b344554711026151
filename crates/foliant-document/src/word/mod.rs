// SPDX-License-Identifier: MIT
//
// Word document support — build and read .docx files via `docx-rs`.
//
// Conversions here are text-centric: a .docx produced from a PDF carries the
// extracted text one paragraph per line, and reading a .docx flattens it back
// to plain text. Layout, styling, and embedded media are not preserved.

use docx_rs::{DocumentChild, Docx, Paragraph, ParagraphChild, Run, RunChild, read_docx};
use foliant_core::error::{FoliantError, Result};
use std::io::Cursor;
use tracing::{debug, instrument};

use crate::pdf::reader::PdfReader;
use crate::pdf::writer::PdfWriter;

// -- Conversions --------------------------------------------------------------

/// Convert an opened PDF into a .docx carrying its extracted text.
///
/// Still-encrypted PDFs are rejected; their text reads as empty, which would
/// turn into a silently blank .docx.
#[instrument(skip_all, fields(pages = reader.page_count()))]
pub fn pdf_to_docx(reader: &PdfReader) -> Result<Vec<u8>> {
    if reader.is_encrypted() {
        return Err(FoliantError::PdfError(
            "document is encrypted; decrypt it first".into(),
        ));
    }

    docx_from_pages(&reader.text_by_page())
}

/// Render the text of a .docx document as a PDF.
#[instrument(skip_all)]
pub fn docx_to_pdf(docx_bytes: &[u8], writer: &PdfWriter) -> Result<Vec<u8>> {
    let text = text_from_docx(docx_bytes)?;
    writer.create_from_text(&text)
}

// -- Writing ------------------------------------------------------------------

/// Build a .docx document from per-page text blocks.
///
/// Each line becomes its own paragraph; an empty paragraph separates
/// consecutive pages.
#[instrument(skip_all, fields(pages = pages.len()))]
pub fn docx_from_pages(pages: &[String]) -> Result<Vec<u8>> {
    let mut docx = Docx::new();
    let mut paragraphs: usize = 0;

    for (index, page_text) in pages.iter().enumerate() {
        if index > 0 {
            docx = docx.add_paragraph(Paragraph::new());
            paragraphs += 1;
        }
        for line in page_text.lines() {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
            paragraphs += 1;
        }
    }

    // A document with no paragraphs at all is given a single empty one so
    // that Word opens it cleanly.
    if paragraphs == 0 {
        docx = docx.add_paragraph(Paragraph::new());
        paragraphs = 1;
    }

    debug!(paragraphs, "Word document assembled");

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|err| FoliantError::Conversion(format!("failed to write Word document: {}", err)))?;
    Ok(cursor.into_inner())
}

// -- Reading ------------------------------------------------------------------

/// Flatten a .docx document to plain text, one line per paragraph.
#[instrument(skip_all, fields(bytes = bytes.len()))]
pub fn text_from_docx(bytes: &[u8]) -> Result<String> {
    let docx = read_docx(bytes)
        .map_err(|err| FoliantError::Conversion(format!("failed to read Word document: {}", err)))?;

    let mut lines: Vec<String> = Vec::new();
    for child in docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut line = String::new();
            for paragraph_child in paragraph.children {
                if let ParagraphChild::Run(run) = paragraph_child {
                    for run_child in run.children {
                        if let RunChild::Text(text) = run_child {
                            line.push_str(&text.text);
                        }
                    }
                }
            }
            lines.push(line);
        }
    }

    debug!(paragraphs = lines.len(), "Word document read");

    Ok(lines.join("\n"))
}
