// SPDX-License-Identifier: MIT
//
// PDF reader — open, inspect, decrypt, and rotate existing PDF documents
// using the `lopdf` crate.

use std::path::Path;

use foliant_core::error::{FoliantError, Result};
use foliant_core::types::RotationAngle;
use lopdf::{Document, Object};
use tracing::{debug, info, instrument};

/// Reads and manipulates existing PDF files.
///
/// Wraps `lopdf::Document` and provides the operations the dispatcher needs
/// on a loaded file: page counts, Info-dictionary metadata, text extraction,
/// decryption, and page rotation. Page-level assembly (merge, split) lives in
/// [`crate::pdf::assemble`].
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Source path, if opened from a file (useful for diagnostics).
    source_path: Option<String>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            FoliantError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.display().to_string()),
        })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            FoliantError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    ///
    /// A still-encrypted document exposes no readable page tree, so this
    /// returns 0 until [`PdfReader::decrypt`] succeeds.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Return the source path if the reader was created via [`PdfReader::open`].
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    /// Whether the document carries an /Encrypt dictionary.
    pub fn is_encrypted(&self) -> bool {
        self.document.is_encrypted()
    }

    /// Key/value pairs from the document's /Info dictionary.
    ///
    /// Entries whose value renders to an empty string are skipped, matching
    /// what a user expects from "show me the metadata". Returns an empty list
    /// when the document has no Info dictionary at all.
    pub fn metadata(&self) -> Vec<(String, String)> {
        let Some(dict) = self.info_dictionary() else {
            return Vec::new();
        };

        let mut entries = Vec::new();
        for (key, value) in dict.iter() {
            let name = String::from_utf8_lossy(key).to_string();
            let rendered = render_metadata_value(value);
            if !rendered.is_empty() {
                entries.push((name, rendered));
            }
        }
        entries
    }

    /// Extract the text of every page, in page order.
    ///
    /// Pages without extractable text yield an empty string.
    #[instrument(skip_all, fields(pages = self.page_count()))]
    pub fn text_by_page(&self) -> Vec<String> {
        self.document
            .get_pages()
            .keys()
            .map(|page| self.document.extract_text(&[*page]).unwrap_or_default())
            .collect()
    }

    // -- Edits ----------------------------------------------------------------

    /// Apply password protection to the document in place.
    #[instrument(skip_all)]
    pub fn encrypt(&mut self, password: &str) -> Result<()> {
        crate::pdf::crypto::encrypt_with_password(&mut self.document, password)
    }

    /// Decrypt the document in place.
    ///
    /// Fails with [`FoliantError::NotEncrypted`] when the document carries no
    /// encryption at all; any failure of the decryption itself is reported as
    /// [`FoliantError::WrongPassword`].
    #[instrument(skip_all)]
    pub fn decrypt(&mut self, password: &str) -> Result<()> {
        let label = self.source_label();
        if !self.document.is_encrypted() {
            return Err(FoliantError::NotEncrypted(label));
        }

        self.document
            .decrypt(password)
            .map_err(|_| FoliantError::WrongPassword(label))?;

        // lopdf leaves the /Encrypt entry behind; drop it so the document
        // saves as a plain unencrypted file.
        self.document.trailer.remove(b"Encrypt");

        info!("Document decrypted");
        Ok(())
    }

    /// Rotate a single page (1-indexed) by `angle`, leaving the others
    /// untouched. The rotation adds to any existing /Rotate value.
    #[instrument(skip(self), fields(page_number, angle = %angle))]
    pub fn rotate_page(&mut self, page_number: u32, angle: RotationAngle) -> Result<()> {
        let pages = self.document.get_pages();
        let total = pages.len() as u32;

        let page_id = *pages
            .get(&page_number)
            .ok_or(FoliantError::InvalidPage {
                page: page_number,
                total,
            })?;

        let existing = self
            .document
            .get_object(page_id)
            .ok()
            .and_then(|obj| match obj {
                Object::Dictionary(dict) => {
                    dict.get(b"Rotate").ok().and_then(|r| r.as_i64().ok())
                }
                _ => None,
            })
            .unwrap_or(0);

        let new_rotation = (existing + angle.degrees()).rem_euclid(360);

        if let Ok(Object::Dictionary(dict)) = self.document.get_object_mut(page_id) {
            dict.set("Rotate", Object::Integer(new_rotation));
        }

        info!(page_number, existing, new_rotation, "Page rotated");
        Ok(())
    }

    // -- Output ---------------------------------------------------------------

    /// Serialise the (possibly modified) document.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.document.save_to(&mut output).map_err(|err| {
            FoliantError::PdfError(format!("failed to serialise PDF: {}", err))
        })?;
        Ok(output)
    }

    /// Borrow the underlying lopdf document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Consume the reader, yielding the underlying document.
    pub fn into_document(self) -> Document {
        self.document
    }

    // -- Helpers --------------------------------------------------------------

    fn source_label(&self) -> String {
        self.source_path
            .clone()
            .unwrap_or_else(|| "<in-memory document>".to_string())
    }

    /// Resolve the /Info entry from the trailer, following one reference if
    /// needed (both direct dictionaries and references occur in the wild).
    fn info_dictionary(&self) -> Option<&lopdf::Dictionary> {
        match self.document.trailer.get(b"Info").ok()? {
            Object::Reference(id) => self
                .document
                .get_object(*id)
                .ok()
                .and_then(|obj| obj.as_dict().ok()),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }
}

/// Render a metadata value as display text.
///
/// PDF text strings may be UTF-16BE with a byte-order mark; everything else
/// is treated as Latin-1-ish and converted lossily.
fn render_metadata_value(value: &Object) -> String {
    match value {
        Object::String(bytes, _) => decode_text_string(bytes),
        Object::Name(bytes) => String::from_utf8_lossy(bytes).to_string(),
        Object::Integer(n) => n.to_string(),
        Object::Real(r) => r.to_string(),
        Object::Boolean(b) => b.to_string(),
        _ => String::new(),
    }
}

fn decode_text_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&utf16)
    } else {
        String::from_utf8_lossy(bytes).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::test_support::sample_pdf;

    #[test]
    fn page_count_matches_source() {
        let bytes = sample_pdf(3, &[]);
        let reader = PdfReader::from_bytes(&bytes).unwrap();
        assert_eq!(reader.page_count(), 3);
    }

    #[test]
    fn open_reads_a_document_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, sample_pdf(2, &[])).unwrap();

        let reader = PdfReader::open(&path).unwrap();
        assert_eq!(reader.page_count(), 2);
        assert_eq!(reader.source_path(), Some(path.display().to_string().as_str()));
    }

    #[test]
    fn metadata_reads_info_dictionary() {
        let bytes = sample_pdf(1, &[("Title", "Quarterly Report"), ("Author", "Dana")]);
        let reader = PdfReader::from_bytes(&bytes).unwrap();
        let meta = reader.metadata();
        assert!(meta.iter().any(|(k, v)| k == "Title" && v == "Quarterly Report"));
        assert!(meta.iter().any(|(k, v)| k == "Author" && v == "Dana"));
    }

    #[test]
    fn empty_metadata_values_are_skipped() {
        let bytes = sample_pdf(1, &[("Title", "Kept"), ("Subject", "")]);
        let reader = PdfReader::from_bytes(&bytes).unwrap();
        let meta = reader.metadata();
        assert!(meta.iter().any(|(k, _)| k == "Title"));
        assert!(!meta.iter().any(|(k, _)| k == "Subject"));
    }

    #[test]
    fn missing_info_dictionary_gives_no_entries() {
        let bytes = sample_pdf(1, &[]);
        let reader = PdfReader::from_bytes(&bytes).unwrap();
        assert!(reader.metadata().is_empty());
    }

    #[test]
    fn utf16_title_is_decoded() {
        // "Hi" as UTF-16BE with BOM.
        let encoded = [0xFEu8, 0xFF, 0x00, b'H', 0x00, b'i'];
        assert_eq!(decode_text_string(&encoded), "Hi");
        assert_eq!(decode_text_string(b"plain"), "plain");
    }

    #[test]
    fn encrypted_document_exposes_no_pages() {
        let mut doc = Document::load_mem(&sample_pdf(2, &[])).unwrap();
        crate::pdf::crypto::encrypt_with_password(&mut doc, "secret").unwrap();
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        let reader = PdfReader::from_bytes(&bytes).unwrap();
        assert!(reader.is_encrypted());
        assert_eq!(reader.page_count(), 0);
        assert!(reader.metadata().is_empty());
    }

    #[test]
    fn decrypt_on_plain_document_is_rejected() {
        let bytes = sample_pdf(1, &[]);
        let mut reader = PdfReader::from_bytes(&bytes).unwrap();
        assert!(!reader.is_encrypted());
        assert!(matches!(
            reader.decrypt("whatever"),
            Err(FoliantError::NotEncrypted(_))
        ));
    }

    #[test]
    fn rotate_sets_rotate_on_that_page_only() {
        let bytes = sample_pdf(3, &[]);
        let mut reader = PdfReader::from_bytes(&bytes).unwrap();
        reader
            .rotate_page(2, RotationAngle::from_degrees(180).unwrap())
            .unwrap();

        let out = reader.to_bytes().unwrap();
        let reloaded = Document::load_mem(&out).unwrap();
        let pages = reloaded.get_pages();
        assert_eq!(pages.len(), 3);

        let rotation_of = |page: u32| -> i64 {
            let id = pages[&page];
            match reloaded.get_object(id) {
                Ok(Object::Dictionary(dict)) => dict
                    .get(b"Rotate")
                    .ok()
                    .and_then(|r| r.as_i64().ok())
                    .unwrap_or(0),
                _ => 0,
            }
        };
        assert_eq!(rotation_of(1), 0);
        assert_eq!(rotation_of(2), 180);
        assert_eq!(rotation_of(3), 0);
    }

    #[test]
    fn rotate_wraps_past_a_full_turn() {
        let bytes = sample_pdf(1, &[]);
        let mut reader = PdfReader::from_bytes(&bytes).unwrap();
        reader
            .rotate_page(1, RotationAngle::from_degrees(270).unwrap())
            .unwrap();
        reader
            .rotate_page(1, RotationAngle::from_degrees(180).unwrap())
            .unwrap();

        let out = reader.to_bytes().unwrap();
        let reloaded = Document::load_mem(&out).unwrap();
        let id = reloaded.get_pages()[&1];
        let rotate = match reloaded.get_object(id) {
            Ok(Object::Dictionary(dict)) => dict.get(b"Rotate").unwrap().as_i64().unwrap(),
            _ => panic!("page dictionary missing"),
        };
        assert_eq!(rotate, 90);
    }

    #[test]
    fn rotate_out_of_range_page_is_rejected() {
        let bytes = sample_pdf(3, &[]);
        let mut reader = PdfReader::from_bytes(&bytes).unwrap();
        let angle = RotationAngle::from_degrees(90).unwrap();
        assert!(matches!(
            reader.rotate_page(0, angle),
            Err(FoliantError::InvalidPage { page: 0, total: 3 })
        ));
        assert!(matches!(
            reader.rotate_page(4, angle),
            Err(FoliantError::InvalidPage { page: 4, total: 3 })
        ));
    }

    #[test]
    fn garbage_bytes_are_a_pdf_error() {
        assert!(matches!(
            PdfReader::from_bytes(b"not a pdf at all"),
            Err(FoliantError::PdfError(_))
        ));
    }
}
