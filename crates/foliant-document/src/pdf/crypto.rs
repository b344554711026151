// SPDX-License-Identifier: MIT
//
// Password protection for PDFs via lopdf's standard security handler.

use foliant_core::error::{FoliantError, Result};
use lopdf::Document;
use lopdf::encryption::{EncryptionState, EncryptionVersion, Permissions};
use tracing::{info, instrument};

/// Encrypt `document` in place with RC4-128.
///
/// The same password fills both the user and owner slots, and all usage
/// permissions stay granted; opening the file simply requires the password.
#[instrument(skip_all)]
pub fn encrypt_with_password(document: &mut Document, password: &str) -> Result<()> {
    let version = EncryptionVersion::V2 {
        document,
        owner_password: password,
        user_password: password,
        key_length: 128,
        permissions: Permissions::all(),
    };

    let state = EncryptionState::try_from(version)
        .map_err(|err| FoliantError::PdfError(format!("failed to prepare encryption: {}", err)))?;

    document
        .encrypt(&state)
        .map_err(|err| FoliantError::PdfError(format!("failed to encrypt document: {}", err)))?;

    info!("Document encrypted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::PdfReader;
    use crate::pdf::test_support::sample_pdf;
    use foliant_core::FoliantError;

    #[test]
    fn encrypt_then_decrypt_round_trips() {
        let mut doc = Document::load_mem(&sample_pdf(2, &[])).unwrap();
        encrypt_with_password(&mut doc, "abc123").unwrap();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        let mut reader = PdfReader::from_bytes(&bytes).unwrap();
        assert!(reader.is_encrypted());
        reader.decrypt("abc123").unwrap();
        assert_eq!(reader.page_count(), 2);

        // The decrypted output must load as a plain document.
        let plain = reader.to_bytes().unwrap();
        let reloaded = PdfReader::from_bytes(&plain).unwrap();
        assert!(!reloaded.is_encrypted());
        assert_eq!(reloaded.page_count(), 2);
    }

    #[test]
    fn wrong_password_is_reported_as_such() {
        let mut doc = Document::load_mem(&sample_pdf(1, &[])).unwrap();
        encrypt_with_password(&mut doc, "secret").unwrap();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        let mut reader = PdfReader::from_bytes(&bytes).unwrap();
        assert!(matches!(
            reader.decrypt("wrong"),
            Err(FoliantError::WrongPassword(_))
        ));
    }
}
