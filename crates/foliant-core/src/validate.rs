// SPDX-License-Identifier: MIT
//
// Input validation: every path is checked against its declared role before
// any operation touches it.

use std::path::Path;

use crate::error::{FoliantError, Result};
use crate::types::FileRole;

/// Check that `path` names an existing file with an extension accepted for
/// `role`.
///
/// Existence is checked first, so a missing `report.docx` passed as a PDF
/// reports [`FoliantError::NotFound`], not [`FoliantError::WrongType`].
pub fn validate(path: &Path, role: FileRole) -> Result<()> {
    if !path.is_file() {
        return Err(FoliantError::NotFound(path.display().to_string()));
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !role.matches_extension(ext) {
        return Err(FoliantError::WrongType {
            expected: role.label(),
            path: path.display().to_string(),
        });
    }

    Ok(())
}
