// SPDX-License-Identifier: MIT
//
// Derived output paths. Every operation that does not take an explicit
// output path derives one from its input with a fixed suffix, so repeated
// runs with the same input always produce the same output name.

use std::path::{Path, PathBuf};

use crate::types::RotationAngle;

/// Insert `suffix` between the file stem and the extension:
/// `report.pdf` + `_encrypted` -> `report_encrypted.pdf`.
pub fn with_stem_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => path.with_file_name(format!("{stem}{suffix}.{ext}")),
        None => path.with_file_name(format!("{stem}{suffix}")),
    }
}

/// `report.pdf` -> `report_encrypted.pdf`
pub fn encrypted_output(input: &Path) -> PathBuf {
    with_stem_suffix(input, "_encrypted")
}

/// `report.pdf` -> `report_decrypted.pdf`
pub fn decrypted_output(input: &Path) -> PathBuf {
    with_stem_suffix(input, "_decrypted")
}

/// `report.pdf` + 180 -> `report_rotated_180.pdf`
pub fn rotated_output(input: &Path, angle: RotationAngle) -> PathBuf {
    with_stem_suffix(input, &format!("_rotated_{}", angle.degrees()))
}

/// Extension swap for format conversions: `report.pdf` -> `report.docx`.
pub fn converted_output(input: &Path, new_extension: &str) -> PathBuf {
    input.with_extension(new_extension)
}

/// Per-page member file inside an output directory, 1-indexed:
/// `out/` + 3 + `pdf` -> `out/page_3.pdf`.
pub fn page_file(dir: &Path, page_number: u32, extension: &str) -> PathBuf {
    dir.join(format!("page_{page_number}.{extension}"))
}
