// SPDX-License-Identifier: MIT
//
// Sample-file generator (menu option 11): a fixed set of small PDFs and
// images to try the other operations on.

use std::fs;
use std::path::{Path, PathBuf};

use foliant_core::{AppConfig, OperationReport, Result};
use foliant_document::PdfWriter;
use foliant_document::image::sample_card_png;

use crate::output::OutputSink;

const SAMPLE_PDFS: [(&str, usize); 4] = [
    ("sample_single.pdf", 1),
    ("sample_multi.pdf", 3),
    ("sample_merge_a.pdf", 1),
    ("sample_merge_b.pdf", 1),
];

const SAMPLE_IMAGES: [&str; 2] = ["sample_image_1.png", "sample_image_2.png"];

/// Create the sample set under `config.sample_dir`, overwriting any previous
/// run. Each created file is reported through the sink as it lands.
pub fn create_samples(sink: &dyn OutputSink, config: &AppConfig) -> Result<OperationReport> {
    let dir = Path::new(&config.sample_dir);
    fs::create_dir_all(dir)?;

    let mut writer = PdfWriter::new(config.paper_size);
    writer.set_title("Foliant Sample");

    let mut outputs: Vec<PathBuf> = Vec::new();

    for (name, pages) in SAMPLE_PDFS {
        let path = dir.join(name);
        fs::write(&path, writer.blank_document(pages)?)?;
        sink.success(&format!("Created sample PDF: {}", path.display()));
        outputs.push(path);
    }

    for name in SAMPLE_IMAGES {
        let path = dir.join(name);
        fs::write(&path, sample_card_png(800, 600)?)?;
        sink.success(&format!("Created sample image: {}", path.display()));
        outputs.push(path);
    }

    Ok(OperationReport {
        message: "Sample files created successfully!".to_string(),
        outputs,
    })
}
