// SPDX-License-Identifier: MIT
//
// PDF module — reading, assembling, encrypting, and creating PDFs.

pub mod assemble;
pub mod crypto;
pub mod reader;
pub mod writer;

pub use reader::PdfReader;
pub use writer::PdfWriter;

#[cfg(test)]
pub(crate) mod test_support {
    use lopdf::{Document, Object, Stream, StringFormat, dictionary};

    /// Build a minimal `page_count`-page PDF with optional /Info entries,
    /// returned as serialised bytes. Each page carries a one-line text
    /// content stream so the file resembles something a real tool produced.
    pub(crate) fn sample_pdf(page_count: usize, info: &[(&str, &str)]) -> Vec<u8> {
        build_sample(page_count, info, 612, 792)
    }

    /// Same as [`sample_pdf`] but with an explicit MediaBox, so tests can
    /// tell pages from different source documents apart after a merge.
    pub(crate) fn sample_pdf_sized(page_count: usize, width: i64, height: i64) -> Vec<u8> {
        build_sample(page_count, &[], width, height)
    }

    fn build_sample(page_count: usize, info: &[(&str, &str)], width: i64, height: i64) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let media_box = vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(width),
            Object::Integer(height),
        ];

        let mut page_ids = Vec::new();
        for page_number in 1..=page_count {
            let content = format!("BT /F1 12 Tf 72 720 Td (Page {page_number}) Tj ET");
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_dict = dictionary! {
                "Type" => "Page",
                "MediaBox" => media_box.clone(),
                "Contents" => Object::Reference(content_id),
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => Object::Reference(font_id) },
                },
            };
            page_ids.push(doc.add_object(page_dict));
        }

        let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_count as i64),
        });

        for page_id in &page_ids {
            if let Ok(page_obj) = doc.get_object_mut(*page_id)
                && let Ok(dict) = page_obj.as_dict_mut()
            {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        if !info.is_empty() {
            let mut info_dict = lopdf::Dictionary::new();
            for (key, value) in info {
                info_dict.set(
                    key.as_bytes().to_vec(),
                    Object::String((*value).into(), StringFormat::Literal),
                );
            }
            let info_id = doc.add_object(info_dict);
            doc.trailer.set("Info", Object::Reference(info_id));
        }

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("serialise sample PDF");
        bytes
    }
}
