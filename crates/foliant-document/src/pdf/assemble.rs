// SPDX-License-Identifier: MIT
//
// Page-level document assembly: merging several PDFs into one and pulling a
// single page out into a standalone document.
//
// Both operations rebuild the page tree from scratch: source objects are
// renumbered into one id space, old Catalog/Pages nodes are thrown away, and
// a fresh tree is wired up over the surviving pages. Objects that end up
// unreachable from the new trailer are pruned before saving.

use std::collections::{BTreeMap, BTreeSet};

use foliant_core::error::{FoliantError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, info, instrument};

use crate::pdf::reader::PdfReader;

/// Merge the pages of `documents` into a single document, in the given
/// order: all pages of the first document, then all pages of the second,
/// and so on.
///
/// Still-encrypted sources are rejected up front; their page trees read as
/// empty, so merging one would silently drop its pages.
#[instrument(skip_all, fields(documents = documents.len()))]
pub fn merge_documents(documents: Vec<Document>) -> Result<Document> {
    if documents.is_empty() {
        return Err(FoliantError::EmptyInput("PDF files"));
    }
    if let Some(position) = documents.iter().position(Document::is_encrypted) {
        return Err(FoliantError::PdfError(format!(
            "source document {} is encrypted; decrypt it first",
            position + 1
        )));
    }

    info!(count = documents.len(), "Merging PDF documents");
    let (pages, objects) = collect(documents)?;
    build(pages, objects)
}

/// Build a standalone one-page document from page `page_number` (1-indexed)
/// of `document`.
#[instrument(skip(document), fields(page_number))]
pub fn extract_page(document: &Document, page_number: u32) -> Result<Document> {
    if document.is_encrypted() {
        return Err(FoliantError::PdfError(
            "document is encrypted; decrypt it first".into(),
        ));
    }

    let total = document.get_pages().len() as u32;
    if page_number == 0 || page_number > total {
        return Err(FoliantError::InvalidPage {
            page: page_number,
            total,
        });
    }

    let (mut pages, objects) = collect(vec![document.clone()])?;
    let kept = pages.swap_remove(page_number as usize - 1);
    build(vec![kept], objects)
}

// -- Reader-facing surface ----------------------------------------------------
//
// The application layer works with `PdfReader` handles and byte buffers, not
// lopdf types; these wrappers close over the serialisation step.

/// Merge already-opened readers and serialise the result.
pub fn merge_readers(readers: Vec<PdfReader>) -> Result<Vec<u8>> {
    let documents = readers.into_iter().map(PdfReader::into_document).collect();
    serialize(merge_documents(documents)?)
}

/// Extract page `page_number` (1-indexed) of `reader` and serialise it.
pub fn extract_page_bytes(reader: &PdfReader, page_number: u32) -> Result<Vec<u8>> {
    serialize(extract_page(reader.document(), page_number)?)
}

fn serialize(mut document: Document) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    document
        .save_to(&mut bytes)
        .map_err(|err| FoliantError::PdfError(format!("failed to serialise PDF: {}", err)))?;
    Ok(bytes)
}

// -- Internals ----------------------------------------------------------------

/// Renumber every source document into one id space and gather its pages (in
/// page order) and its full object map.
fn collect(
    documents: Vec<Document>,
) -> Result<(Vec<(ObjectId, Object)>, BTreeMap<ObjectId, Object>)> {
    let mut max_id = 1;
    let mut pages: Vec<(ObjectId, Object)> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut document in documents {
        document.renumber_objects_with(max_id);
        max_id = document.max_id + 1;

        for (_, object_id) in document.get_pages() {
            let object = document
                .get_object(object_id)
                .map_err(|err| {
                    FoliantError::PdfError(format!(
                        "unreadable page object {:?}: {}",
                        object_id, err
                    ))
                })?
                .to_owned();
            pages.push((object_id, object));
        }

        objects.append(&mut document.objects);
    }

    Ok((pages, objects))
}

/// Wire a fresh Catalog and Pages tree over `pages`, carrying every
/// non-page-tree object across unchanged.
fn build(pages: Vec<(ObjectId, Object)>, objects: BTreeMap<ObjectId, Object>) -> Result<Document> {
    if pages.is_empty() {
        return Err(FoliantError::PdfError("no pages to assemble".into()));
    }

    let mut document = Document::with_version("1.5");
    let mut catalog_slot: Option<(ObjectId, Object)> = None;
    let mut pages_slot: Option<(ObjectId, Dictionary)> = None;

    for (object_id, object) in objects {
        match object.type_name().unwrap_or(b"") {
            b"Catalog" => {
                // Keep the first catalog's id; its contents are rewritten below.
                let id = catalog_slot.as_ref().map(|(id, _)| *id).unwrap_or(object_id);
                catalog_slot = Some((id, object));
            }
            b"Pages" => {
                if let Ok(dict) = object.as_dict() {
                    let mut merged = dict.clone();
                    if let Some((_, existing)) = &pages_slot {
                        merged.extend(existing);
                    }
                    let id = pages_slot.as_ref().map(|(id, _)| *id).unwrap_or(object_id);
                    pages_slot = Some((id, merged));
                }
            }
            // Pages are re-inserted below with a patched /Parent; bookmark
            // trees are dropped because their targets may not survive.
            b"Page" | b"Outlines" | b"Outline" => {}
            _ => {
                document.objects.insert(object_id, object);
            }
        }
    }

    let Some((catalog_id, catalog_object)) = catalog_slot else {
        return Err(FoliantError::PdfError(
            "source documents have no catalog".into(),
        ));
    };
    let Some((pages_id, mut pages_dict)) = pages_slot else {
        return Err(FoliantError::PdfError(
            "source documents have no page tree".into(),
        ));
    };

    for (object_id, object) in &pages {
        if let Ok(dict) = object.as_dict() {
            let mut dict = dict.clone();
            dict.set("Parent", Object::Reference(pages_id));
            document
                .objects
                .insert(*object_id, Object::Dictionary(dict));
        }
    }

    pages_dict.set("Count", pages.len() as u32);
    pages_dict.set(
        "Kids",
        pages
            .iter()
            .map(|(id, _)| Object::Reference(*id))
            .collect::<Vec<_>>(),
    );
    document
        .objects
        .insert(pages_id, Object::Dictionary(pages_dict));

    let mut catalog_dict = catalog_object
        .as_dict()
        .map_err(|err| FoliantError::PdfError(format!("catalog is not a dictionary: {}", err)))?
        .clone();
    catalog_dict.set("Pages", Object::Reference(pages_id));
    catalog_dict.remove(b"Outlines");
    document
        .objects
        .insert(catalog_id, Object::Dictionary(catalog_dict));

    document.trailer.set("Root", Object::Reference(catalog_id));

    drop_unreachable(&mut document);

    document.max_id = document.objects.len() as u32;
    document.renumber_objects();
    document.compress();

    debug!(
        pages = pages.len(),
        objects = document.objects.len(),
        "Assembly complete"
    );
    Ok(document)
}

/// Remove objects not reachable from the trailer, so a single-page extract
/// does not drag along the content streams of every other source page.
fn drop_unreachable(document: &mut Document) {
    let mut reachable: BTreeSet<ObjectId> = BTreeSet::new();
    let mut stack: Vec<ObjectId> = Vec::new();

    for (_, value) in document.trailer.iter() {
        collect_references(value, &mut stack);
    }

    while let Some(id) = stack.pop() {
        if !reachable.insert(id) {
            continue;
        }
        if let Ok(object) = document.get_object(id) {
            collect_references(object, &mut stack);
        }
    }

    document.objects.retain(|id, _| reachable.contains(id));
}

fn collect_references(object: &Object, out: &mut Vec<ObjectId>) {
    match object {
        Object::Reference(id) => out.push(*id),
        Object::Array(items) => {
            for item in items {
                collect_references(item, out);
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter() {
                collect_references(value, out);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter() {
                collect_references(value, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::crypto::encrypt_with_password;
    use crate::pdf::test_support::{sample_pdf, sample_pdf_sized};

    fn load(bytes: &[u8]) -> Document {
        Document::load_mem(bytes).unwrap()
    }

    fn save(mut document: Document) -> Vec<u8> {
        let mut bytes = Vec::new();
        document.save_to(&mut bytes).unwrap();
        bytes
    }

    /// Width of the MediaBox of `page_number`, to tell source documents apart.
    fn page_width(document: &Document, page_number: u32) -> i64 {
        let id = document.get_pages()[&page_number];
        let Ok(Object::Dictionary(dict)) = document.get_object(id) else {
            panic!("page {page_number} is not a dictionary");
        };
        let Ok(Object::Array(media_box)) = dict.get(b"MediaBox") else {
            panic!("page {page_number} has no MediaBox");
        };
        match media_box[2] {
            Object::Integer(w) => w,
            Object::Real(w) => w as i64,
            _ => panic!("unexpected MediaBox entry"),
        }
    }

    #[test]
    fn merge_preserves_page_counts_and_order() {
        let a = load(&sample_pdf_sized(1, 612, 792));
        let b = load(&sample_pdf_sized(2, 595, 842));

        let merged = merge_documents(vec![a, b]).unwrap();
        let reloaded = load(&save(merged));

        assert_eq!(reloaded.get_pages().len(), 3);
        assert_eq!(page_width(&reloaded, 1), 612);
        assert_eq!(page_width(&reloaded, 2), 595);
        assert_eq!(page_width(&reloaded, 3), 595);
    }

    #[test]
    fn merge_of_nothing_is_rejected() {
        assert!(matches!(
            merge_documents(Vec::new()),
            Err(FoliantError::EmptyInput("PDF files"))
        ));
    }

    #[test]
    fn extracted_page_stands_alone() {
        let source = load(&sample_pdf(3, &[]));
        let single = extract_page(&source, 2).unwrap();
        let reloaded = load(&save(single));
        assert_eq!(reloaded.get_pages().len(), 1);
    }

    #[test]
    fn extract_prunes_other_pages_content() {
        let source = load(&sample_pdf(3, &[]));
        let single = extract_page(&source, 1).unwrap();
        // The extract must not carry the other pages or their streams.
        assert!(single.objects.len() < source.objects.len());
    }

    #[test]
    fn extract_rejects_out_of_range_pages() {
        let source = load(&sample_pdf(3, &[]));
        assert!(matches!(
            extract_page(&source, 0),
            Err(FoliantError::InvalidPage { page: 0, total: 3 })
        ));
        assert!(matches!(
            extract_page(&source, 4),
            Err(FoliantError::InvalidPage { page: 4, total: 3 })
        ));
    }

    #[test]
    fn split_then_merge_round_trips_the_page_count() {
        let source = load(&sample_pdf(3, &[]));
        let parts: Vec<Document> = (1..=3)
            .map(|n| extract_page(&source, n).unwrap())
            .collect();
        for part in &parts {
            assert_eq!(part.get_pages().len(), 1);
        }

        let merged = merge_documents(parts).unwrap();
        let reloaded = load(&save(merged));
        assert_eq!(reloaded.get_pages().len(), 3);
    }

    #[test]
    fn encrypted_sources_are_rejected() {
        let mut doc = load(&sample_pdf(1, &[]));
        encrypt_with_password(&mut doc, "secret").unwrap();
        let locked_bytes = save(doc);

        // A merge must fail outright rather than drop the locked pages.
        let plain = PdfReader::from_bytes(&sample_pdf(1, &[])).unwrap();
        let locked = PdfReader::from_bytes(&locked_bytes).unwrap();
        assert!(matches!(
            merge_readers(vec![plain, locked]),
            Err(FoliantError::PdfError(_))
        ));

        let reloaded = load(&locked_bytes);
        assert!(matches!(
            extract_page(&reloaded, 1),
            Err(FoliantError::PdfError(_))
        ));
    }

    #[test]
    fn reader_wrappers_serialise_directly() {
        let first = PdfReader::from_bytes(&sample_pdf(1, &[])).unwrap();
        let second = PdfReader::from_bytes(&sample_pdf(2, &[])).unwrap();

        let merged = merge_readers(vec![first, second]).unwrap();
        assert_eq!(load(&merged).get_pages().len(), 3);

        let reader = PdfReader::from_bytes(&merged).unwrap();
        let page = extract_page_bytes(&reader, 3).unwrap();
        assert_eq!(load(&page).get_pages().len(), 1);
    }
}
