//! End-to-end pipeline tests: probe -> rasterize -> assemble over the
//! synthetic backend.

use std::sync::Arc;

use imagedata_pdf::{
    assemble_document, probe, rasterize, ColorMode, DocumentFormat, Error, PdfImageReader,
    ReadOptions, SyntheticBackend,
};

fn open_letter(pages: u32) -> (SyntheticBackend, imagedata_pdf::Document) {
    let backend = SyntheticBackend::letter_pages(pages);
    let doc = probe::probe_bytes(b"%PDF-1.7\n", &backend)
        .unwrap()
        .into_document()
        .unwrap();
    (backend, doc)
}

#[test]
fn probe_rejects_unknown_bytes_without_error() {
    let backend = SyntheticBackend::letter_pages(1);
    let outcome = probe::probe_bytes(b"<!DOCTYPE html><html></html>", &backend).unwrap();
    assert!(!outcome.is_recognized());

    let outcome = probe::probe_bytes(b"", &backend).unwrap();
    assert!(!outcome.is_recognized());
}

#[test]
fn probe_corrupt_document_is_an_error() {
    // Valid signature, but the backend cannot open a document structure.
    let backend = SyntheticBackend::new();
    let result = probe::probe_bytes(b"%PDF-1.7\ntruncated", &backend);
    assert!(matches!(result, Err(Error::Corrupt(_))));
}

#[test]
fn probe_recognizes_postscript() {
    let backend = SyntheticBackend::letter_pages(1);
    let doc = probe::probe_bytes(b"%!PS-Adobe-3.0\n", &backend)
        .unwrap()
        .into_document()
        .unwrap();
    assert_eq!(doc.format(), &DocumentFormat::PostScript);
}

#[test]
fn resolution_scaling_is_monotonic() {
    let (_backend, doc) = open_letter(1);
    let mut previous = (0, 0);
    for dpi in [9.0, 36.0, 72.0, 150.0, 300.0] {
        let buffer = rasterize(&doc, 0, dpi, ColorMode::Grayscale).unwrap();
        assert!(
            buffer.width >= previous.0 && buffer.height >= previous.1,
            "dimensions shrank between DPI steps: {:?} -> {:?}",
            previous,
            buffer.dimensions()
        );
        previous = buffer.dimensions();
    }
}

#[test]
fn repeated_rasterization_is_byte_identical() {
    let (_backend, doc) = open_letter(2);
    for color_mode in [ColorMode::Rgb, ColorMode::Grayscale] {
        let first = rasterize(&doc, 1, 120.0, color_mode).unwrap();
        let second = rasterize(&doc, 1, 120.0, color_mode).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn skip_policy_returns_partial_array_with_skip_record() {
    let backend = SyntheticBackend::new()
        .with_page(612.0, 792.0)
        .with_page(612.0, 792.0)
        .with_failing_page(612.0, 792.0)
        .with_page(612.0, 792.0);
    let doc = probe::probe_bytes(b"%PDF-1.5\n", &backend)
        .unwrap()
        .into_document()
        .unwrap();

    let options = ReadOptions::new().with_dpi(36.0).skip_failed_pages();
    let (array, info) = assemble_document(&doc, &options).unwrap();

    assert_eq!(array.pages, 3);
    assert_eq!(info.page_count, 3);
    assert_eq!(info.skipped_pages, vec![2]);
}

#[test]
fn abort_policy_raises_with_failing_page_index() {
    let backend = SyntheticBackend::new()
        .with_page(612.0, 792.0)
        .with_failing_page(612.0, 792.0);
    let doc = probe::probe_bytes(b"%PDF-1.5\n", &backend)
        .unwrap()
        .into_document()
        .unwrap();

    let options = ReadOptions::new().with_dpi(36.0);
    match assemble_document(&doc, &options) {
        Err(Error::Assembly { page, .. }) => assert_eq!(page, 1),
        other => panic!("expected Assembly error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn letter_page_at_72dpi_matches_point_size() {
    // 612x792 points at 72 dpi is exactly 612x792 pixels, and the pixel
    // spacing is 25.4/72 mm on both axes.
    let (_backend, doc) = open_letter(1);
    let options = ReadOptions::new().with_dpi(72.0);
    let (array, info) = assemble_document(&doc, &options).unwrap();

    assert_eq!(array.shape(), (1, 792, 612, 3));
    assert!(array.is_single_page());
    assert!((info.pixel_spacing_mm.0 - 0.3528).abs() < 1e-4);
    assert!((info.pixel_spacing_mm.1 - 0.3528).abs() < 1e-4);
    assert_eq!(info.page_count, 1);
}

#[test]
fn reader_end_to_end_through_builder() {
    let backend = Arc::new(
        SyntheticBackend::new()
            .with_page(595.0, 842.0)
            .with_page(595.0, 842.0),
    );
    let (array, info) = PdfImageReader::with_backend(backend)
        .dpi(72.0)
        .grayscale()
        .read_bytes(b"%PDF-2.0\nbody")
        .unwrap();

    assert_eq!(array.shape(), (2, 842, 595, 1));
    assert_eq!(info.color_mode, ColorMode::Grayscale);
    assert_eq!(
        info.format,
        DocumentFormat::Pdf {
            version: Some("2.0".into())
        }
    );
}

#[test]
fn metadata_carries_document_fields() {
    use imagedata_pdf::BackendMetadata;

    let backend = SyntheticBackend::letter_pages(1).with_metadata(BackendMetadata {
        title: Some("A Lover's Complaint".into()),
        author: Some("W. Shakespeare".into()),
        creation_date: Some("D:20220315101500Z".into()),
    });
    let doc = probe::probe_bytes(b"%PDF-1.7\n", &backend)
        .unwrap()
        .into_document()
        .unwrap();

    let (_, info) = assemble_document(&doc, &ReadOptions::new().with_dpi(36.0)).unwrap();
    assert_eq!(info.title.as_deref(), Some("A Lover's Complaint"));
    assert_eq!(info.author.as_deref(), Some("W. Shakespeare"));
    assert!(info.created.is_some());
}

#[test]
fn handle_is_per_read_and_reusable_within_one_read() {
    // One probe, many rasterize calls against the same handle.
    let (_backend, doc) = open_letter(3);
    for index in 0..doc.page_count() {
        let buffer = rasterize(&doc, index, 36.0, ColorMode::Rgb).unwrap();
        assert_eq!(buffer.dimensions(), (306, 396));
    }
    // Dropping the handle releases backend resources.
    drop(doc);
}

#[test]
fn concurrent_documents_do_not_share_state() {
    // Distinct documents may be processed concurrently, one handle each.
    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(|| {
                let backend = SyntheticBackend::letter_pages(2);
                let doc = probe::probe_bytes(b"%PDF-1.7\n", &backend)
                    .unwrap()
                    .into_document()
                    .unwrap();
                let options = ReadOptions::new().with_dpi(36.0);
                assemble_document(&doc, &options).unwrap().0.pages
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 2);
    }
}
