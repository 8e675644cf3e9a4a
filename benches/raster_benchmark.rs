//! Benchmarks for rasterization and assembly over the synthetic backend.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use imagedata_pdf::{
    assemble_document, probe, rasterize, ColorMode, Document, ReadOptions, SyntheticBackend,
};

fn open_letter(pages: u32) -> Document {
    let backend = SyntheticBackend::letter_pages(pages);
    probe::probe_bytes(b"%PDF-1.7\n", &backend)
        .unwrap()
        .into_document()
        .unwrap()
}

fn bench_probe(c: &mut Criterion) {
    let backend = SyntheticBackend::letter_pages(1);
    c.bench_function("probe_pdf_bytes", |b| {
        b.iter(|| {
            probe::probe_bytes(black_box(b"%PDF-1.7\nbody"), &backend)
                .unwrap()
                .is_recognized()
        })
    });
    c.bench_function("probe_negative", |b| {
        b.iter(|| {
            probe::probe_bytes(black_box(b"<!DOCTYPE html>"), &backend)
                .unwrap()
                .is_recognized()
        })
    });
}

fn bench_rasterize(c: &mut Criterion) {
    let doc = open_letter(1);
    c.bench_function("rasterize_letter_72dpi_rgb", |b| {
        b.iter(|| rasterize(&doc, 0, black_box(72.0), ColorMode::Rgb).unwrap())
    });
    c.bench_function("rasterize_letter_72dpi_gray", |b| {
        b.iter(|| rasterize(&doc, 0, black_box(72.0), ColorMode::Grayscale).unwrap())
    });
}

fn bench_assemble(c: &mut Criterion) {
    let doc = open_letter(10);
    let options = ReadOptions::new().with_dpi(36.0);
    c.bench_function("assemble_10_pages_36dpi", |b| {
        b.iter(|| assemble_document(&doc, black_box(&options)).unwrap())
    });
}

criterion_group!(benches, bench_probe, bench_rasterize, bench_assemble);
criterion_main!(benches);
