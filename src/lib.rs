//! # imagedata-pdf
//!
//! Read PDF and PostScript documents as multi-page image arrays.
//!
//! This crate is a format plugin for image-data hosts: it probes a byte
//! stream for a PDF/PostScript signature, rasterizes each page at a
//! configurable resolution and color mode, and assembles the pages into a
//! single ordered array with geometric metadata (pixel spacing, page
//! count, skipped pages).
//!
//! ## Quick Start
//!
//! ```no_run
//! use imagedata_pdf::{read_file_with_options, ReadOptions};
//!
//! fn main() -> imagedata_pdf::Result<()> {
//!     let options = ReadOptions::new().with_dpi(300.0).grayscale();
//!     let (array, info) = read_file_with_options("document.pdf", &options)?;
//!     println!("{} pages of {}x{}", array.pages, array.width, array.height);
//!     println!("pixel spacing: {:.4} mm", info.pixel_spacing_mm.0);
//!     Ok(())
//! }
//! ```
//!
//! ## Design
//!
//! - **Prober** ([`probe`]): signature check (`%PDF-` / `%!PS`), then the
//!   document is opened through the rendering backend. An unrecognized
//!   input is a negative probe, not an error, so a host plugin chain can
//!   try its next format plugin.
//! - **Rasterizer** ([`raster`]): pixel dimensions are
//!   `round_half_up(points / 72 * dpi)`; grayscale uses the BT.601 luma
//!   weights. Output is deterministic on a stable backend.
//! - **Assembler** ([`assemble`]): sequential per-document page loop with
//!   configurable page-failure and page-geometry policies.
//!
//! Rendering goes through the [`backend::RenderBackend`] trait. The
//! default `pdfium` feature binds the pdfium library at runtime; the
//! deterministic [`backend::SyntheticBackend`] needs no native code.
//!
//! Documents are processed one page at a time over a single open handle.
//! For throughput across many documents, open one handle per document —
//! [`read_files_with`] does exactly that, in parallel.

pub mod assemble;
pub mod backend;
pub mod document;
pub mod error;
pub mod model;
pub mod options;
pub mod plugin;
pub mod probe;
pub mod raster;

// Re-export commonly used types
pub use assemble::assemble as assemble_document;
pub use backend::{BackendDocument, BackendMetadata, RenderBackend, SyntheticBackend};
pub use document::{Document, PageDescriptor};
pub use error::{Error, Result};
pub use model::{ColorMode, ImageArray, ImageInfo, RasterBuffer};
pub use options::{GeometryPolicy, PageErrorPolicy, ReadOptions, DEFAULT_DPI};
pub use plugin::{FormatPlugin, PdfPlugin, PluginRegistry};
pub use probe::{is_pdf_bytes, is_postscript_bytes, DocumentFormat, ProbeOutcome};
pub use raster::{rasterize, MAX_DPI, MIN_DPI};

#[cfg(feature = "pdfium")]
pub use backend::PdfiumBackend;

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

/// Read a document file with default options (150 dpi, RGB, abort on the
/// first page failure).
#[cfg(feature = "pdfium")]
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<(ImageArray, ImageInfo)> {
    read_file_with_options(path, &ReadOptions::default())
}

/// Read a document file with custom options.
#[cfg(feature = "pdfium")]
pub fn read_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ReadOptions,
) -> Result<(ImageArray, ImageInfo)> {
    let data = std::fs::read(path)?;
    read_bytes_with_options(&data, options)
}

/// Read a document from bytes with default options.
#[cfg(feature = "pdfium")]
pub fn read_bytes(data: &[u8]) -> Result<(ImageArray, ImageInfo)> {
    read_bytes_with_options(data, &ReadOptions::default())
}

/// Read a document from bytes with custom options.
#[cfg(feature = "pdfium")]
pub fn read_bytes_with_options(
    data: &[u8],
    options: &ReadOptions,
) -> Result<(ImageArray, ImageInfo)> {
    PdfPlugin::new().read(data, options)
}

/// Read many document files in parallel over the default backend.
///
/// One handle per document, no sharing between them; results are in input
/// order. The first error aborts the batch.
#[cfg(feature = "pdfium")]
pub fn read_files<P: AsRef<Path> + Sync>(
    paths: &[P],
    options: &ReadOptions,
) -> Result<Vec<(ImageArray, ImageInfo)>> {
    read_files_with(paths, options, Arc::new(PdfiumBackend::new()))
}

/// Read many document files in parallel over a caller-supplied backend.
///
/// Each document is probed and read independently on a worker thread with
/// its own handle; no mutable state is shared between documents.
pub fn read_files_with<P: AsRef<Path> + Sync>(
    paths: &[P],
    options: &ReadOptions,
    backend: Arc<dyn RenderBackend>,
) -> Result<Vec<(ImageArray, ImageInfo)>> {
    paths
        .par_iter()
        .map(|path| {
            let data = std::fs::read(path)?;
            PdfPlugin::with_backend(backend.clone()).read(&data, options)
        })
        .collect()
}

/// Builder for reading documents into image arrays.
///
/// # Example
///
/// ```
/// use imagedata_pdf::{PdfImageReader, SyntheticBackend};
/// use std::sync::Arc;
///
/// let backend = Arc::new(SyntheticBackend::letter_pages(2));
/// let (array, info) = PdfImageReader::with_backend(backend)
///     .dpi(72.0)
///     .grayscale()
///     .skip_failed_pages()
///     .read_bytes(b"%PDF-1.7\n")?;
/// assert_eq!(array.pages, 2);
/// assert_eq!(info.page_count, 2);
/// # Ok::<(), imagedata_pdf::Error>(())
/// ```
pub struct PdfImageReader {
    options: ReadOptions,
    backend: Arc<dyn RenderBackend>,
}

impl PdfImageReader {
    /// Create a reader over the default pdfium backend.
    #[cfg(feature = "pdfium")]
    pub fn new() -> Self {
        Self::with_backend(Arc::new(PdfiumBackend::new()))
    }

    /// Create a reader over a caller-supplied backend.
    pub fn with_backend(backend: Arc<dyn RenderBackend>) -> Self {
        Self {
            options: ReadOptions::default(),
            backend,
        }
    }

    /// Set the rasterization resolution.
    pub fn dpi(mut self, dpi: f64) -> Self {
        self.options = self.options.with_dpi(dpi);
        self
    }

    /// Produce single-channel output.
    pub fn grayscale(mut self) -> Self {
        self.options = self.options.grayscale();
        self
    }

    /// Set the output color mode.
    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.options = self.options.with_color_mode(mode);
        self
    }

    /// Skip pages that fail to render instead of aborting.
    pub fn skip_failed_pages(mut self) -> Self {
        self.options = self.options.skip_failed_pages();
        self
    }

    /// Pad heterogeneous pages to the largest page size.
    pub fn pad_pages(mut self, fill: u8) -> Self {
        self.options = self.options.pad_pages(fill);
        self
    }

    /// Rotate every page counter-clockwise by a multiple of 90 degrees.
    pub fn rotate(mut self, degrees: u16) -> Self {
        self.options = self.options.with_rotation(degrees);
        self
    }

    /// Apply a pre-built options record wholesale.
    pub fn options(mut self, options: ReadOptions) -> Self {
        self.options = options;
        self
    }

    /// Read a document file.
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<(ImageArray, ImageInfo)> {
        let data = std::fs::read(path)?;
        self.read_bytes(&data)
    }

    /// Read a document from bytes.
    pub fn read_bytes(&self, data: &[u8]) -> Result<(ImageArray, ImageInfo)> {
        PdfPlugin::with_backend(self.backend.clone()).read(data, &self.options)
    }

    /// Hand back the raw document bytes with the metadata record instead
    /// of rasterizing, for hosts that store the document encapsulated.
    pub fn read_encapsulated_bytes(&self, data: &[u8]) -> Result<(Vec<u8>, ImageInfo)> {
        PdfPlugin::with_backend(self.backend.clone()).read_encapsulated(data, &self.options)
    }

    /// Probe without reading: open the document and return its handle.
    pub fn probe_bytes(&self, data: &[u8]) -> Result<ProbeOutcome> {
        probe::probe_bytes(data, self.backend.as_ref())
    }
}

#[cfg(feature = "pdfium")]
impl Default for PdfImageReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(pages: u32) -> PdfImageReader {
        PdfImageReader::with_backend(Arc::new(SyntheticBackend::letter_pages(pages)))
    }

    #[test]
    fn test_reader_builder_options() {
        let r = reader(1).dpi(300.0).grayscale().skip_failed_pages().rotate(90);
        assert_eq!(r.options.dpi, 300.0);
        assert_eq!(r.options.color_mode, ColorMode::Grayscale);
        assert_eq!(r.options.on_page_error, PageErrorPolicy::Skip);
        assert_eq!(r.options.rotate_deg, 90);
    }

    #[test]
    fn test_reader_reads_synthetic_pdf() {
        let (array, info) = reader(2).dpi(36.0).read_bytes(b"%PDF-1.7\n").unwrap();
        assert_eq!(array.pages, 2);
        assert_eq!(info.page_count, 2);
        assert_eq!(
            info.format,
            DocumentFormat::Pdf {
                version: Some("1.7".into())
            }
        );
    }

    #[test]
    fn test_reader_encapsulated_bytes() {
        let source = b"%PDF-1.7\nbody".as_slice();
        let (bytes, info) = reader(2).read_encapsulated_bytes(source).unwrap();
        assert_eq!(bytes, source);
        assert_eq!(info.page_count, 2);
    }

    #[test]
    fn test_reader_rejects_unknown_bytes() {
        let result = reader(1).read_bytes(b"GIF89a....");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_reader_probe_bytes() {
        let outcome = reader(3).probe_bytes(b"%!PS-Adobe-3.0\n").unwrap();
        let doc = outcome.into_document().unwrap();
        assert_eq!(doc.format(), &DocumentFormat::PostScript);
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn test_read_files_with_parallel() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for i in 0..4 {
            let path = dir.path().join(format!("doc{}.pdf", i));
            let mut file = std::fs::File::create(&path).unwrap();
            file.write_all(b"%PDF-1.7\ncontent").unwrap();
            paths.push(path);
        }

        let options = ReadOptions::new().with_dpi(18.0);
        let backend = Arc::new(SyntheticBackend::letter_pages(2));
        let results = read_files_with(&paths, &options, backend).unwrap();
        assert_eq!(results.len(), 4);
        for (array, info) in &results {
            assert_eq!(array.pages, 2);
            assert_eq!(info.page_count, 2);
        }
    }

    #[test]
    fn test_read_files_with_propagates_io_error() {
        let options = ReadOptions::default();
        let backend = Arc::new(SyntheticBackend::letter_pages(1));
        let result = read_files_with(&["/no/such/file.pdf"], &options, backend);
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
