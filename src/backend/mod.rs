//! Rendering backend abstraction layer.
//!
//! Provides a trait-based interface for document rendering, isolating the
//! concrete engine (pdfium) from probing, rasterization, and assembly.
//! A deterministic in-memory backend, [`SyntheticBackend`], is available
//! for hosts that test plugin chains without a native rendering library.

mod synthetic;

#[cfg(feature = "pdfium")]
mod pdfium;

pub use synthetic::{SyntheticBackend, SyntheticPage};

#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumBackend;

use crate::error::Result;
use crate::model::RasterBuffer;
use crate::probe::DocumentFormat;

/// Document metadata as reported by the backend, raw and unparsed.
#[derive(Debug, Clone, Default)]
pub struct BackendMetadata {
    /// Document title, if present.
    pub title: Option<String>,
    /// Document author, if present.
    pub author: Option<String>,
    /// Creation date string in the source format (e.g., `D:20220131...`).
    pub creation_date: Option<String>,
}

/// Abstract interface for a rendering engine.
///
/// A backend opens byte streams into [`BackendDocument`] handles. One
/// backend instance may open many documents; the documents themselves must
/// not be shared across concurrent operations (see [`BackendDocument`]).
pub trait RenderBackend: Send + Sync {
    /// Backend name for diagnostics.
    fn name(&self) -> &'static str;

    /// Whether this backend can decode documents of the given format.
    fn supports(&self, format: &DocumentFormat) -> bool;

    /// Open a document from bytes.
    ///
    /// Fails with [`Error::Corrupt`](crate::Error::Corrupt) when the byte
    /// stream is not a structurally valid document, and with
    /// [`Error::MissingBackend`](crate::Error::MissingBackend) when the
    /// engine itself is unavailable.
    fn open(&self, data: &[u8]) -> Result<Box<dyn BackendDocument>>;
}

/// An open document inside a rendering engine.
///
/// The handle owns engine resources for its lifetime; dropping it releases
/// them. Handles support at most one in-flight operation at a time and are
/// deliberately not `Send`: callers needing parallel throughput open one
/// handle per document and keep each on its own thread.
pub trait BackendDocument {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Physical page size in points (1 pt = 1/72 inch).
    ///
    /// Per-page failures are reported as
    /// [`Error::Render`](crate::Error::Render) with the page index attached.
    fn page_size(&self, index: u32) -> Result<(f32, f32)>;

    /// Intrinsic page rotation in degrees (0, 90, 180, 270).
    fn page_rotation(&self, index: u32) -> Result<u16>;

    /// Render one page to an RGB sample grid of the requested pixel size.
    ///
    /// Output is deterministic for identical inputs on a stable engine.
    fn render(&self, index: u32, width_px: u32, height_px: u32) -> Result<RasterBuffer>;

    /// Document metadata. Backends without metadata support return the
    /// default (empty) record.
    fn metadata(&self) -> BackendMetadata {
        BackendMetadata::default()
    }
}
