//! Error types for the imagedata-pdf plugin.

use std::io;
use thiserror::Error;

use crate::probe::DocumentFormat;

/// Result type alias for imagedata-pdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while decoding a document into image arrays.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No registered plugin recognized the input bytes.
    #[error("Unknown file format: no plugin recognized the input")]
    UnknownFormat,

    /// The signature was recognized but the active backend cannot decode it.
    #[error("{0} input is not supported by the active rendering backend")]
    UnsupportedFormat(DocumentFormat),

    /// The rendering backend library could not be loaded.
    #[error("Rendering backend unavailable: {0}")]
    MissingBackend(String),

    /// The signature matched but the document structure could not be opened.
    #[error("Corrupt document: {0}")]
    Corrupt(String),

    /// A caller-supplied option is out of range or unknown.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Page index beyond the document's page count.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The backend failed to rasterize a single page. Recoverable at
    /// assembly granularity when the skip policy is configured.
    #[error("Failed to render page {page}: {reason}")]
    Render { page: u32, reason: String },

    /// Pages in one document produced different pixel dimensions under the
    /// strict geometry policy.
    #[error(
        "Inconsistent page geometry: page {page} is {}x{} but expected {}x{}",
        .actual.0, .actual.1, .expected.0, .expected.1
    )]
    InconsistentGeometry {
        page: u32,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Assembly aborted on the first unrecoverable page failure.
    #[error("Assembly failed at page {page}")]
    Assembly {
        page: u32,
        #[source]
        source: Box<Error>,
    },

    /// The document yielded no image data at all (zero pages, or every
    /// page was skipped).
    #[error("No image data read from document")]
    NoImageData,

    /// Writing documents is not implemented by this plugin.
    #[error("Writing PDF files is not implemented")]
    WriteNotImplemented,
}

impl Error {
    /// Whether this error is local to a single page, and therefore
    /// recoverable under [`PageErrorPolicy::Skip`](crate::PageErrorPolicy::Skip).
    pub fn is_page_local(&self) -> bool {
        matches!(self, Error::Render { .. })
    }
}
