//! Document format detection and probing.
//!
//! Probing is the first step of the plugin chain: a cheap signature check
//! decides whether this plugin handles the input at all, and only then is
//! the document opened through the rendering backend.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backend::RenderBackend;
use crate::document::Document;
use crate::error::{Error, Result};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
/// PostScript magic bytes: %!PS
const PS_MAGIC: &[u8] = b"%!PS";
/// Number of leading bytes inspected by the sniffer.
const SNIFF_LEN: usize = 16;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Recognized document format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    /// PDF (ISO 32000). `version` is taken from the header when the file
    /// carries a well-formed `%PDF-d.d` signature.
    Pdf { version: Option<String> },
    /// PostScript, identified by the `%!PS` signature.
    PostScript,
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Pdf {
                version: Some(version),
            } => write!(f, "PDF {}", version),
            DocumentFormat::Pdf { version: None } => write!(f, "PDF"),
            DocumentFormat::PostScript => write!(f, "PostScript"),
        }
    }
}

/// Outcome of probing an input.
///
/// A negative probe is not an error: it tells the host plugin chain to try
/// the next registered format plugin.
pub enum ProbeOutcome {
    /// The signature matched and the document was opened. The handle owns
    /// the backend decoder resources until it is dropped.
    Recognized(Document),
    /// The input does not carry a PDF or PostScript signature.
    NotRecognized,
}

impl ProbeOutcome {
    /// Whether the input was recognized.
    pub fn is_recognized(&self) -> bool {
        matches!(self, ProbeOutcome::Recognized(_))
    }

    /// Unwrap the document handle, if recognized.
    pub fn into_document(self) -> Option<Document> {
        match self {
            ProbeOutcome::Recognized(doc) => Some(doc),
            ProbeOutcome::NotRecognized => None,
        }
    }
}

/// Sniff the format signature from leading bytes, without opening anything.
///
/// Returns `None` when neither the `%PDF-` nor the `%!PS` signature is
/// present within the first [`SNIFF_LEN`] bytes.
pub fn sniff_bytes(data: &[u8]) -> Option<DocumentFormat> {
    let head = &data[..data.len().min(SNIFF_LEN)];

    if head.starts_with(PDF_MAGIC) {
        let version = head
            .get(PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN)
            .map(|v| String::from_utf8_lossy(v).to_string())
            .filter(|v| is_valid_version(v));
        return Some(DocumentFormat::Pdf { version });
    }

    if head.starts_with(PS_MAGIC) {
        return Some(DocumentFormat::PostScript);
    }

    None
}

/// Sniff the format signature from the start of a file.
pub fn sniff_path<P: AsRef<Path>>(path: P) -> Result<Option<DocumentFormat>> {
    let mut file = File::open(path)?;
    let mut header = [0u8; SNIFF_LEN];
    // A file shorter than the sniff window can still be signature-checked.
    let n = read_up_to(&mut file, &mut header)?;
    Ok(sniff_bytes(&header[..n]))
}

fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Check if a version string looks like "1.0" through "9.9".
fn is_valid_version(version: &str) -> bool {
    let chars: Vec<char> = version.chars().collect();
    chars.len() == 3 && chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

/// Check if bytes carry a PDF signature.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    matches!(sniff_bytes(data), Some(DocumentFormat::Pdf { .. }))
}

/// Check if bytes carry a PostScript signature.
pub fn is_postscript_bytes(data: &[u8]) -> bool {
    matches!(sniff_bytes(data), Some(DocumentFormat::PostScript))
}

/// Probe an in-memory document and open it through the given backend.
///
/// * Missing signature → `Ok(ProbeOutcome::NotRecognized)`, never an error.
/// * Signature present but the backend cannot open a valid document
///   structure → [`Error::Corrupt`].
/// * Signature present for a format the backend cannot decode →
///   [`Error::UnsupportedFormat`].
///
/// On success the returned [`Document`] owns the backend resources; they
/// are released when the handle is dropped, on every exit path.
pub fn probe_bytes(data: &[u8], backend: &dyn RenderBackend) -> Result<ProbeOutcome> {
    let format = match sniff_bytes(data) {
        Some(format) => format,
        None => return Ok(ProbeOutcome::NotRecognized),
    };

    if !backend.supports(&format) {
        return Err(Error::UnsupportedFormat(format));
    }

    log::debug!("probe: recognized {} input ({} bytes)", format, data.len());
    let inner = backend.open(data)?;
    Ok(ProbeOutcome::Recognized(Document::new(format, inner)))
}

/// Probe a document on disk. See [`probe_bytes`].
pub fn probe_path<P: AsRef<Path>>(path: P, backend: &dyn RenderBackend) -> Result<ProbeOutcome> {
    let data = std::fs::read(path)?;
    probe_bytes(&data, backend)
}
