//! The opened document handle.

use crate::backend::{BackendDocument, BackendMetadata};
use crate::error::{Error, Result};
use crate::probe::DocumentFormat;

/// Per-page physical geometry, read from the document without rendering.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageDescriptor {
    /// 0-based page index, in document page order.
    pub index: u32,
    /// Physical width in points (1 pt = 1/72 inch).
    pub width_pt: f32,
    /// Physical height in points.
    pub height_pt: f32,
    /// Intrinsic page rotation in degrees.
    pub rotation_deg: u16,
}

/// An opened PDF/PostScript document.
///
/// Created by a successful probe; owns the backend decoder resources until
/// dropped. Handles are created and dropped per read, never cached across
/// calls, and support at most one in-flight operation at a time.
pub struct Document {
    format: DocumentFormat,
    inner: Box<dyn BackendDocument>,
}

impl Document {
    pub(crate) fn new(format: DocumentFormat, inner: Box<dyn BackendDocument>) -> Self {
        Self { format, inner }
    }

    /// The recognized source format.
    pub fn format(&self) -> &DocumentFormat {
        &self.format
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.inner.page_count()
    }

    /// Geometry of one page.
    pub fn descriptor(&self, index: u32) -> Result<PageDescriptor> {
        let count = self.page_count();
        if index >= count {
            return Err(Error::PageOutOfRange(index, count));
        }
        let (width_pt, height_pt) = self.inner.page_size(index)?;
        let rotation_deg = self.inner.page_rotation(index)?;
        Ok(PageDescriptor {
            index,
            width_pt,
            height_pt,
            rotation_deg,
        })
    }

    /// Geometry of every page, in document order.
    pub fn descriptors(&self) -> Result<Vec<PageDescriptor>> {
        (0..self.page_count()).map(|i| self.descriptor(i)).collect()
    }

    /// Raw document metadata from the backend.
    pub fn metadata(&self) -> BackendMetadata {
        self.inner.metadata()
    }

    pub(crate) fn backend(&self) -> &dyn BackendDocument {
        self.inner.as_ref()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("format", &self.format)
            .field("pages", &self.page_count())
            .finish()
    }
}
