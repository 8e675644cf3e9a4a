//! Deterministic in-memory rendering backend.
//!
//! Produces reproducible gradient pages without any native library, so
//! hosts can exercise a plugin chain end to end and this crate can test
//! rasterization, assembly policies, and failure handling.

use crate::backend::{BackendDocument, BackendMetadata, RenderBackend};
use crate::error::{Error, Result};
use crate::model::RasterBuffer;
use crate::probe::DocumentFormat;

/// Configuration of one synthetic page.
#[derive(Debug, Clone)]
pub struct SyntheticPage {
    /// Physical width in points.
    pub width_pt: f32,
    /// Physical height in points.
    pub height_pt: f32,
    /// Intrinsic rotation reported for the page.
    pub rotation_deg: u16,
    /// When set, rendering this page fails with a page-local error.
    pub fail_render: bool,
    /// Seed mixed into the gradient so pages are distinguishable.
    pub seed: u8,
}

impl SyntheticPage {
    /// A page of the given physical size.
    pub fn new(width_pt: f32, height_pt: f32) -> Self {
        Self {
            width_pt,
            height_pt,
            rotation_deg: 0,
            fail_render: false,
            seed: 0,
        }
    }

    /// US Letter, 612 x 792 points.
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    /// A4, 595 x 842 points.
    pub fn a4() -> Self {
        Self::new(595.0, 842.0)
    }
}

/// In-memory [`RenderBackend`] rendering deterministic gradients.
///
/// Accepts both PDF and PostScript signatures. Opening an empty
/// configuration mimics a structurally broken file and fails with
/// [`Error::Corrupt`] unless pages were configured.
#[derive(Debug, Clone, Default)]
pub struct SyntheticBackend {
    pages: Vec<SyntheticPage>,
    metadata: BackendMetadata,
}

impl SyntheticBackend {
    /// A backend with no pages configured; every open fails as corrupt.
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend serving one document of `count` Letter-sized pages.
    pub fn letter_pages(count: u32) -> Self {
        let mut backend = Self::new();
        for i in 0..count {
            let mut page = SyntheticPage::letter();
            page.seed = i as u8;
            backend.pages.push(page);
        }
        backend
    }

    /// Append a page of the given physical size.
    pub fn with_page(mut self, width_pt: f32, height_pt: f32) -> Self {
        let mut page = SyntheticPage::new(width_pt, height_pt);
        page.seed = self.pages.len() as u8;
        self.pages.push(page);
        self
    }

    /// Append a page whose render call always fails.
    pub fn with_failing_page(mut self, width_pt: f32, height_pt: f32) -> Self {
        let mut page = SyntheticPage::new(width_pt, height_pt);
        page.seed = self.pages.len() as u8;
        page.fail_render = true;
        self.pages.push(page);
        self
    }

    /// Append a fully configured page.
    pub fn with_configured_page(mut self, page: SyntheticPage) -> Self {
        self.pages.push(page);
        self
    }

    /// Attach document metadata reported by opened documents.
    pub fn with_metadata(mut self, metadata: BackendMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl RenderBackend for SyntheticBackend {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn supports(&self, _format: &DocumentFormat) -> bool {
        true
    }

    fn open(&self, _data: &[u8]) -> Result<Box<dyn BackendDocument>> {
        if self.pages.is_empty() {
            return Err(Error::Corrupt("synthetic document has no pages".into()));
        }
        Ok(Box::new(SyntheticDocument {
            pages: self.pages.clone(),
            metadata: self.metadata.clone(),
        }))
    }
}

struct SyntheticDocument {
    pages: Vec<SyntheticPage>,
    metadata: BackendMetadata,
}

impl SyntheticDocument {
    fn page(&self, index: u32) -> Result<&SyntheticPage> {
        self.pages.get(index as usize).ok_or(Error::Render {
            page: index,
            reason: "page index beyond synthetic document".into(),
        })
    }
}

/// Gradient sample at (x, y) for a page seed and channel. Pure function of
/// its inputs, so repeated renders are byte-identical.
fn gradient(x: u32, y: u32, seed: u8, channel: u32) -> u8 {
    ((x.wrapping_mul(7))
        .wrapping_add(y.wrapping_mul(13))
        .wrapping_add(seed as u32 * 31)
        .wrapping_add(channel * 97)
        % 251) as u8
}

impl BackendDocument for SyntheticDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_size(&self, index: u32) -> Result<(f32, f32)> {
        let page = self.page(index)?;
        Ok((page.width_pt, page.height_pt))
    }

    fn page_rotation(&self, index: u32) -> Result<u16> {
        Ok(self.page(index)?.rotation_deg)
    }

    fn render(&self, index: u32, width_px: u32, height_px: u32) -> Result<RasterBuffer> {
        let page = self.page(index)?;
        if page.fail_render {
            return Err(Error::Render {
                page: index,
                reason: "synthetic page configured to fail".into(),
            });
        }

        let mut data = Vec::with_capacity(width_px as usize * height_px as usize * 3);
        for y in 0..height_px {
            for x in 0..width_px {
                for channel in 0..3 {
                    data.push(gradient(x, y, page.seed, channel));
                }
            }
        }
        RasterBuffer::new(width_px, height_px, 3, data)
    }

    fn metadata(&self) -> BackendMetadata {
        self.metadata.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_empty_is_corrupt() {
        let backend = SyntheticBackend::new();
        assert!(matches!(
            backend.open(b"%PDF-1.4"),
            Err(Error::Corrupt(_))
        ));
    }

    #[test]
    fn test_render_is_deterministic() {
        let backend = SyntheticBackend::letter_pages(2);
        let doc = backend.open(b"%PDF-1.4").unwrap();
        let a = doc.render(1, 40, 30).unwrap();
        let b = doc.render(1, 40, 30).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_pages_differ_by_seed() {
        let backend = SyntheticBackend::letter_pages(2);
        let doc = backend.open(b"%PDF-1.4").unwrap();
        let a = doc.render(0, 16, 16).unwrap();
        let b = doc.render(1, 16, 16).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_failing_page() {
        let backend = SyntheticBackend::new()
            .with_page(612.0, 792.0)
            .with_failing_page(612.0, 792.0);
        let doc = backend.open(b"%PDF-1.4").unwrap();
        assert!(doc.render(0, 10, 10).is_ok());
        assert!(matches!(
            doc.render(1, 10, 10),
            Err(Error::Render { page: 1, .. })
        ));
    }

    #[test]
    fn test_supports_both_formats() {
        let backend = SyntheticBackend::letter_pages(1);
        assert!(backend.supports(&DocumentFormat::Pdf { version: None }));
        assert!(backend.supports(&DocumentFormat::PostScript));
    }
}
