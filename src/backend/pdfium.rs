//! Concrete rendering backend over the pdfium library.
//!
//! pdfium is loaded dynamically at runtime; a missing library surfaces as
//! [`Error::MissingBackend`] rather than a link failure, so the crate
//! itself always builds. The library is bound once per thread and kept for
//! the life of the process — pdfium itself is not thread-safe, which is
//! also why document handles stay on the thread that opened them.

use std::cell::OnceCell;

use log::debug;
use pdfium_render::prelude::*;

use crate::backend::{BackendDocument, BackendMetadata, RenderBackend};
use crate::error::{Error, Result};
use crate::model::RasterBuffer;
use crate::probe::DocumentFormat;

fn pdfium() -> Result<&'static Pdfium> {
    thread_local! {
        static PDFIUM: OnceCell<std::result::Result<&'static Pdfium, String>> =
            const { OnceCell::new() };
    }
    PDFIUM.with(|cell| {
        cell.get_or_init(|| {
            Pdfium::bind_to_system_library()
                .or_else(|_| {
                    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                })
                .map(|bindings| &*Box::leak(Box::new(Pdfium::new(bindings))))
                .map_err(|e| e.to_string())
        })
        .clone()
        .map_err(Error::MissingBackend)
    })
}

/// [`RenderBackend`] backed by the pdfium rendering engine. PDF only;
/// PostScript input is rejected at probe time.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfiumBackend;

impl PdfiumBackend {
    pub fn new() -> Self {
        Self
    }

    /// Whether the pdfium library can be loaded on this thread.
    pub fn is_available() -> bool {
        pdfium().is_ok()
    }
}

impl RenderBackend for PdfiumBackend {
    fn name(&self) -> &'static str {
        "pdfium"
    }

    fn supports(&self, format: &DocumentFormat) -> bool {
        matches!(format, DocumentFormat::Pdf { .. })
    }

    fn open(&self, data: &[u8]) -> Result<Box<dyn BackendDocument>> {
        let doc = pdfium()?
            .load_pdf_from_byte_vec(data.to_vec(), None)
            .map_err(|e| Error::Corrupt(e.to_string()))?;
        Ok(Box::new(PdfiumDocument { doc }))
    }
}

struct PdfiumDocument {
    doc: PdfDocument<'static>,
}

impl PdfiumDocument {
    fn page_index(&self, index: u32) -> Result<u16> {
        u16::try_from(index).map_err(|_| Error::Render {
            page: index,
            reason: "page index exceeds pdfium's 16-bit page range".into(),
        })
    }
}

impl BackendDocument for PdfiumDocument {
    fn page_count(&self) -> u32 {
        self.doc.pages().len() as u32
    }

    fn page_size(&self, index: u32) -> Result<(f32, f32)> {
        let pages = self.doc.pages();
        let page = pages.get(self.page_index(index)?).map_err(|e| Error::Render {
            page: index,
            reason: e.to_string(),
        })?;
        Ok((page.width().value, page.height().value))
    }

    fn page_rotation(&self, index: u32) -> Result<u16> {
        let pages = self.doc.pages();
        let page = pages.get(self.page_index(index)?).map_err(|e| Error::Render {
            page: index,
            reason: e.to_string(),
        })?;
        let degrees = match page.rotation() {
            Ok(PdfPageRenderRotation::None) | Err(_) => 0,
            Ok(PdfPageRenderRotation::Degrees90) => 90,
            Ok(PdfPageRenderRotation::Degrees180) => 180,
            Ok(PdfPageRenderRotation::Degrees270) => 270,
        };
        Ok(degrees)
    }

    fn render(&self, index: u32, width_px: u32, height_px: u32) -> Result<RasterBuffer> {
        let pages = self.doc.pages();
        let page = pages.get(self.page_index(index)?).map_err(|e| Error::Render {
            page: index,
            reason: e.to_string(),
        })?;

        let config = PdfRenderConfig::new()
            .set_target_width(width_px as i32)
            .set_target_height(height_px as i32);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| Error::Render {
                page: index,
                reason: e.to_string(),
            })?;

        let rgb = bitmap.as_image().into_rgb8();
        debug!(
            "pdfium rendered page {} at {}x{}",
            index,
            rgb.width(),
            rgb.height()
        );
        let (w, h) = (rgb.width(), rgb.height());
        RasterBuffer::new(w, h, 3, rgb.into_raw())
    }

    fn metadata(&self) -> BackendMetadata {
        let metadata = self.doc.metadata();
        let tag_value = |tag: PdfDocumentMetadataTagType| {
            metadata
                .get(tag)
                .map(|t| t.value().to_string())
                .filter(|v| !v.is_empty())
        };
        BackendMetadata {
            title: tag_value(PdfDocumentMetadataTagType::Title),
            author: tag_value(PdfDocumentMetadataTagType::Author),
            creation_date: tag_value(PdfDocumentMetadataTagType::CreationDate),
        }
    }
}
