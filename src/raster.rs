//! Page rasterization: physical geometry to pixel sample grids.

use log::debug;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::model::{ColorMode, RasterBuffer};

/// Lowest accepted rasterization resolution, in dots per inch.
pub const MIN_DPI: f64 = 9.0;
/// Highest accepted rasterization resolution, in dots per inch.
pub const MAX_DPI: f64 = 2400.0;

/// Round half-up to the nearest integer. The single rounding rule used for
/// all geometry math, so repeated calls at one DPI reproduce exactly.
pub fn round_half_up(value: f64) -> u32 {
    (value + 0.5).floor() as u32
}

/// Target pixel dimensions for a physical page size at the given DPI.
/// Degenerate physical sizes still produce at least one pixel per axis.
pub fn pixel_dims(width_pt: f32, height_pt: f32, dpi: f64) -> (u32, u32) {
    let to_px = |pt: f32| round_half_up(pt as f64 / 72.0 * dpi).max(1);
    (to_px(width_pt), to_px(height_pt))
}

/// Validate a requested DPI value.
pub fn validate_dpi(dpi: f64) -> Result<()> {
    if !dpi.is_finite() || !(MIN_DPI..=MAX_DPI).contains(&dpi) {
        return Err(Error::InvalidParameter(format!(
            "dpi {} outside supported range {}..={}",
            dpi, MIN_DPI, MAX_DPI
        )));
    }
    Ok(())
}

/// Rasterize one page of an opened document.
///
/// Pixel dimensions are `round_half_up(size_pt / 72 * dpi)` per axis.
/// Grayscale output is converted from the backend's RGB rendering with the
/// BT.601 luma weights (see [`RasterBuffer::into_grayscale`]). Output is
/// deterministic for identical `(document, page_index, dpi, color_mode)`
/// on a stable backend.
///
/// A failure on this page is reported as [`Error::Render`] and is not
/// fatal to the document; the assembler decides whether to skip or abort.
pub fn rasterize(
    doc: &Document,
    page_index: u32,
    dpi: f64,
    color_mode: ColorMode,
) -> Result<RasterBuffer> {
    validate_dpi(dpi)?;
    let count = doc.page_count();
    if page_index >= count {
        return Err(Error::PageOutOfRange(page_index, count));
    }

    let (width_pt, height_pt) = doc.backend().page_size(page_index)?;
    let (width_px, height_px) = pixel_dims(width_pt, height_pt, dpi);
    debug!(
        "rasterize page {}: {:.1}x{:.1}pt at {}dpi -> {}x{}px {}",
        page_index, width_pt, height_pt, dpi, width_px, height_px, color_mode
    );

    let buffer = doc.backend().render(page_index, width_px, height_px)?;
    if buffer.dimensions() != (width_px, height_px) {
        debug!(
            "backend rendered page {} at {}x{} instead of {}x{}",
            page_index, buffer.width, buffer.height, width_px, height_px
        );
    }

    Ok(match color_mode {
        ColorMode::Grayscale => buffer.into_grayscale(),
        ColorMode::Rgb => buffer,
    })
}
