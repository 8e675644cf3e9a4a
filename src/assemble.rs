//! Assembly of per-page raster buffers into one image array.

use log::{debug, warn};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::model::{ImageArray, ImageInfo, RasterBuffer};
use crate::options::{GeometryPolicy, PageErrorPolicy, ReadOptions};
use crate::raster::rasterize;

/// Rasterize every page of an opened document and stack the results.
///
/// Pages are processed strictly in document order, one at a time, reusing
/// the single open handle. Page-local render failures are classified here:
/// under [`PageErrorPolicy::Skip`] the page index is recorded in the
/// metadata and assembly continues; under [`PageErrorPolicy::Abort`] the
/// first failure is wrapped as [`Error::Assembly`] with the page index
/// attached and no partial array is returned. Every other error
/// propagates immediately.
pub fn assemble(doc: &Document, options: &ReadOptions) -> Result<(ImageArray, ImageInfo)> {
    options.validate()?;

    let page_count = doc.page_count();
    debug!(
        "assemble: {} pages at {}dpi, {} ({:?}, {:?})",
        page_count, options.dpi, options.color_mode, options.on_page_error, options.geometry
    );

    let mut rendered: Vec<(u32, RasterBuffer)> = Vec::with_capacity(page_count as usize);
    let mut skipped: Vec<u32> = Vec::new();

    for index in 0..page_count {
        match rasterize(doc, index, options.dpi, options.color_mode) {
            Ok(buffer) => {
                let buffer = buffer.rotated(options.rotate_deg)?;
                rendered.push((index, buffer));
            }
            Err(err) if err.is_page_local() => match options.on_page_error {
                PageErrorPolicy::Abort => {
                    return Err(Error::Assembly {
                        page: index,
                        source: Box::new(err),
                    });
                }
                PageErrorPolicy::Skip => {
                    warn!("skipping page {}: {}", index, err);
                    skipped.push(index);
                }
            },
            Err(err) => return Err(err),
        }
    }

    if rendered.is_empty() {
        return Err(Error::NoImageData);
    }

    let buffers = apply_geometry_policy(rendered, options.geometry)?;
    let info = ImageInfo::new(
        doc.format().clone(),
        options.dpi,
        options.color_mode,
        options.rotate_deg,
        buffers.len() as u32,
        skipped,
        doc.metadata(),
    );
    let array = ImageArray::from_buffers(buffers)?;
    Ok((array, info))
}

/// Enforce shape consistency across rendered pages.
fn apply_geometry_policy(
    rendered: Vec<(u32, RasterBuffer)>,
    policy: GeometryPolicy,
) -> Result<Vec<RasterBuffer>> {
    match policy {
        GeometryPolicy::Strict => {
            let expected = rendered[0].1.dimensions();
            for (page, buffer) in &rendered {
                if buffer.dimensions() != expected {
                    return Err(Error::InconsistentGeometry {
                        page: *page,
                        expected,
                        actual: buffer.dimensions(),
                    });
                }
            }
            Ok(rendered.into_iter().map(|(_, buffer)| buffer).collect())
        }
        GeometryPolicy::PadToMax { fill } => {
            let max_width = rendered.iter().map(|(_, b)| b.width).max().unwrap_or(1);
            let max_height = rendered.iter().map(|(_, b)| b.height).max().unwrap_or(1);
            rendered
                .into_iter()
                .map(|(page, buffer)| {
                    if buffer.dimensions() == (max_width, max_height) {
                        Ok(buffer)
                    } else {
                        debug!(
                            "padding page {} from {}x{} to {}x{}",
                            page, buffer.width, buffer.height, max_width, max_height
                        );
                        Ok(pad_to(buffer, max_width, max_height, fill))
                    }
                })
                .collect()
        }
    }
}

/// Place a buffer in the top-left corner of a larger canvas filled with
/// `fill`.
fn pad_to(buffer: RasterBuffer, width: u32, height: u32, fill: u8) -> RasterBuffer {
    let mut canvas = RasterBuffer::filled(width, height, buffer.channels, fill);
    let c = buffer.channels as usize;
    let src_row = buffer.width as usize * c;
    let dst_row = width as usize * c;
    for y in 0..buffer.height as usize {
        canvas.data[y * dst_row..y * dst_row + src_row]
            .copy_from_slice(&buffer.data[y * src_row..(y + 1) * src_row]);
    }
    canvas
}
