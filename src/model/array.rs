//! The assembled multi-page image array.

use crate::error::{Error, Result};
use crate::model::RasterBuffer;

/// Ordered stack of per-page sample grids sharing one geometry.
///
/// Data is contiguous and page-major: sample `(page, y, x, channel)` lives
/// at `((page * height + y) * width + x) * channels + channel`. Ownership
/// transfers to the caller; nothing is cached across reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageArray {
    /// Number of pages stacked along the leading axis.
    pub pages: u32,
    /// Height of every page in pixels.
    pub height: u32,
    /// Width of every page in pixels.
    pub width: u32,
    /// Samples per pixel (1 = grayscale, 3 = RGB).
    pub channels: u8,
    /// Raw sample data, `pages * height * width * channels` bytes.
    pub data: Vec<u8>,
}

impl ImageArray {
    /// Stack page buffers into one array, in the given order.
    ///
    /// Every buffer must share the same dimensions and channel count; the
    /// assembler normalizes geometry before calling this, so a mismatch
    /// here means a caller bug and fails with
    /// [`Error::InconsistentGeometry`]. An empty stack fails with
    /// [`Error::NoImageData`].
    pub fn from_buffers(buffers: Vec<RasterBuffer>) -> Result<Self> {
        let first = buffers.first().ok_or(Error::NoImageData)?;
        let (width, height, channels) = (first.width, first.height, first.channels);

        let page_len = width as usize * height as usize * channels as usize;
        let mut data = Vec::with_capacity(page_len * buffers.len());
        let pages = buffers.len() as u32;

        for (i, buffer) in buffers.into_iter().enumerate() {
            if buffer.dimensions() != (width, height) || buffer.channels != channels {
                return Err(Error::InconsistentGeometry {
                    page: i as u32,
                    expected: (width, height),
                    actual: buffer.dimensions(),
                });
            }
            data.extend_from_slice(&buffer.data);
        }

        Ok(Self {
            pages,
            height,
            width,
            channels,
            data,
        })
    }

    /// Array shape as (pages, height, width, channels).
    pub fn shape(&self) -> (u32, u32, u32, u8) {
        (self.pages, self.height, self.width, self.channels)
    }

    /// Raw samples of one page, or `None` when out of range.
    pub fn page(&self, index: u32) -> Option<&[u8]> {
        if index >= self.pages {
            return None;
        }
        let page_len = self.width as usize * self.height as usize * self.channels as usize;
        let start = index as usize * page_len;
        Some(&self.data[start..start + page_len])
    }

    /// Copy one page back out as a [`RasterBuffer`].
    pub fn page_buffer(&self, index: u32) -> Option<RasterBuffer> {
        self.page(index).map(|data| RasterBuffer {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: data.to_vec(),
        })
    }

    /// One sample value.
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is out of range.
    pub fn sample(&self, page: u32, x: u32, y: u32, channel: u8) -> u8 {
        assert!(page < self.pages && x < self.width && y < self.height && channel < self.channels);
        let idx = ((page as usize * self.height as usize + y as usize) * self.width as usize
            + x as usize)
            * self.channels as usize
            + channel as usize;
        self.data[idx]
    }

    /// Whether the array holds exactly one page. Hosts typically present a
    /// single page as a plain 2-D image.
    pub fn is_single_page(&self) -> bool {
        self.pages == 1
    }
}
