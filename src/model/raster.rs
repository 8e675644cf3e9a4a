//! Per-page raster buffer.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Color mode of decoded samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Single luminance channel per pixel.
    Grayscale,
    /// Three channels per pixel, R-G-B order.
    #[default]
    Rgb,
}

impl ColorMode {
    /// Number of samples per pixel.
    pub fn channels(&self) -> u8 {
        match self {
            ColorMode::Grayscale => 1,
            ColorMode::Rgb => 3,
        }
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorMode::Grayscale => write!(f, "grayscale"),
            ColorMode::Rgb => write!(f, "rgb"),
        }
    }
}

/// A decoded sample grid for one page: `width` x `height` pixels with
/// `channels` 8-bit samples each, row-major, top-left origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Samples per pixel (1 = grayscale, 3 = RGB).
    pub channels: u8,
    /// Raw sample data, `width * height * channels` bytes.
    pub data: Vec<u8>,
}

impl RasterBuffer {
    /// Create a buffer from raw samples, validating the length invariant.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "raster buffer length {} does not match {}x{}x{}",
                data.len(),
                width,
                height,
                channels
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Create a buffer filled with a constant sample value.
    pub fn filled(width: u32, height: u32, channels: u8, fill: u8) -> Self {
        let len = width as usize * height as usize * channels as usize;
        Self {
            width,
            height,
            channels,
            data: vec![fill; len],
        }
    }

    /// Samples of the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        assert!(x < self.width && y < self.height);
        let c = self.channels as usize;
        let offset = (y as usize * self.width as usize + x as usize) * c;
        &self.data[offset..offset + c]
    }

    /// Pixel dimensions as (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Convert to a single-channel buffer using the ITU-R BT.601 luma
    /// weights: `Y = 0.299 R + 0.587 G + 0.114 B`, rounded half-up.
    ///
    /// Integer arithmetic keeps the conversion byte-reproducible across
    /// platforms. A grayscale buffer is returned unchanged.
    pub fn into_grayscale(self) -> RasterBuffer {
        if self.channels == 1 {
            return self;
        }
        let c = self.channels as usize;
        let data: Vec<u8> = self
            .data
            .chunks_exact(c)
            .map(|px| {
                let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
                ((299 * r + 587 * g + 114 * b + 500) / 1000) as u8
            })
            .collect();
        RasterBuffer {
            width: self.width,
            height: self.height,
            channels: 1,
            data,
        }
    }

    /// Rotate the buffer counter-clockwise by a multiple of 90 degrees.
    ///
    /// `degrees` must be 0, 90, 180, or 270; anything else fails with
    /// [`Error::InvalidParameter`].
    pub fn rotated(&self, degrees: u16) -> Result<RasterBuffer> {
        match degrees {
            0 => Ok(self.clone()),
            90 => Ok(self.rotate_quarter(|x, y, w, _h| (y, w - 1 - x))),
            180 => Ok(self.rotate_half()),
            270 => Ok(self.rotate_quarter(|x, y, _w, h| (h - 1 - y, x))),
            _ => Err(Error::InvalidParameter(format!(
                "rotation {} is not a multiple of 90 in 0..360",
                degrees
            ))),
        }
    }

    /// Quarter-turn rotation; `map(x, y, w, h)` gives the source pixel's
    /// destination coordinates. The output swaps width and height.
    fn rotate_quarter(&self, map: impl Fn(u32, u32, u32, u32) -> (u32, u32)) -> RasterBuffer {
        let c = self.channels as usize;
        let (dw, dh) = (self.height, self.width);
        let mut data = vec![0u8; self.data.len()];
        for y in 0..self.height {
            for x in 0..self.width {
                let (dx, dy) = map(x, y, self.width, self.height);
                let src = (y as usize * self.width as usize + x as usize) * c;
                let dst = (dy as usize * dw as usize + dx as usize) * c;
                data[dst..dst + c].copy_from_slice(&self.data[src..src + c]);
            }
        }
        RasterBuffer {
            width: dw,
            height: dh,
            channels: self.channels,
            data,
        }
    }

    fn rotate_half(&self) -> RasterBuffer {
        let c = self.channels as usize;
        let mut data = vec![0u8; self.data.len()];
        for (i, px) in self.data.chunks_exact(c).rev().enumerate() {
            data[i * c..(i + 1) * c].copy_from_slice(px);
        }
        RasterBuffer {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data,
        }
    }
}
