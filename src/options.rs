//! Read options and policy configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::ColorMode;
use crate::raster::validate_dpi;

/// Default rasterization resolution in dots per inch.
pub const DEFAULT_DPI: f64 = 150.0;

/// What to do when the backend fails on a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageErrorPolicy {
    /// Propagate the first failure; no partial array is returned.
    #[default]
    Abort,
    /// Record the failed page index in the metadata and continue.
    Skip,
}

/// What to do when pages in one document produce different pixel sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryPolicy {
    /// Fail with an inconsistent-geometry error.
    #[default]
    Strict,
    /// Pad every page to the maximum dimensions with the given sample value.
    PadToMax { fill: u8 },
}

/// Options for reading a document into an image array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Rasterization resolution in dots per inch.
    pub dpi: f64,

    /// Output color mode.
    pub color_mode: ColorMode,

    /// Page-failure policy.
    pub on_page_error: PageErrorPolicy,

    /// Page-geometry policy.
    pub geometry: GeometryPolicy,

    /// Rotation applied to every page, in degrees counter-clockwise.
    /// Must be 0, 90, 180, or 270.
    pub rotate_deg: u16,

    /// Hand back the raw document bytes with the metadata record instead
    /// of rasterizing, for hosts that store the document encapsulated.
    /// Served by [`PdfPlugin::read_encapsulated`](crate::PdfPlugin::read_encapsulated).
    pub encapsulate: bool,
}

impl ReadOptions {
    /// Create read options with defaults (150 dpi RGB, abort on failure,
    /// strict geometry, no rotation).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rasterization resolution.
    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the output color mode.
    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    /// Produce single-channel output.
    pub fn grayscale(mut self) -> Self {
        self.color_mode = ColorMode::Grayscale;
        self
    }

    /// Skip pages that fail to render instead of aborting.
    pub fn skip_failed_pages(mut self) -> Self {
        self.on_page_error = PageErrorPolicy::Skip;
        self
    }

    /// Pad heterogeneous pages to the largest page size with `fill`.
    pub fn pad_pages(mut self, fill: u8) -> Self {
        self.geometry = GeometryPolicy::PadToMax { fill };
        self
    }

    /// Rotate every page counter-clockwise by a multiple of 90 degrees.
    pub fn with_rotation(mut self, degrees: u16) -> Self {
        self.rotate_deg = degrees;
        self
    }

    /// Request the raw document bytes instead of a rasterized array.
    pub fn encapsulated(mut self) -> Self {
        self.encapsulate = true;
        self
    }

    /// Validate option values. Called once at the start of every read.
    pub fn validate(&self) -> Result<()> {
        validate_dpi(self.dpi)?;
        if !matches!(self.rotate_deg, 0 | 90 | 180 | 270) {
            return Err(Error::InvalidParameter(format!(
                "rotate value {} is not implemented",
                self.rotate_deg
            )));
        }
        Ok(())
    }

    /// Parse a comma-separated `key=value` option string, e.g.
    /// `"dpi=300,rotate=90,on_error=skip"`, as passed through by hosts
    /// that configure plugins with flat strings.
    ///
    /// Recognized keys: `dpi`, `color` (`rgb` | `gray` | `grayscale`),
    /// `on_error` (`abort` | `skip`), `geometry` (`strict` | `pad` |
    /// `pad:<fill>`), `rotate`, `encapsulate` (`on` | `off`). Unknown
    /// keys or unparseable values fail with [`Error::InvalidParameter`].
    pub fn parse_spec(spec: &str) -> Result<Self> {
        let mut options = Self::default();
        for expr in spec.split(',').filter(|s| !s.trim().is_empty()) {
            let (key, value) = expr
                .split_once('=')
                .ok_or_else(|| Error::InvalidParameter(format!("expected key=value, got {:?}", expr)))?;
            let (key, value) = (key.trim(), value.trim());
            match key {
                "dpi" => {
                    options.dpi = value.parse().map_err(|_| {
                        Error::InvalidParameter(format!("dpi value {:?} is not a number", value))
                    })?;
                }
                "color" => {
                    options.color_mode = match value {
                        "rgb" => ColorMode::Rgb,
                        "gray" | "grayscale" => ColorMode::Grayscale,
                        other => {
                            return Err(Error::InvalidParameter(format!(
                                "unknown color mode {:?}",
                                other
                            )))
                        }
                    };
                }
                "on_error" => {
                    options.on_page_error = match value {
                        "abort" => PageErrorPolicy::Abort,
                        "skip" => PageErrorPolicy::Skip,
                        other => {
                            return Err(Error::InvalidParameter(format!(
                                "unknown page-error policy {:?}",
                                other
                            )))
                        }
                    };
                }
                "geometry" => {
                    options.geometry = match value {
                        "strict" => GeometryPolicy::Strict,
                        "pad" => GeometryPolicy::PadToMax { fill: 255 },
                        other => match other.strip_prefix("pad:") {
                            Some(fill) => GeometryPolicy::PadToMax {
                                fill: fill.parse().map_err(|_| {
                                    Error::InvalidParameter(format!(
                                        "pad fill {:?} is not a byte",
                                        fill
                                    ))
                                })?,
                            },
                            None => {
                                return Err(Error::InvalidParameter(format!(
                                    "unknown geometry policy {:?}",
                                    other
                                )))
                            }
                        },
                    };
                }
                "rotate" => {
                    options.rotate_deg = value.parse().map_err(|_| {
                        Error::InvalidParameter(format!("rotate value {:?} is not a number", value))
                    })?;
                }
                "encapsulate" => {
                    options.encapsulate = match value {
                        "on" | "true" | "1" => true,
                        "off" | "false" | "0" => false,
                        other => {
                            return Err(Error::InvalidParameter(format!(
                                "encapsulate value {:?} is not a switch",
                                other
                            )))
                        }
                    };
                }
                other => {
                    return Err(Error::InvalidParameter(format!(
                        "unknown attribute {:?} set in option string",
                        other
                    )))
                }
            }
        }
        options.validate()?;
        Ok(options)
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            color_mode: ColorMode::Rgb,
            on_page_error: PageErrorPolicy::Abort,
            geometry: GeometryPolicy::Strict,
            rotate_deg: 0,
            encapsulate: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_options_builder() {
        let options = ReadOptions::new()
            .with_dpi(300.0)
            .grayscale()
            .skip_failed_pages()
            .pad_pages(0)
            .with_rotation(90);

        assert_eq!(options.dpi, 300.0);
        assert_eq!(options.color_mode, ColorMode::Grayscale);
        assert_eq!(options.on_page_error, PageErrorPolicy::Skip);
        assert_eq!(options.geometry, GeometryPolicy::PadToMax { fill: 0 });
        assert_eq!(options.rotate_deg, 90);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_default_options() {
        let options = ReadOptions::default();
        assert_eq!(options.dpi, 150.0);
        assert_eq!(options.color_mode, ColorMode::Rgb);
        assert_eq!(options.on_page_error, PageErrorPolicy::Abort);
        assert_eq!(options.geometry, GeometryPolicy::Strict);
        assert_eq!(options.rotate_deg, 0);
        assert!(!options.encapsulate);
    }

    #[test]
    fn test_validate_rejects_bad_rotation() {
        let options = ReadOptions::new().with_rotation(45);
        assert!(matches!(
            options.validate(),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_dpi() {
        let options = ReadOptions::new().with_dpi(-1.0);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_parse_spec_full() {
        let options =
            ReadOptions::parse_spec("dpi=300, rotate=90, color=gray, on_error=skip, geometry=pad:0")
                .unwrap();
        assert_eq!(options.dpi, 300.0);
        assert_eq!(options.rotate_deg, 90);
        assert_eq!(options.color_mode, ColorMode::Grayscale);
        assert_eq!(options.on_page_error, PageErrorPolicy::Skip);
        assert_eq!(options.geometry, GeometryPolicy::PadToMax { fill: 0 });
    }

    #[test]
    fn test_parse_spec_empty_is_default() {
        assert_eq!(ReadOptions::parse_spec("").unwrap(), ReadOptions::default());
    }

    #[test]
    fn test_parse_spec_encapsulate() {
        assert!(ReadOptions::parse_spec("encapsulate=on").unwrap().encapsulate);
        assert!(ReadOptions::parse_spec("encapsulate=1").unwrap().encapsulate);
        assert!(!ReadOptions::parse_spec("encapsulate=off").unwrap().encapsulate);
        assert!(!ReadOptions::parse_spec("dpi=150").unwrap().encapsulate);
        assert!(ReadOptions::parse_spec("encapsulate=maybe").is_err());
    }

    #[test]
    fn test_parse_spec_unknown_key() {
        let result = ReadOptions::parse_spec("dpi=150,antialias=5");
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_parse_spec_bad_values() {
        assert!(ReadOptions::parse_spec("dpi=fast").is_err());
        assert!(ReadOptions::parse_spec("rotate=45").is_err());
        assert!(ReadOptions::parse_spec("color=cmyk").is_err());
        assert!(ReadOptions::parse_spec("dpi").is_err());
        assert!(ReadOptions::parse_spec("dpi=99999").is_err());
    }
}
