//! Geometric and document metadata attached to an assembled image array.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::BackendMetadata;
use crate::model::ColorMode;
use crate::probe::DocumentFormat;

/// Millimetres per inch, for pixel-spacing computation.
pub const MM_PER_INCH: f64 = 25.4;

/// Metadata describing an assembled [`ImageArray`](crate::ImageArray).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Source document format.
    pub format: DocumentFormat,

    /// Rasterization resolution in dots per inch.
    pub dpi: f64,

    /// Color mode shared by all pages in the array.
    pub color_mode: ColorMode,

    /// Number of successfully rasterized pages.
    pub page_count: u32,

    /// Physical size of one pixel in millimetres, (row, column) axes.
    /// Always `25.4 / dpi` on both axes.
    pub pixel_spacing_mm: (f64, f64),

    /// Rotation applied to every page, in degrees counter-clockwise.
    pub rotation_deg: u16,

    /// Page indices that failed to render and were skipped under the skip
    /// policy. Empty when every page rasterized.
    pub skipped_pages: Vec<u32>,

    /// Document title, when the source carries one.
    pub title: Option<String>,

    /// Document author, when the source carries one.
    pub author: Option<String>,

    /// Document creation timestamp, parsed from the source metadata.
    pub created: Option<DateTime<Utc>>,
}

impl ImageInfo {
    /// Build the metadata record for an assembly run.
    pub(crate) fn new(
        format: DocumentFormat,
        dpi: f64,
        color_mode: ColorMode,
        rotation_deg: u16,
        page_count: u32,
        skipped_pages: Vec<u32>,
        backend: BackendMetadata,
    ) -> Self {
        let spacing = MM_PER_INCH / dpi;
        Self {
            format,
            dpi,
            color_mode,
            page_count,
            pixel_spacing_mm: (spacing, spacing),
            rotation_deg,
            skipped_pages,
            title: backend.title,
            author: backend.author,
            created: backend.creation_date.as_deref().and_then(parse_pdf_date),
        }
    }

    /// Serialize the record to a JSON string for host interchange.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Parse a PDF date string (`D:YYYYMMDDHHmmSS`, PDF 32000-1 §7.9.4).
///
/// Everything after the seconds field is a timezone offset; it is ignored
/// and the timestamp is interpreted as UTC. Dates truncated after any
/// complete field (down to `D:YYYY`) are accepted with the missing fields
/// defaulted, matching how viewers treat partial dates.
pub fn parse_pdf_date(raw: &str) -> Option<DateTime<Utc>> {
    let digits: String = raw
        .trim()
        .trim_start_matches("D:")
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .take(14)
        .collect();

    // Fields are two digits each after the four-digit year; a string that
    // ends mid-field is malformed.
    if digits.len() < 4 || digits.len() % 2 != 0 {
        return None;
    }

    // Pad missing trailing fields: month/day default to 01, time to 00.
    let mut padded = digits;
    for default in ["01", "01", "00", "00", "00"] {
        if padded.len() >= 14 {
            break;
        }
        padded.push_str(default);
    }

    NaiveDateTime::parse_from_str(&padded, "%Y%m%d%H%M%S")
        .ok()
        .map(|dt| dt.and_utc())
}

/// Pixel spacing in millimetres for a given DPI.
pub fn pixel_spacing_mm(dpi: f64) -> f64 {
    MM_PER_INCH / dpi
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_full_pdf_date() {
        let dt = parse_pdf_date("D:20220131120530+01'00'").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2022, 1, 31));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (12, 5, 30));
    }

    #[test]
    fn test_parse_date_without_prefix() {
        let dt = parse_pdf_date("20220131120530").unwrap();
        assert_eq!(dt.year(), 2022);
    }

    #[test]
    fn test_parse_truncated_date() {
        let dt = parse_pdf_date("D:2022").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2022, 1, 1));

        let dt = parse_pdf_date("D:202206").unwrap();
        assert_eq!((dt.year(), dt.month()), (2022, 6));
    }

    #[test]
    fn test_parse_invalid_date() {
        assert!(parse_pdf_date("").is_none());
        assert!(parse_pdf_date("D:").is_none());
        assert!(parse_pdf_date("not a date").is_none());
        assert!(parse_pdf_date("D:20221").is_none()); // ends mid-field
        assert!(parse_pdf_date("D:20221399000000").is_none()); // month 13
    }

    #[test]
    fn test_pixel_spacing() {
        let spacing = pixel_spacing_mm(72.0);
        assert!((spacing - 0.3528).abs() < 1e-4);
        assert!((pixel_spacing_mm(150.0) - 25.4 / 150.0).abs() < 1e-12);
    }

    #[test]
    fn test_info_json_round_trip() {
        let info = ImageInfo::new(
            DocumentFormat::Pdf {
                version: Some("1.7".into()),
            },
            150.0,
            ColorMode::Rgb,
            0,
            3,
            vec![1],
            BackendMetadata {
                title: Some("title".into()),
                author: None,
                creation_date: Some("D:20220101000000".into()),
            },
        );
        let json = info.to_json();
        let back: ImageInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back.page_count, 3);
        assert_eq!(back.skipped_pages, vec![1]);
        assert_eq!(back.title.as_deref(), Some("title"));
        assert!(back.created.is_some());
    }
}
