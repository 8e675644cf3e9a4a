//! Data model: raster buffers, the assembled image array, and metadata.

mod array;
mod info;
mod raster;

pub use array::ImageArray;
pub use info::{parse_pdf_date, pixel_spacing_mm, ImageInfo, MM_PER_INCH};
pub use raster::{ColorMode, RasterBuffer};
