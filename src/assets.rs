//! Reference watermark bitmaps embedded in the binary.
//!
//! Each PNG shows the white logo rendered over pure black, so a pixel's
//! brightness is the logo's opacity at that point.

use image::{DynamicImage, ImageFormat};

use crate::error::{Error, Result};
use crate::geometry::WatermarkSize;

/// 48x48 reference capture.
pub const BG_48_PNG: &[u8] = include_bytes!("../assets/bg_48.png");

/// 96x96 reference capture.
pub const BG_96_PNG: &[u8] = include_bytes!("../assets/bg_96.png");

/// Raw PNG bytes of the reference for `size`.
#[must_use]
pub fn reference_png(size: WatermarkSize) -> &'static [u8] {
    match size {
        WatermarkSize::Small => BG_48_PNG,
        WatermarkSize::Large => BG_96_PNG,
    }
}

/// Decode the embedded reference image for `size`.
///
/// # Errors
///
/// Returns [`Error::AlphaMapDecode`] if the embedded PNG is corrupt.
pub fn load_reference_image(size: WatermarkSize) -> Result<DynamicImage> {
    image::load_from_memory_with_format(reference_png(size), ImageFormat::Png)
        .map_err(Error::AlphaMapDecode)
}
