//! Per-pixel opacity maps extracted from reference captures.

use std::ops::Index;

use image::{DynamicImage, RgbImage};

use crate::error::{Error, Result};

/// Normalized opacity of the watermark, one value in `[0, 1]` per pixel.
///
/// Values are stored row-major from the top-left corner, so the entry for
/// `(row, col)` lives at `row * width + col`. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaMap {
    values: Vec<f32>,
    width: u32,
    height: u32,
}

impl AlphaMap {
    /// Extract an alpha map from a capture of the logo over pure black.
    ///
    /// The alpha at each pixel is `max(R, G, B) / 255`. The maximum rather
    /// than the mean lets any bright channel dominate, which absorbs the slight
    /// color fringing of a screen capture.
    #[must_use]
    pub fn from_rgb(reference: &RgbImage) -> Self {
        let values = reference
            .pixels()
            .map(|px| {
                let [r, g, b] = px.0;
                f32::from(r.max(g).max(b)) / 255.0
            })
            .collect();

        Self {
            values,
            width: reference.width(),
            height: reference.height(),
        }
    }

    /// Extract an alpha map from any decoded image, reading its RGB channels.
    #[must_use]
    pub fn from_image(reference: &DynamicImage) -> Self {
        match reference.as_rgb8() {
            Some(rgb) => Self::from_rgb(rgb),
            None => Self::from_rgb(&reference.to_rgb8()),
        }
    }

    /// Decode an encoded reference image and extract its alpha map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlphaMapDecode`] if the bytes are not a decodable image.
    pub fn from_png_bytes(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).map_err(Error::AlphaMapDecode)?;
        Ok(Self::from_image(&img))
    }

    /// Width of the reference in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the reference in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of entries (`width * height`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Row-major alpha values.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Alpha at `(row, col)`, or `None` outside the map.
    #[must_use]
    pub fn get(&self, row: u32, col: u32) -> Option<f32> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.values.get((row * self.width + col) as usize).copied()
    }
}

impl Index<usize> for AlphaMap {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.values[index]
    }
}
