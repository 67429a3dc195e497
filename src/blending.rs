//! Alpha blending math for watermark removal.
//!
//! Gemini applies watermarks via forward alpha blending:
//! `watermarked = alpha * logo + (1 - alpha) * original`
//!
//! This module provides the reverse operation to recover original pixels.

use image::{GenericImage, Pixel};

use crate::alpha_map::AlphaMap;
use crate::geometry::Position;

/// Alpha threshold: ignore pixels with negligible watermark effect (noise).
pub const ALPHA_THRESHOLD: f32 = 0.002;

/// Maximum alpha: clamp to avoid division by near-zero in reverse blending.
pub const MAX_ALPHA: f32 = 0.99;

/// Brightness of the logo on every channel (pure white).
pub const LOGO_VALUE: f32 = 255.0;

/// Restrict `value` to `[min, max]`.
///
/// Unlike [`f32::clamp`] this never panics, even if the bounds are inverted.
#[must_use]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Recover a channel value on the `0..=255` scale from its watermarked value.
///
/// `alpha` must already be clamped to at most [`MAX_ALPHA`]. The result is
/// clamped to `[0, 255]`.
#[must_use]
pub fn unblend(watermarked: f32, alpha: f32) -> f32 {
    let original = (watermarked - alpha * LOGO_VALUE) / (1.0 - alpha);
    clamp(original, 0.0, 255.0)
}

/// Recover one 8-bit channel from its watermarked value.
///
/// `alpha` must already be clamped to at most [`MAX_ALPHA`].
#[must_use]
pub fn unblend_channel(watermarked: u8, alpha: f32) -> u8 {
    u8::from_scale(unblend(f32::from(watermarked), alpha))
}

/// Subpixel types [`reverse_blend`] can correct.
///
/// The blend works on the 8-bit `0..=255` scale. Each type maps its own
/// range onto that scale and back, so 16-bit and float images keep their
/// extra precision.
pub trait BlendChannel: Copy {
    /// The value on the `0..=255` scale.
    fn to_scale(self) -> f32;

    /// Convert back from the `0..=255` scale. `value` is already clamped.
    fn from_scale(value: f32) -> Self;
}

impl BlendChannel for u8 {
    fn to_scale(self) -> f32 {
        f32::from(self)
    }

    // Truncates toward zero.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from_scale(value: f32) -> Self {
        value as u8
    }
}

impl BlendChannel for u16 {
    fn to_scale(self) -> f32 {
        f32::from(self) / 257.0
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from_scale(value: f32) -> Self {
        (value * 257.0).round() as u16
    }
}

impl BlendChannel for f32 {
    fn to_scale(self) -> f32 {
        self * 255.0
    }

    fn from_scale(value: f32) -> Self {
        value / 255.0
    }
}

/// Number of leading channels that carry color, i.e. all but the opacity one.
fn color_channels<P: Pixel>() -> usize {
    usize::from(P::CHANNEL_COUNT) - usize::from(P::HAS_ALPHA)
}

/// Remove the watermark covering `position` from `image` in place.
///
/// For every `(row, col)` of the rectangle, the alpha at the same offset in
/// `alpha_map` drives the inverse blend of the color channels: red, green
/// and blue, or the single gray channel. The opacity channel, if any, is
/// never written. Coordinates outside the image, offsets outside the map and
/// alphas below [`ALPHA_THRESHOLD`] are skipped. Pixels outside the
/// rectangle are never touched.
pub fn reverse_blend<I>(image: &mut I, alpha_map: &AlphaMap, position: Position)
where
    I: GenericImage,
    <I::Pixel as Pixel>::Subpixel: BlendChannel,
{
    let color = color_channels::<I::Pixel>();
    let (img_w, img_h) = image.dimensions();

    for row in 0..position.height {
        for col in 0..position.width {
            let (Ok(x), Ok(y)) = (
                u32::try_from(position.x + i64::from(col)),
                u32::try_from(position.y + i64::from(row)),
            ) else {
                continue;
            };
            if x >= img_w || y >= img_h {
                continue;
            }

            let Some(alpha) = alpha_map.get(row, col) else {
                continue;
            };
            if alpha < ALPHA_THRESHOLD {
                continue;
            }
            let alpha = alpha.min(MAX_ALPHA);

            let mut px = image.get_pixel(x, y);
            for ch in px.channels_mut().iter_mut().take(color) {
                let watermarked = *ch;
                *ch = BlendChannel::from_scale(unblend(watermarked.to_scale(), alpha));
            }
            image.put_pixel(x, y, px);
        }
    }
}
