//! Watermark geometry: which preset applies to an image and where it sits.
//!
//! Gemini stamps its logo in the bottom-right corner. Images whose width AND
//! height both exceed 1024 pixels get the 96x96 logo 64px from the edges;
//! every other image gets the 48x48 logo 32px from the edges.

/// Dimension both sides must strictly exceed to select [`WatermarkSize::Large`].
pub const LARGE_IMAGE_THRESHOLD: u32 = 1024;

/// Watermark size classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatermarkSize {
    /// 48x48 watermark, 32px margin (images where either dimension <= 1024).
    Small,
    /// 96x96 watermark, 64px margin (images where both dimensions > 1024).
    Large,
}

impl WatermarkSize {
    /// Side length of the square logo in pixels.
    #[must_use]
    pub const fn size(self) -> u32 {
        match self {
            Self::Small => 48,
            Self::Large => 96,
        }
    }

    /// Distance in pixels from the right and bottom edges.
    #[must_use]
    pub const fn margin(self) -> u32 {
        match self {
            Self::Small => 32,
            Self::Large => 64,
        }
    }

    /// The size/margin pair for this preset.
    #[must_use]
    pub const fn config(self) -> WatermarkConfig {
        WatermarkConfig {
            size: self.size(),
            margin: self.margin(),
        }
    }
}

/// Size and margin of the watermark for a given image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatermarkConfig {
    /// Width and height of the logo in pixels (48 or 96).
    pub size: u32,
    /// Distance from the image edge in pixels (32 or 64).
    pub margin: u32,
}

impl WatermarkConfig {
    /// The preset this config belongs to.
    #[must_use]
    pub const fn preset(self) -> WatermarkSize {
        if self.size == WatermarkSize::Large.size() {
            WatermarkSize::Large
        } else {
            WatermarkSize::Small
        }
    }
}

/// Axis-aligned square covering the watermark, in image coordinates.
///
/// Spans `[x, x + width) x [y, y + height)`. The origin is signed: images
/// smaller than `margin + size` yield negative coordinates, which callers
/// treat as "partly or fully outside the image".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Width (always the config size).
    pub width: u32,
    /// Height (always the config size).
    pub height: u32,
}

impl Position {
    /// Whether image coordinate `(x, y)` lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x + i64::from(self.width)
            && y < self.y + i64::from(self.height)
    }

    /// Whether the whole rectangle lies inside a `width x height` image.
    #[must_use]
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x + i64::from(self.width) <= i64::from(width)
            && self.y + i64::from(self.height) <= i64::from(height)
    }
}

/// Choose the watermark preset for an image of the given dimensions.
#[must_use]
pub fn watermark_size_for(width: u32, height: u32) -> WatermarkSize {
    if width > LARGE_IMAGE_THRESHOLD && height > LARGE_IMAGE_THRESHOLD {
        WatermarkSize::Large
    } else {
        WatermarkSize::Small
    }
}

/// Determine the watermark configuration from image dimensions.
///
/// Only when both sides strictly exceed 1024 is the large preset used; a
/// 2000x1024 image still gets the small one.
#[must_use]
pub fn detect_config(width: u32, height: u32) -> WatermarkConfig {
    watermark_size_for(width, height).config()
}

/// Rectangle the watermark occupies in a `img_width x img_height` image.
///
/// No clamping: the result may extend past the top-left of a tiny image.
#[must_use]
pub fn calculate_position(img_width: u32, img_height: u32, config: WatermarkConfig) -> Position {
    let offset = i64::from(config.margin) + i64::from(config.size);
    Position {
        x: i64::from(img_width) - offset,
        y: i64::from(img_height) - offset,
        width: config.size,
        height: config.size,
    }
}

/// Detected configuration and position for the given dimensions, without
/// touching any pixels.
#[must_use]
pub fn watermark_info(width: u32, height: u32) -> (WatermarkConfig, Position) {
    let config = detect_config(width, height);
    (config, calculate_position(width, height, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_preset_requires_both_dimensions_above_1024() {
        for (w, h) in [(1025, 1025), (1920, 1080), (1080, 1920), (2000, 2000), (4096, 4096)] {
            assert_eq!(
                detect_config(w, h),
                WatermarkConfig {
                    size: 96,
                    margin: 64
                },
                "{w}x{h}"
            );
        }
    }

    #[test]
    fn small_preset_otherwise() {
        for (w, h) in [
            (100, 100),
            (512, 512),
            (800, 600),
            (1024, 1024),
            (1025, 800),
            (800, 1025),
            (1920, 1024),
            (1024, 1920),
            (1024, 2000),
            (2000, 1024),
        ] {
            assert_eq!(
                detect_config(w, h),
                WatermarkConfig {
                    size: 48,
                    margin: 32
                },
                "{w}x{h}"
            );
        }
    }

    #[test]
    fn position_for_small_config() {
        let config = WatermarkSize::Small.config();
        let pos = calculate_position(800, 600, config);
        assert_eq!((pos.x, pos.y), (720, 520));
        assert_eq!((pos.width, pos.height), (48, 48));

        let pos = calculate_position(1024, 768, config);
        assert_eq!((pos.x, pos.y), (944, 688));
    }

    #[test]
    fn position_for_large_config() {
        let config = WatermarkSize::Large.config();
        let pos = calculate_position(2000, 2000, config);
        assert_eq!((pos.x, pos.y), (1840, 1840));

        let pos = calculate_position(1920, 1080, config);
        assert_eq!((pos.x, pos.y), (1760, 920));
    }

    #[test]
    fn position_goes_negative_for_tiny_images() {
        let pos = calculate_position(50, 30, WatermarkSize::Small.config());
        assert_eq!((pos.x, pos.y), (-30, -50));
        assert!(!pos.fits_within(50, 30));
        assert!(pos.contains(0, -50));
        assert!(!pos.contains(18, 0));
    }

    #[test]
    fn fits_within_exact_footprint() {
        let pos = calculate_position(80, 80, WatermarkSize::Small.config());
        assert_eq!((pos.x, pos.y), (0, 0));
        assert!(pos.fits_within(80, 80));
        assert!(pos.contains(47, 47));
        assert!(!pos.contains(48, 47));
    }

    #[test]
    fn watermark_info_matches_parts() {
        for (w, h) in [(800, 600), (1024, 768), (2000, 2000)] {
            let (config, pos) = watermark_info(w, h);
            assert_eq!(config, detect_config(w, h));
            assert_eq!(pos, calculate_position(w, h, config));
        }
    }

    #[test]
    fn config_round_trips_to_preset() {
        assert_eq!(WatermarkSize::Small.config().preset(), WatermarkSize::Small);
        assert_eq!(WatermarkSize::Large.config().preset(), WatermarkSize::Large);
    }
}
