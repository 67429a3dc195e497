//! Core watermark removal engine.

use std::borrow::Cow;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, GenericImage, ImageFormat, Pixel, RgbImage, RgbaImage};

use crate::alpha_map::AlphaMap;
use crate::assets;
use crate::blending::{self, BlendChannel};
use crate::error::{Error, Result};
use crate::files;
use crate::geometry::{self, Position, WatermarkConfig, WatermarkSize};

/// JPEG quality used when re-encoding JPEG inputs.
pub const JPEG_QUALITY: u8 = 95;

/// Options controlling file processing.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Appended to the input file stem to name the output.
    pub suffix: String,
    /// Force a specific watermark size instead of deriving it from dimensions.
    pub force_size: Option<WatermarkSize>,
    /// Report detected geometry for each image.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            suffix: files::DEFAULT_SUFFIX.to_string(),
            force_size: None,
            verbose: false,
            quiet: false,
        }
    }
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the input file.
    pub path: PathBuf,
    /// Where the cleaned image was (or would have been) written.
    pub output: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Decoded dimensions, once the image has been read.
    pub dimensions: Option<(u32, u32)>,
    /// Detected container format of the input.
    pub format: Option<ImageFormat>,
    /// Watermark geometry that was applied.
    pub watermark: Option<(WatermarkConfig, Position)>,
    /// Human-readable status message.
    pub message: String,
}

/// The watermark engine holding pre-computed alpha maps.
///
/// Create once with [`WatermarkEngine::new()`] and reuse for multiple images.
/// The maps are read-only after construction, so a single engine can be
/// shared across threads without locking.
pub struct WatermarkEngine {
    alpha_map_small: AlphaMap,
    alpha_map_large: AlphaMap,
}

impl WatermarkEngine {
    /// Create a new engine from the embedded reference images.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlphaMapDecode`] if an embedded PNG cannot be decoded.
    pub fn new() -> Result<Self> {
        let small = assets::load_reference_image(WatermarkSize::Small)?;
        let large = assets::load_reference_image(WatermarkSize::Large)?;
        Self::from_references(&small, &large)
    }

    /// Create an engine from caller-supplied reference captures.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReferenceSize`] unless `small` is 48x48 and `large` is 96x96.
    pub fn from_references(small: &DynamicImage, large: &DynamicImage) -> Result<Self> {
        check_reference(small, WatermarkSize::Small)?;
        check_reference(large, WatermarkSize::Large)?;

        let engine = Self {
            alpha_map_small: AlphaMap::from_image(small),
            alpha_map_large: AlphaMap::from_image(large),
        };
        tracing::debug!("watermark engine ready (48x48 and 96x96 alpha maps)");
        Ok(engine)
    }

    /// The pre-computed alpha map for a preset.
    #[must_use]
    pub fn alpha_map(&self, size: WatermarkSize) -> &AlphaMap {
        match size {
            WatermarkSize::Small => &self.alpha_map_small,
            WatermarkSize::Large => &self.alpha_map_large,
        }
    }

    /// Remove the watermark, choosing the preset from the image dimensions.
    ///
    /// Returns a new image with the same dimensions and pixel layout; the
    /// input is not modified. Only pixels inside the watermark rectangle can
    /// differ, and only in their color channels. 8-bit, 16-bit and float
    /// layouts are each corrected at their own precision.
    #[must_use]
    pub fn remove_watermark(&self, image: &DynamicImage) -> DynamicImage {
        let size = geometry::watermark_size_for(image.width(), image.height());
        self.remove_watermark_as(image, size)
    }

    /// Remove the watermark assuming the given preset regardless of dimensions.
    #[must_use]
    pub fn remove_watermark_as(&self, image: &DynamicImage, size: WatermarkSize) -> DynamicImage {
        match image {
            DynamicImage::ImageLuma8(buf) => DynamicImage::ImageLuma8(self.restored(buf, size)),
            DynamicImage::ImageLumaA8(buf) => DynamicImage::ImageLumaA8(self.restored(buf, size)),
            DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(self.restored(buf, size)),
            DynamicImage::ImageRgba8(buf) => DynamicImage::ImageRgba8(self.restored(buf, size)),
            DynamicImage::ImageLuma16(buf) => DynamicImage::ImageLuma16(self.restored(buf, size)),
            DynamicImage::ImageLumaA16(buf) => {
                DynamicImage::ImageLumaA16(self.restored(buf, size))
            }
            DynamicImage::ImageRgb16(buf) => DynamicImage::ImageRgb16(self.restored(buf, size)),
            DynamicImage::ImageRgba16(buf) => DynamicImage::ImageRgba16(self.restored(buf, size)),
            DynamicImage::ImageRgb32F(buf) => DynamicImage::ImageRgb32F(self.restored(buf, size)),
            DynamicImage::ImageRgba32F(buf) => {
                DynamicImage::ImageRgba32F(self.restored(buf, size))
            }
            // Layouts added to `image` later are corrected through 8-bit RGBA.
            other => self.restored(other, size),
        }
    }

    /// Remove the watermark from a packed RGB buffer.
    #[must_use]
    pub fn remove_watermark_rgb(&self, image: &RgbImage) -> RgbImage {
        self.restored(image, geometry::watermark_size_for(image.width(), image.height()))
    }

    /// Remove the watermark from a packed RGBA buffer, keeping its alpha channel.
    #[must_use]
    pub fn remove_watermark_rgba(&self, image: &RgbaImage) -> RgbaImage {
        self.restored(image, geometry::watermark_size_for(image.width(), image.height()))
    }

    fn restored<I>(&self, image: &I, size: WatermarkSize) -> I
    where
        I: GenericImage + Clone,
        <I::Pixel as Pixel>::Subpixel: BlendChannel,
    {
        let mut out = image.clone();
        let (width, height) = out.dimensions();
        let position = geometry::calculate_position(width, height, size.config());

        if !position.fits_within(width, height) {
            tracing::debug!(
                width,
                height,
                x = position.x,
                y = position.y,
                "watermark extends past image bounds; correcting the overlap only"
            );
        }

        blending::reverse_blend(&mut out, self.alpha_map(size), position);
        out
    }

    /// Process a single image file: load, remove, save next to the input.
    ///
    /// The output name is [`files::output_path`] with `opts.suffix`, and the
    /// output is encoded in the input's detected format.
    #[must_use]
    pub fn process_file(&self, input: &Path, opts: &ProcessOptions) -> ProcessResult {
        let mut result = ProcessResult {
            path: input.to_path_buf(),
            output: files::output_path(input, &opts.suffix),
            success: false,
            dimensions: None,
            format: None,
            watermark: None,
            message: String::new(),
        };

        match self.try_process_file(&mut result, opts) {
            Ok(()) => {
                result.success = true;
                result.message = "Watermark removed".to_string();
            }
            Err(e) => {
                tracing::warn!(path = %input.display(), error = %e, "failed to process image");
                result.message = e.to_string();
            }
        }

        result
    }

    fn try_process_file(&self, result: &mut ProcessResult, opts: &ProcessOptions) -> Result<()> {
        let (img, format) = load_image(&result.path)?;
        let (width, height) = (img.width(), img.height());
        result.dimensions = Some((width, height));
        result.format = Some(format);

        let size = opts
            .force_size
            .unwrap_or_else(|| geometry::watermark_size_for(width, height));
        let config = size.config();
        let position = geometry::calculate_position(width, height, config);
        result.watermark = Some((config, position));

        tracing::debug!(
            path = %result.path.display(),
            width,
            height,
            format = ?format,
            size = config.size,
            x = position.x,
            y = position.y,
            "removing watermark"
        );

        let cleaned = self.remove_watermark_as(&img, size);
        save_image(&cleaned, &result.output, format)
    }

    /// Process many files with one engine.
    ///
    /// Runs in parallel when the `cli` feature is enabled (via rayon). Results
    /// come back in input order.
    #[must_use]
    pub fn process_files(&self, inputs: &[PathBuf], opts: &ProcessOptions) -> Vec<ProcessResult> {
        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            inputs
                .par_iter()
                .map(|input| self.process_file(input, opts))
                .collect()
        }

        #[cfg(not(feature = "cli"))]
        {
            inputs
                .iter()
                .map(|input| self.process_file(input, opts))
                .collect()
        }
    }
}

fn check_reference(reference: &DynamicImage, size: WatermarkSize) -> Result<()> {
    let expected = size.size();
    if reference.width() == expected && reference.height() == expected {
        Ok(())
    } else {
        Err(Error::ReferenceSize {
            width: reference.width(),
            height: reference.height(),
            expected,
        })
    }
}

/// Decode an image file, detecting the format from its content.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened, [`Error::UnsupportedFormat`]
/// if the content matches no known format, or [`Error::Image`] if decoding fails.
pub fn load_image(path: &Path) -> Result<(DynamicImage, ImageFormat)> {
    let reader = image::ImageReader::open(path)?.with_guessed_format()?;
    let format = reader
        .format()
        .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;
    Ok((reader.decode()?, format))
}

/// Save an image in `format`, with per-format settings.
///
/// PNG stays lossless, JPEG uses quality 95, WebP is written lossless and BMP
/// as is. Any other format falls back to PNG. Pixel layouts a codec cannot
/// store are converted to the nearest layout it can: 8-bit for JPEG, WebP
/// and BMP, 16-bit for float images written as PNG.
///
/// # Errors
///
/// Returns an error if the file cannot be created or encoding fails.
pub fn save_image(img: &DynamicImage, path: &Path, format: ImageFormat) -> Result<()> {
    match format {
        ImageFormat::Jpeg => {
            let encodable = match img.color() {
                ColorType::L8 | ColorType::Rgb8 => Cow::Borrowed(img),
                _ => Cow::Owned(DynamicImage::ImageRgb8(img.to_rgb8())),
            };
            let file = BufWriter::new(File::create(path)?);
            encodable.write_with_encoder(JpegEncoder::new_with_quality(file, JPEG_QUALITY))?;
        }
        ImageFormat::WebP | ImageFormat::Bmp => {
            let encodable = match img.color() {
                ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => {
                    Cow::Borrowed(img)
                }
                _ => Cow::Owned(DynamicImage::ImageRgba8(img.to_rgba8())),
            };
            encodable.save_with_format(path, format)?;
        }
        _ => {
            let encodable = match img.color() {
                ColorType::Rgb32F => Cow::Owned(DynamicImage::ImageRgb16(img.to_rgb16())),
                ColorType::Rgba32F => Cow::Owned(DynamicImage::ImageRgba16(img.to_rgba16())),
                _ => Cow::Borrowed(img),
            };
            encodable.save_with_format(path, ImageFormat::Png)?;
        }
    }

    Ok(())
}
