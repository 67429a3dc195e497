//! Error types for the gemini-watermark-remover crate.

/// Errors that can occur while building the engine or moving images on and off disk.
///
/// The watermark transform itself never fails; every variant here comes from
/// asset loading or file I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to decode a reference watermark bitmap.
    #[error("failed to decode reference watermark image: {0}")]
    AlphaMapDecode(image::ImageError),

    /// A reference bitmap does not have the dimensions of its preset.
    #[error("reference image is {width}x{height}, expected {expected}x{expected}")]
    ReferenceSize {
        /// Reference width in pixels.
        width: u32,
        /// Reference height in pixels.
        height: u32,
        /// Side length required by the preset.
        expected: u32,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image decoding or encoding.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// A glob pattern could not be parsed.
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
