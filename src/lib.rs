//! Remove the visible Gemini logo watermark via reverse alpha blending.
//!
//! Gemini composites a semi-transparent white sparkle into the bottom-right
//! corner of generated images. Given the per-pixel opacity of that logo, the
//! compositing equation can be solved for the original pixel:
//!
//! ```text
//! watermarked = alpha * 255 + (1 - alpha) * original
//! original    = (watermarked - alpha * 255) / (1 - alpha)
//! ```
//!
//! The opacity comes from 48x48 and 96x96 reference captures of the logo over
//! black, embedded in the binary and decoded once per [`WatermarkEngine`].
//!
//! # Quick Start
//!
//! ```no_run
//! use gemini_watermark_remover::WatermarkEngine;
//!
//! let engine = WatermarkEngine::new().expect("failed to init engine");
//! let img = image::open("photo.png").unwrap();
//! let cleaned = engine.remove_watermark(&img);
//! cleaned.save("photo_clean.png").unwrap();
//! ```
//!
//! # Geometry
//!
//! Placement depends only on the image dimensions, see [`watermark_info`]:
//!
//! ```
//! use gemini_watermark_remover::watermark_info;
//!
//! let (config, pos) = watermark_info(800, 600);
//! assert_eq!((config.size, config.margin), (48, 32));
//! assert_eq!((pos.x, pos.y), (720, 520));
//! ```

#![deny(missing_docs)]

pub mod alpha_map;
pub mod assets;
pub mod blending;
mod engine;
pub mod error;
pub mod files;
pub mod geometry;

pub use alpha_map::AlphaMap;
pub use engine::{
    load_image, save_image, ProcessOptions, ProcessResult, WatermarkEngine, JPEG_QUALITY,
};
pub use error::{Error, Result};
pub use files::{collect_inputs, output_path, DEFAULT_SUFFIX};
pub use geometry::{
    calculate_position, detect_config, watermark_info, Position, WatermarkConfig, WatermarkSize,
};
