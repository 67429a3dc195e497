//! Remove the Gemini watermark from a single image.
//!
//! Usage:
//! ```sh
//! cargo run --example remove_watermark -- input.png output.png
//! ```

use std::env;
use std::process;

use gemini_watermark_remover::{watermark_info, WatermarkEngine};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <input> <output>", args[0]);
        process::exit(1);
    }

    let engine = WatermarkEngine::new().expect("failed to initialize engine");
    let img = image::open(&args[1]).expect("failed to open input");

    let (config, pos) = watermark_info(img.width(), img.height());
    println!(
        "{}x{} watermark at ({}, {})",
        config.size, config.size, pos.x, pos.y
    );

    let cleaned = engine.remove_watermark(&img);
    if let Err(e) = cleaned.save(&args[2]) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    println!("Saved: {}", args[2]);
}
