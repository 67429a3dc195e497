use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gemini_watermark_remover::files::{is_batch_input, is_glob_pattern};
use gemini_watermark_remover::{
    calculate_position, collect_inputs, load_image, watermark_info, ProcessOptions, ProcessResult,
    WatermarkEngine, WatermarkSize, DEFAULT_SUFFIX,
};

#[derive(Parser)]
#[command(
    name = "gemini-watermark-remover",
    about = "Remove the visible Gemini watermark via reverse alpha blending",
    version,
    after_help = "Examples:\n  \
                  gemini-watermark-remover image.png            # Process single image\n  \
                  gemini-watermark-remover -s _nowm image.png   # Custom suffix\n  \
                  gemini-watermark-remover ./images/            # Process all images in folder\n  \
                  gemini-watermark-remover 'shots/*.jpg'        # Glob pattern\n  \
                  gemini-watermark-remover -v ./images/         # Verbose mode"
)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Input image, directory (not recursive) or glob pattern
    input: String,

    /// Suffix to append to output filenames
    #[arg(short, long, default_value = DEFAULT_SUFFIX)]
    suffix: String,

    /// Force 48x48 watermark size
    #[arg(long, conflicts_with = "force_large")]
    force_small: bool,

    /// Force 96x96 watermark size
    #[arg(long)]
    force_large: bool,

    /// Only report detected watermark geometry, write nothing
    #[arg(long)]
    info: bool,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let force_size = if cli.force_small {
        Some(WatermarkSize::Small)
    } else if cli.force_large {
        Some(WatermarkSize::Large)
    } else {
        None
    };

    let opts = ProcessOptions {
        suffix: cli.suffix,
        force_size,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let engine = match WatermarkEngine::new() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error initializing engine: {e}");
            process::exit(1);
        }
    };

    let is_pattern = is_glob_pattern(&cli.input);
    if !is_pattern && !Path::new(&cli.input).exists() {
        eprintln!("Error accessing path: {} does not exist", cli.input);
        process::exit(1);
    }

    let files = match collect_inputs(&cli.input, &opts.suffix) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error finding images: {e}");
            process::exit(1);
        }
    };

    if files.is_empty() {
        eprintln!("No image files found");
        process::exit(1);
    }
    if is_batch_input(&cli.input) && !opts.quiet {
        println!("Found {} image(s) to process", files.len());
    }

    if cli.info {
        report_geometry(&files, &opts);
        return;
    }

    let results = engine.process_files(&files, &opts);

    let mut fail_count = 0usize;
    for r in &results {
        print_result(r, &opts);
        if !r.success {
            fail_count += 1;
        }
    }

    if !opts.quiet {
        println!(
            "Successfully processed {}/{} image(s)",
            results.len() - fail_count,
            results.len()
        );
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn report_geometry(files: &[PathBuf], opts: &ProcessOptions) {
    let mut failed = false;
    for path in files {
        match load_image(path) {
            Ok((img, format)) => {
                let (w, h) = (img.width(), img.height());
                let (config, pos) = match opts.force_size {
                    Some(size) => (size.config(), calculate_position(w, h, size.config())),
                    None => watermark_info(w, h),
                };
                println!("{} ({w}x{h}, format: {format:?})", path.display());
                println!(
                    "  Watermark: {}x{} at position ({}, {})",
                    config.size, config.size, pos.x, pos.y
                );
            }
            Err(e) => {
                eprintln!("Error reading {}: {e}", path.display());
                failed = true;
            }
        }
    }
    if failed {
        process::exit(1);
    }
}

fn print_result(result: &ProcessResult, opts: &ProcessOptions) {
    if !result.success {
        eprintln!("Error processing {}: {}", result.path.display(), result.message);
        return;
    }
    if opts.quiet {
        return;
    }

    if opts.verbose {
        if let (Some((w, h)), Some((config, pos))) = (result.dimensions, result.watermark) {
            let format = result
                .format
                .map_or_else(|| "unknown".to_string(), |f| format!("{f:?}"));
            println!("Processing: {} ({w}x{h}, format: {format})", result.path.display());
            println!(
                "  Watermark: {}x{} at position ({}, {})",
                config.size, config.size, pos.x, pos.y
            );
        }
    }
    println!("Saved: {}", result.output.display());
}
