use gemini_watermark_remover::{
    detect_config, load_image, watermark_info, AlphaMap, ProcessOptions, WatermarkEngine,
    WatermarkSize,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

/// Stamp `map` onto `img` at the detected position, the way Gemini does.
fn composite(img: &mut RgbImage, map: &AlphaMap) {
    let (_, pos) = watermark_info(img.width(), img.height());
    for row in 0..map.height() {
        for col in 0..map.width() {
            let alpha = map.get(row, col).unwrap();
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            let px = img.get_pixel_mut(
                (pos.x + i64::from(col)) as u32,
                (pos.y + i64::from(row)) as u32,
            );
            for ch in 0..3 {
                let v = alpha * 255.0 + (1.0 - alpha) * f32::from(px[ch]);
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                {
                    px[ch] = v.round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }
}

/// Busy but deterministic content so a wrong correction would show.
fn textured(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        #[allow(clippy::cast_possible_truncation)]
        let px = Rgb([
            (x * 3 % 200) as u8,
            (y * 5 % 200) as u8,
            ((x + y) % 200) as u8,
        ]);
        px
    })
}

fn max_channel_diff(a: &RgbImage, b: &RgbImage) -> i32 {
    a.pixels()
        .zip(b.pixels())
        .flat_map(|(p, q)| (0..3).map(move |ch| (i32::from(p[ch]) - i32::from(q[ch])).abs()))
        .max()
        .unwrap_or(0)
}

#[test]
fn engine_initializes_successfully() {
    assert!(WatermarkEngine::new().is_ok());
}

#[test]
fn round_trip_recovers_small_watermark() {
    let engine = WatermarkEngine::new().unwrap();
    let original = textured(800, 600);
    let mut stamped = original.clone();
    composite(&mut stamped, engine.alpha_map(WatermarkSize::Small));
    assert!(max_channel_diff(&stamped, &original) > 10);

    let restored = engine.remove_watermark_rgb(&stamped);
    assert!(max_channel_diff(&restored, &original) <= 2);
}

#[test]
fn round_trip_recovers_large_watermark() {
    let engine = WatermarkEngine::new().unwrap();
    assert_eq!(detect_config(1200, 1100).size, 96);

    let original = textured(1200, 1100);
    let mut stamped = original.clone();
    composite(&mut stamped, engine.alpha_map(WatermarkSize::Large));

    let restored = engine.remove_watermark_rgb(&stamped);
    assert!(max_channel_diff(&restored, &original) <= 2);
}

#[test]
fn round_trip_with_custom_references() {
    let gradient = |side: u32| {
        DynamicImage::ImageRgb8(RgbImage::from_fn(side, side, |x, _| {
            #[allow(clippy::cast_possible_truncation)]
            let v = (x * 120 / side) as u8;
            Rgb([v, v, v])
        }))
    };
    let engine = WatermarkEngine::from_references(&gradient(48), &gradient(96)).unwrap();

    let original = textured(300, 300);
    let mut stamped = original.clone();
    composite(&mut stamped, engine.alpha_map(WatermarkSize::Small));

    let restored = engine.remove_watermark(&DynamicImage::ImageRgb8(stamped));
    assert!(max_channel_diff(restored.as_rgb8().unwrap(), &original) <= 2);
}

#[test]
fn source_image_is_not_modified() {
    let engine = WatermarkEngine::new().unwrap();
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        200,
        200,
        Rgba([230, 230, 230, 128]),
    ));
    let snapshot = img.clone();

    let out = engine.remove_watermark(&img);
    assert_eq!(img, snapshot);
    assert_ne!(out, img);
}

#[test]
fn process_file_keeps_png_as_png() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("render.png");
    let engine = WatermarkEngine::new().unwrap();

    let original = textured(400, 300);
    let mut stamped = original.clone();
    composite(&mut stamped, engine.alpha_map(WatermarkSize::Small));
    stamped.save(&input).unwrap();

    let result = engine.process_file(&input, &ProcessOptions::default());
    assert!(result.success, "{}", result.message);
    assert_eq!(result.output, tmp.path().join("render_clean.png"));
    assert_eq!(result.dimensions, Some((400, 300)));
    assert_eq!(result.format, Some(ImageFormat::Png));
    let (config, pos) = result.watermark.unwrap();
    assert_eq!((config.size, pos.x, pos.y), (48, 320, 220));

    let (cleaned, format) = load_image(&result.output).unwrap();
    assert_eq!(format, ImageFormat::Png);
    assert!(max_channel_diff(&cleaned.to_rgb8(), &original) <= 2);
}

#[test]
fn process_file_keeps_jpeg_as_jpeg() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("photo.jpg");
    textured(320, 240).save(&input).unwrap();

    let engine = WatermarkEngine::new().unwrap();
    let opts = ProcessOptions {
        suffix: "_nowm".to_string(),
        ..ProcessOptions::default()
    };
    let result = engine.process_file(&input, &opts);
    assert!(result.success, "{}", result.message);
    assert_eq!(result.output, tmp.path().join("photo_nowm.jpg"));

    let (cleaned, format) = load_image(&result.output).unwrap();
    assert_eq!(format, ImageFormat::Jpeg);
    assert_eq!((cleaned.width(), cleaned.height()), (320, 240));
}

#[test]
fn process_file_honors_forced_size() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("small.png");
    textured(400, 400).save(&input).unwrap();

    let engine = WatermarkEngine::new().unwrap();
    let opts = ProcessOptions {
        force_size: Some(WatermarkSize::Large),
        ..ProcessOptions::default()
    };
    let result = engine.process_file(&input, &opts);
    assert!(result.success);
    let (config, pos) = result.watermark.unwrap();
    assert_eq!((config.size, config.margin), (96, 64));
    assert_eq!((pos.x, pos.y), (240, 240));
}

#[test]
fn process_file_reports_failures() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = WatermarkEngine::new().unwrap();

    let missing = engine.process_file(&tmp.path().join("missing.png"), &ProcessOptions::default());
    assert!(!missing.success);
    assert!(!missing.message.is_empty());

    let corrupt = tmp.path().join("corrupt.png");
    std::fs::write(&corrupt, b"\x89PNG but not really").unwrap();
    let result = engine.process_file(&corrupt, &ProcessOptions::default());
    assert!(!result.success);
    assert!(result.dimensions.is_none());
    assert!(!result.output.exists());
}

#[test]
fn process_files_returns_results_in_input_order() {
    let tmp = tempfile::tempdir().unwrap();
    let mut inputs = Vec::new();
    for (i, side) in [120u32, 90, 200].iter().enumerate() {
        let path = tmp.path().join(format!("img{i}.png"));
        textured(*side, *side).save(&path).unwrap();
        inputs.push(path);
    }
    inputs.push(tmp.path().join("absent.png"));

    let engine = WatermarkEngine::new().unwrap();
    let results = engine.process_files(&inputs, &ProcessOptions::default());

    assert_eq!(results.len(), 4);
    for (result, input) in results.iter().zip(&inputs) {
        assert_eq!(&result.path, input);
    }
    assert!(results[..3].iter().all(|r| r.success));
    assert!(!results[3].success);
}
