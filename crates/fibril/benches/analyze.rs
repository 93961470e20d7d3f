use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fibril::{hsv_to_rgb, AnalysisParams, Analyzer, HsvImage, ZoneClassifier};
use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Three hue bands with per-pixel hue jitter, roughly like a stained section.
fn synthetic_section(width: u32, height: u32) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(7);
    RgbImage::from_fn(width, height, |_, y| {
        let depth = y as f64 / height as f64;
        let base: i32 = if depth < 0.1 {
            8
        } else if depth < 0.4 {
            40
        } else {
            66
        };
        let hue = (base + rng.gen_range(-3..=3)).clamp(0, 179) as u8;
        let value = rng.gen_range(150..=230);
        Rgb(hsv_to_rgb(hue, 230, value))
    })
}

fn bench_analyze(c: &mut Criterion) {
    let image = synthetic_section(320, 480);
    let analyzer = Analyzer::new();
    let params = AnalysisParams::default();

    c.bench_function("analyze_320x480", |b| {
        b.iter(|| analyzer.analyze(black_box(&image), black_box(&params)))
    });

    let manual = AnalysisParams {
        use_automatic_zone_detection: false,
        ..Default::default()
    };
    c.bench_function("analyze_manual_320x480", |b| {
        b.iter(|| analyzer.analyze(black_box(&image), black_box(&manual)))
    });
}

fn bench_zone_detection(c: &mut Criterion) {
    let hsv = HsvImage::from_rgb(&synthetic_section(320, 480));
    let classifier = ZoneClassifier::new(Default::default()).expect("default config is valid");

    c.bench_function("detect_zones_320x480", |b| {
        b.iter(|| classifier.detect(black_box(&hsv)))
    });
}

criterion_group!(benches, bench_analyze, bench_zone_detection);
criterion_main!(benches);
