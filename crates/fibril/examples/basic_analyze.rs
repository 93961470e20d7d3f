use fibril::{profile_rows, write_profile_csv, AnalysisParams, Analyzer};
use image::ImageReader;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <section.png> [profile.csv]", args[0]);
        std::process::exit(2);
    }

    let image = ImageReader::open(&args[1])?.decode()?.to_rgb8();
    let result = Analyzer::new().analyze(&image, &AnalysisParams::default());
    if !result.success {
        return Err(result.error.unwrap_or_default().into());
    }

    let b = result.zone_boundaries;
    println!(
        "SZ 0-{:.1}%  MZ {:.1}-{:.1}%  DZ {:.1}-100%",
        b.sz_boundary * 100.0,
        b.sz_boundary * 100.0,
        b.mz_boundary * 100.0,
        b.mz_boundary * 100.0
    );
    println!(
        "Anchors: 0° = hue {:.1}, 90° = hue {:.1} ({:?})",
        result.calibration.zero_hue, result.calibration.ninety_hue, result.calibration_source
    );
    for (name, s) in [
        ("SZ", &result.zone_summaries.sz),
        ("MZ", &result.zone_summaries.mz),
        ("DZ", &result.zone_summaries.dz),
    ] {
        println!(
            "{name}: {:.1}° ± {:.1}° over {} px",
            s.mean_angle, s.std_angle, s.pixel_count
        );
    }

    if let Some(out_path) = args.get(2) {
        let file = std::fs::File::create(out_path)?;
        write_profile_csv(&profile_rows(&result), file)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
