//! fibril CLI — command-line interface for cartilage orientation profiling.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use fibril::{
    annotate_zones, hue_heatmap, masked_image, profile_rows, rgb_to_hsv, write_profile_csv,
    write_zone_summary_csv, AnalysisParams, Analyzer, AnalyzerConfig,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "fibril")]
#[command(
    about = "Detect cartilage zones and profile collagen fiber orientation in polarized-light images"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one section: zones, calibration, summaries and depth profile.
    Analyze(CliAnalyzeArgs),

    /// Run automatic zone detection only and print it as JSON.
    Zones(CliZonesArgs),

    /// Print the 8-bit HSV triple of an RGB color.
    Hsv {
        #[arg(long)]
        r: u8,
        #[arg(long)]
        g: u8,
        #[arg(long)]
        b: u8,
    },
}

#[derive(Debug, Clone, Args)]
struct CliConfigArgs {
    /// JSON analyzer configuration; missing keys take defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the clustering seed.
    #[arg(long)]
    seed: Option<u64>,
}

impl CliConfigArgs {
    fn load(&self) -> CliResult<AnalyzerConfig> {
        let mut config = match &self.config {
            Some(path) => AnalyzerConfig::from_json_file(path)
                .map_err(|e| format!("failed to load config {}: {}", path.display(), e))?,
            None => AnalyzerConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.classifier.kmeans.seed = seed;
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Args)]
struct CliAnalyzeArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// Path to write the analysis result (JSON).
    #[arg(long)]
    out: PathBuf,

    /// Path to write the depth profile (CSV).
    #[arg(long)]
    profile_csv: Option<PathBuf>,

    /// Path to write the zone summaries (CSV).
    #[arg(long)]
    zones_csv: Option<PathBuf>,

    /// Path to write the image with zone boundaries drawn.
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Path to write the image with pixels outside the validity mask blacked out.
    #[arg(long)]
    mask_image: Option<PathBuf>,

    /// Path to write the jet-colored hue heatmap.
    #[arg(long)]
    hue_image: Option<PathBuf>,

    /// Detect zone boundaries automatically instead of using the manual fractions.
    #[arg(long)]
    auto: bool,

    /// Hue mapped to 0°. Requires --ninety-hue.
    #[arg(long, requires = "ninety_hue")]
    zero_hue: Option<f64>,

    /// Hue mapped to 90°. Requires --zero-hue.
    #[arg(long, requires = "zero_hue")]
    ninety_hue: Option<f64>,

    /// Manual SZ/MZ boundary as a fraction of image height.
    #[arg(long, default_value = "0.33")]
    sz_boundary: f64,

    /// Manual MZ/DZ boundary as a fraction of image height.
    #[arg(long, default_value = "0.66")]
    mz_boundary: f64,

    #[command(flatten)]
    config: CliConfigArgs,
}

impl CliAnalyzeArgs {
    fn params(&self) -> AnalysisParams {
        AnalysisParams {
            use_automatic_zone_detection: self.auto,
            forced_zero_hue: self.zero_hue,
            forced_ninety_hue: self.ninety_hue,
            manual_top_boundary_fraction: self.sz_boundary,
            manual_bottom_boundary_fraction: self.mz_boundary,
        }
    }
}

#[derive(Debug, Clone, Args)]
struct CliZonesArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    #[command(flatten)]
    config: CliConfigArgs,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => run_analyze(&args),
        Commands::Zones(args) => run_zones(&args),
        Commands::Hsv { r, g, b } => run_hsv(r, g, b),
    }
}

fn open_rgb(path: &Path) -> CliResult<image::RgbImage> {
    let img = image::open(path)
        .map_err(|e| format!("failed to open image {}: {}", path.display(), e))?;
    Ok(img.to_rgb8())
}

// ── analyze ────────────────────────────────────────────────────────────

fn run_analyze(args: &CliAnalyzeArgs) -> CliResult<()> {
    let image = open_rgb(&args.image)?;
    let analyzer = Analyzer::with_config(args.config.load()?);
    let params = args.params();

    tracing::info!(
        "Analyzing {} ({}x{})",
        args.image.display(),
        image.width(),
        image.height()
    );
    let result = analyzer.analyze(&image, &params);
    if !result.success {
        return Err(result
            .error
            .unwrap_or_else(|| "analysis failed".to_string())
            .into());
    }

    let b = result.zone_boundaries;
    tracing::info!(
        "Zones: SZ 0-{:.1}%, MZ {:.1}-{:.1}%, DZ {:.1}-100%",
        b.sz_boundary * 100.0,
        b.sz_boundary * 100.0,
        b.mz_boundary * 100.0,
        b.mz_boundary * 100.0
    );
    tracing::info!(
        "Calibration ({:?}): 0° = hue {:.1}, 90° = hue {:.1}",
        result.calibration_source,
        result.calibration.zero_hue,
        result.calibration.ninety_hue
    );
    for (name, s) in [
        ("SZ", &result.zone_summaries.sz),
        ("MZ", &result.zone_summaries.mz),
        ("DZ", &result.zone_summaries.dz),
    ] {
        tracing::info!(
            "  {}: {:.1}° ± {:.1}° ({} px, {})",
            name,
            s.mean_angle,
            s.std_angle,
            s.pixel_count,
            s.hex
        );
    }

    let json = serde_json::to_string_pretty(&result)?;
    std::fs::write(&args.out, json)?;
    tracing::info!("Results written to {}", args.out.display());

    if let Some(path) = &args.profile_csv {
        let file = std::fs::File::create(path)?;
        write_profile_csv(&profile_rows(&result), file)?;
        tracing::info!("Depth profile written to {}", path.display());
    }
    if let Some(path) = &args.zones_csv {
        let file = std::fs::File::create(path)?;
        write_zone_summary_csv(&result, file)?;
        tracing::info!("Zone summaries written to {}", path.display());
    }
    if let Some(path) = &args.overlay {
        annotate_zones(&image, &result.zone_boundaries).save(path)?;
        tracing::info!("Overlay written to {}", path.display());
    }
    if let Some(path) = &args.mask_image {
        masked_image(&image).save(path)?;
        tracing::info!("Masked image written to {}", path.display());
    }
    if let Some(path) = &args.hue_image {
        hue_heatmap(&image).save(path)?;
        tracing::info!("Hue heatmap written to {}", path.display());
    }
    Ok(())
}

// ── zones ──────────────────────────────────────────────────────────────

fn run_zones(args: &CliZonesArgs) -> CliResult<()> {
    let image = open_rgb(&args.image)?;
    let analyzer = Analyzer::with_config(args.config.load()?);
    let detection = analyzer.detect_zones(&image)?;
    println!("{}", serde_json::to_string_pretty(&detection)?);
    Ok(())
}

// ── hsv ────────────────────────────────────────────────────────────────

fn run_hsv(r: u8, g: u8, b: u8) -> CliResult<()> {
    let hsv = rgb_to_hsv(r, g, b);
    println!("H={} S={} V={}", hsv.h, hsv.s, hsv.v);
    Ok(())
}
