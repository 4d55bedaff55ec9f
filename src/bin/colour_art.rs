use anyhow::{Context, Result, bail};
use clap::Parser;
use colour_art::{
    ArtworkOptions, ArtworkPipeline, ExportFormat, FixedPalette, KMeansQuantizer, PaletteOrder,
    RenderMode, SessionState, ShapeKind, parse_hex,
};
use rand::{SeedableRng, rngs::StdRng};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

/// Turn photographs into colour-palette artwork.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of palette colours (1 to 20)
    #[arg(short = 'k', long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=20))]
    n_colors: u8,

    /// Shuffle the palette instead of ordering by coverage
    #[arg(long)]
    remix: bool,

    /// Paint blocks instead of proportional bands
    #[arg(long)]
    pixel_me: bool,

    /// Clip shape: rectangle, square or circle
    #[arg(long, default_value = "rectangle")]
    shape: ShapeKind,

    /// Artwork width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Artwork height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Output image format: png or jpeg
    #[arg(short, long, default_value = "png")]
    format: ExportFormat,

    /// Comma-separated list of hex colors to use as palette (skip k-means)
    #[arg(short = 'c', long)]
    palette: Option<String>,

    /// Seed for k-means and remix; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Also write a CSV swatch next to each artwork
    #[arg(long)]
    swatch: bool,

    /// Print each palette as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Output directory
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,

    /// Output filename prefix (ignored when --out-dir supplied)
    #[arg(short = 'p', long, default_value = "artwork_")]
    prefix: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let options = ArtworkOptions::default()
        .with_num_colors(args.n_colors as usize)
        .with_order(if args.remix { PaletteOrder::Shuffled } else { PaletteOrder::Ascending })
        .with_mode(if args.pixel_me { RenderMode::Pixelated } else { RenderMode::Banded })
        .with_shape(args.shape)
        .with_size(args.width, args.height);
    let session = SessionState::new(options).context("invalid artwork options")?;

    let fixed = match &args.palette {
        Some(list) => Some(FixedPalette(
            list.split(',')
                .map(parse_hex)
                .collect::<colour_art::Result<Vec<_>>>()
                .context("invalid --palette")?,
        )),
        None => None,
    };
    let kmeans = KMeansQuantizer::default().with_seed(args.seed.unwrap_or(0));
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut pipeline = ArtworkPipeline::new(args.width, args.height)?;
    let mut failures = 0usize;
    for input in &args.inputs {
        let result = match &fixed {
            Some(fixed) => process(&args, input, &session, fixed, &mut rng, &mut pipeline),
            None => process(&args, input, &session, &kmeans, &mut rng, &mut pipeline),
        };
        if let Err(e) = result {
            log::error!("{}: {e:#}", input.display());
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{failures} of {} input(s) failed", args.inputs.len());
    }
    Ok(())
}

fn process<Q: colour_art::Quantizer>(
    args: &Args,
    input: &Path,
    session: &SessionState,
    quantizer: &Q,
    rng: &mut StdRng,
    pipeline: &mut ArtworkPipeline,
) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let state = session
        .analyze(&bytes, quantizer, rng)
        .context("palette extraction failed")?;

    pipeline.paint_session(&state)?;
    let encoded = pipeline
        .export_image(args.format)
        .context("artwork export failed")?;

    let out_path = output_path(args, input, args.format.extension());
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&out_path, encoded)?;
    log::info!("Saved → {}", out_path.display());

    if args.swatch {
        let csv_path = out_path.with_extension("csv");
        fs::write(&csv_path, state.swatch())?;
        log::info!("Saved → {}", csv_path.display());
    }

    if args.json {
        let colors: Vec<_> = state
            .palette()
            .iter()
            .map(|e| json!({ "color": e.css_rgb(), "hex": e.css_hex(), "percentage": e.percentage }))
            .collect();
        let doc = json!({ "input": input.display().to_string(), "palette": colors });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    }

    Ok(())
}

fn output_path(args: &Args, input: &Path, extension: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    match &args.out_dir {
        Some(dir) => dir.join(format!("{stem}.{extension}")),
        None => PathBuf::from(format!("{}{stem}.{extension}", args.prefix)),
    }
}
