use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::{SeedableRng, rngs::StdRng};

use cumulus::{
    CancelToken, CloudPaths, PerlinField, PipelineConfig, SketchStyle, paint_scene,
    run_cloud_pipeline,
};

#[derive(Parser, Debug)]
#[command(name = "cumulus", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a cloud illustration and write it as a PNG.
    Render(RenderArgs),
    /// Run only the geometry pipeline and write the paths as JSON.
    Paths(PathsArgs),
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Seed for the noise field and all random draws; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 1600)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 1000)]
    height: u32,

    /// Cloud layer count; 0 picks randomly between 6 and 19.
    #[arg(long, default_value_t = 0)]
    layers: usize,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PathsArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Also capture construction circles and the coarse outline per layer.
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Paths(args) => cmd_paths(args),
    }
}

fn generate(common: &CommonArgs, capture_debug: bool) -> anyhow::Result<(u64, CloudPaths)> {
    let seed = common.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let field = PerlinField::new(seed as u32);

    let w = f64::from(common.width);
    let h = f64::from(common.height);
    let mut cfg = PipelineConfig::new(w, h, 0.06 * w.min(h));
    cfg.layer_count = common.layers;
    cfg.capture_debug = capture_debug;

    let token = CancelToken::new();
    let clouds = run_cloud_pipeline(&cfg, &field, &mut rng, &token)
        .context("cloud pipeline failed")?;
    Ok((seed, clouds))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (seed, clouds) = generate(&args.common, false)?;

    // Re-derive the per-run style and painting RNG from the same seed so a
    // render is reproducible end to end.
    let mut rng = StdRng::seed_from_u64(seed ^ 0x70ab_51c7);
    let field = PerlinField::new(seed as u32);
    let style = SketchStyle::randomized(&mut rng);
    let img = paint_scene(
        &clouds,
        args.common.width,
        args.common.height,
        style,
        &field,
        &mut rng,
    );

    img.save(&args.out)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    println!(
        "rendered {} layers (seed {seed}) -> {}",
        clouds.outlines.len(),
        args.out.display()
    );
    Ok(())
}

fn cmd_paths(args: PathsArgs) -> anyhow::Result<()> {
    let (seed, clouds) = generate(&args.common, args.debug)?;

    let json = serde_json::to_string_pretty(&clouds).context("failed to serialize paths")?;
    std::fs::write(&args.out, json)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    println!(
        "generated {} layers (seed {seed}) -> {}",
        clouds.outlines.len(),
        args.out.display()
    );
    Ok(())
}
