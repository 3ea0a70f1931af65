use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;

use herodo::{
    Config, FfmpegSink, FfmpegSinkOpts, FrameStream, ImageAnimator, MotionSpec, PanDirection,
    Pipeline, RenderThreading,
};

#[derive(Parser, Debug)]
#[command(name = "herodo", version, about = "Vertical history documentaries from Wikipedia")]
struct Cli {
    /// JSON configuration file; missing keys keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for every random motion draw.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a full documentary for a Wikipedia article.
    Make(MakeArgs),
    /// Render one Ken Burns frame of an image as a PNG.
    Preview(PreviewArgs),
    /// Render a single image as a silent Ken Burns MP4 (requires `ffmpeg` on PATH).
    Animate(AnimateArgs),
}

#[derive(Parser, Debug)]
struct MakeArgs {
    /// Wikipedia page title, e.g. "Battle of Gettysburg".
    title: String,

    /// Output MP4 path.
    #[arg(short, long, default_value = "output.mp4")]
    output: PathBuf,

    /// Background music file mixed under the narration.
    #[arg(short, long)]
    music: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct MotionArgs {
    /// Pan direction; random picks one of the fixed directions.
    #[arg(long, default_value = "random")]
    pan: PanDirection,

    /// Starting zoom; drawn from the configured range when omitted.
    #[arg(long)]
    start_zoom: Option<f64>,

    /// Final zoom; drawn from the configured range when omitted.
    #[arg(long)]
    end_zoom: Option<f64>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    #[arg(long)]
    image: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Clip length in seconds.
    #[arg(long, default_value_t = 5.0)]
    duration: f64,

    /// Time within the clip to render.
    #[arg(long, default_value_t = 0.0)]
    t: f64,

    #[command(flatten)]
    motion: MotionArgs,
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    #[arg(long)]
    image: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Clip length in seconds.
    #[arg(long, default_value_t = 5.0)]
    duration: f64,

    #[command(flatten)]
    motion: MotionArgs,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    run(Cli::parse())
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut cfg = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    if cli.seed.is_some() {
        cfg.sequence.seed = cli.seed;
    }

    match cli.cmd {
        Command::Make(args) => cmd_make(cfg, args),
        Command::Preview(args) => cmd_preview(&cfg, args),
        Command::Animate(args) => cmd_animate(&cfg, args),
    }
}

fn cmd_make(cfg: Config, args: MakeArgs) -> anyhow::Result<()> {
    ensure_parent(&args.output)?;
    let pipeline = Pipeline::new(cfg)?;
    let report = pipeline.run(&args.title, &args.output, args.music.as_deref())?;

    for w in &report.warnings {
        eprintln!("warning: {w}");
    }
    eprintln!(
        "wrote {} ({:.2}s, {} clips, {} frames)",
        report.output.display(),
        report.duration_secs,
        report.clips_rendered,
        report.stats.frames_total
    );
    Ok(())
}

fn motion_spec(cfg: &Config, args: &MotionArgs, rng: &mut StdRng) -> anyhow::Result<MotionSpec> {
    let drawn = MotionSpec::random(&cfg.motion, rng);
    let start = args.start_zoom.unwrap_or(drawn.start_zoom);
    let end = args.end_zoom.unwrap_or(drawn.end_zoom.max(start));
    Ok(MotionSpec::new(start, end, args.pan)?)
}

fn make_clip(
    cfg: &Config,
    image: &Path,
    duration: f64,
    motion: &MotionArgs,
) -> anyhow::Result<herodo::KenBurnsClip> {
    let mut rng = match cfg.sequence.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let spec = motion_spec(cfg, motion, &mut rng)?;
    let clip = ImageAnimator::new(cfg).animate_path(image, duration, &spec, &mut rng)?;
    Ok(clip)
}

fn cmd_preview(cfg: &Config, args: PreviewArgs) -> anyhow::Result<()> {
    let clip = make_clip(cfg, &args.image, args.duration, &args.motion)?;
    let frame = clip.render_at(args.t);

    ensure_parent(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    let m = clip.motion();
    eprintln!(
        "wrote {} (pan {:?}, zoom {:.3} -> {:.3})",
        args.out.display(),
        m.direction,
        m.start_zoom,
        m.end_zoom
    );
    Ok(())
}

fn cmd_animate(cfg: &Config, args: AnimateArgs) -> anyhow::Result<()> {
    let clip = make_clip(cfg, &args.image, args.duration, &args.motion)?;
    let plan = herodo::EncodePlan {
        canvas: cfg.video.canvas,
        fps: cfg.video.fps,
        filter: cfg.video.filter.to_filter_type(),
        threading: RenderThreading::from_config(&cfg.sequence),
        audio: None,
    };
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::from_config(&args.out, &cfg.encode));
    let stats = herodo::encode_stream(&clip, &plan, &mut sink)?;

    eprintln!(
        "wrote {} ({} frames)",
        args.out.display(),
        stats.frames_total
    );
    Ok(())
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
