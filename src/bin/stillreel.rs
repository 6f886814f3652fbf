use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stillreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a single image into one PNG frame.
    Frame(FrameArgs),
    /// Render a slideshow MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input image.
    #[arg(long)]
    image: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, value_enum, default_value_t = ModeChoice::Regular)]
    mode: ModeChoice,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Job description JSON; replaces every other job flag.
    #[arg(long, conflicts_with = "images")]
    job: Option<PathBuf>,

    /// Input images in playback order (repeatable).
    #[arg(long = "image", required_unless_present = "job")]
    images: Vec<PathBuf>,

    /// Soundtrack file.
    #[arg(long)]
    audio: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ModeChoice::Regular)]
    mode: ModeChoice,

    #[arg(long, default_value_t = 5.0)]
    seconds_per_image: f64,

    /// Clip fade-in/out length in seconds.
    #[arg(long, default_value_t = 1.0)]
    fade: f64,

    /// Soundtrack fade-in/out length in seconds.
    #[arg(long, default_value_t = 2.0)]
    audio_fade: f64,

    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Compositing threads (defaults to all cores).
    #[arg(long)]
    threads: Option<usize>,

    /// What to do when the soundtrack is shorter than the video.
    #[arg(long, value_enum, default_value_t = ShortAudioChoice::Silence)]
    short_audio: ShortAudioChoice,

    /// Output MP4 path (defaults to `output_video.mp4` beside the first image).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also write the job report as JSON.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Regular,
    Shorts,
}

impl From<ModeChoice> for stillreel::VideoMode {
    fn from(m: ModeChoice) -> Self {
        match m {
            ModeChoice::Regular => Self::Regular,
            ModeChoice::Shorts => Self::Shorts,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShortAudioChoice {
    Silence,
    Loop,
    Reject,
}

impl From<ShortAudioChoice> for stillreel::ShortAudioPolicy {
    fn from(p: ShortAudioChoice) -> Self {
        match p {
            ShortAudioChoice::Silence => Self::Silence,
            ShortAudioChoice::Loop => Self::Loop,
            ShortAudioChoice::Reject => Self::Reject,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stillreel=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mode = stillreel::VideoMode::from(args.mode);
    let frame = stillreel::compose_image_file(
        &args.image,
        mode.canvas(),
        &stillreel::ComposeOpts::default(),
    )?;

    ensure_parent(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.rgb8,
        frame.width,
        frame.height,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn job_from_args(args: &RenderArgs) -> anyhow::Result<stillreel::JobConfig> {
    if let Some(path) = &args.job {
        return Ok(stillreel::JobConfig::from_json_file(path)?);
    }
    let mut cfg = stillreel::JobConfig::new(args.images.clone());
    cfg.audio = args.audio.clone();
    cfg.mode = args.mode.into();
    cfg.per_image_secs = args.seconds_per_image;
    cfg.fade_secs = args.fade;
    cfg.audio_fade_secs = args.audio_fade;
    cfg.fps = stillreel::Fps::new(args.fps, 1)?;
    cfg.threads = args.threads;
    cfg.short_audio = args.short_audio.into();
    cfg.output = args.out.clone();
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = job_from_args(&args)?;
    cfg.validate()?;
    let out_path = cfg.output_path();

    let sink = stillreel::FfmpegSink::new(stillreel::FfmpegSinkOpts::new(&out_path));
    let mut encoder = stillreel::SinkEncoder::new(sink, cfg.fps);
    let mut progress = |u: stillreel::ProgressUpdate| {
        eprintln!("composited {}/{}", u.completed, u.total);
    };
    let cancel = stillreel::CancelToken::new();

    let report = stillreel::run_job(&cfg, &mut encoder, &mut progress, &cancel)?;

    for s in &report.skipped {
        eprintln!("skipped {}: {}", s.path.display(), s.reason);
    }
    if !report.dropped.is_empty() {
        eprintln!(
            "{} image(s) did not fit the {} duration limit",
            report.dropped.len(),
            report.mode
        );
    }
    if let Some(path) = &args.report {
        ensure_parent(path)?;
        let json = serde_json::to_string_pretty(&report).context("serialize job report")?;
        std::fs::write(path, json)
            .with_context(|| format!("write report '{}'", path.display()))?;
    }

    eprintln!(
        "wrote {} ({} clips, {:.2}s)",
        out_path.display(),
        report.clips.len(),
        report.duration_secs
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
