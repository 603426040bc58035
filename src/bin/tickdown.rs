use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tickdown::state::model::{AspectRatio, BackgroundStyle};
use tickdown::state::patch::{CanvasPatch, ExportPatch, SequencePatch, VisualsPatch};
use tickdown::{
    BellTicks, Clock, CpuSurface, ElementContent, ElementId, ExportFormat, ExportOutcome,
    FfmpegSink, FfmpegSinkOpts, OutputPath, Preset, RenderSurface, Resolution, RunStart, Studio,
    SystemClock,
};

#[derive(Parser, Debug)]
#[command(name = "tickdown", version)]
struct Cli {
    /// Log debug events to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one frame as a PNG (the end frame unless --progress is given).
    Frame(FrameArgs),
    /// Export the full run (video formats require `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Play the run in the terminal in real time.
    Preview(PreviewArgs),
    /// Print the projected frame at a given progress as JSON.
    Inspect(InspectArgs),
}

/// Document selection shared by every subcommand. Flags override the preset.
#[derive(Args, Debug, Default)]
struct DocArgs {
    /// Preset JSON (`{ "state": ..., "config": ... }`).
    #[arg(long)]
    preset: Option<PathBuf>,

    /// Count to start from.
    #[arg(long, allow_negative_numbers = true)]
    start: Option<String>,

    /// Count to finish on.
    #[arg(long, allow_negative_numbers = true)]
    end: Option<String>,

    /// Run length in seconds.
    #[arg(long)]
    duration: Option<String>,

    #[arg(long)]
    fps: Option<u32>,

    #[arg(long, value_enum)]
    resolution: Option<ResolutionChoice>,

    #[arg(long, value_enum)]
    format: Option<FormatChoice>,

    #[arg(long, value_enum)]
    aspect: Option<AspectChoice>,

    #[arg(long, value_enum)]
    background: Option<BackgroundChoice>,

    /// Theme-service response JSON to apply on top of the preset.
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Disable tick sounds.
    #[arg(long)]
    mute: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    doc: DocArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Scrub to this progress in [0, 1] instead of running to the end.
    #[arg(long)]
    progress: Option<f64>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    doc: DocArgs,

    /// Output file, or a directory to receive a timestamped artifact.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    doc: DocArgs,

    /// Terminal refresh rate.
    #[arg(long, default_value_t = 30)]
    refresh: u32,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    #[command(flatten)]
    doc: DocArgs,

    #[arg(long, default_value_t = 1.0)]
    progress: f64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Webm,
    Mp4,
    Png,
    Gif,
}

impl From<FormatChoice> for ExportFormat {
    fn from(c: FormatChoice) -> Self {
        match c {
            FormatChoice::Webm => ExportFormat::Webm,
            FormatChoice::Mp4 => ExportFormat::Mp4,
            FormatChoice::Png => ExportFormat::Png,
            FormatChoice::Gif => ExportFormat::Gif,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResolutionChoice {
    #[value(name = "720p")]
    Hd720,
    #[value(name = "1080p")]
    Hd1080,
    #[value(name = "4k")]
    Uhd4k,
}

impl From<ResolutionChoice> for Resolution {
    fn from(c: ResolutionChoice) -> Self {
        match c {
            ResolutionChoice::Hd720 => Resolution::Hd720,
            ResolutionChoice::Hd1080 => Resolution::Hd1080,
            ResolutionChoice::Uhd4k => Resolution::Uhd4k,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AspectChoice {
    #[value(name = "9:16")]
    Portrait,
    #[value(name = "1:1")]
    Square,
    #[value(name = "16:9")]
    Landscape,
}

impl From<AspectChoice> for AspectRatio {
    fn from(c: AspectChoice) -> Self {
        match c {
            AspectChoice::Portrait => AspectRatio::Portrait,
            AspectChoice::Square => AspectRatio::Square,
            AspectChoice::Landscape => AspectRatio::Landscape,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackgroundChoice {
    Solid,
    Gradient,
    Particles,
}

impl From<BackgroundChoice> for BackgroundStyle {
    fn from(c: BackgroundChoice) -> Self {
        match c {
            BackgroundChoice::Solid => BackgroundStyle::Solid,
            BackgroundChoice::Gradient => BackgroundStyle::Gradient,
            BackgroundChoice::Particles => BackgroundStyle::Particles,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_preset(doc: &DocArgs) -> anyhow::Result<Preset> {
    let mut preset = match &doc.preset {
        Some(path) => Preset::from_path(path)
            .with_context(|| format!("load preset '{}'", path.display()))?,
        None => Preset::default(),
    };

    let state = &mut preset.state;
    let mut seq = SequencePatch::default();
    if let Some(raw) = &doc.start {
        seq = seq.start_input(raw);
    }
    if let Some(raw) = &doc.end {
        seq = seq.end_input(raw);
    }
    if let Some(raw) = &doc.duration {
        seq = seq.duration_input(raw);
    }
    state.sequence = seq.apply(&state.sequence);

    state.export = ExportPatch {
        format: doc.format.map(Into::into),
        resolution: doc.resolution.map(Into::into),
        fps: doc.fps,
        quality: None,
    }
    .apply(&state.export);

    state.canvas = CanvasPatch {
        aspect_ratio: doc.aspect.map(Into::into),
        ..Default::default()
    }
    .apply(&state.canvas);

    let mut visuals = VisualsPatch {
        background_style: doc.background.map(Into::into),
        ..Default::default()
    };
    if doc.mute {
        visuals.sound = Some(false);
    }
    state.visuals = visuals.apply(&state.visuals);

    if let Some(path) = &doc.theme {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read theme response '{}'", path.display()))?;
        let suggestion = tickdown::parse_theme_response(&text)
            .with_context(|| format!("apply theme '{}'", path.display()))?;
        state.visuals = suggestion.to_patch().apply(&state.visuals);
    }

    Ok(preset)
}

fn make_studio(doc: &DocArgs) -> anyhow::Result<Studio<SystemClock>> {
    let preset = load_preset(doc)?;
    Ok(Studio::new(preset, SystemClock)?)
}

fn write_bytes(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    tickdown::encode::ffmpeg::ensure_parent_dir(path)?;
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut studio = make_studio(&args.doc)?;
    let mut surface = CpuSurface::new();

    let bytes = match args.progress {
        Some(p) => {
            let view = studio.scrub(p);
            let frame = surface.render(&view, studio.config().still_scale)?;
            tickdown::encode::png::encode_png(&frame)?
        }
        None => match tickdown::export_still(&mut studio, Some(&mut surface))? {
            ExportOutcome::Finished(report) => report
                .artifact
                .bytes
                .context("still export produced no image bytes")?,
            ExportOutcome::Rejected { active } => anyhow::bail!("{active:?} run in progress"),
        },
    };

    write_bytes(&args.out, &bytes)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut studio = make_studio(&args.doc)?;
    let mut surface = CpuSurface::new();
    let output = if args.out.extension().is_some() {
        OutputPath::File(args.out.clone())
    } else {
        OutputPath::Dir(args.out.clone())
    };
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(output.clone()));

    let report = match tickdown::export(&mut studio, Some(&mut surface), &mut sink)? {
        ExportOutcome::Finished(report) => report,
        ExportOutcome::Rejected { active } => anyhow::bail!("{active:?} run in progress"),
    };

    let path = match (&report.artifact.path, &report.artifact.bytes) {
        (Some(path), _) => path.clone(),
        (None, Some(bytes)) => {
            let path = output.resolve(&report.artifact.file_name);
            write_bytes(&path, bytes)?;
            path
        }
        (None, None) => anyhow::bail!("export produced no artifact"),
    };
    eprintln!(
        "wrote {} ({} frames, {}x{})",
        path.display(),
        report.frames,
        report.width,
        report.height
    );
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let studio = make_studio(&args.doc)?;
    let mut studio = studio.with_ticks(BellTicks::new(std::io::stderr()));
    if let RunStart::Rejected { active } = studio.start_preview() {
        anyhow::bail!("{active:?} run in progress");
    }

    let interval = Duration::from_secs_f64(1.0 / f64::from(args.refresh.max(1)));
    let mut out = std::io::stdout().lock();
    let mut next = studio.clock().now();
    while studio.run().is_previewing {
        studio.on_frame();
        write!(out, "\r\x1b[2K{}", status_line(&studio))?;
        out.flush()?;
        next += interval;
        std::thread::sleep(next.saturating_duration_since(studio.clock().now()));
    }
    writeln!(out)?;
    Ok(())
}

fn status_line<C: Clock>(studio: &Studio<C>) -> String {
    let view = studio.view();
    let text_of = |id: ElementId| {
        view.element(id)
            .filter(|e| e.visible)
            .and_then(|e| match &e.content {
                ElementContent::Status { message, .. } => Some(message.clone()),
                ElementContent::Text { text } => Some(text.clone()),
                _ => None,
            })
            .unwrap_or_default()
    };
    format!(
        "{:>6}  {:<12} {}",
        view.current_count,
        text_of(ElementId::Status),
        text_of(ElementId::Percentage)
    )
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let studio = make_studio(&args.doc)?;
    let view = studio.scrub(args.progress);
    let json = serde_json::to_string_pretty(&view).context("serialize frame view")?;
    println!("{json}");
    Ok(())
}
