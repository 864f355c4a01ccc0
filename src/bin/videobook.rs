use std::{
    io::{BufWriter, Write as _},
    path::PathBuf,
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "videobook", version)]
struct Cli {
    #[command(flatten)]
    comp: CompositionArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct CompositionArgs {
    /// Frames per second.
    #[arg(long, global = true, default_value_t = videobook::COMPOSITION_FPS)]
    fps: u32,

    /// Composition width in pixels.
    #[arg(long, global = true, default_value_t = videobook::COMPOSITION_WIDTH)]
    width: u32,

    /// Composition height in pixels.
    #[arg(long, global = true, default_value_t = videobook::COMPOSITION_HEIGHT)]
    height: u32,

    /// Composition length in frames.
    #[arg(long, global = true, default_value_t = videobook::DURATION_IN_FRAMES)]
    duration: u64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse an SRT file and print its entries as JSON.
    Parse(ParseArgs),
    /// Print the caption state of a single frame as JSON.
    Frame(FrameArgs),
    /// Print the caption state of a frame range, one JSON object per line.
    Timeline(TimelineArgs),
}

#[derive(Parser, Debug)]
struct ParseArgs {
    /// Input SRT file.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SessionArgs {
    /// Input props JSON (`videoUrl`, `srtUrl`, `illustrationSrtUrl`).
    #[arg(long)]
    props: PathBuf,

    /// Directory that URL paths are resolved against. Defaults to the props file's directory.
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,
}

#[derive(Parser, Debug)]
struct TimelineArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// First frame (inclusive).
    #[arg(long, default_value_t = 0)]
    from: u64,

    /// Last frame (exclusive). Defaults to the composition length.
    #[arg(long)]
    to: Option<u64>,

    /// Frame step.
    #[arg(long, default_value_t = 1)]
    step: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Parse(args) => cmd_parse(args),
        Command::Frame(args) => cmd_frame(&cli.comp, args),
        Command::Timeline(args) => cmd_timeline(&cli.comp, args),
    }
}

fn session_opts(comp: &CompositionArgs) -> anyhow::Result<videobook::SessionOpts> {
    let opts = videobook::SessionOpts {
        fps: videobook::Fps::new(comp.fps, 1)?,
        duration_frames: comp.duration,
        canvas: videobook::Canvas {
            width: comp.width,
            height: comp.height,
        },
        ..videobook::SessionOpts::default()
    };
    opts.validate()?;
    Ok(opts)
}

fn open_session(
    comp: &CompositionArgs,
    args: &SessionArgs,
) -> anyhow::Result<videobook::VideoBookSession> {
    let props = videobook::VideoBookProps::from_path(&args.props)
        .with_context(|| format!("read props '{}'", args.props.display()))?;
    let root = match &args.static_dir {
        Some(dir) => dir.clone(),
        None => args
            .props
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    let fetcher = Arc::new(videobook::StaticDirFetcher::new(root));
    let session = videobook::VideoBookSession::load(props, fetcher, session_opts(comp)?)
        .with_context(|| "load captions")?;
    tracing::info!(
        captions = session.captions().len(),
        illustrations = session.illustrations().len(),
        "session ready"
    );
    Ok(session)
}

fn cmd_parse(args: ParseArgs) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read srt '{}'", args.in_path.display()))?;
    let captions = videobook::parse_srt(&raw)
        .with_context(|| format!("parse srt '{}'", args.in_path.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &captions).with_context(|| "write JSON")?;
    writeln!(out)?;
    Ok(())
}

fn cmd_frame(comp: &CompositionArgs, args: FrameArgs) -> anyhow::Result<()> {
    let mut session = open_session(comp, &args.session)?;
    let state = session.frame_state(videobook::FrameIndex(args.frame))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &state).with_context(|| "write JSON")?;
    writeln!(out)?;
    Ok(())
}

fn cmd_timeline(comp: &CompositionArgs, args: TimelineArgs) -> anyhow::Result<()> {
    if args.step == 0 {
        anyhow::bail!("--step must be > 0");
    }
    let mut session = open_session(comp, &args.session)?;
    let end = args
        .to
        .unwrap_or(comp.duration)
        .min(session.opts().duration_frames);

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for f in (args.from..end).step_by(args.step as usize) {
        let state = session.frame_state(videobook::FrameIndex(f))?;
        serde_json::to_writer(&mut out, &state).with_context(|| "write JSON")?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
