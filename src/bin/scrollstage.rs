use std::{
    collections::BTreeMap,
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scrollstage::{
    FrameReport, PageDef, ScheduleEntry, SceneSnapshot, Showcase, Stage, page::showcase,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scrollstage", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved entrance schedule of every section as JSON.
    Timeline(TimelineArgs),
    /// Smooth-scroll to a position and write the per-frame scene trace.
    Simulate(SimulateArgs),
    /// Jump to a scroll position, let everything settle and print the scene.
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
struct TimelineArgs {
    /// Input page JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input page JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Target scroll position, px.
    #[arg(long)]
    to: f64,

    /// Smooth-scroll duration, seconds (page default when omitted).
    #[arg(long)]
    duration: Option<f64>,

    /// Frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Extra time simulated after the scroll lands, seconds.
    #[arg(long, default_value_t = 1.0)]
    tail: f64,

    /// Output trace path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Input page JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Scroll position, px.
    #[arg(long)]
    at: f64,

    /// Frames per second used while settling.
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

#[derive(serde::Serialize)]
struct TraceFrame {
    frame: u64,
    time: f64,
    report: FrameReport,
    scene: SceneSnapshot,
}

const MAX_SETTLE_FRAMES: usize = 10_000;
const MAX_TRACE_FRAMES: u64 = 36_000;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Timeline(args) => cmd_timeline(args),
        Command::Simulate(args) => cmd_simulate(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn mount(path: &Path) -> anyhow::Result<(PageDef, Stage, Showcase)> {
    let page = PageDef::from_path(path)
        .with_context(|| format!("load page '{}'", path.display()))?;
    let mut stage = Stage::new(page.viewport)?;
    let show = showcase::load(&mut stage, &page).context("mount page")?;
    Ok((page, stage, show))
}

fn frame_dt(fps: u32) -> anyhow::Result<f64> {
    if fps == 0 {
        anyhow::bail!("--fps must be > 0");
    }
    Ok(1.0 / f64::from(fps))
}

fn cmd_timeline(args: TimelineArgs) -> anyhow::Result<()> {
    let (_page, stage, show) = mount(&args.in_path)?;
    let schedules: BTreeMap<&str, Vec<Vec<ScheduleEntry>>> = show
        .scopes()
        .map(|(id, scope)| (id, stage.schedules(scope)))
        .filter(|(_, s)| !s.is_empty())
        .collect();
    print_json(&schedules)
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let dt = frame_dt(args.fps)?;
    if let Some(d) = args.duration
        && !(d.is_finite() && d >= 0.0)
    {
        anyhow::bail!("--duration must be >= 0");
    }
    if !(args.tail.is_finite() && args.tail >= 0.0) {
        anyhow::bail!("--tail must be >= 0");
    }
    let (page, mut stage, _show) = mount(&args.in_path)?;
    let duration = args.duration.unwrap_or(page.motion.nav_duration);
    let frames = trace_frames(duration, args.tail, args.fps)?;
    stage.navigate(args.to, duration)?;

    let mut trace = Vec::new();
    for i in 0..frames {
        let report = stage.frame(dt);
        trace.push(TraceFrame {
            frame: i,
            time: (i + 1) as f64 * dt,
            report,
            scene: stage.snapshot(),
        });
    }
    tracing::info!(frames, scroll = stage.scroll(), "simulation done");

    match args.out {
        Some(path) => {
            let f = std::fs::File::create(&path)
                .with_context(|| format!("create trace '{}'", path.display()))?;
            serde_json::to_writer_pretty(std::io::BufWriter::new(f), &trace)
                .context("write trace")?;
            tracing::info!(path = %path.display(), "trace written");
            Ok(())
        }
        None => print_json(&trace),
    }
}

/// Frames covering `duration + tail` seconds, rejecting traces too long to hold.
fn trace_frames(duration: f64, tail: f64, fps: u32) -> anyhow::Result<u64> {
    let frames = ((duration + tail) * f64::from(fps)).ceil();
    if !(frames.is_finite() && frames <= MAX_TRACE_FRAMES as f64) {
        anyhow::bail!(
            "simulation of {:.0} s at {fps} fps exceeds {MAX_TRACE_FRAMES} frames",
            duration + tail
        );
    }
    Ok(frames as u64)
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let dt = frame_dt(args.fps)?;
    let (_page, mut stage, _show) = mount(&args.in_path)?;
    stage.settle(dt, MAX_SETTLE_FRAMES);
    stage.scroll_to(args.at);
    let frames = stage.settle(dt, MAX_SETTLE_FRAMES);
    tracing::info!(frames, scroll = stage.scroll(), "settled");
    print_json(&stage.snapshot())
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).context("write json")?;
    writeln!(out)?;
    Ok(())
}
