//! Montage - timeline schedule host
//!
//! Loads a timeline file, resolves clip durations, builds the timeline and
//! prints the schedule as JSON lines for an external renderer.
//!
//! Usage: `montage <timeline.json> [--manifest durations.json] [--frame N]
//! [--timeout-ms MS]`

use anyhow::{bail, Context, Result};
use montage_core::FrameRate;
use montage_media::{build_timeline, ManifestResolver, StaticResolver, DEFAULT_RESOLVE_TIMEOUT};
use montage_timeline::{Layout, Timeline, TimelineFile};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

struct Args {
    timeline: PathBuf,
    manifest: Option<PathBuf>,
    frame: Option<i64>,
    timeout: Duration,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut timeline = None;
        let mut manifest = None;
        let mut frame = None;
        let mut timeout = DEFAULT_RESOLVE_TIMEOUT;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--manifest" => {
                    manifest = Some(PathBuf::from(args.next().context("--manifest needs a path")?));
                }
                "--frame" => {
                    let value = args.next().context("--frame needs a frame number")?;
                    frame = Some(value.parse().with_context(|| format!("bad frame: {value}"))?);
                }
                "--timeout-ms" => {
                    let value = args.next().context("--timeout-ms needs a value")?;
                    let ms: u64 = value
                        .parse()
                        .with_context(|| format!("bad timeout: {value}"))?;
                    timeout = Duration::from_millis(ms);
                }
                other if other.starts_with("--") => bail!("unknown option {other}"),
                path => timeline = Some(PathBuf::from(path)),
            }
        }

        let Some(timeline) = timeline else {
            bail!(
                "usage: montage <timeline.json> [--manifest durations.json] [--frame N] [--timeout-ms MS]"
            );
        };
        Ok(Self {
            timeline,
            manifest,
            frame,
            timeout,
        })
    }
}

/// First line of output: everything a renderer needs before sampling.
#[derive(Serialize)]
struct ScheduleHeader<'a> {
    fps: FrameRate,
    width: u32,
    height: u32,
    fade_color: [u8; 3],
    total_frames: i64,
    layout: &'a Layout,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine readable.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse()?;
    info!(path = %args.timeline.display(), "Loading timeline");

    let file = TimelineFile::load_from_file(&args.timeline)
        .with_context(|| format!("failed to load {}", args.timeline.display()))?;
    let config = &file.timeline;

    let timeline: Timeline = match &args.manifest {
        Some(path) => {
            let resolver = ManifestResolver::load(path)
                .await
                .with_context(|| format!("failed to load manifest {}", path.display()))?;
            build_timeline(config, &resolver, args.timeout).await?
        }
        None => build_timeline(config, &StaticResolver::new(), args.timeout).await?,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let header = ScheduleHeader {
        fps: config.fps,
        width: config.width,
        height: config.height,
        fade_color: config.fade_color,
        total_frames: timeline.total_duration(),
        layout: timeline.layout(),
    };
    serde_json::to_writer(&mut out, &header)?;
    writeln!(out)?;

    let samples = match args.frame {
        Some(frame) => vec![timeline.sample_at(frame, config.fps)?],
        None => timeline.sample_all(config.fps)?,
    };
    for sample in &samples {
        serde_json::to_writer(&mut out, sample)?;
        writeln!(out)?;
    }

    info!(samples = samples.len(), "Schedule written");
    Ok(())
}
