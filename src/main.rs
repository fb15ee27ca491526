//! Benday demo CLI: synthetic sensor in, styled PNG frames out.

use anyhow::Result;
use benday::align::ScaledMapper;
use benday::capture::{SensorBackend, SensorConfig, SyntheticSensor};
use benday::config::{Config, ConfigWatcher};
use benday::output::{FrameSink, PngSink};
use benday::pipeline::{FramePipeline, ProcessSettings};
use benday::stylize::StyleMode;
use benday::utils::PaceCounter;
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

/// Depth-camera body masking and frame stylization demo.
#[derive(Parser, Debug)]
#[command(name = "benday")]
#[command(about = "Mask the tracked person and stylize the frame")]
struct Args {
    /// Color frame width
    #[arg(long, default_value = "640")]
    color_width: u32,

    /// Color frame height
    #[arg(long, default_value = "480")]
    color_height: u32,

    /// Depth frame width
    #[arg(long, default_value = "320")]
    depth_width: u32,

    /// Depth frame height
    #[arg(long, default_value = "240")]
    depth_height: u32,

    /// Style filter to start with
    #[arg(short, long, value_enum, default_value = "original")]
    mode: StyleMode,

    /// Skip the diagnostic label on the output
    #[arg(long)]
    no_label: bool,

    /// Number of frames to produce (0 = run until Ctrl-C)
    #[arg(short, long, default_value = "90")]
    frames: u64,

    /// Target frames per second
    #[arg(long, default_value = "30")]
    fps: u32,

    /// Directory for the output PNG sequence
    #[arg(short, long, default_value = "frames")]
    out: PathBuf,

    /// YAML config file watched for live mode changes
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    // Set up signal handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received interrupt signal, shutting down...");
        r.store(false, Ordering::SeqCst);
    })?;

    let sensor_config = SensorConfig {
        color_width: args.color_width,
        color_height: args.color_height,
        depth_width: args.depth_width,
        depth_height: args.depth_height,
        fps: args.fps,
    };
    let geometry = sensor_config.geometry();
    let mut sensor = SyntheticSensor::open(sensor_config)?;

    let mut pipeline = FramePipeline::new(geometry, Box::new(ScaledMapper::new(geometry)));
    let mut sink = PngSink::new(args.out)?;

    let mut settings = ProcessSettings {
        mode: args.mode,
        annotate: !args.no_label,
    };
    if let Some(path) = &args.config {
        match Config::load(path) {
            Ok(config) => {
                settings.mode = config.mode;
                settings.annotate = config.annotate;
                info!("Loaded config: starting in {:?} mode", settings.mode);
            }
            Err(e) => tracing::warn!("Ignoring config file: {:#}", e),
        }
    }
    let mut watcher = ConfigWatcher::new(args.config.clone());

    let frame_duration = Duration::from_secs_f64(1.0 / args.fps.max(1) as f64);
    let mut pace = PaceCounter::new();
    let mut written = 0u64;

    info!("Starting frame loop in {:?} mode", settings.mode);
    while running.load(Ordering::SeqCst) {
        if args.frames != 0 && written >= args.frames {
            break;
        }
        let frame_start = Instant::now();

        // Pick up live mode changes between cycles.
        if let Some(watcher) = &mut watcher {
            if let Some(config) = watcher.check_for_changes() {
                settings.mode = config.mode;
                settings.annotate = config.annotate;
            }
        }

        let frames = sensor.acquire()?;
        let process_start = Instant::now();
        let output = pipeline.process(&frames.color, &frames.depth, &frames.body_index, &settings)?;
        let busy = process_start.elapsed();

        sink.write_frame(output, geometry.color_width, geometry.color_height)?;
        written += 1;

        if let Some(report) = pace.update(busy) {
            info!(
                "{:.2} FPS, {:.2} ms processing per frame",
                report.fps,
                report.mean_busy.as_secs_f64() * 1000.0
            );
        }

        // Frame rate limiting
        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
    }

    info!("Wrote {} frames", written);
    Ok(())
}
