use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use carspeed_rs::integration::{
    AnnotatedVideoSink, CascadeDetector, CascadeParams, OpenCvTrackerBackend, VideoFileSource,
};
use carspeed_rs::{FrameSource, PipelineConfig, TrackerPipeline};

#[derive(ValueEnum, Debug, Clone, Copy)]
enum TrackerArg {
    /// Kernelized correlation filter, fast
    Kcf,
    /// Discriminative correlation filter, slower but steadier in busy scenes
    Csrt,
}

impl From<TrackerArg> for OpenCvTrackerBackend {
    fn from(arg: TrackerArg) -> Self {
        match arg {
            TrackerArg::Kcf => OpenCvTrackerBackend::Kcf,
            TrackerArg::Csrt => OpenCvTrackerBackend::Csrt,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "carspeed", about = "Track vehicles in a video and annotate their speed")]
struct Args {
    #[arg(long, value_name = "PATH", default_value = "videos/cars.mp4")]
    input: PathBuf,
    #[arg(long, value_name = "PATH", default_value = "output/tracked_video.mp4")]
    output: PathBuf,
    /// Haar cascade model used for vehicle detection
    #[arg(long, value_name = "PATH", default_value = "models/myhaar.xml")]
    cascade: PathBuf,
    /// YAML file with detection_interval, skip_factor and ppm
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Single-object tracker used for every vehicle
    #[arg(long, value_enum, default_value_t = TrackerArg::Kcf)]
    tracker: TrackerArg,
    /// Run detection every N frames
    #[arg(long)]
    detection_interval: Option<u32>,
    /// Write every Nth frame to the output
    #[arg(long)]
    skip_factor: Option<u32>,
    /// Pixels per metre
    #[arg(long)]
    ppm: Option<f64>,
    #[arg(long, default_value_t = 1.1)]
    scale_factor: f64,
    #[arg(long, default_value_t = 5)]
    min_neighbors: i32,
    #[arg(long, default_value_t = 30)]
    min_size: i32,
}

impl Args {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        if let Some(n) = self.detection_interval {
            config = config.with_detection_interval(n);
        }
        if let Some(n) = self.skip_factor {
            config = config.with_skip_factor(n);
        }
        if let Some(ppm) = self.ppm {
            config = config.with_ppm(ppm);
        }
        config.validate()?;
        Ok(config)
    }

    fn cascade_params(&self) -> CascadeParams {
        CascadeParams {
            scale_factor: self.scale_factor,
            min_neighbors: self.min_neighbors,
            min_size: self.min_size,
        }
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("carspeed=info,carspeed_rs=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> Result<()> {
    let config = args.pipeline_config()?;
    info!(
        "detection_interval={} skip_factor={} ppm={}",
        config.detection_interval, config.skip_factor, config.ppm
    );

    let detector = CascadeDetector::load(&args.cascade, args.cascade_params())?;
    let mut source = VideoFileSource::open(&args.input)?;
    let backend = OpenCvTrackerBackend::from(args.tracker);
    info!("Using {:?} tracker", backend);

    let mut pipeline = TrackerPipeline::for_source(&source, detector, backend, config)?;
    let mut sink = AnnotatedVideoSink::create(
        &args.output,
        pipeline.summary().output_fps,
        source.frame_size(),
    )?;
    let summary = pipeline
        .run(&mut source, &mut sink)
        .with_context(|| format!("Failed while processing {}", args.input.display()))?;

    info!(
        "{} frames in, {} frames out, {} vehicles tracked",
        summary.frames_processed, summary.frames_emitted, summary.objects_created
    );
    println!("Done! Output video saved at: {}", args.output.display());
    Ok(())
}
