//! # carspeed-rs
//!
//! Vehicle tracking and speed estimation over a recorded video.
//!
//! A detector runs every `detection_interval` frames. Its boxes are matched to
//! live tracked objects by centroid containment, unmatched boxes start new
//! objects, and per-object single-object trackers carry every identity across
//! the frames in between. Speed is derived from the pixel displacement of each
//! object between frames, using a pixels-per-metre calibration and the input
//! video's frame rate. Only every `skip_factor`-th frame is emitted.
//!
//! ## Example
//!
//! ```rust,ignore
//! use carspeed_rs::{PipelineConfig, TrackerPipeline};
//!
//! let mut pipeline = TrackerPipeline::for_source(&source, detector, backend, PipelineConfig::default())?;
//! let summary = pipeline.run(&mut source, &mut sink)?;
//! ```

pub mod config;
pub mod error;
pub mod integration;
pub mod tracker;

#[cfg(test)]
mod test_support;

pub use config::PipelineConfig;
pub use error::{BoxError, ConfigError, PipelineError, TrackError};
pub use integration::{
    DetectionSource, FrameReport, FrameSink, FrameSource, FrameStage, ObjectTracker, RunSummary,
    TrackerBackend, TrackerPipeline,
};
pub use tracker::{
    AssociationEngine, FrameSize, PositionHistory, Rect, SpeedEstimator, TrackId, TrackRegistry,
    TrackSnapshot,
};
