//! Integration module for connecting detection, tracking and video backends
//! to the tracking core.
//!
//! This module provides the capability traits the core depends on, the frame
//! loop that drives them, and an optional OpenCV implementation of each.

mod detector;
mod frame_stage;
mod pipeline;

pub use detector::{DetectionSource, FrameSink, FrameSource, ObjectTracker, TrackerBackend};
pub use frame_stage::FrameStage;
pub use pipeline::{FrameReport, RunSummary, TrackerPipeline};

#[cfg(feature = "opencv-backend")]
mod opencv_backend;

#[cfg(feature = "opencv-backend")]
pub use opencv_backend::{
    AnnotatedVideoSink, CascadeDetector, CascadeParams, OpenCvTracker, OpenCvTrackerBackend,
    VideoFileSource,
};
