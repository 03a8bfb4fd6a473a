//! Error types.

use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

use crate::tracker::TrackId;

/// Boxed collaborator error carried as the source of a [`PipelineError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors reported by the track registry.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackError {
    /// The object's tracker could not follow it on this frame. Its handle is
    /// dead; the object must be removed.
    #[error("tracker for object {0} lost its target")]
    TrackerLost(TrackId),

    #[error("no live tracked object with id {0}")]
    UnknownTrack(TrackId),
}

/// Invalid or unreadable configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("detection_interval must be a positive integer")]
    ZeroDetectionInterval,

    #[error("skip_factor must be a positive integer")]
    ZeroSkipFactor,

    #[error("ppm must be a positive finite number, got {0}")]
    InvalidPpm(f64),

    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Fatal errors that abort a run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("video source cannot be opened: {0}")]
    SourceUnreadable(String),

    #[error("detector cannot be initialised: {0}")]
    DetectorUnavailable(String),

    #[error("output video cannot be created: {0}")]
    SinkUnwritable(String),

    #[error("input frame rate must be positive and finite, got {0}")]
    InvalidFrameRate(f64),

    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    #[error("failed to decode frame {frame_index}")]
    Source {
        frame_index: u64,
        #[source]
        source: BoxError,
    },

    #[error("detector failed on frame {frame_index}")]
    Detector {
        frame_index: u64,
        #[source]
        source: BoxError,
    },

    #[error("failed to create tracker on frame {frame_index}")]
    TrackerInit {
        frame_index: u64,
        #[source]
        source: BoxError,
    },

    #[error("failed to emit frame {frame_index}")]
    Sink {
        frame_index: u64,
        #[source]
        source: BoxError,
    },
}
