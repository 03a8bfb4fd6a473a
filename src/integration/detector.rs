//! Capability traits for the external collaborators of the tracking core.
//!
//! The core never looks inside a frame. Every trait is generic over the frame
//! type `F`, so any vision backend (OpenCV, a test script, ...) can drive it.

use crate::tracker::{FrameSize, Rect, TrackSnapshot};

/// Trait for object detection backends.
///
/// Implement this trait to connect any vehicle detector to the pipeline.
///
/// # Example
///
/// ```ignore
/// use carspeed_rs::{DetectionSource, Rect};
///
/// struct MyDetector;
///
/// impl DetectionSource<MyFrame> for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, frame: &MyFrame) -> Result<Vec<Rect>, Self::Error> {
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource<F> {
    /// Error type for detection failures.
    type Error;

    /// Return the candidate vehicle boxes found in `frame`, possibly none.
    ///
    /// Boxes are expected to be clamped to the frame by the detector.
    fn detect(&mut self, frame: &F) -> Result<Vec<Rect>, Self::Error>;
}

/// A single-object tracker instance following one vehicle.
pub trait ObjectTracker<F> {
    /// Follow the target onto `frame`.
    ///
    /// `None` means the target was lost. The tracker must not be advanced
    /// again after that.
    fn advance(&mut self, frame: &F) -> Option<Rect>;
}

/// Factory for single-object trackers.
pub trait TrackerBackend<F> {
    type Tracker: ObjectTracker<F>;
    type Error;

    /// Create a tracker seeded with `initial_box` on `frame`.
    fn create(&mut self, frame: &F, initial_box: Rect) -> Result<Self::Tracker, Self::Error>;
}

/// Sequential, finite source of decoded frames.
pub trait FrameSource {
    type Frame;
    type Error;

    /// Native frame rate of the input video.
    fn fps(&self) -> f64;

    fn frame_size(&self) -> FrameSize;

    /// Decode the next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<Self::Frame>, Self::Error>;
}

/// Destination for emitted frames.
///
/// Receives frames in decode order, together with the state of every live
/// tracked object at the end of that frame.
pub trait FrameSink<F> {
    type Error;

    fn emit(&mut self, frame: &F, tracks: &[TrackSnapshot]) -> Result<(), Self::Error>;
}
