//! OpenCV backend: Haar cascade detection, KCF or CSRT tracking and video file I/O.
//!
//! # Example
//!
//! ```ignore
//! use carspeed_rs::integration::{AnnotatedVideoSink, CascadeDetector, CascadeParams,
//!     OpenCvTrackerBackend, VideoFileSource};
//! use carspeed_rs::{FrameSource, PipelineConfig, TrackerPipeline};
//!
//! let config = PipelineConfig::default();
//! let detector = CascadeDetector::load("models/myhaar.xml", CascadeParams::default())?;
//! let mut source = VideoFileSource::open("videos/cars.mp4")?;
//! let mut pipeline =
//!     TrackerPipeline::for_source(&source, detector, OpenCvTrackerBackend::Kcf, config)?;
//! let mut sink = AnnotatedVideoSink::create(
//!     "output/tracked_video.mp4",
//!     pipeline.summary().output_fps,
//!     source.frame_size(),
//! )?;
//! pipeline.run(&mut source, &mut sink)?;
//! ```

use std::path::Path;

use opencv::{
    core::{self, Mat, Ptr, Scalar, Size, Vector},
    imgproc, objdetect,
    prelude::*,
    tracking::{TrackerCSRT, TrackerCSRT_Params, TrackerKCF, TrackerKCF_Params},
    videoio::{self, VideoCapture, VideoWriter},
};
use tracing::info;

use super::{DetectionSource, FrameSink, FrameSource, ObjectTracker, TrackerBackend};
use crate::error::PipelineError;
use crate::tracker::{FrameSize, Rect, TrackSnapshot};

fn to_cv_rect(r: Rect) -> core::Rect {
    core::Rect::new(r.x, r.y, r.width, r.height)
}

fn from_cv_rect(r: core::Rect) -> Rect {
    Rect::new(r.x, r.y, r.width, r.height)
}

/// `detect_multi_scale` parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeParams {
    pub scale_factor: f64,
    pub min_neighbors: i32,
    /// Smallest accepted box side, in pixels
    pub min_size: i32,
}

impl Default for CascadeParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 5,
            min_size: 30,
        }
    }
}

/// Vehicle detector backed by an OpenCV Haar cascade.
pub struct CascadeDetector {
    classifier: objdetect::CascadeClassifier,
    params: CascadeParams,
    gray: Mat,
    found: Vector<core::Rect>,
}

impl CascadeDetector {
    /// Load a cascade model. Fails with `DetectorUnavailable` if the file is
    /// missing or holds no usable cascade.
    pub fn load(path: impl AsRef<Path>, params: CascadeParams) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PipelineError::DetectorUnavailable(format!(
                "cascade file missing: {}",
                path.display()
            )));
        }
        let path_str = path.to_str().ok_or_else(|| {
            PipelineError::DetectorUnavailable(format!("invalid path: {}", path.display()))
        })?;
        let classifier = objdetect::CascadeClassifier::new(path_str)
            .map_err(|e| PipelineError::DetectorUnavailable(e.to_string()))?;
        if classifier
            .empty()
            .map_err(|e| PipelineError::DetectorUnavailable(e.to_string()))?
        {
            return Err(PipelineError::DetectorUnavailable(format!(
                "failed to load cascade model at {}",
                path.display()
            )));
        }
        info!("Loaded cascade model {}", path.display());
        Ok(Self {
            classifier,
            params,
            gray: Mat::default(),
            found: Vector::new(),
        })
    }
}

impl DetectionSource<Mat> for CascadeDetector {
    type Error = opencv::Error;

    fn detect(&mut self, frame: &Mat) -> Result<Vec<Rect>, opencv::Error> {
        imgproc::cvt_color(
            frame,
            &mut self.gray,
            imgproc::COLOR_BGR2GRAY,
            0,
            core::AlgorithmHint::ALGO_HINT_DEFAULT,
        )?;
        self.found.clear();
        self.classifier.detect_multi_scale(
            &self.gray,
            &mut self.found,
            self.params.scale_factor,
            self.params.min_neighbors,
            0,
            Size::new(self.params.min_size, self.params.min_size),
            Size::default(),
        )?;
        Ok(self.found.iter().map(from_cv_rect).collect())
    }
}

enum CvTracker {
    Kcf(Ptr<TrackerKCF>),
    Csrt(Ptr<TrackerCSRT>),
}

/// One OpenCV single-object tracker instance.
pub struct OpenCvTracker {
    tracker: CvTracker,
    rect: core::Rect,
}

impl ObjectTracker<Mat> for OpenCvTracker {
    fn advance(&mut self, frame: &Mat) -> Option<Rect> {
        let mut rect = self.rect;
        let updated = match &mut self.tracker {
            CvTracker::Kcf(tracker) => tracker.update(frame, &mut rect),
            CvTracker::Csrt(tracker) => tracker.update(frame, &mut rect),
        };
        match updated {
            Ok(true) => {
                self.rect = rect;
                Some(from_cv_rect(rect))
            }
            // An OpenCV error is treated the same as losing the target.
            _ => None,
        }
    }
}

/// Which OpenCV tracker algorithm backs each tracked object.
///
/// KCF is fast; CSRT is slower but holds on better in cluttered scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenCvTrackerBackend {
    #[default]
    Kcf,
    Csrt,
}

impl TrackerBackend<Mat> for OpenCvTrackerBackend {
    type Tracker = OpenCvTracker;
    type Error = opencv::Error;

    fn create(&mut self, frame: &Mat, initial_box: Rect) -> Result<OpenCvTracker, opencv::Error> {
        let rect = to_cv_rect(initial_box);
        let tracker = match self {
            OpenCvTrackerBackend::Kcf => {
                let mut tracker = TrackerKCF::create(TrackerKCF_Params::default()?)?;
                tracker.init(frame, rect)?;
                CvTracker::Kcf(tracker)
            }
            OpenCvTrackerBackend::Csrt => {
                let mut tracker = TrackerCSRT::create(&TrackerCSRT_Params::default()?)?;
                tracker.init(frame, rect)?;
                CvTracker::Csrt(tracker)
            }
        };
        Ok(OpenCvTracker { tracker, rect })
    }
}

/// Frames decoded from a video file.
pub struct VideoFileSource {
    cap: VideoCapture,
    fps: f64,
    size: FrameSize,
}

impl VideoFileSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let unreadable = |detail: String| {
            PipelineError::SourceUnreadable(format!("{}: {}", path.display(), detail))
        };

        let path_str = path.to_str().ok_or_else(|| unreadable("invalid path".into()))?;
        let cap = VideoCapture::from_file(path_str, videoio::CAP_ANY)
            .map_err(|e| unreadable(e.to_string()))?;
        if !cap.is_opened().map_err(|e| unreadable(e.to_string()))? {
            return Err(unreadable("cannot open video".into()));
        }

        let prop = |id: i32| {
            videoio::VideoCaptureTraitConst::get(&cap, id).map_err(|e| unreadable(e.to_string()))
        };
        let fps = prop(videoio::CAP_PROP_FPS)?;
        let width = prop(videoio::CAP_PROP_FRAME_WIDTH)? as i32;
        let height = prop(videoio::CAP_PROP_FRAME_HEIGHT)? as i32;

        info!(
            "Video properties: {}x{} @ {:.1} FPS ({})",
            width,
            height,
            fps,
            path.display()
        );

        Ok(Self {
            cap,
            fps,
            size: FrameSize::new(width, height),
        })
    }
}

impl FrameSource for VideoFileSource {
    type Frame = Mat;
    type Error = opencv::Error;

    fn fps(&self) -> f64 {
        self.fps
    }

    fn frame_size(&self) -> FrameSize {
        self.size
    }

    fn next_frame(&mut self) -> Result<Option<Mat>, opencv::Error> {
        let mut frame = Mat::default();
        if !self.cap.read(&mut frame)? || frame.empty() {
            return Ok(None);
        }
        Ok(Some(frame))
    }
}

/// Writes frames with each tracked object's box and speed drawn on them.
pub struct AnnotatedVideoSink {
    writer: VideoWriter,
}

impl AnnotatedVideoSink {
    /// Open an `mp4v` writer at `fps`, creating the parent directory if needed.
    pub fn create(path: impl AsRef<Path>, fps: f64, size: FrameSize) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let unwritable = |detail: String| {
            PipelineError::SinkUnwritable(format!("{}: {}", path.display(), detail))
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| unwritable(e.to_string()))?;
        }
        let path_str = path.to_str().ok_or_else(|| unwritable("invalid path".into()))?;

        let fourcc =
            VideoWriter::fourcc('m', 'p', '4', 'v').map_err(|e| unwritable(e.to_string()))?;
        let writer = VideoWriter::new(
            path_str,
            fourcc,
            fps,
            Size::new(size.width, size.height),
            true,
        )
        .map_err(|e| unwritable(e.to_string()))?;
        if !writer.is_opened().map_err(|e| unwritable(e.to_string()))? {
            return Err(unwritable("cannot open video writer".into()));
        }

        info!("Output video: {} @ {:.1} FPS", path.display(), fps);
        Ok(Self { writer })
    }
}

fn draw_tracks(frame: &mut Mat, tracks: &[TrackSnapshot]) -> opencv::Result<()> {
    let box_color = Scalar::new(0.0, 255.0, 0.0, 0.0);
    let text_color = Scalar::new(255.0, 255.0, 255.0, 0.0);
    for track in tracks {
        imgproc::rectangle(frame, to_cv_rect(track.bbox), box_color, 2, imgproc::LINE_8, 0)?;
        if let Some(speed) = track.speed_kmh {
            imgproc::put_text(
                frame,
                &format!("{} km/hr", speed as i64),
                core::Point::new(track.bbox.x, track.bbox.y.saturating_sub(5)),
                imgproc::FONT_HERSHEY_SIMPLEX,
                0.5,
                text_color,
                1,
                imgproc::LINE_8,
                false,
            )?;
        }
    }
    Ok(())
}

impl FrameSink<Mat> for AnnotatedVideoSink {
    type Error = opencv::Error;

    fn emit(&mut self, frame: &Mat, tracks: &[TrackSnapshot]) -> Result<(), opencv::Error> {
        let mut annotated = frame.try_clone()?;
        draw_tracks(&mut annotated, tracks)?;
        self.writer.write(&annotated)
    }
}
