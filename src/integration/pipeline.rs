//! TrackerPipeline: the frame loop combining detection, tracking and speed estimation.

use std::error::Error as StdError;
use std::marker::PhantomData;

use tracing::info;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::tracker::{
    AssociationEngine, FrameSize, SpeedEstimator, TrackId, TrackRegistry, TrackSnapshot,
    advance_all,
};

use super::{DetectionSource, FrameSink, FrameSource, FrameStage, TrackerBackend};

/// Outcome of processing a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame_index: u64,
    /// Stages the frame passed through, starting from `Idle`
    pub stages: Vec<FrameStage>,
    /// Raw detections returned by the detector, zero on track-only frames
    pub detections: usize,
    /// `(detection index, object id)` pairs confirmed by association
    pub matched: Vec<(usize, TrackId)>,
    pub skipped: usize,
    pub created: Vec<TrackId>,
    pub removed: Vec<TrackId>,
    /// Every live object after the speed step
    pub tracks: Vec<TrackSnapshot>,
}

impl FrameReport {
    /// Branch taken out of `Idle`.
    pub fn branch(&self) -> FrameStage {
        self.stages.get(1).copied().unwrap_or_default()
    }

    /// Whether the frame reached `Emit` and goes to the output.
    pub fn emits(&self) -> bool {
        self.stages.last() == Some(&FrameStage::Emit)
    }
}

/// Totals for a complete run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub frames_processed: u64,
    pub frames_emitted: u64,
    pub detection_events: u64,
    pub objects_created: u64,
    pub objects_removed: u64,
    pub input_fps: f64,
    pub output_fps: f64,
}

/// Drives detection, association, tracking and speed estimation one frame at
/// a time, for frames of type `F`.
///
/// Speeds are always computed against the input frame rate. Emission is a
/// projection of the per-frame state and has no effect on it.
pub struct TrackerPipeline<F, D, B>
where
    B: TrackerBackend<F>,
{
    detector: D,
    backend: B,
    registry: TrackRegistry<B::Tracker>,
    association: AssociationEngine,
    estimator: SpeedEstimator,
    config: PipelineConfig,
    input_fps: f64,
    frame_index: u64,
    summary: RunSummary,
    _frame: PhantomData<fn(&F)>,
}

impl<F, D, B> TrackerPipeline<F, D, B>
where
    D: DetectionSource<F>,
    D::Error: StdError + Send + Sync + 'static,
    B: TrackerBackend<F>,
    B::Error: StdError + Send + Sync + 'static,
{
    /// Create a pipeline for an input video running at `input_fps`.
    pub fn new(
        detector: D,
        backend: B,
        config: PipelineConfig,
        input_fps: f64,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        if !(input_fps.is_finite() && input_fps > 0.0) {
            return Err(PipelineError::InvalidFrameRate(input_fps));
        }
        Ok(Self {
            detector,
            backend,
            registry: TrackRegistry::new(),
            association: AssociationEngine::new(),
            estimator: SpeedEstimator::new(config.ppm),
            config,
            input_fps,
            frame_index: 0,
            summary: RunSummary {
                input_fps,
                output_fps: config.output_fps(input_fps),
                ..Default::default()
            },
            _frame: PhantomData,
        })
    }

    /// Create a pipeline using the frame rate and frame size reported by `source`.
    pub fn for_source<S>(
        source: &S,
        detector: D,
        backend: B,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError>
    where
        S: FrameSource<Frame = F>,
    {
        let pipeline = Self::new(detector, backend, config, source.fps())?;
        Ok(pipeline.with_frame_size(source.frame_size()))
    }

    /// Reject detections that extend beyond frames of this size.
    pub fn with_frame_size(mut self, frame_size: FrameSize) -> Self {
        self.association = self.association.with_frame_size(frame_size);
        self
    }

    /// Process the next frame of the input.
    pub fn process_frame(&mut self, frame: &F) -> Result<FrameReport, PipelineError> {
        let frame_index = self.frame_index;
        let mut report = FrameReport {
            frame_index,
            stages: FrameStage::path(frame_index, &self.config),
            detections: 0,
            matched: Vec::new(),
            skipped: 0,
            created: Vec::new(),
            removed: Vec::new(),
            tracks: Vec::new(),
        };

        match report.branch() {
            FrameStage::DetectAndAssociate => {
                let detections = self.detector.detect(frame).map_err(|e| {
                    PipelineError::Detector {
                        frame_index,
                        source: Box::new(e),
                    }
                })?;
                info!("Frame {}: detected {} vehicles", frame_index, detections.len());

                let outcome = self
                    .association
                    .associate(&mut self.registry, &mut self.backend, frame, &detections)
                    .map_err(|e| PipelineError::TrackerInit {
                        frame_index,
                        source: Box::new(e),
                    })?;

                self.summary.detection_events += 1;
                report.detections = detections.len();
                report.matched = outcome.matched;
                report.skipped = outcome.skipped.len();
                report.created = outcome.created;
                report.removed = outcome.removed;
            }
            _ => {
                report.removed = advance_all(&mut self.registry, frame);
            }
        }

        self.registry.refresh_speeds(&self.estimator, self.input_fps);

        report.tracks = self.registry.snapshots();

        self.summary.frames_processed += 1;
        self.summary.objects_created += report.created.len() as u64;
        self.summary.objects_removed += report.removed.len() as u64;
        self.frame_index += 1;

        Ok(report)
    }

    /// Process every frame of `source` in order, emitting sampled frames to
    /// `sink`, until the source is exhausted.
    pub fn run<S, K>(&mut self, source: &mut S, sink: &mut K) -> Result<RunSummary, PipelineError>
    where
        S: FrameSource<Frame = F>,
        S::Error: StdError + Send + Sync + 'static,
        K: FrameSink<F>,
        K::Error: StdError + Send + Sync + 'static,
    {
        loop {
            let frame_index = self.frame_index;
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    return Err(PipelineError::Source {
                        frame_index,
                        source: Box::new(e),
                    });
                }
            };

            let report = self.process_frame(&frame)?;
            if report.emits() {
                sink.emit(&frame, &report.tracks)
                    .map_err(|e| PipelineError::Sink {
                        frame_index,
                        source: Box::new(e),
                    })?;
                self.summary.frames_emitted += 1;
            }
        }

        info!(
            "Processed {} frames ({} emitted at {:.2} fps), {} objects tracked, {} removed",
            self.summary.frames_processed,
            self.summary.frames_emitted,
            self.summary.output_fps,
            self.summary.objects_created,
            self.summary.objects_removed
        );
        Ok(self.summary)
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the tracked-object registry.
    pub fn registry(&self) -> &TrackRegistry<B::Tracker> {
        &self.registry
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn input_fps(&self) -> f64 {
        self.input_fps
    }

    /// Index of the next frame to be processed.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }
}
