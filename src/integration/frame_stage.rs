use crate::config::PipelineConfig;

/// Stage of the per-frame state machine driven by the pipeline.
///
/// Every frame starts in `Idle` and leaves it for exactly one of
/// `DetectAndAssociate` or `TrackOnly`. `Emit` is entered afterwards only on
/// emission frames, and never feeds back into tracking state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameStage {
    /// Frame decoded, nothing done yet
    #[default]
    Idle,
    /// Detector runs and detections are reconciled with live objects
    DetectAndAssociate,
    /// Live objects are advanced by their own trackers only
    TrackOnly,
    /// Frame is written to the output
    Emit,
}

impl FrameStage {
    /// Branch taken out of `Idle` for the given frame.
    ///
    /// A zero interval never selects detection.
    pub fn branch(frame_index: u64, detection_interval: u32) -> Self {
        if frame_index.checked_rem(detection_interval as u64) == Some(0) {
            FrameStage::DetectAndAssociate
        } else {
            FrameStage::TrackOnly
        }
    }

    /// Stage that follows `self` on frame `frame_index`, or `None` once the
    /// frame is done.
    pub fn next(self, frame_index: u64, config: &PipelineConfig) -> Option<Self> {
        match self {
            FrameStage::Idle => Some(Self::branch(frame_index, config.detection_interval)),
            FrameStage::DetectAndAssociate | FrameStage::TrackOnly => config
                .is_emission_frame(frame_index)
                .then_some(FrameStage::Emit),
            FrameStage::Emit => None,
        }
    }

    /// Every stage a frame passes through, starting from `Idle`.
    pub fn path(frame_index: u64, config: &PipelineConfig) -> Vec<Self> {
        let mut stages = vec![FrameStage::Idle];
        let mut stage = FrameStage::Idle;
        while let Some(next) = stage.next(frame_index, config) {
            stages.push(next);
            stage = next;
        }
        stages
    }

    pub fn is_detection(self) -> bool {
        self == FrameStage::DetectAndAssociate
    }
}
