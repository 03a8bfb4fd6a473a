//! Minimal collaborators for unit tests.

use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;

use crate::integration::{DetectionSource, ObjectTracker, TrackerBackend};
use crate::tracker::Rect;

/// Replays one step per advance; once the steps run out it keeps its box.
#[derive(Debug, Clone)]
pub struct StepTracker {
    steps: VecDeque<Option<Rect>>,
    last: Option<Rect>,
}

impl<F> ObjectTracker<F> for StepTracker {
    fn advance(&mut self, _frame: &F) -> Option<Rect> {
        if let Some(step) = self.steps.pop_front() {
            self.last = step;
        }
        self.last
    }
}

#[derive(Debug, thiserror::Error)]
#[error("backend refused to create a tracker")]
pub struct CreateRefused;

/// Hands out step lists in creation order and can be told to refuse once.
#[derive(Debug, Default)]
pub struct StepBackend {
    steps: VecDeque<Vec<Option<Rect>>>,
    fail_next: bool,
}

impl StepBackend {
    pub fn with_steps(mut self, steps: Vec<Option<Rect>>) -> Self {
        self.steps.push_back(steps);
        self
    }

    pub fn fail_next_create(&mut self) {
        self.fail_next = true;
    }
}

impl<F> TrackerBackend<F> for StepBackend {
    type Tracker = StepTracker;
    type Error = CreateRefused;

    fn create(&mut self, _frame: &F, initial_box: Rect) -> Result<StepTracker, CreateRefused> {
        if std::mem::take(&mut self.fail_next) {
            return Err(CreateRefused);
        }
        Ok(StepTracker {
            steps: self.steps.pop_front().unwrap_or_default().into(),
            last: Some(initial_box),
        })
    }
}

/// Records every frame it is asked about.
#[derive(Debug, Default)]
pub struct RecordingDetector {
    detections: HashMap<usize, Vec<Rect>>,
    pub calls: Vec<usize>,
}

impl RecordingDetector {
    pub fn on(mut self, frame: usize, boxes: Vec<Rect>) -> Self {
        self.detections.insert(frame, boxes);
        self
    }
}

impl DetectionSource<usize> for RecordingDetector {
    type Error = Infallible;

    fn detect(&mut self, frame: &usize) -> Result<Vec<Rect>, Infallible> {
        self.calls.push(*frame);
        Ok(self.detections.get(frame).cloned().unwrap_or_default())
    }
}
