//! Scripted collaborators. A frame is just its index.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;

use carspeed_rs::{
    DetectionSource, FrameSink, FrameSize, FrameSource, ObjectTracker, Rect, TrackSnapshot,
    TrackerBackend,
};

#[derive(Debug, Clone)]
pub struct ScriptedTracker {
    script: HashMap<usize, Option<Rect>>,
    last: Option<Rect>,
}

impl ObjectTracker<usize> for ScriptedTracker {
    fn advance(&mut self, frame: &usize) -> Option<Rect> {
        if let Some(step) = self.script.get(frame) {
            self.last = *step;
        }
        self.last
    }
}

/// Assigns scripts to trackers in creation order; later trackers stay put.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    scripts: VecDeque<Vec<(usize, Option<Rect>)>>,
}

impl ScriptedBackend {
    pub fn with_script(mut self, script: Vec<(usize, Option<Rect>)>) -> Self {
        self.scripts.push_back(script);
        self
    }
}

impl TrackerBackend<usize> for ScriptedBackend {
    type Tracker = ScriptedTracker;
    type Error = Infallible;

    fn create(&mut self, _frame: &usize, initial_box: Rect) -> Result<ScriptedTracker, Infallible> {
        let script = self.scripts.pop_front().unwrap_or_default();
        Ok(ScriptedTracker {
            script: script.into_iter().collect(),
            last: Some(initial_box),
        })
    }
}

#[derive(Debug, Default)]
pub struct ScriptedDetector {
    detections: HashMap<usize, Vec<Rect>>,
}

impl ScriptedDetector {
    pub fn on(mut self, frame: usize, boxes: Vec<Rect>) -> Self {
        self.detections.insert(frame, boxes);
        self
    }
}

impl DetectionSource<usize> for ScriptedDetector {
    type Error = Infallible;

    fn detect(&mut self, frame: &usize) -> Result<Vec<Rect>, Infallible> {
        Ok(self.detections.get(frame).cloned().unwrap_or_default())
    }
}

/// Yields frames `0..len`.
#[derive(Debug)]
pub struct IndexSource {
    next: usize,
    len: usize,
    fps: f64,
}

impl IndexSource {
    pub fn new(len: usize, fps: f64) -> Self {
        Self { next: 0, len, fps }
    }
}

impl FrameSource for IndexSource {
    type Frame = usize;
    type Error = Infallible;

    fn fps(&self) -> f64 {
        self.fps
    }

    fn frame_size(&self) -> FrameSize {
        FrameSize::new(640, 480)
    }

    fn next_frame(&mut self) -> Result<Option<usize>, Infallible> {
        if self.next >= self.len {
            return Ok(None);
        }
        self.next += 1;
        Ok(Some(self.next - 1))
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<(usize, Vec<TrackSnapshot>)>,
}

impl FrameSink<usize> for RecordingSink {
    type Error = Infallible;

    fn emit(&mut self, frame: &usize, tracks: &[TrackSnapshot]) -> Result<(), Infallible> {
        self.frames.push((*frame, tracks.to_vec()));
        Ok(())
    }
}

/// Script placing a box at `start.x + dx * frame` on each of `frames`.
pub fn moving(
    start: Rect,
    dx: i32,
    frames: std::ops::RangeInclusive<usize>,
) -> Vec<(usize, Option<Rect>)> {
    frames
        .map(|f| {
            let x = start.x + dx * f as i32;
            (f, Some(Rect::new(x, start.y, start.width, start.height)))
        })
        .collect()
}
