//! Per-object position history used for speed estimation.

use crate::tracker::rect::Rect;
use crate::tracker::speed::SpeedEstimator;

/// The last two known boxes of a tracked object and its last computed speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionHistory {
    /// Box at the last moment the object's position changed
    pub previous_box: Rect,
    /// Most recent tracker output
    pub current_box: Rect,
    /// Last computed speed in km/h, absent until the object first moves
    pub last_speed: Option<f64>,
}

impl PositionHistory {
    /// Start a history at `initial_box` with no speed.
    pub fn new(initial_box: Rect) -> Self {
        Self {
            previous_box: initial_box,
            current_box: initial_box,
            last_speed: None,
        }
    }

    /// Whether the position moved since `previous_box` was recorded.
    ///
    /// Only the top-left corner is compared: a width/height change alone is a
    /// zero-distance displacement and would otherwise overwrite a real speed.
    pub fn has_moved(&self) -> bool {
        self.previous_box.position() != self.current_box.position()
    }

    /// Recompute the speed if the object moved, then roll the history forward.
    ///
    /// `fps` must be the native frame rate of the input video. When the object
    /// has not moved, `last_speed` is left as it was.
    pub fn refresh_speed(&mut self, estimator: &SpeedEstimator, fps: f64) -> Option<f64> {
        if self.has_moved() {
            let speed = estimator.estimate(
                self.previous_box.position(),
                self.current_box.position(),
                fps,
            );
            self.last_speed = Some(speed);
            self.previous_box = self.current_box;
        }
        self.last_speed
    }
}
