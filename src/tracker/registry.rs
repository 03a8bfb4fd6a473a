//! Pool of live tracked objects and identity allocation.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::TrackError;
use crate::integration::{ObjectTracker, TrackerBackend};
use crate::tracker::history::PositionHistory;
use crate::tracker::rect::Rect;
use crate::tracker::speed::SpeedEstimator;

/// Identity of a tracked object, unique for the lifetime of a registry.
pub type TrackId = u64;

/// One live vehicle identity: its exclusively owned tracker and its history.
///
/// Tracker and history live in the same entry, so they are created and
/// dropped together.
#[derive(Debug)]
pub struct TrackedObject<T> {
    id: TrackId,
    tracker: T,
    history: PositionHistory,
}

impl<T> TrackedObject<T> {
    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn history(&self) -> &PositionHistory {
        &self.history
    }

    pub fn current_box(&self) -> Rect {
        self.history.current_box
    }

    pub fn last_speed(&self) -> Option<f64> {
        self.history.last_speed
    }

    pub fn snapshot(&self) -> TrackSnapshot {
        TrackSnapshot {
            id: self.id,
            bbox: self.history.current_box,
            speed_kmh: self.history.last_speed,
        }
    }
}

/// Read-only view of a tracked object at the end of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSnapshot {
    pub id: TrackId,
    pub bbox: Rect,
    pub speed_kmh: Option<f64>,
}

/// Owns every live tracked object.
///
/// Ids are allocated from a per-registry counter and never handed out twice,
/// even after the object holding one is removed. Objects enumerate in
/// ascending id order, which is also creation order.
#[derive(Debug)]
pub struct TrackRegistry<T> {
    objects: BTreeMap<TrackId, TrackedObject<T>>,
    next_id: TrackId,
}

impl<T> Default for TrackRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TrackRegistry<T> {
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Start tracking a new object seeded with `initial_box` on `frame`.
    ///
    /// The id is only consumed once the backend has produced a tracker.
    pub fn create<F, B>(
        &mut self,
        backend: &mut B,
        frame: &F,
        initial_box: Rect,
    ) -> Result<TrackId, B::Error>
    where
        B: TrackerBackend<F, Tracker = T>,
    {
        let tracker = backend.create(frame, initial_box)?;
        let id = self.next_id;
        self.next_id += 1;
        self.objects.insert(
            id,
            TrackedObject {
                id,
                tracker,
                history: PositionHistory::new(initial_box),
            },
        );
        debug!(id, ?initial_box, "created tracked object");
        Ok(id)
    }

    /// Advance the object's tracker on `frame` and record the new box.
    ///
    /// On [`TrackError::TrackerLost`] the object is left in place; the caller
    /// is expected to [`remove`](Self::remove) it.
    pub fn advance<F>(&mut self, id: TrackId, frame: &F) -> Result<Rect, TrackError>
    where
        T: ObjectTracker<F>,
    {
        let object = self
            .objects
            .get_mut(&id)
            .ok_or(TrackError::UnknownTrack(id))?;
        let bbox = object
            .tracker
            .advance(frame)
            .ok_or(TrackError::TrackerLost(id))?;
        object.history.current_box = bbox;
        Ok(bbox)
    }

    /// Drop the object, its tracker and its history. Removing an id that is
    /// not live is a no-op. Returns whether anything was removed.
    pub fn remove(&mut self, id: TrackId) -> bool {
        self.objects.remove(&id).is_some()
    }

    /// Snapshot of the live ids in enumeration order.
    pub fn list_ids(&self) -> Vec<TrackId> {
        self.objects.keys().copied().collect()
    }

    pub fn get(&self, id: TrackId) -> Option<&TrackedObject<T>> {
        self.objects.get(&id)
    }

    pub fn history(&self, id: TrackId) -> Option<&PositionHistory> {
        self.objects.get(&id).map(|o| &o.history)
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of ids handed out so far, including retired ones.
    pub fn total_created(&self) -> u64 {
        self.next_id
    }

    /// Live objects in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackedObject<T>> {
        self.objects.values()
    }

    /// Run the speed step for every live object.
    pub fn refresh_speeds(&mut self, estimator: &SpeedEstimator, fps: f64) {
        for object in self.objects.values_mut() {
            let before = object.history.last_speed;
            let after = object.history.refresh_speed(estimator, fps);
            if after != before {
                debug!(id = object.id, speed_kmh = ?after, "speed updated");
            }
        }
    }

    pub fn snapshots(&self) -> Vec<TrackSnapshot> {
        self.objects.values().map(TrackedObject::snapshot).collect()
    }
}
