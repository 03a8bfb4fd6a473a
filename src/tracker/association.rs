//! Reconciles a detection event with the pool of live tracked objects.

use tracing::{debug, info, warn};

use crate::error::TrackError;
use crate::integration::{ObjectTracker, TrackerBackend};
use crate::tracker::matching::{first_match, validate_detection};
use crate::tracker::rect::{FrameSize, Rect};
use crate::tracker::registry::{TrackId, TrackRegistry};

/// What a detection event did to the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationOutcome {
    /// `(detection index, object id)` for each detection that confirmed an existing object
    pub matched: Vec<(usize, TrackId)>,
    /// Objects created for unmatched detections, in creation order
    pub created: Vec<TrackId>,
    /// Objects removed because their tracker failed to advance
    pub removed: Vec<TrackId>,
    /// Indices of malformed detections that were ignored
    pub skipped: Vec<usize>,
}

/// Advance every live object on `frame`, removing those whose tracker fails.
///
/// Returns the removed ids in enumeration order.
pub fn advance_all<F, T>(registry: &mut TrackRegistry<T>, frame: &F) -> Vec<TrackId>
where
    T: ObjectTracker<F>,
{
    let mut removed = Vec::new();
    for id in registry.list_ids() {
        match registry.advance(id, frame) {
            Ok(_) => {}
            Err(TrackError::TrackerLost(id)) => {
                info!("Removing object {} due to poor tracking quality", id);
                registry.remove(id);
                removed.push(id);
            }
            // list_ids is a snapshot and nothing else removes during this loop
            Err(TrackError::UnknownTrack(_)) => {}
        }
    }
    removed
}

/// Centroid-containment association.
///
/// Matching only decides identity. It never touches an object's geometry,
/// which comes exclusively from its tracker.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssociationEngine {
    frame_size: Option<FrameSize>,
}

impl AssociationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also reject detections that extend beyond a frame of this size.
    pub fn with_frame_size(mut self, frame_size: FrameSize) -> Self {
        self.frame_size = Some(frame_size);
        self
    }

    pub fn frame_size(&self) -> Option<FrameSize> {
        self.frame_size
    }

    /// Run one detection event.
    ///
    /// 1. Every live object is advanced once on `frame`; failures are removed
    ///    before any matching happens.
    /// 2. Each valid detection is matched to the first live object, in
    ///    enumeration order, whose just-advanced box contains the detection's
    ///    center.
    /// 3. Unmatched detections seed new objects. A new object takes part in
    ///    matching for the detections that follow it in the same event, so a
    ///    duplicate detection does not spawn a second identity.
    pub fn associate<F, B>(
        &self,
        registry: &mut TrackRegistry<B::Tracker>,
        backend: &mut B,
        frame: &F,
        detections: &[Rect],
    ) -> Result<AssociationOutcome, B::Error>
    where
        B: TrackerBackend<F>,
    {
        let mut outcome = AssociationOutcome {
            removed: advance_all(registry, frame),
            ..Default::default()
        };

        let mut candidates: Vec<(TrackId, Rect)> = registry
            .iter()
            .map(|object| (object.id(), object.current_box()))
            .collect();

        for (idx, det) in detections.iter().enumerate() {
            if let Err(reason) = validate_detection(det, self.frame_size) {
                warn!(?det, ?reason, "ignoring malformed detection");
                outcome.skipped.push(idx);
                continue;
            }

            match first_match(det.center(), &candidates) {
                Some(id) => {
                    debug!(detection = idx, id, "detection matched tracked object");
                    outcome.matched.push((idx, id));
                }
                None => {
                    let id = registry.create(backend, frame, *det)?;
                    candidates.push((id, *det));
                    outcome.created.push(id);
                }
            }
        }

        Ok(outcome)
    }
}
