mod association;
mod history;
mod matching;
mod rect;
mod registry;
mod speed;

pub use association::{AssociationEngine, AssociationOutcome, advance_all};
pub use history::PositionHistory;
pub use matching::{MalformedDetection, first_match, validate_detection};
pub use rect::{FrameSize, Rect};
pub use registry::{TrackId, TrackRegistry, TrackSnapshot, TrackedObject};
pub use speed::{DEFAULT_PPM, SpeedEstimator, estimate_speed};
