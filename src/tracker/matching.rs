//! Matching utilities for detection association.

use crate::tracker::rect::{FrameSize, Rect};
use crate::tracker::registry::TrackId;

/// Why a detection box was rejected before association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedDetection {
    /// Width or height is zero or negative.
    NonPositiveExtent,
    /// The box extends beyond the frame, or its far edge is not a valid
    /// pixel coordinate.
    OutOfBounds,
}

/// Check a raw detection box. `frame` bounds are only checked when known;
/// coordinate range is always checked.
pub fn validate_detection(
    bbox: &Rect,
    frame: Option<FrameSize>,
) -> Result<(), MalformedDetection> {
    if !bbox.has_positive_extent() {
        return Err(MalformedDetection::NonPositiveExtent);
    }
    if !bbox.edges_in_range() {
        return Err(MalformedDetection::OutOfBounds);
    }
    match frame {
        Some(size) if !bbox.fits_within(size) => Err(MalformedDetection::OutOfBounds),
        _ => Ok(()),
    }
}

/// First candidate, in the given order, whose box contains `point`.
///
/// This is deliberately not a best-match search: when several boxes contain
/// the point, the one enumerated first wins.
pub fn first_match(point: (i64, i64), candidates: &[(TrackId, Rect)]) -> Option<TrackId> {
    candidates
        .iter()
        .find(|(_, bbox)| bbox.contains(point))
        .map(|(id, _)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_prefers_enumeration_order() {
        let candidates = vec![
            (4, Rect::new(0, 0, 100, 100)),
            (2, Rect::new(40, 40, 20, 20)),
        ];
        // (50, 50) lies in both; the tighter box would be a "better" match.
        assert_eq!(first_match((50, 50), &candidates), Some(4));

        let reversed: Vec<_> = candidates.into_iter().rev().collect();
        assert_eq!(first_match((50, 50), &reversed), Some(2));
    }

    #[test]
    fn test_first_match_skips_non_containing() {
        let candidates = vec![
            (0, Rect::new(0, 0, 10, 10)),
            (1, Rect::new(100, 100, 10, 10)),
        ];
        assert_eq!(first_match((105, 110), &candidates), Some(1));
        assert_eq!(first_match((50, 50), &candidates), None);
        assert_eq!(first_match((50, 50), &[]), None);
    }

    #[test]
    fn test_validate_detection() {
        let frame = Some(FrameSize::new(640, 480));

        assert_eq!(validate_detection(&Rect::new(10, 10, 40, 40), frame), Ok(()));
        assert_eq!(
            validate_detection(&Rect::new(10, 10, 0, 40), frame),
            Err(MalformedDetection::NonPositiveExtent)
        );
        assert_eq!(
            validate_detection(&Rect::new(10, 10, 40, -1), None),
            Err(MalformedDetection::NonPositiveExtent)
        );
        assert_eq!(
            validate_detection(&Rect::new(620, 10, 40, 40), frame),
            Err(MalformedDetection::OutOfBounds)
        );
        assert_eq!(validate_detection(&Rect::new(620, 10, 40, 40), None), Ok(()));
        assert_eq!(
            validate_detection(&Rect::new(10, i32::MAX - 5, 40, 40), None),
            Err(MalformedDetection::OutOfBounds)
        );
    }
}
