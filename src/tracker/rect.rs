/// Axis-aligned bounding box in integer pixel coordinates.
///
/// Stored in TLWH form (top-left x, top-left y, width, height), which is what
/// both the detector and the single-object trackers report. Value semantics:
/// two boxes are equal exactly when all four coordinates are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: i32,
    /// Top-left y coordinate
    pub y: i32,
    /// Width of the bounding box
    pub width: i32,
    /// Height of the bounding box
    pub height: i32,
}

/// Dimensions of a decoded frame in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSize {
    pub width: i32,
    pub height: i32,
}

impl FrameSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    ///
    /// Edges are widened to `i64`, so the far edge of any `i32` box is
    /// representable.
    #[inline]
    pub fn to_tlbr(&self) -> [i64; 4] {
        let (x, y) = (self.x as i64, self.y as i64);
        [x, y, x + self.width as i64, y + self.height as i64]
    }

    /// Convert to TLWH format: (x, y, width, height).
    #[inline]
    pub fn to_tlwh(&self) -> [i32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Top-left corner, the point speed is measured from.
    #[inline]
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Center point, rounded down to whole pixels.
    #[inline]
    pub fn center(&self) -> (i64, i64) {
        (
            self.x as i64 + (self.width / 2) as i64,
            self.y as i64 + (self.height / 2) as i64,
        )
    }

    #[inline]
    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Whether `point` lies inside the box. All four edges are inclusive.
    #[inline]
    pub fn contains(&self, point: (i64, i64)) -> bool {
        let (px, py) = point;
        let [x1, y1, x2, y2] = self.to_tlbr();
        x1 <= px && px <= x2 && y1 <= py && py <= y2
    }

    /// Whether the box has a strictly positive width and height.
    #[inline]
    pub fn has_positive_extent(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Whether the far edges are still valid `i32` pixel coordinates.
    pub fn edges_in_range(&self) -> bool {
        let [_, _, x2, y2] = self.to_tlbr();
        x2 <= i32::MAX as i64 && y2 <= i32::MAX as i64
    }

    /// Whether the box lies entirely within a frame of the given size.
    pub fn fits_within(&self, frame: FrameSize) -> bool {
        let [x1, y1, x2, y2] = self.to_tlbr();
        x1 >= 0 && y1 >= 0 && x2 <= frame.width as i64 && y2 <= frame.height as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_conversions() {
        let rect = Rect::new(10, 20, 30, 40);

        assert_eq!(rect.to_tlwh(), [10, 20, 30, 40]);
        assert_eq!(rect.to_tlbr(), [10, 20, 40, 60]);
        assert_eq!(rect.position(), (10, 20));
    }

    #[test]
    fn test_far_edges_do_not_overflow() {
        let rect = Rect::new(i32::MAX - 10, 0, 40, 40);

        assert_eq!(rect.to_tlbr()[2], i32::MAX as i64 + 30);
        assert_eq!(rect.center(), (i32::MAX as i64 + 10, 20));
        assert!(!rect.edges_in_range());
        assert!(!rect.fits_within(FrameSize::new(640, 480)));
        assert!(rect.contains((i32::MAX as i64, 0)));
        assert!(!rect.contains((-5, 0)));

        assert!(Rect::new(0, 0, 40, 40).edges_in_range());
        assert!(Rect::new(i32::MAX - 40, 0, 40, 40).edges_in_range());
    }

    #[test]
    fn test_center_rounds_down() {
        assert_eq!(Rect::new(100, 100, 40, 40).center(), (120, 120));
        assert_eq!(Rect::new(0, 0, 5, 7).center(), (2, 3));
    }

    #[test]
    fn test_contains_is_inclusive_on_every_edge() {
        let rect = Rect::new(10, 10, 20, 20);

        assert!(rect.contains((10, 10)));
        assert!(rect.contains((30, 30)));
        assert!(rect.contains((10, 30)));
        assert!(rect.contains((30, 10)));
        assert!(rect.contains((20, 20)));

        assert!(!rect.contains((9, 20)));
        assert!(!rect.contains((31, 20)));
        assert!(!rect.contains((20, 9)));
        assert!(!rect.contains((20, 31)));
    }

    #[test]
    fn test_extent_and_bounds() {
        let frame = FrameSize::new(640, 480);

        assert!(Rect::new(0, 0, 640, 480).fits_within(frame));
        assert!(!Rect::new(-1, 0, 10, 10).fits_within(frame));
        assert!(!Rect::new(600, 0, 41, 10).fits_within(frame));
        assert!(!Rect::new(0, 0, 0, 10).has_positive_extent());
        assert!(!Rect::new(0, 0, 10, -3).has_positive_extent());
        assert_eq!(Rect::new(0, 0, 10, 3).area(), 30);
    }
}
