//! Pixel-displacement speed estimation.

use nalgebra::Point2;

/// Default calibration: pixels per metre of road surface.
pub const DEFAULT_PPM: f64 = 8.8;

/// Metres per second to kilometres per hour.
const MPS_TO_KMH: f64 = 3.6;

/// Converts the displacement between two consecutive positions into km/h.
///
/// The displacement is assumed to have happened over a single source frame
/// interval, so `fps` is always the native frame rate of the input video.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedEstimator {
    ppm: f64,
}

impl Default for SpeedEstimator {
    fn default() -> Self {
        Self { ppm: DEFAULT_PPM }
    }
}

impl SpeedEstimator {
    pub fn new(ppm: f64) -> Self {
        Self { ppm }
    }

    /// Pixels-per-metre calibration constant in use.
    pub fn ppm(&self) -> f64 {
        self.ppm
    }

    /// Speed in km/h for a move from `p1` to `p2` over one frame at `fps`.
    pub fn estimate(&self, p1: (i32, i32), p2: (i32, i32), fps: f64) -> f64 {
        estimate_speed(p1, p2, fps, self.ppm)
    }
}

/// Speed in km/h for a move from `p1` to `p2` over one frame at `fps`, given
/// `ppm` pixels per metre.
pub fn estimate_speed(p1: (i32, i32), p2: (i32, i32), fps: f64, ppm: f64) -> f64 {
    let a = Point2::new(p1.0 as f64, p1.1 as f64);
    let b = Point2::new(p2.0 as f64, p2.1 as f64);
    let d_pixels = nalgebra::distance(&a, &b);
    let d_meters = d_pixels / ppm;
    d_meters * fps * MPS_TO_KMH
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_horizontal_shift() {
        // 8 px at 8.8 ppm over one 30 fps frame
        let speed = SpeedEstimator::default().estimate((100, 100), (108, 100), 30.0);
        assert_relative_eq!(speed, 98.181_818, epsilon = 1e-5);
        assert_eq!(speed as i32, 98);
    }

    #[test]
    fn test_euclidean_distance() {
        let speed = estimate_speed((0, 0), (3, 4), 10.0, 1.0);
        assert_relative_eq!(speed, 5.0 * 10.0 * 3.6, epsilon = 1e-9);
    }

    #[test]
    fn test_direction_does_not_matter() {
        let est = SpeedEstimator::new(4.0);
        assert_relative_eq!(
            est.estimate((10, 10), (30, 25), 25.0),
            est.estimate((30, 25), (10, 10), 25.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_zero_displacement() {
        assert_eq!(SpeedEstimator::default().estimate((5, 5), (5, 5), 30.0), 0.0);
    }

    #[test]
    fn test_scales_linearly_with_fps_and_inverse_ppm() {
        let base = estimate_speed((0, 0), (10, 0), 30.0, 8.8);
        assert_relative_eq!(estimate_speed((0, 0), (10, 0), 60.0, 8.8), base * 2.0, epsilon = 1e-9);
        assert_relative_eq!(estimate_speed((0, 0), (10, 0), 30.0, 17.6), base / 2.0, epsilon = 1e-9);
    }
}
