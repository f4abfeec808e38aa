//! Confidence scoring for a projected endpoint
//!
//! Independent sub-scores in [0, 1], combined as a product.
//! Any single weak signal pulls the whole score down.

use super::buffer::{PointBuffer, MIN_BUFFER_SIZE};
use super::types::GesturePath;
use super::velocity::segment_velocities;
use crate::config::{ConfidenceConfig, PhysicsConfig};

/// Speed must fall below 90% of the previous segment to count as braking
const DECELERATION_FACTOR: f64 = 0.9;

/// Segments inspected by the braking check
const DECELERATION_SEGMENTS: usize = 3;

/// Net displacement (pixels) below which a path has no usable direction
const MIN_NET_DISPLACEMENT: f64 = 1.0;

/// Everything the scorer looks at for one poll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInputs {
    pub sample_count: usize,
    pub elapsed_ms: f64,
    pub speed: f64,
    /// Net displacement / path length
    pub straightness: f64,
    pub decelerating: bool,
}

impl ConfidenceInputs {
    /// Whole-gesture measures from `path`, recent braking from `buffer`
    pub fn gather(buffer: &PointBuffer, path: &GesturePath, speed: f64) -> Self {
        Self {
            sample_count: buffer.len(),
            elapsed_ms: path.elapsed_ms(),
            speed,
            straightness: straightness(path),
            decelerating: is_decelerating(buffer),
        }
    }
}

/// Combines the sub-scores into a single confidence
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceScorer {
    min_gesture_time_ms: f64,
    min_velocity_threshold: f64,
    tuning: ConfidenceConfig,
}

impl ConfidenceScorer {
    pub fn new(min_gesture_time_ms: f64, min_velocity_threshold: f64, tuning: ConfidenceConfig) -> Self {
        Self {
            min_gesture_time_ms,
            min_velocity_threshold,
            tuning,
        }
    }

    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::new(
            config.min_gesture_time_ms,
            config.min_velocity_threshold,
            config.confidence,
        )
    }

    /// Final confidence, always within [0, 1]
    pub fn score(&self, inputs: &ConfidenceInputs) -> f64 {
        let penalty = if inputs.decelerating {
            self.tuning.deceleration_penalty.clamp(0.0, 1.0)
        } else {
            1.0
        };

        let combined = duration_score(
            inputs.elapsed_ms,
            self.min_gesture_time_ms,
            self.tuning.duration_scale,
        ) * speed_score(
            inputs.speed,
            self.min_velocity_threshold,
            self.tuning.speed_scale,
        ) * straightness_score(inputs.straightness)
            * sample_score(inputs.sample_count, self.tuning.enough_samples)
            * penalty;

        if combined.is_nan() {
            0.0
        } else {
            combined.clamp(0.0, 1.0)
        }
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

// ============================================================================
// SUB-SCORES
// ============================================================================

/// 0 below the minimum gesture time, saturating `scale` ms above it
pub fn duration_score(elapsed_ms: f64, min_gesture_time_ms: f64, scale: f64) -> f64 {
    if elapsed_ms.is_nan() || elapsed_ms < min_gesture_time_ms {
        return 0.0;
    }
    saturate((elapsed_ms - min_gesture_time_ms) / scale)
}

/// 0 at or below the threshold, saturating `scale` px/s above it
pub fn speed_score(speed: f64, threshold: f64, scale: f64) -> f64 {
    if speed.is_nan() || speed <= threshold {
        return 0.0;
    }
    saturate((speed - threshold) / scale)
}

/// Straightness ratio clamped to [0, 1]
pub fn straightness_score(ratio: f64) -> f64 {
    saturate(ratio)
}

/// 0 below `MIN_BUFFER_SIZE`, 1 at `enough_samples` or more
pub fn sample_score(sample_count: usize, enough_samples: usize) -> f64 {
    if sample_count < MIN_BUFFER_SIZE {
        return 0.0;
    }
    saturate(sample_count as f64 / enough_samples.max(1) as f64)
}

fn saturate(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

// ============================================================================
// PATH MEASURES
// ============================================================================

/// Net displacement over path length across every sample of the gesture
///
/// Fewer than three samples cannot bend, so they count as straight.
pub fn straightness(path: &GesturePath) -> f64 {
    if path.samples() < 3 {
        return 1.0;
    }

    let net = path.net_displacement();
    if net < MIN_NET_DISPLACEMENT {
        return 0.0;
    }

    let length = path.length();
    if length <= 0.0 {
        return 0.0;
    }

    (net / length).clamp(0.0, 1.0)
}

/// True when every recent segment is markedly slower than the one before
pub fn is_decelerating(buffer: &PointBuffer) -> bool {
    let mut previous: Option<f64> = None;
    let mut transitions = 0;
    for segment in segment_velocities(buffer, DECELERATION_SEGMENTS) {
        let speed = segment.velocity.speed();
        if let Some(before) = previous {
            if speed >= before * DECELERATION_FACTOR || speed.is_nan() {
                return false;
            }
            transitions += 1;
        }
        previous = Some(speed);
    }

    transitions > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::TouchSample;

    fn buffer_of(points: &[(f64, f64, f64)]) -> PointBuffer {
        let mut buffer = PointBuffer::with_capacity(32);
        for &(x, y, t) in points {
            buffer.push(TouchSample::new(x, y, t));
        }
        buffer
    }

    fn path_of(points: &[(f64, f64, f64)]) -> GesturePath {
        let mut path = GesturePath::default();
        for &(x, y, t) in points {
            path.extend(TouchSample::new(x, y, t));
        }
        path
    }

    #[test]
    fn duration_score_bounds() {
        assert_eq!(duration_score(10.0, 30.0, 100.0), 0.0);
        assert_eq!(duration_score(30.0, 30.0, 100.0), 0.0);
        assert!((duration_score(80.0, 30.0, 100.0) - 0.5).abs() < 1e-12);
        assert_eq!(duration_score(500.0, 30.0, 100.0), 1.0);
        assert_eq!(duration_score(f64::NAN, 30.0, 100.0), 0.0);
    }

    #[test]
    fn duration_score_is_monotonic() {
        let mut last = 0.0;
        for ms in 0..300 {
            let score = duration_score(ms as f64, 30.0, 100.0);
            assert!(score >= last);
            last = score;
        }
    }

    #[test]
    fn speed_score_bounds() {
        assert_eq!(speed_score(0.0, 50.0, 500.0), 0.0);
        assert_eq!(speed_score(50.0, 50.0, 500.0), 0.0);
        assert!((speed_score(300.0, 50.0, 500.0) - 0.5).abs() < 1e-12);
        assert_eq!(speed_score(1.0e9, 50.0, 500.0), 1.0);
    }

    #[test]
    fn straightness_score_clamps() {
        assert_eq!(straightness_score(1.3), 1.0);
        assert_eq!(straightness_score(-0.2), 0.0);
        assert_eq!(straightness_score(0.75), 0.75);
        assert_eq!(straightness_score(f64::NAN), 0.0);
    }

    #[test]
    fn sample_score_bounds() {
        assert_eq!(sample_score(0, 5), 0.0);
        assert_eq!(sample_score(1, 5), 0.0);
        assert!((sample_score(2, 5) - 0.4).abs() < 1e-12);
        assert_eq!(sample_score(5, 5), 1.0);
        assert_eq!(sample_score(50, 5), 1.0);
    }

    #[test]
    fn straight_path_is_one() {
        let path = path_of(&[(0.0, 0.0, 0.0), (10.0, 0.0, 16.0), (20.0, 0.0, 32.0)]);
        assert!((straightness(&path) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zigzag_path_is_less_straight() {
        let path = path_of(&[
            (0.0, 0.0, 0.0),
            (10.0, 10.0, 10.0),
            (20.0, 0.0, 20.0),
            (30.0, 10.0, 30.0),
        ]);
        let s = straightness(&path);
        assert!(s > 0.0 && s < 0.9, "straightness {}", s);
    }

    #[test]
    fn closed_loop_has_zero_straightness() {
        let path = path_of(&[(0.0, 0.0, 0.0), (10.0, 0.0, 10.0), (0.0, 0.0, 20.0)]);
        assert_eq!(straightness(&path), 0.0);
    }

    #[test]
    fn straightness_covers_evicted_samples() {
        // Out and back along x, then a straight run the buffer alone would keep
        let points = [
            (0.0, 0.0, 0.0),
            (100.0, 0.0, 10.0),
            (0.0, 0.0, 20.0),
            (10.0, 0.0, 30.0),
            (20.0, 0.0, 40.0),
        ];
        let mut buffer = PointBuffer::with_capacity(3);
        for &(x, y, t) in &points {
            buffer.push(TouchSample::new(x, y, t));
        }
        let path = path_of(&points);

        let inputs = ConfidenceInputs::gather(&buffer, &path, 600.0);
        // 20 px net over 220 px travelled
        assert!((inputs.straightness - 20.0 / 220.0).abs() < 1e-12);
        assert_eq!(inputs.elapsed_ms, 40.0);
        assert_eq!(inputs.sample_count, 3);
    }

    #[test]
    fn braking_is_detected() {
        let buffer = buffer_of(&[
            (0.0, 0.0, 0.0),
            (40.0, 0.0, 10.0),
            (70.0, 0.0, 20.0),
            (85.0, 0.0, 30.0),
        ]);
        assert!(is_decelerating(&buffer));

        let steady = buffer_of(&[
            (0.0, 0.0, 0.0),
            (20.0, 0.0, 10.0),
            (40.0, 0.0, 20.0),
            (60.0, 0.0, 30.0),
        ]);
        assert!(!is_decelerating(&steady));
    }

    #[test]
    fn score_is_product_of_sub_scores() {
        let scorer = ConfidenceScorer::default();
        let inputs = ConfidenceInputs {
            sample_count: 10,
            elapsed_ms: 80.0,
            speed: 300.0,
            straightness: 1.0,
            decelerating: false,
        };
        // duration 0.5 * speed 0.5
        assert!((scorer.score(&inputs) - 0.25).abs() < 1e-12);

        let braking = ConfidenceInputs {
            decelerating: true,
            ..inputs
        };
        assert!((scorer.score(&braking) - 0.125).abs() < 1e-12);
    }

    #[test]
    fn short_gesture_is_penalized() {
        let scorer = ConfidenceScorer::default();
        let inputs = ConfidenceInputs {
            sample_count: 10,
            elapsed_ms: 20.0,
            speed: 2000.0,
            straightness: 1.0,
            decelerating: false,
        };
        assert_eq!(scorer.score(&inputs), 0.0);
    }

    #[test]
    fn saturated_inputs_reach_one() {
        let scorer = ConfidenceScorer::default();
        let inputs = ConfidenceInputs {
            sample_count: 100,
            elapsed_ms: 1000.0,
            speed: 5000.0,
            straightness: 1.0,
            decelerating: false,
        };
        assert_eq!(scorer.score(&inputs), 1.0);
    }
}
