//! Property-based tests for the physics pipeline.
//!
//! These tests use proptest to verify:
//! - Confidence always stays within [0, 1]
//! - The sample buffer never grows past its capacity
//! - Projections point along the motion and follow `s² / 2a`

#![cfg(test)]

use proptest::prelude::*;

use crate::config::PhysicsConfig;
use crate::physics::{
    straightness, GesturePath, KinematicProjector, PointBuffer, TouchSample, Velocity,
    MAX_BUFFER_SIZE, MIN_BUFFER_SIZE,
};
use crate::predictor::GesturePredictor;

// =============================================================================
// Arbitrary Generators
// =============================================================================

prop_compose! {
    fn arb_step()(
        dx in -60.0f64..60.0,
        dy in -60.0f64..60.0,
        dt in 0.0f64..40.0,
    ) -> (f64, f64, f64) {
        (dx, dy, dt)
    }
}

prop_compose! {
    /// Monotonic-time gesture built from random steps
    fn arb_gesture()(
        start_x in -500.0f64..500.0,
        start_y in -500.0f64..500.0,
        steps in prop::collection::vec(arb_step(), 0..60),
    ) -> Vec<TouchSample> {
        let mut x = start_x;
        let mut y = start_y;
        let mut t = 0.0;
        let mut samples = vec![TouchSample::new(x, y, t)];
        for (dx, dy, dt) in steps {
            x += dx;
            y += dy;
            t += dt;
            samples.push(TouchSample::new(x, y, t));
        }
        samples
    }
}

prop_compose! {
    fn arb_config()(
        deceleration_rate in 100.0f64..10_000.0,
        min_velocity_threshold in 0.0f64..500.0,
        min_gesture_time_ms in 0.0f64..200.0,
        velocity_smoothing_factor in 0.0f64..=1.0,
        velocity_window in 1usize..16,
        buffer_capacity in 0usize..400,
    ) -> PhysicsConfig {
        PhysicsConfig {
            deceleration_rate,
            min_velocity_threshold,
            min_gesture_time_ms,
            velocity_smoothing_factor,
            velocity_window,
            buffer_capacity,
            ..Default::default()
        }
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn confidence_is_bounded(config in arb_config(), gesture in arb_gesture()) {
        let mut predictor = GesturePredictor::new(config).unwrap();
        for sample in &gesture {
            predictor.add_point(sample.x, sample.y, sample.t).unwrap();
            if let Some(prediction) = predictor.get_prediction() {
                prop_assert!((0.0..=1.0).contains(&prediction.confidence));
                prop_assert!(prediction.duration_ms >= 0.0);
                prop_assert!(prediction.x.is_finite() && prediction.y.is_finite());
            }
        }
    }

    #[test]
    fn single_sample_never_predicts(x in -1e6f64..1e6, y in -1e6f64..1e6, t in 0.0f64..1e9) {
        let mut predictor = GesturePredictor::default();
        prop_assert!(predictor.get_prediction().is_none());
        predictor.add_point(x, y, t).unwrap();
        prop_assert!(predictor.get_prediction().is_none());
    }

    #[test]
    fn buffer_keeps_most_recent(capacity in 0usize..300, count in 0usize..600) {
        let mut buffer = PointBuffer::with_capacity(capacity);
        for i in 0..count {
            buffer.push(TouchSample::new(i as f64, 0.0, i as f64));
        }

        let effective = capacity.clamp(MIN_BUFFER_SIZE, MAX_BUFFER_SIZE);
        prop_assert_eq!(buffer.capacity(), effective);
        prop_assert_eq!(buffer.len(), count.min(effective));

        let first_kept = count.saturating_sub(effective);
        let xs: Vec<f64> = buffer.iter().map(|s| s.x).collect();
        let expected: Vec<f64> = (first_kept..count).map(|i| i as f64).collect();
        prop_assert_eq!(xs, expected);
    }

    #[test]
    fn constant_motion_projects_forward(
        speed_px_per_ms in 0.2f64..10.0,
        interval_ms in 4.0f64..32.0,
        count in 3usize..30,
    ) {
        let mut predictor = GesturePredictor::default();
        let mut path = GesturePath::default();
        for i in 0..count {
            let t = i as f64 * interval_ms;
            let x = t * speed_px_per_ms;
            predictor.add_point(x, 0.0, t).unwrap();
            path.extend(TouchSample::new(x, 0.0, t));
        }

        prop_assert!((straightness(&path) - 1.0).abs() < 1e-9);

        // Default threshold is 50 px/s, every generated speed is above it
        let prediction = predictor.get_prediction().unwrap();
        prop_assert!(prediction.dx > 0.0);
        prop_assert!(prediction.dy.abs() < 1e-9);
    }

    #[test]
    fn projection_distance_follows_kinematics(
        vx in -5000.0f64..5000.0,
        vy in -5000.0f64..5000.0,
        rate in 100.0f64..10_000.0,
    ) {
        let projector = KinematicProjector::new(rate, 0.0);
        let velocity = Velocity::new(vx, vy);
        let speed = velocity.speed();
        prop_assume!(speed > 1e-6);

        let projection = projector.project(velocity).unwrap();
        let expected = speed * speed / (2.0 * rate);
        prop_assert!((projection.distance() - expected).abs() <= expected * 1e-9 + 1e-9);
        prop_assert!(projection.dx * vx >= 0.0);
        prop_assert!(projection.dy * vy >= 0.0);
    }
}
