//! Kinematic projection to the resting point
//!
//! Constant deceleration along the direction of travel:
//! distance `d = s² / 2a`, time to rest `T = s / a`.

use super::types::Velocity;
use crate::config::PhysicsConfig;

/// Remaining travel predicted from a velocity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Displacement from the current position (pixels)
    pub dx: f64,
    pub dy: f64,
    /// Time until the gesture comes to rest (ms)
    pub duration_ms: f64,
    /// Speed the projection was computed from (px/s)
    pub speed: f64,
}

impl Projection {
    pub fn distance(&self) -> f64 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }
}

/// Projects a velocity forward under constant deceleration
#[derive(Debug, Clone, Copy)]
pub struct KinematicProjector {
    /// Deceleration in pixels/second²
    deceleration_rate: f64,
    /// Below this speed there is no projection
    min_velocity_threshold: f64,
}

impl KinematicProjector {
    pub fn new(deceleration_rate: f64, min_velocity_threshold: f64) -> Self {
        Self {
            deceleration_rate,
            min_velocity_threshold,
        }
    }

    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::new(config.deceleration_rate, config.min_velocity_threshold)
    }

    /// `None` when the speed is below the threshold or effectively zero
    pub fn project(&self, velocity: Velocity) -> Option<Projection> {
        let speed = velocity.speed();

        if !speed.is_finite() || speed < self.min_velocity_threshold || speed <= f64::EPSILON {
            return None;
        }

        let direction = velocity.as_vector() / speed;
        let distance = speed * speed / (2.0 * self.deceleration_rate);
        let time_to_stop_s = speed / self.deceleration_rate;

        Some(Projection {
            dx: distance * direction.x,
            dy: distance * direction.y,
            duration_ms: time_to_stop_s * 1000.0,
            speed,
        })
    }
}

impl Default for KinematicProjector {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}
