//! Velocity estimation with exponential smoothing
//!
//! Weights recent segments more heavily, then blends the result
//! with the previous smoothed velocity of the same gesture.

use super::buffer::{PointBuffer, MIN_BUFFER_SIZE};
use super::types::{TimedVelocity, TouchSample, Velocity};
use crate::config::PhysicsConfig;

/// Result of one estimation pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VelocityEstimate {
    /// Fewer than `MIN_BUFFER_SIZE` samples
    Insufficient,
    /// Smoothed velocity in pixels/second
    Smoothed(Velocity),
    /// Newest pair has no positive time step; carries the prior smoothed value
    Unchanged(Velocity),
}

impl VelocityEstimate {
    pub fn velocity(&self) -> Option<Velocity> {
        match self {
            VelocityEstimate::Insufficient => None,
            VelocityEstimate::Smoothed(v) | VelocityEstimate::Unchanged(v) => Some(*v),
        }
    }
}

/// Smoothed velocity estimator
///
/// Stateless: the smoothing state lives on the predictor and is passed in,
/// so a scripted sequence of calls can be checked step by step.
#[derive(Debug, Clone, Copy)]
pub struct VelocityEstimator {
    /// Weight of the previous smoothed velocity (alpha)
    smoothing: f64,
    /// Segments in the weighted estimate
    window: usize,
}

impl VelocityEstimator {
    pub fn new(smoothing: f64, window: usize) -> Self {
        Self {
            smoothing: smoothing.clamp(0.0, 1.0),
            window: window.max(1),
        }
    }

    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::new(config.velocity_smoothing_factor, config.velocity_window)
    }

    /// Estimate and smooth against `previous`
    ///
    /// A zero time step on the newest pair carries no new information: the
    /// previous smoothed value is kept as-is, and without one the estimate
    /// stays `Insufficient` so the first real velocity still seeds the filter.
    pub fn estimate(&self, buffer: &PointBuffer, previous: Option<Velocity>) -> VelocityEstimate {
        if buffer.len() < MIN_BUFFER_SIZE {
            return VelocityEstimate::Insufficient;
        }

        let instant = match (self.instantaneous(buffer), previous) {
            (Some(v), _) => v,
            (None, Some(prev)) => return VelocityEstimate::Unchanged(prev),
            (None, None) => return VelocityEstimate::Insufficient,
        };

        let smoothed = match previous {
            Some(prev) => prev.blend(instant, self.smoothing),
            // First estimate of the gesture seeds the filter
            None => instant,
        };

        VelocityEstimate::Smoothed(smoothed)
    }

    /// Recency-weighted velocity over the last `window` segments
    ///
    /// Returns `None` when the newest pair has no positive time step.
    pub fn instantaneous(&self, buffer: &PointBuffer) -> Option<Velocity> {
        let (prev, last) = last_pair(buffer)?;
        if prev.velocity_to(last).is_none() {
            return None;
        }

        let mut total_x = 0.0;
        let mut total_y = 0.0;
        let mut total_weight = 0.0;

        // Linear recency weights: oldest segment 1, newest `window`
        let span = self.window + 1;
        let pairs = buffer.recent(span).zip(buffer.recent(span).skip(1));
        for (i, (earlier, later)) in pairs.enumerate() {
            if let Some(v) = earlier.velocity_to(later) {
                let weight = (i + 1) as f64;
                total_x += v.vx * weight;
                total_y += v.vy * weight;
                total_weight += weight;
            }
        }

        if total_weight > 0.0 {
            Some(Velocity::new(total_x / total_weight, total_y / total_weight))
        } else {
            None
        }
    }
}

impl Default for VelocityEstimator {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

fn last_pair(buffer: &PointBuffer) -> Option<(&TouchSample, &TouchSample)> {
    let n = buffer.len();
    if n < 2 {
        return None;
    }
    Some((buffer.get(n - 2)?, buffer.get(n - 1)?))
}

/// Raw per-segment velocities of the `segments` most recent segments
///
/// Segments with a non-positive time step are skipped. Each entry is
/// stamped with the time of its later sample.
pub fn segment_velocities(
    buffer: &PointBuffer,
    segments: usize,
) -> impl Iterator<Item = TimedVelocity> + '_ {
    buffer
        .recent(segments + 1)
        .zip(buffer.recent(segments + 1).skip(1))
        .filter_map(|(earlier, later)| {
            earlier.velocity_to(later).map(|velocity| TimedVelocity {
                velocity,
                t: later.t,
            })
        })
}
