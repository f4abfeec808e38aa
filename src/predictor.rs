//! Per-gesture predictor
//!
//! Owns one sample buffer plus the smoothing state derived from it.
//! Pipeline per poll: velocity estimate → projection → confidence.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::config::PhysicsConfig;
use crate::error::{PredictorError, Result};
use crate::physics::{
    segment_velocities, CancellationDetector, ConfidenceInputs, ConfidenceScorer, GesturePath,
    KinematicProjector, PointBuffer, Prediction, TimedVelocity, TouchSample, Velocity,
    VelocityEstimate, VelocityEstimator,
};

/// Smoothed velocities remembered across polls (the newest transition)
const VELOCITY_HISTORY: usize = 2;

/// Raw segments inspected for cancellation (the newest transition)
const CANCELLATION_SEGMENTS: usize = 2;

/// Prediction engine for a single gesture
///
/// `Empty` until the first sample, `Active` afterwards; `reset` returns it
/// to `Empty` so the same instance can serve the next gesture.
#[derive(Debug, Clone)]
pub struct GesturePredictor {
    buffer: PointBuffer,
    config: PhysicsConfig,
    estimator: VelocityEstimator,
    projector: KinematicProjector,
    scorer: ConfidenceScorer,
    detector: CancellationDetector,
    /// Smoothing state, advanced by every `get_prediction`
    smoothed_velocity: Option<Velocity>,
    /// Smoothed velocities of recent polls, oldest first, one per timestamp
    velocity_history: VecDeque<TimedVelocity>,
    /// Whole-gesture path, unaffected by buffer eviction
    path: GesturePath,
}

impl GesturePredictor {
    pub fn new(config: PhysicsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new_unchecked(config))
    }

    /// Caller guarantees `config` has been validated
    pub(crate) fn new_unchecked(config: PhysicsConfig) -> Self {
        Self {
            buffer: PointBuffer::with_capacity(config.effective_capacity()),
            config,
            estimator: VelocityEstimator::from_config(&config),
            projector: KinematicProjector::from_config(&config),
            scorer: ConfidenceScorer::from_config(&config),
            detector: CancellationDetector::from_config(&config),
            smoothed_velocity: None,
            velocity_history: VecDeque::with_capacity(VELOCITY_HISTORY),
            path: GesturePath::default(),
        }
    }

    /// Record a touch sample
    ///
    /// Rejected samples leave the gesture untouched.
    pub fn add_point(&mut self, x: f64, y: f64, t: f64) -> Result<()> {
        check_finite("x", x)?;
        check_finite("y", y)?;
        check_finite("t", t)?;
        if t < 0.0 {
            return Err(PredictorError::InvalidInput {
                field: "t",
                value: t,
                reason: "must be non-negative",
            });
        }

        if let Some(last) = self.buffer.last() {
            if t < last.t {
                return Err(PredictorError::TimestampOutOfOrder {
                    previous: last.t,
                    current: t,
                });
            }
        }

        trace!(x, y, t, "touch sample");
        let sample = TouchSample::new(x, y, t);
        self.buffer.push(sample);
        self.path.extend(sample);
        Ok(())
    }

    /// Projected resting point, or `None` when there is nothing to predict
    ///
    /// Does not touch the buffer, but advances the smoothing state when the
    /// newest sample carries new motion.
    pub fn get_prediction(&mut self) -> Option<Prediction> {
        let last = *self.buffer.last()?;
        let velocity = match self.estimator.estimate(&self.buffer, self.smoothed_velocity) {
            VelocityEstimate::Insufficient => return None,
            VelocityEstimate::Unchanged(velocity) => velocity,
            VelocityEstimate::Smoothed(velocity) => {
                self.smoothed_velocity = Some(velocity);
                self.record_velocity(TimedVelocity {
                    velocity,
                    t: last.t,
                });
                velocity
            }
        };

        let projection = self.projector.project(velocity)?;
        let inputs = ConfidenceInputs::gather(&self.buffer, &self.path, projection.speed);
        let confidence = self.scorer.score(&inputs);

        trace!(
            dx = projection.dx,
            dy = projection.dy,
            confidence,
            "prediction"
        );

        Some(Prediction {
            x: last.x + projection.dx,
            y: last.y + projection.dy,
            confidence,
            dx: projection.dx,
            dy: projection.dy,
            duration_ms: projection.duration_ms,
            velocity,
        })
    }

    /// Clear samples and smoothing state; the predictor stays usable
    pub fn reset(&mut self) {
        debug!(points = self.buffer.len(), "gesture reset");
        self.buffer.clear();
        self.smoothed_velocity = None;
        self.velocity_history.clear();
        self.path.clear();
    }

    /// Whether the gesture currently looks abandoned
    ///
    /// Looks at the newest transition only: between the last two polled
    /// smoothed velocities, and between the two newest raw segments.
    /// Pure read.
    pub fn detect_cancellation(&self) -> bool {
        self.detector
            .is_cancelled(self.velocity_history.iter().copied())
            || self
                .detector
                .is_cancelled(segment_velocities(&self.buffer, CANCELLATION_SEGMENTS))
    }

    /// Milliseconds between the first and the newest sample
    pub fn elapsed_ms(&self) -> f64 {
        self.path.elapsed_ms()
    }

    pub fn point_count(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_active(&self) -> bool {
        !self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn smoothed_velocity(&self) -> Option<Velocity> {
        self.smoothed_velocity
    }

    pub fn samples(&self) -> impl Iterator<Item = &TouchSample> + '_ {
        self.buffer.iter()
    }

    fn record_velocity(&mut self, entry: TimedVelocity) {
        // Repeated polls of the same sample replace rather than append
        if let Some(newest) = self.velocity_history.back_mut() {
            if newest.t == entry.t {
                *newest = entry;
                return;
            }
        }
        if self.velocity_history.len() == VELOCITY_HISTORY {
            self.velocity_history.pop_front();
        }
        self.velocity_history.push_back(entry);
    }
}

impl Default for GesturePredictor {
    fn default() -> Self {
        Self::new_unchecked(PhysicsConfig::default())
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PredictorError::InvalidInput {
            field,
            value,
            reason: "must be finite",
        })
    }
}
