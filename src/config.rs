//! Physics configuration
//!
//! Tuning for the projection model and the confidence scorer. Every field
//! has a default, so a partial JSON document is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};
use crate::physics::{MAX_BUFFER_SIZE, MIN_BUFFER_SIZE};

/// Deceleration rate in pixels/second²
const DEFAULT_DECELERATION_RATE: f64 = 1500.0;
/// Speeds below this (pixels/second) never produce a prediction
const DEFAULT_MIN_VELOCITY_THRESHOLD: f64 = 50.0;
/// Gestures shorter than this (ms) get zero duration confidence
const DEFAULT_MIN_GESTURE_TIME_MS: f64 = 30.0;
/// 0.3 = 30% previous smoothed velocity, 70% new estimate
const DEFAULT_SMOOTHING_FACTOR: f64 = 0.3;
/// Segments used by the recency-weighted velocity estimate
const DEFAULT_VELOCITY_WINDOW: usize = 5;
/// Samples kept per gesture (~0.8s at 120Hz)
const DEFAULT_BUFFER_CAPACITY: usize = 100;

/// Speed above threshold (pixels/second) that saturates speed confidence
const DEFAULT_SPEED_SCALE: f64 = 500.0;
/// Duration above minimum (ms) that saturates duration confidence
const DEFAULT_DURATION_SCALE: f64 = 100.0;
/// Sample count that saturates sample-sufficiency confidence
const DEFAULT_ENOUGH_SAMPLES: usize = 5;
/// Confidence multiplier applied while the gesture is visibly braking
const DEFAULT_DECELERATION_PENALTY: f64 = 0.5;

// ============================================================================
// CONFIDENCE TUNING
// ============================================================================

/// Saturation constants for the confidence sub-scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    pub speed_scale: f64,
    pub duration_scale: f64,
    pub enough_samples: usize,
    pub deceleration_penalty: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            speed_scale: DEFAULT_SPEED_SCALE,
            duration_scale: DEFAULT_DURATION_SCALE,
            enough_samples: DEFAULT_ENOUGH_SAMPLES,
            deceleration_penalty: DEFAULT_DECELERATION_PENALTY,
        }
    }
}

impl ConfidenceConfig {
    pub fn validate(&self) -> Result<()> {
        positive("confidence.speed_scale", self.speed_scale)?;
        positive("confidence.duration_scale", self.duration_scale)?;
        unit_interval("confidence.deceleration_penalty", self.deceleration_penalty)?;
        if self.enough_samples < MIN_BUFFER_SIZE {
            return Err(PredictorError::InvalidConfiguration {
                field: "confidence.enough_samples",
                value: self.enough_samples as f64,
                reason: "must be at least the minimum buffer size",
            });
        }
        Ok(())
    }
}

// ============================================================================
// PHYSICS CONFIG
// ============================================================================

/// Physics parameters supplied once per predictor or context
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Deceleration rate in pixels/second² (> 0)
    pub deceleration_rate: f64,
    /// Minimum velocity threshold in pixels/second (>= 0)
    pub min_velocity_threshold: f64,
    /// Minimum gesture time in milliseconds (>= 0)
    pub min_gesture_time_ms: f64,
    /// Weight of the previous smoothed velocity, in [0, 1]
    pub velocity_smoothing_factor: f64,
    /// Number of most recent segments in the weighted estimate
    pub velocity_window: usize,
    /// Sample capacity, clamped into `MIN_BUFFER_SIZE..=MAX_BUFFER_SIZE`
    pub buffer_capacity: usize,
    pub confidence: ConfidenceConfig,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            deceleration_rate: DEFAULT_DECELERATION_RATE,
            min_velocity_threshold: DEFAULT_MIN_VELOCITY_THRESHOLD,
            min_gesture_time_ms: DEFAULT_MIN_GESTURE_TIME_MS,
            velocity_smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            velocity_window: DEFAULT_VELOCITY_WINDOW,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            confidence: ConfidenceConfig::default(),
        }
    }
}

impl PhysicsConfig {
    /// Build a validated config from the four core parameters
    pub fn new(
        deceleration_rate: f64,
        min_velocity_threshold: f64,
        min_gesture_time_ms: f64,
        velocity_smoothing_factor: f64,
    ) -> Result<Self> {
        let config = Self {
            deceleration_rate,
            min_velocity_threshold,
            min_gesture_time_ms,
            velocity_smoothing_factor,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PhysicsConfig =
            serde_json::from_str(json).map_err(|e| PredictorError::ConfigParse {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        // Plain numeric struct; serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        positive("deceleration_rate", self.deceleration_rate)?;
        non_negative("min_velocity_threshold", self.min_velocity_threshold)?;
        non_negative("min_gesture_time_ms", self.min_gesture_time_ms)?;
        unit_interval("velocity_smoothing_factor", self.velocity_smoothing_factor)?;

        if self.velocity_window == 0 || self.velocity_window > MAX_BUFFER_SIZE {
            return Err(PredictorError::InvalidConfiguration {
                field: "velocity_window",
                value: self.velocity_window as f64,
                reason: "must be between 1 and the maximum buffer size",
            });
        }

        self.confidence.validate()
    }

    /// Buffer capacity after clamping to the supported range
    pub fn effective_capacity(&self) -> usize {
        self.buffer_capacity.clamp(MIN_BUFFER_SIZE, MAX_BUFFER_SIZE)
    }
}

// ============================================================================
// RANGE CHECKS
// ============================================================================

fn finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PredictorError::InvalidConfiguration {
            field,
            value,
            reason: "must be finite",
        })
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(PredictorError::InvalidConfiguration {
            field,
            value,
            reason: "must be positive",
        });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(PredictorError::InvalidConfiguration {
            field,
            value,
            reason: "cannot be negative",
        });
    }
    Ok(())
}

fn unit_interval(field: &'static str, value: f64) -> Result<()> {
    finite(field, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(PredictorError::InvalidConfiguration {
            field,
            value,
            reason: "must be within [0, 1]",
        });
    }
    Ok(())
}
