//! Physics module - velocity estimation and endpoint projection
//!
//! Re-exports only. All logic in submodules.

mod types;
mod buffer;
mod velocity;
mod projection;
mod confidence;
mod cancellation;
mod proptest;

pub use types::{GesturePath, Prediction, TimedVelocity, TouchSample, Velocity};
pub use buffer::{PointBuffer, MAX_BUFFER_SIZE, MIN_BUFFER_SIZE};
pub use velocity::{segment_velocities, VelocityEstimate, VelocityEstimator};
pub use projection::{KinematicProjector, Projection};
pub use confidence::{
    duration_score, is_decelerating, sample_score, speed_score, straightness,
    straightness_score, ConfidenceInputs, ConfidenceScorer,
};
pub use cancellation::{CancellationDetector, CancellationSignal, STALL_WINDOW_MS};
