//! Swipe Predictor - touch gesture endpoint prediction
//!
//! Entry point for the library. Only contains:
//! - Module declarations
//! - Re-exports of the public API and the C ABI / WASM entry points

pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod physics;
pub mod predictor;

mod bridge;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use config::{ConfidenceConfig, PhysicsConfig};
pub use context::{HandleTable, PredictorContext, PredictorHandle, MAX_PREDICTORS};
pub use error::{PredictorError, Result};
pub use logging::{init_logging, LogFormat};
pub use physics::{Prediction, TouchSample, Velocity, MAX_BUFFER_SIZE, MIN_BUFFER_SIZE};
pub use predictor::GesturePredictor;

// ============================================================================
// HOST ENTRY POINTS
// ============================================================================

pub use bridge::*;
