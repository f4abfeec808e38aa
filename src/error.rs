//! Error types for swipe-predictor.

use thiserror::Error;

use crate::context::PredictorHandle;

/// Main error type for predictor operations.
///
/// "No prediction available" is not an error: it is reported as `None` by
/// [`GesturePredictor::get_prediction`](crate::GesturePredictor::get_prediction).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictorError {
    /// Handle is unknown or was already destroyed.
    #[error("invalid predictor handle: {0}")]
    InvalidHandle(PredictorHandle),

    /// Context id is unknown or was already destroyed.
    #[error("invalid context handle: {0:#x}")]
    InvalidContext(u64),

    /// Non-finite coordinate or timestamp, or a negative timestamp.
    #[error("invalid input: {field} = {value} ({reason})")]
    InvalidInput {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Timestamp earlier than the previous sample of the same gesture.
    #[error("timestamp out of order: {current}ms after {previous}ms")]
    TimestampOutOfOrder { previous: f64, current: f64 },

    /// Physics parameter out of its documented range.
    #[error("invalid configuration: {field} = {value} ({reason})")]
    InvalidConfiguration {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Configuration document could not be parsed.
    #[error("configuration parse error: {message}")]
    ConfigParse { message: String },

    /// Context already holds its maximum number of live predictors.
    #[error("context is full: {capacity} live predictors")]
    CapacityExceeded { capacity: usize },

    /// Logging could not be installed.
    #[error("logging error: {message}")]
    Logging { message: String },

    /// A panic was caught at the foreign-function boundary.
    #[error("internal fault caught at the foreign-function boundary")]
    Panicked,
}

impl PredictorError {
    /// Stable negative status code used by the C ABI.
    pub fn code(&self) -> i32 {
        match self {
            PredictorError::InvalidHandle(_) => -1,
            PredictorError::InvalidContext(_) => -2,
            PredictorError::InvalidInput { .. } => -3,
            PredictorError::TimestampOutOfOrder { .. } => -4,
            PredictorError::InvalidConfiguration { .. } => -5,
            PredictorError::ConfigParse { .. } => -6,
            PredictorError::CapacityExceeded { .. } => -7,
            PredictorError::Logging { .. } => -8,
            PredictorError::Panicked => -99,
        }
    }

    /// Returns true for stale or unknown handles of either kind.
    pub fn is_invalid_handle(&self) -> bool {
        matches!(
            self,
            PredictorError::InvalidHandle(_) | PredictorError::InvalidContext(_)
        )
    }

    /// Returns true if a sample was rejected by `add_point`.
    ///
    /// The gesture state is left untouched in that case, so the caller can
    /// keep feeding samples.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            PredictorError::InvalidInput { .. } | PredictorError::TimestampOutOfOrder { .. }
        )
    }
}

/// Convenience result type for predictor operations.
pub type Result<T> = std::result::Result<T, PredictorError>;
