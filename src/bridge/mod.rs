//! Bridge module - host ↔ Rust communication
//!
//! C ABI and wasm-bindgen entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

pub mod ffi;
mod wasm;

pub use ffi::{
    // C ABI entry points
    swipe_predictor_init,
    swipe_predictor_init_logging,
    swipe_predictor_context_create,
    swipe_predictor_context_create_default,
    swipe_predictor_context_create_json,
    swipe_predictor_context_destroy,
    swipe_predictor_create,
    swipe_predictor_destroy,
    swipe_predictor_add_point,
    swipe_predictor_get_prediction,
    swipe_predictor_reset,
    swipe_predictor_detect_cancellation,
    // Status codes
    SWIPE_PREDICTOR_OK, SWIPE_PREDICTOR_NONE, SWIPE_PREDICTOR_PANICKED,
};

pub use wasm::SwipePredictorModule;
