//! C ABI entry points
//!
//! Contexts and predictors are referred to by packed `u64` handles, never
//! raw pointers. Contexts live in a process-wide registry, so a destroyed
//! context id is reported as an error instead of being dereferenced.
//!
//! Status codes: `1` success or true, `0` no prediction or false, negative
//! values are [`PredictorError::code`]. Handle-returning calls return `0`
//! on failure.

use std::ffi::{c_char, CStr};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, LazyLock, Once};

use tracing::{debug, error, warn};

use crate::config::PhysicsConfig;
use crate::context::{HandleTable, PredictorContext, PredictorHandle};
use crate::error::{PredictorError, Result};
use crate::logging::{init_logging, LogFormat};

pub const SWIPE_PREDICTOR_OK: i32 = 1;
pub const SWIPE_PREDICTOR_NONE: i32 = 0;
pub const SWIPE_PREDICTOR_PANICKED: i32 = -99;

/// Live contexts allowed per process
const MAX_CONTEXTS: usize = 1024;

static CONTEXTS: LazyLock<HandleTable<Arc<PredictorContext>>> =
    LazyLock::new(|| HandleTable::with_capacity(MAX_CONTEXTS));

static PANIC_HOOK: Once = Once::new();

// ============================================================================
// BOUNDARY HELPERS
// ============================================================================

/// Route panics through `tracing` before the default hook runs
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            error!(%info, "panic inside swipe predictor");
            previous(info);
        }));
    });
}

/// Run a status-returning operation, converting errors and panics to codes
fn status(op: &'static str, f: impl FnOnce() -> Result<i32>) -> i32 {
    install_panic_hook();
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(code)) => code,
        Ok(Err(e)) => {
            warn!(op, error = %e, "call rejected");
            e.code()
        }
        Err(_) => SWIPE_PREDICTOR_PANICKED,
    }
}

/// Run a handle-returning operation; `0` on any failure
fn handle(op: &'static str, f: impl FnOnce() -> Result<u64>) -> u64 {
    install_panic_hook();
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(raw)) => raw,
        Ok(Err(e)) => {
            warn!(op, error = %e, "call rejected");
            0
        }
        Err(_) => 0,
    }
}

fn context(ctx: u64) -> Result<Arc<PredictorContext>> {
    CONTEXTS
        .with(PredictorHandle::from_raw(ctx), |context| Arc::clone(context))
        .map_err(|_| PredictorError::InvalidContext(ctx))
}

fn register(context: PredictorContext) -> Result<u64> {
    let id = CONTEXTS.insert(Arc::new(context))?.to_raw();
    debug!(context = id, "context created");
    Ok(id)
}

fn flag(value: bool) -> i32 {
    if value {
        SWIPE_PREDICTOR_OK
    } else {
        SWIPE_PREDICTOR_NONE
    }
}

// ============================================================================
// LIFECYCLE
// ============================================================================

/// Install the panic hook; optional, every entry point does it lazily
#[no_mangle]
pub extern "C" fn swipe_predictor_init() -> i32 {
    status("init", || {
        install_panic_hook();
        Ok(SWIPE_PREDICTOR_OK)
    })
}

/// Install a stderr `tracing` subscriber (0=error ... 4=trace)
#[no_mangle]
pub extern "C" fn swipe_predictor_init_logging(verbosity: u32) -> i32 {
    status("init_logging", || {
        let verbosity = u8::try_from(verbosity).unwrap_or(u8::MAX);
        init_logging(verbosity, LogFormat::Text)?;
        Ok(SWIPE_PREDICTOR_OK)
    })
}

// ============================================================================
// CONTEXTS
// ============================================================================

/// Create a context from the four core physics parameters
#[no_mangle]
pub extern "C" fn swipe_predictor_context_create(
    deceleration_rate: f64,
    min_velocity_threshold: f64,
    min_gesture_time_ms: f64,
    velocity_smoothing_factor: f64,
) -> u64 {
    handle("context_create", || {
        let config = PhysicsConfig::new(
            deceleration_rate,
            min_velocity_threshold,
            min_gesture_time_ms,
            velocity_smoothing_factor,
        )?;
        register(PredictorContext::new(config)?)
    })
}

#[no_mangle]
pub extern "C" fn swipe_predictor_context_create_default() -> u64 {
    handle("context_create_default", || {
        register(PredictorContext::default())
    })
}

/// Create a context from a JSON configuration document
///
/// # Safety
///
/// `json` must be null or point to a NUL-terminated string that stays
/// valid for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn swipe_predictor_context_create_json(json: *const c_char) -> u64 {
    handle("context_create_json", || {
        if json.is_null() {
            return Err(PredictorError::ConfigParse {
                message: "null configuration string".into(),
            });
        }
        // SAFETY: non-null and NUL-terminated per the caller contract
        let text = unsafe { CStr::from_ptr(json) }
            .to_str()
            .map_err(|e| PredictorError::ConfigParse {
                message: e.to_string(),
            })?;
        let config = PhysicsConfig::from_json(text)?;
        register(PredictorContext::new(config)?)
    })
}

/// Destroy a context and every predictor in it
#[no_mangle]
pub extern "C" fn swipe_predictor_context_destroy(ctx: u64) -> i32 {
    status("context_destroy", || {
        CONTEXTS
            .remove(PredictorHandle::from_raw(ctx))
            .map_err(|_| PredictorError::InvalidContext(ctx))?;
        debug!(context = ctx, "context destroyed");
        Ok(SWIPE_PREDICTOR_OK)
    })
}

// ============================================================================
// PREDICTORS
// ============================================================================

#[no_mangle]
pub extern "C" fn swipe_predictor_create(ctx: u64) -> u64 {
    handle("create", || {
        Ok(context(ctx)?.create_predictor()?.to_raw())
    })
}

#[no_mangle]
pub extern "C" fn swipe_predictor_destroy(ctx: u64, predictor: u64) -> i32 {
    status("destroy", || {
        context(ctx)?.destroy_predictor(PredictorHandle::from_raw(predictor))?;
        Ok(SWIPE_PREDICTOR_OK)
    })
}

#[no_mangle]
pub extern "C" fn swipe_predictor_add_point(ctx: u64, predictor: u64, x: f64, y: f64, t: f64) -> i32 {
    status("add_point", || {
        context(ctx)?.add_point(PredictorHandle::from_raw(predictor), x, y, t)?;
        Ok(SWIPE_PREDICTOR_OK)
    })
}

/// Write the projected endpoint and confidence
///
/// Returns `1` with the outputs written, `0` with the outputs untouched when
/// there is no prediction yet.
///
/// # Safety
///
/// Each output pointer must be null or valid for a write of one `f64`.
/// Null outputs are rejected with an error code.
#[no_mangle]
pub unsafe extern "C" fn swipe_predictor_get_prediction(
    ctx: u64,
    predictor: u64,
    out_x: *mut f64,
    out_y: *mut f64,
    out_confidence: *mut f64,
) -> i32 {
    status("get_prediction", || {
        if out_x.is_null() || out_y.is_null() || out_confidence.is_null() {
            return Err(PredictorError::InvalidInput {
                field: "out",
                value: 0.0,
                reason: "null output pointer",
            });
        }

        let prediction = context(ctx)?.get_prediction(PredictorHandle::from_raw(predictor))?;
        match prediction {
            Some(p) => {
                // SAFETY: checked non-null above; validity per the caller contract
                unsafe {
                    *out_x = p.x;
                    *out_y = p.y;
                    *out_confidence = p.confidence;
                }
                Ok(SWIPE_PREDICTOR_OK)
            }
            None => Ok(SWIPE_PREDICTOR_NONE),
        }
    })
}

#[no_mangle]
pub extern "C" fn swipe_predictor_reset(ctx: u64, predictor: u64) -> i32 {
    status("reset", || {
        context(ctx)?.reset_predictor(PredictorHandle::from_raw(predictor))?;
        Ok(SWIPE_PREDICTOR_OK)
    })
}

/// `1` if the gesture looks cancelled, `0` if not
#[no_mangle]
pub extern "C" fn swipe_predictor_detect_cancellation(ctx: u64, predictor: u64) -> i32 {
    status("detect_cancellation", || {
        let cancelled = context(ctx)?.detect_cancellation(PredictorHandle::from_raw(predictor))?;
        Ok(flag(cancelled))
    })
}
