//! wasm-bindgen entry points
//!
//! One `SwipePredictorModule` per host module instance. Returns are plain
//! numbers so the same code also runs natively.

use wasm_bindgen::prelude::*;

use crate::config::PhysicsConfig;
use crate::context::{PredictorContext, PredictorHandle};
use crate::error::PredictorError;

/// Called automatically when the WASM module loads
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub struct SwipePredictorModule {
    context: PredictorContext,
}

#[wasm_bindgen]
impl SwipePredictorModule {
    /// Module with the default physics configuration
    #[wasm_bindgen(constructor)]
    pub fn new() -> SwipePredictorModule {
        Self {
            context: PredictorContext::default(),
        }
    }

    /// New predictor handle, `0` when the module is full
    #[wasm_bindgen(js_name = createPredictor)]
    pub fn create_predictor(&self) -> u64 {
        self.context
            .create_predictor()
            .map(PredictorHandle::to_raw)
            .unwrap_or(0)
    }

    /// Predictor with its own JSON configuration, `0` if it is invalid
    #[wasm_bindgen(js_name = createPredictorWithJson)]
    pub fn create_predictor_with_json(&self, json: &str) -> u64 {
        PhysicsConfig::from_json(json)
            .and_then(|config| self.context.create_predictor_with(config))
            .map(PredictorHandle::to_raw)
            .unwrap_or(0)
    }

    #[wasm_bindgen(js_name = destroyPredictor)]
    pub fn destroy_predictor(&self, handle: u64) -> i32 {
        to_status(self.context.destroy_predictor(PredictorHandle::from_raw(handle)))
    }

    /// `1` on success, negative error code if the sample was rejected
    #[wasm_bindgen(js_name = addPoint)]
    pub fn add_point(&self, handle: u64, x: f64, y: f64, t: f64) -> i32 {
        to_status(self.context.add_point(PredictorHandle::from_raw(handle), x, y, t))
    }

    /// `[x, y, confidence]`, or `None` when there is nothing to predict
    #[wasm_bindgen(js_name = getPrediction)]
    pub fn get_prediction(&self, handle: u64) -> Option<Vec<f64>> {
        self.context
            .get_prediction(PredictorHandle::from_raw(handle))
            .ok()
            .flatten()
            .map(|p| vec![p.x, p.y, p.confidence])
    }

    #[wasm_bindgen(js_name = resetPredictor)]
    pub fn reset_predictor(&self, handle: u64) -> i32 {
        to_status(self.context.reset_predictor(PredictorHandle::from_raw(handle)))
    }

    /// False for unknown handles
    #[wasm_bindgen(js_name = detectCancellation)]
    pub fn detect_cancellation(&self, handle: u64) -> bool {
        self.context
            .detect_cancellation(PredictorHandle::from_raw(handle))
            .unwrap_or(false)
    }

    #[wasm_bindgen(getter, js_name = predictorCount)]
    pub fn predictor_count(&self) -> usize {
        self.context.len()
    }
}

impl SwipePredictorModule {
    /// Module whose predictors default to `config`
    pub fn with_config(config: PhysicsConfig) -> Result<Self, PredictorError> {
        Ok(Self {
            context: PredictorContext::new(config)?,
        })
    }
}

impl Default for SwipePredictorModule {
    fn default() -> Self {
        Self::new()
    }
}

fn to_status(result: Result<(), PredictorError>) -> i32 {
    match result {
        Ok(()) => 1,
        Err(e) => e.code(),
    }
}
