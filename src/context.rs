//! Predictor context - a handle table of live gestures
//!
//! Handles are generation-checked slot indices: a destroyed handle never
//! aliases a predictor created later in the same slot.

use std::fmt;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::config::PhysicsConfig;
use crate::error::{PredictorError, Result};
use crate::physics::Prediction;
use crate::predictor::GesturePredictor;

/// Live predictors allowed per context
pub const MAX_PREDICTORS: usize = 10_000;

// ============================================================================
// HANDLE
// ============================================================================

/// Opaque reference to one predictor inside a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PredictorHandle {
    index: u32,
    generation: u32,
}

impl PredictorHandle {
    /// Packed form used across the foreign-function boundary
    ///
    /// Generations start at 1, so a valid handle never packs to 0.
    pub fn to_raw(self) -> u64 {
        (u64::from(self.generation) << 32) | u64::from(self.index)
    }

    pub fn from_raw(raw: u64) -> Self {
        Self {
            index: raw as u32,
            generation: (raw >> 32) as u32,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for PredictorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

// ============================================================================
// HANDLE TABLE
// ============================================================================

struct Slot<T> {
    generation: u32,
    entry: Option<Mutex<T>>,
}

/// Generation-checked slot arena
///
/// Insert and remove take the table write lock. Access takes the read lock
/// plus the entry's own mutex, so different entries are used in parallel.
pub struct HandleTable<T> {
    inner: RwLock<TableInner<T>>,
    capacity: usize,
}

struct TableInner<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> HandleTable<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(TableInner {
                slots: Vec::new(),
                free: Vec::new(),
                live: 0,
            }),
            capacity,
        }
    }

    pub fn insert(&self, value: T) -> Result<PredictorHandle> {
        let mut inner = self.inner.write();
        if inner.live >= self.capacity {
            return Err(PredictorError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let index = match inner.free.pop() {
            Some(index) => index,
            None => {
                let index = u32::try_from(inner.slots.len()).map_err(|_| {
                    PredictorError::CapacityExceeded {
                        capacity: self.capacity,
                    }
                })?;
                inner.slots.push(Slot {
                    generation: 0,
                    entry: None,
                });
                index
            }
        };

        let slot = &mut inner.slots[index as usize];
        // Skip 0 on wrap so packed handles stay non-zero
        slot.generation = slot.generation.wrapping_add(1).max(1);
        slot.entry = Some(Mutex::new(value));
        let generation = slot.generation;
        inner.live += 1;

        Ok(PredictorHandle { index, generation })
    }

    /// Remove and return the entry; the handle is stale afterwards
    pub fn remove(&self, handle: PredictorHandle) -> Result<T> {
        let mut inner = self.inner.write();
        let slot = inner
            .slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .ok_or(PredictorError::InvalidHandle(handle))?;
        let entry = slot
            .entry
            .take()
            .ok_or(PredictorError::InvalidHandle(handle))?;

        inner.free.push(handle.index);
        inner.live -= 1;
        Ok(entry.into_inner())
    }

    /// Run `f` with exclusive access to one entry
    pub fn with<R>(&self, handle: PredictorHandle, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let inner = self.inner.read();
        let entry = inner
            .slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_ref())
            .ok_or(PredictorError::InvalidHandle(handle))?;

        let mut value = entry.lock();
        Ok(f(&mut value))
    }

    pub fn contains(&self, handle: PredictorHandle) -> bool {
        let inner = self.inner.read();
        inner
            .slots
            .get(handle.index as usize)
            .is_some_and(|slot| slot.generation == handle.generation && slot.entry.is_some())
    }

    pub fn len(&self) -> usize {
        self.inner.read().live
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// ============================================================================
// CONTEXT
// ============================================================================

/// Independent set of predictors sharing a default configuration
pub struct PredictorContext {
    config: PhysicsConfig,
    predictors: HandleTable<GesturePredictor>,
}

impl PredictorContext {
    pub fn new(config: PhysicsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_capacity_unchecked(config, MAX_PREDICTORS))
    }

    /// Context with a custom live-predictor limit
    pub fn with_capacity(config: PhysicsConfig, capacity: usize) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_capacity_unchecked(config, capacity))
    }

    fn with_capacity_unchecked(config: PhysicsConfig, capacity: usize) -> Self {
        Self {
            config,
            predictors: HandleTable::with_capacity(capacity),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// New predictor using the context's configuration
    pub fn create_predictor(&self) -> Result<PredictorHandle> {
        let handle = self
            .predictors
            .insert(GesturePredictor::new_unchecked(self.config))?;
        debug!(%handle, "predictor created");
        Ok(handle)
    }

    /// New predictor with its own configuration
    pub fn create_predictor_with(&self, config: PhysicsConfig) -> Result<PredictorHandle> {
        let predictor = GesturePredictor::new(config)?;
        let handle = self.predictors.insert(predictor)?;
        debug!(%handle, "predictor created with custom config");
        Ok(handle)
    }

    pub fn destroy_predictor(&self, handle: PredictorHandle) -> Result<()> {
        self.predictors.remove(handle)?;
        debug!(%handle, "predictor destroyed");
        Ok(())
    }

    /// Run `f` against one predictor as a single critical section
    pub fn with_predictor<R>(
        &self,
        handle: PredictorHandle,
        f: impl FnOnce(&mut GesturePredictor) -> R,
    ) -> Result<R> {
        self.predictors.with(handle, f)
    }

    pub fn add_point(&self, handle: PredictorHandle, x: f64, y: f64, t: f64) -> Result<()> {
        self.with_predictor(handle, |p| p.add_point(x, y, t))?
    }

    pub fn get_prediction(&self, handle: PredictorHandle) -> Result<Option<Prediction>> {
        self.with_predictor(handle, |p| p.get_prediction())
    }

    pub fn reset_predictor(&self, handle: PredictorHandle) -> Result<()> {
        self.with_predictor(handle, |p| p.reset())
    }

    pub fn detect_cancellation(&self, handle: PredictorHandle) -> Result<bool> {
        self.with_predictor(handle, |p| p.detect_cancellation())
    }

    pub fn contains(&self, handle: PredictorHandle) -> bool {
        self.predictors.contains(handle)
    }

    /// Live predictors
    pub fn len(&self) -> usize {
        self.predictors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictors.is_empty()
    }
}

impl Default for PredictorContext {
    fn default() -> Self {
        Self::with_capacity_unchecked(PhysicsConfig::default(), MAX_PREDICTORS)
    }
}

impl fmt::Debug for PredictorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictorContext")
            .field("config", &self.config)
            .field("live", &self.len())
            .finish()
    }
}
