//! Cancellation detection
//!
//! A gesture that reverses along its dominant axis, or stalls abruptly,
//! is more likely being abandoned than flicked. Advisory only.

use super::types::TimedVelocity;
use crate::config::PhysicsConfig;

/// A stall only counts if the speed collapses within this window (ms)
pub const STALL_WINDOW_MS: f64 = 100.0;

/// Why a velocity history looks cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationSignal {
    /// Velocity flipped sign along the dominant axis
    Reversal,
    /// Speed dropped from above the threshold to at/below it
    Stall,
}

/// Inspects consecutive velocities for signs of an aborted gesture
#[derive(Debug, Clone, Copy)]
pub struct CancellationDetector {
    min_velocity_threshold: f64,
    stall_window_ms: f64,
}

impl CancellationDetector {
    pub fn new(min_velocity_threshold: f64) -> Self {
        Self {
            min_velocity_threshold,
            stall_window_ms: STALL_WINDOW_MS,
        }
    }

    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::new(config.min_velocity_threshold)
    }

    /// Signal between the two newest entries of a chronological history
    ///
    /// Older transitions are ignored, so the flag clears as soon as the
    /// gesture settles into steady motion again.
    pub fn inspect<I>(&self, history: I) -> Option<CancellationSignal>
    where
        I: IntoIterator<Item = TimedVelocity>,
    {
        let (earlier, later) = history
            .into_iter()
            .fold((None, None), |(_, later), entry| (later, Some(entry)));
        self.inspect_pair(&earlier?, &later?)
    }

    pub fn is_cancelled<I>(&self, history: I) -> bool
    where
        I: IntoIterator<Item = TimedVelocity>,
    {
        self.inspect(history).is_some()
    }

    fn inspect_pair(
        &self,
        earlier: &TimedVelocity,
        later: &TimedVelocity,
    ) -> Option<CancellationSignal> {
        let earlier_speed = earlier.velocity.speed();
        if earlier_speed.is_nan() || earlier_speed <= self.min_velocity_threshold {
            // Nothing to cancel while the finger is barely moving
            return None;
        }

        // Dominant axis of the earlier motion
        let (before, after) = if earlier.velocity.vx.abs() >= earlier.velocity.vy.abs() {
            (earlier.velocity.vx, later.velocity.vx)
        } else {
            (earlier.velocity.vy, later.velocity.vy)
        };

        if before * after < 0.0 {
            return Some(CancellationSignal::Reversal);
        }

        let later_speed = later.velocity.speed();
        let gap_ms = later.t - earlier.t;
        if later_speed <= self.min_velocity_threshold && gap_ms <= self.stall_window_ms {
            return Some(CancellationSignal::Stall);
        }

        None
    }
}

impl Default for CancellationDetector {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}
