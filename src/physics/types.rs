//! Gesture state - shared data structures for physics calculations

use nalgebra::Vector2;

/// One recorded touch observation
///
/// Position is in the gesture's local coordinates (pixels),
/// time in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchSample {
    pub x: f64,
    pub y: f64,
    pub t: f64,
}

impl TouchSample {
    pub fn new(x: f64, y: f64, t: f64) -> Self {
        Self { x, y, t }
    }

    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    pub fn distance_to(&self, other: &TouchSample) -> f64 {
        (other.position() - self.position()).norm()
    }

    /// Velocity (px/s) from `self` to a later sample, `None` if `dt <= 0`
    pub fn velocity_to(&self, later: &TouchSample) -> Option<Velocity> {
        let dt_ms = later.t - self.t;
        if dt_ms.is_nan() || dt_ms <= 0.0 {
            return None;
        }
        let dt_s = dt_ms / 1000.0;
        Some(Velocity::new(
            (later.x - self.x) / dt_s,
            (later.y - self.y) / dt_s,
        ))
    }
}

/// Velocity in pixels per second
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

impl Velocity {
    pub const ZERO: Velocity = Velocity { vx: 0.0, vy: 0.0 };

    pub fn new(vx: f64, vy: f64) -> Self {
        Self { vx, vy }
    }

    pub fn as_vector(&self) -> Vector2<f64> {
        Vector2::new(self.vx, self.vy)
    }

    /// Speed magnitude
    pub fn speed(&self) -> f64 {
        self.as_vector().norm()
    }

    /// Exponential smoothing: `alpha` weights `self` (the previous value)
    pub fn blend(&self, instant: Velocity, alpha: f64) -> Velocity {
        Velocity::new(
            alpha * self.vx + (1.0 - alpha) * instant.vx,
            alpha * self.vy + (1.0 - alpha) * instant.vy,
        )
    }
}

/// Velocity observed at a point in time (ms)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedVelocity {
    pub velocity: Velocity,
    pub t: f64,
}

/// Running summary of everything a gesture has travelled
///
/// Kept alongside the sample buffer so straightness and elapsed time cover
/// the whole gesture even after old samples are evicted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GesturePath {
    origin: Option<TouchSample>,
    latest: Option<TouchSample>,
    length: f64,
    samples: usize,
}

impl GesturePath {
    pub fn extend(&mut self, sample: TouchSample) {
        match self.latest {
            Some(latest) => self.length += latest.distance_to(&sample),
            None => self.origin = Some(sample),
        }
        self.latest = Some(sample);
        self.samples += 1;
    }

    /// Distance travelled along the path
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Straight-line distance from the first to the newest sample
    pub fn net_displacement(&self) -> f64 {
        match (self.origin, self.latest) {
            (Some(origin), Some(latest)) => origin.distance_to(&latest),
            _ => 0.0,
        }
    }

    /// Samples recorded, including evicted ones
    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn origin(&self) -> Option<&TouchSample> {
        self.origin.as_ref()
    }

    /// Milliseconds between the first and the newest sample
    pub fn elapsed_ms(&self) -> f64 {
        match (self.origin, self.latest) {
            (Some(origin), Some(latest)) => (latest.t - origin.t).max(0.0),
            _ => 0.0,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Projected endpoint of a gesture and how much to trust it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Projected resting x in gesture coordinates
    pub x: f64,
    /// Projected resting y in gesture coordinates
    pub y: f64,
    /// 0.0 to 1.0
    pub confidence: f64,
    /// Remaining travel from the last sample
    pub dx: f64,
    pub dy: f64,
    /// Predicted time until the gesture comes to rest
    pub duration_ms: f64,
    /// Smoothed velocity the projection was computed from
    pub velocity: Velocity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_between_samples() {
        let a = TouchSample::new(0.0, 0.0, 0.0);
        let b = TouchSample::new(100.0, 0.0, 100.0);

        let v = a.velocity_to(&b).unwrap();
        assert_eq!(v.vx, 1000.0); // 100 px / 0.1 s
        assert_eq!(v.vy, 0.0);
        assert_eq!(v.speed(), 1000.0);
    }

    #[test]
    fn zero_or_negative_dt_has_no_velocity() {
        let a = TouchSample::new(0.0, 0.0, 16.0);
        assert!(a.velocity_to(&TouchSample::new(5.0, 0.0, 16.0)).is_none());
        assert!(a.velocity_to(&TouchSample::new(5.0, 0.0, 8.0)).is_none());
        assert!(a.velocity_to(&TouchSample::new(5.0, 0.0, f64::NAN)).is_none());
    }

    #[test]
    fn blend_weights_previous_value() {
        let prev = Velocity::new(100.0, 0.0);
        let next = prev.blend(Velocity::new(200.0, 40.0), 0.25);
        assert!((next.vx - 175.0).abs() < 1e-9);
        assert!((next.vy - 30.0).abs() < 1e-9);
    }

    #[test]
    fn path_tracks_whole_gesture() {
        let mut path = GesturePath::default();
        assert_eq!(path.elapsed_ms(), 0.0);
        assert_eq!(path.net_displacement(), 0.0);

        path.extend(TouchSample::new(0.0, 0.0, 10.0));
        path.extend(TouchSample::new(3.0, 4.0, 20.0));
        path.extend(TouchSample::new(0.0, 0.0, 30.0));

        assert_eq!(path.samples(), 3);
        assert_eq!(path.length(), 10.0);
        assert_eq!(path.net_displacement(), 0.0);
        assert_eq!(path.elapsed_ms(), 20.0);

        path.clear();
        assert_eq!(path, GesturePath::default());
        assert!(path.origin().is_none());
    }

    #[test]
    fn distance_between_samples() {
        let a = TouchSample::new(3.0, 4.0, 0.0);
        let b = TouchSample::new(6.0, 8.0, 1.0);
        assert_eq!(a.distance_to(&b), 5.0);
    }
}
