//! Rolling touch-sample buffer for one gesture
//!
//! Fixed capacity; the oldest sample is overwritten when full.

use super::types::TouchSample;

/// Minimum number of samples needed to estimate velocity
pub const MIN_BUFFER_SIZE: usize = 2;

/// Upper bound on per-gesture capacity (~2s at 120Hz)
pub const MAX_BUFFER_SIZE: usize = 256;

/// Rolling buffer that keeps the most recent samples in chronological order
#[derive(Debug, Clone)]
pub struct PointBuffer {
    /// Circular storage, allocated once at construction
    data: Vec<TouchSample>,

    /// Slot holding the oldest sample
    head: usize,

    /// Number of valid samples
    len: usize,
}

impl PointBuffer {
    /// Capacity is clamped into `MIN_BUFFER_SIZE..=MAX_BUFFER_SIZE`
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.clamp(MIN_BUFFER_SIZE, MAX_BUFFER_SIZE);
        Self {
            data: vec![TouchSample::default(); capacity],
            head: 0,
            len: 0,
        }
    }

    /// Append a sample, evicting the oldest one at capacity
    pub fn push(&mut self, sample: TouchSample) {
        let capacity = self.data.len();
        let write_index = (self.head + self.len) % capacity;
        self.data[write_index] = sample;

        if self.len == capacity {
            self.head = (self.head + 1) % capacity;
        } else {
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Sample at chronological position `i` (0 = oldest)
    pub fn get(&self, i: usize) -> Option<&TouchSample> {
        if i >= self.len {
            return None;
        }
        Some(&self.data[(self.head + i) % self.data.len()])
    }

    pub fn first(&self) -> Option<&TouchSample> {
        self.get(0)
    }

    pub fn last(&self) -> Option<&TouchSample> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Samples oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TouchSample> + '_ {
        (0..self.len).map(move |i| &self.data[(self.head + i) % self.data.len()])
    }

    /// The `n` most recent samples, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &TouchSample> + '_ {
        self.iter().skip(self.len.saturating_sub(n))
    }

    /// Clear the buffer (start of a new gesture)
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}

impl Default for PointBuffer {
    fn default() -> Self {
        Self::with_capacity(MAX_BUFFER_SIZE)
    }
}
