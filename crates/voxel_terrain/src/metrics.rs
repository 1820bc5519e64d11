//! Engine-agnostic timing and throughput counters for chunk generation.
//!
//! # Usage
//!
//! ```ignore
//! let metrics = loader.scheduler().metrics();
//! println!(
//!     "{} chunks, avg {:.0}us",
//!     metrics.completed,
//!     metrics.avg_extraction_us()
//! );
//! ```

use std::collections::VecDeque;

/// Rolling window for storing recent values (e.g., timing history).
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// Create a new rolling window with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new value, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    /// Get the number of values in the window.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the window is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear all values.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Iterate over values (oldest to newest).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    /// Get the most recent value.
    pub fn last(&self) -> Option<&T> {
        self.buffer.back()
    }
}

impl<T: Copy + Default + std::ops::Add<Output = T>> RollingWindow<T> {
    /// Compute the sum of all values.
    pub fn sum(&self) -> T {
        self.buffer.iter().copied().fold(T::default(), |acc, x| acc + x)
    }
}

impl RollingWindow<u64> {
    /// Compute the average of all values.
    pub fn average(&self) -> f64 {
        if self.buffer.is_empty() {
            0.0
        } else {
            self.sum() as f64 / self.buffer.len() as f64
        }
    }

    /// Get min and max values.
    pub fn min_max(&self) -> Option<(u64, u64)> {
        let min = self.buffer.iter().min()?;
        let max = self.buffer.iter().max()?;
        Some((*min, *max))
    }
}

impl Default for RollingWindow<u64> {
    fn default() -> Self {
        Self::new(128) // ~2 seconds of completions at 60fps
    }
}

/// Scheduler-level counters. Totals are cumulative for the scheduler's
/// lifetime; timings keep the most recent window.
#[derive(Debug, Clone, Default)]
pub struct SchedulerMetrics {
    /// Extraction time per completed job in microseconds.
    pub extraction_us: RollingWindow<u64>,
    /// Jobs handed to a worker.
    pub dispatched: u64,
    /// Completions returned to the caller.
    pub completed: u64,
    /// Completions dropped because their job was cancelled.
    pub discarded: u64,
    /// Requests refused because the queue was full.
    pub deferred: u64,
    /// Queued or running jobs cancelled.
    pub cancelled: u64,
    /// Triangles across all returned meshes.
    pub triangles: u64,
}

impl SchedulerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completion that will be handed to the caller.
    pub fn record_completion(&mut self, elapsed_us: u64, triangles: usize) {
        self.extraction_us.push(elapsed_us);
        self.completed += 1;
        self.triangles += triangles as u64;
    }

    /// Get average extraction timing in microseconds.
    pub fn avg_extraction_us(&self) -> f64 {
        self.extraction_us.average()
    }

    /// Get the most recent extraction timing in microseconds.
    pub fn last_extraction_us(&self) -> u64 {
        self.extraction_us.last().copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_window() {
        let mut window = RollingWindow::new(3);
        assert!(window.is_empty());
        assert_eq!(window.min_max(), None);

        window.push(10u64);
        window.push(20);
        window.push(30);
        assert_eq!(window.len(), 3);
        assert_eq!(window.sum(), 60);
        assert_eq!(window.average(), 20.0);

        // Push one more, oldest should be evicted
        window.push(40);
        assert_eq!(window.len(), 3);
        assert_eq!(window.sum(), 90);
        assert_eq!(window.average(), 30.0);
        assert_eq!(window.min_max(), Some((20, 40)));
    }

    #[test]
    fn test_zero_capacity_window_stays_empty() {
        let mut window = RollingWindow::new(0);
        window.push(5u64);
        assert!(window.is_empty());
    }

    #[test]
    fn test_completion_recording() {
        let mut metrics = SchedulerMetrics::new();

        metrics.record_completion(1000, 10);
        metrics.record_completion(2000, 0);
        metrics.record_completion(3000, 5);

        assert_eq!(metrics.completed, 3);
        assert_eq!(metrics.triangles, 15);
        assert_eq!(metrics.avg_extraction_us(), 2000.0);
        assert_eq!(metrics.last_extraction_us(), 3000);
    }
}
