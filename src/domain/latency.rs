use std::collections::VecDeque;

/// Number of samples retained for the rolling average
pub const WINDOW_CAPACITY: usize = 100;

/// Bounded FIFO window of latency samples in milliseconds
#[derive(Debug, Clone)]
pub struct LatencyWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl LatencyWindow {
    pub fn new() -> Self {
        Self::with_capacity(WINDOW_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest once at capacity
    pub fn record(&mut self, sample: f64) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Arithmetic mean of the retained samples, rounded to 2 decimal places.
    /// Returns `None` when no samples have been recorded yet.
    pub fn average(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: f64 = self.samples.iter().sum();
        Some(round2(sum / self.samples.len() as f64))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for LatencyWindow {
    fn default() -> Self {
        Self::new()
    }
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_of_three() {
        let mut window = LatencyWindow::new();
        for sample in [10.0, 20.0, 30.0] {
            window.record(sample);
        }
        assert_eq!(window.average(), Some(20.0));
    }

    #[test]
    fn test_empty_window_has_no_average() {
        let window = LatencyWindow::new();
        assert_eq!(window.average(), None);
        assert!(window.is_empty());
    }

    #[test]
    fn test_eviction_beyond_capacity() {
        let mut window = LatencyWindow::new();
        for i in 0..250 {
            window.record(i as f64);
        }
        assert_eq!(window.len(), WINDOW_CAPACITY);
        // Retained samples are 150..=249, mean 199.5
        assert_eq!(window.average(), Some(199.5));
    }

    #[test]
    fn test_average_rounds_to_two_decimals() {
        let mut window = LatencyWindow::new();
        window.record(1.0);
        window.record(2.0);
        window.record(2.0);
        // 5/3 = 1.666...
        assert_eq!(window.average(), Some(1.67));
    }
}
