//! Trailing moving average
//!
//! Keeps the most recent `window_size` samples. Until the window fills up,
//! the average covers every sample seen so far (growing window).

use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// Trailing mean over a bounded window of samples
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window_size: usize,
    samples: VecDeque<f64>,
}

impl MovingAverage {
    /// Create a moving average over `window_size` samples
    ///
    /// The buffer grows with the samples pushed, so a window larger than
    /// the input costs nothing up front.
    pub fn new(window_size: NonZeroUsize) -> Self {
        Self {
            window_size: window_size.get(),
            samples: VecDeque::new(),
        }
    }

    /// Add a sample and return the mean of the window ending at it
    pub fn push(&mut self, value: f64) -> f64 {
        if self.samples.len() == self.window_size {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
        self.mean()
    }

    /// Mean of the samples currently in the window
    ///
    /// The sum is taken over the window each time so that rounding error
    /// does not carry over between records.
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }
}
