use super::Filter;
use crate::error::{FilterError, Result};
use crate::statistics;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Statistic computed over the window on every sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregator {
    #[default]
    Mean,
    Median,
}

impl Aggregator {
    pub fn apply(self, window: &[f64]) -> f64 {
        match self {
            Aggregator::Mean => statistics::mean(window),
            Aggregator::Median => statistics::median(window),
        }
    }
}

/// Aggregate over the last `window_size` raw samples.
#[derive(Debug, Clone)]
pub struct MovingWindowFilter {
    window_size: usize,
    aggregator: Aggregator,
    window: VecDeque<f64>,
}

impl MovingWindowFilter {
    pub fn new(window_size: usize) -> Result<Self> {
        if window_size < 1 {
            return Err(FilterError::Configuration {
                context: format!("window size must be at least 1, got {}", window_size),
            });
        }
        Ok(MovingWindowFilter {
            window_size,
            aggregator: Aggregator::default(),
            window: VecDeque::with_capacity(window_size),
        })
    }

    pub fn with_aggregator(self, aggregator: Aggregator) -> Self {
        MovingWindowFilter { aggregator, ..self }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Buffered samples, oldest first.
    pub fn window(&self) -> impl Iterator<Item = f64> + '_ {
        self.window.iter().copied()
    }
}

impl Filter for MovingWindowFilter {
    fn filter(&mut self, x: f64, _timestamp: Option<f64>) -> f64 {
        if self.window.len() == self.window_size {
            self.window.pop_front();
        }
        self.window.push_back(x);
        self.aggregator.apply(self.window.make_contiguous())
    }
}
