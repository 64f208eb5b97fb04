use super::Filter;
use serde::{Deserialize, Serialize};

/// Recurrence used by [`SingleExponentialFilter`] once it has seen a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// `alpha * last_x + (1 - alpha) * last_estimate`: blends in the previous
    /// raw sample, so the estimate trails the input by one call.
    #[default]
    Predict,
    /// `alpha * x + (1 - alpha) * last_estimate`: plain exponential moving
    /// average of the current sample.
    Lowpass,
}

#[derive(Debug, Clone, Copy)]
struct Prev {
    x: f64,
    estimate: f64,
}

/// One-pole recursive smoother.
///
/// `alpha` is read on every call, owners may retune it between samples.
#[derive(Debug, Clone)]
pub struct SingleExponentialFilter {
    pub alpha: f64,
    variant: Variant,
    prev: Option<Prev>,
}

impl SingleExponentialFilter {
    pub fn new(alpha: f64, variant: Variant) -> Self {
        SingleExponentialFilter {
            alpha,
            variant,
            prev: None,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Raw sample seen on the previous call.
    pub fn last_x(&self) -> Option<f64> {
        self.prev.map(|p| p.x)
    }

    pub fn last_estimate(&self) -> Option<f64> {
        self.prev.map(|p| p.estimate)
    }
}

impl Filter for SingleExponentialFilter {
    fn filter(&mut self, x: f64, _timestamp: Option<f64>) -> f64 {
        let estimate = match self.prev {
            None => x,
            Some(prev) => match self.variant {
                Variant::Predict => self.alpha * prev.x + (1.0 - self.alpha) * prev.estimate,
                Variant::Lowpass => self.alpha * x + (1.0 - self.alpha) * prev.estimate,
            },
        };
        self.prev = Some(Prev { x, estimate });
        estimate
    }
}

/// Holt's linear trend smoother: level plus trend `b`.
#[derive(Debug, Clone)]
pub struct DoubleExponentialFilter {
    pub alpha: f64,
    pub gamma: f64,
    estimate: Option<f64>,
    b: f64,
}

impl DoubleExponentialFilter {
    pub fn new(alpha: f64, gamma: f64) -> Self {
        DoubleExponentialFilter {
            alpha,
            gamma,
            estimate: None,
            b: 0.0,
        }
    }

    pub fn trend(&self) -> f64 {
        self.b
    }
}

impl Filter for DoubleExponentialFilter {
    fn filter(&mut self, x: f64, _timestamp: Option<f64>) -> f64 {
        let s = match self.estimate {
            None => {
                self.b = 0.0;
                x
            }
            Some(last) => {
                let s = self.alpha * x + (1.0 - self.alpha) * (last + self.b);
                self.b = self.gamma * (s - last) + (1.0 - self.gamma) * self.b;
                s
            }
        };
        self.estimate = Some(s);
        s
    }
}
