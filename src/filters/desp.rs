use super::Filter;

/// Double exponential smoothing-based prediction.
///
/// Two cascaded exponential averages `s1`, `s2` are combined into an
/// extrapolation `tau` samples ahead of the double-smoothed trend:
///
/// ```text
/// s1 <- alpha * x  + (1 - alpha) * s1
/// s2 <- alpha * s1 + (1 - alpha) * s2
/// k   = alpha * tau / (1 - alpha)
/// y   = (2 + k) * s1 - (1 + k) * s2
/// ```
#[derive(Debug, Clone)]
pub struct DESPFilter {
    pub alpha: f64,
    pub tau: f64,
    s1: Option<f64>,
    s2: Option<f64>,
}

impl DESPFilter {
    pub fn new(alpha: f64, tau: f64) -> Self {
        DESPFilter {
            alpha,
            tau,
            s1: None,
            s2: None,
        }
    }

    fn lead(&self) -> f64 {
        self.alpha * self.tau / (1.0 - self.alpha)
    }
}

impl Filter for DESPFilter {
    fn filter(&mut self, x: f64, _timestamp: Option<f64>) -> f64 {
        let a = self.alpha;
        let s1 = match self.s1 {
            None => x,
            Some(s1) => a * x + (1.0 - a) * s1,
        };
        // s2 is seeded with the already updated s1
        let s2 = match self.s2 {
            None => s1,
            Some(s2) => a * s1 + (1.0 - a) * s2,
        };
        self.s1 = Some(s1);
        self.s2 = Some(s2);

        let k = self.lead();
        (2.0 + k) * s1 - (1.0 + k) * s2
    }
}
