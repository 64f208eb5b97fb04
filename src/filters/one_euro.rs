//! The [1€ filter]: a low-pass filter whose cutoff rises with the estimated
//! speed of the signal. Slow signals are smoothed hard, fast ones follow with
//! little lag.
//!
//! [1€ filter]: https://gery.casiez.net/1euro/

use super::exponential::{SingleExponentialFilter, Variant};
use super::Filter;
use std::f64::consts::PI;

#[derive(Debug, Clone)]
pub struct OneEuroFilter {
    freq: f64,
    pub mincutoff: f64,
    pub beta: f64,
    pub dcutoff: f64,
    x: SingleExponentialFilter,
    dx: SingleExponentialFilter,
    last_time: Option<f64>,
}

impl OneEuroFilter {
    /// - `freq`: sampling frequency in Hz, used until two timestamped samples
    ///   have been seen.
    /// - `mincutoff`: cutoff in Hz when the signal is at rest. Lower means
    ///   less jitter and more lag.
    /// - `beta`: how fast the cutoff grows with speed. Higher means less lag.
    /// - `dcutoff`: cutoff in Hz for the derivative estimate.
    pub fn new(freq: f64, mincutoff: f64, beta: f64, dcutoff: f64) -> Self {
        let mut filter = OneEuroFilter {
            freq,
            mincutoff,
            beta,
            dcutoff,
            x: SingleExponentialFilter::new(0.0, Variant::Lowpass),
            dx: SingleExponentialFilter::new(0.0, Variant::Lowpass),
            last_time: None,
        };
        filter.x.alpha = filter.alpha(mincutoff);
        filter.dx.alpha = filter.alpha(dcutoff);
        filter
    }

    /// Current sampling frequency estimate.
    pub fn freq(&self) -> f64 {
        self.freq
    }

    /// Smoothed derivative from the last call.
    pub fn derivative(&self) -> Option<f64> {
        self.dx.last_estimate()
    }

    /// Smoothing coefficient of a first-order low-pass with the given cutoff
    /// at the current sampling frequency.
    pub fn alpha(&self, cutoff: f64) -> f64 {
        let te = 1.0 / self.freq;
        let tau = 1.0 / (2.0 * PI * cutoff);
        1.0 / (1.0 + tau / te)
    }
}

impl Filter for OneEuroFilter {
    fn filter(&mut self, x: f64, timestamp: Option<f64>) -> f64 {
        if let (Some(last), Some(now)) = (self.last_time, timestamp) {
            if now <= last {
                tracing::warn!(last, now, "non-increasing timestamp, sampling frequency is no longer positive");
            }
            self.freq = 1.0 / (now - last);
        }
        self.last_time = timestamp;

        let dx = match self.x.last_x() {
            None => 0.0,
            Some(prev) => (x - prev) * self.freq,
        };
        self.dx.alpha = self.alpha(self.dcutoff);
        let edx = self.dx.filter(dx, None);

        let cutoff = self.mincutoff + self.beta * edx.abs();
        self.x.alpha = self.alpha(cutoff);
        tracing::trace!(freq = self.freq, edx, cutoff, "one euro step");
        self.x.filter(x, None)
    }
}
