pub mod desp;
pub mod exponential;
pub mod moving_window;
pub mod one_euro;

pub use desp::DESPFilter;
pub use exponential::{DoubleExponentialFilter, SingleExponentialFilter, Variant};
pub use moving_window::{Aggregator, MovingWindowFilter};
pub use one_euro::OneEuroFilter;

/// Causal per-sample smoother.
///
/// Each call consumes one raw sample and returns the estimate for it. The
/// first call on a fresh instance returns a value derived only from that
/// sample. `timestamp` is in seconds and only read by filters that track the
/// sampling rate.
pub trait Filter {
    fn filter(&mut self, x: f64, timestamp: Option<f64>) -> f64;
}
