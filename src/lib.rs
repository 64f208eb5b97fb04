#![allow(non_snake_case)]
//! Causal, constant-memory smoothing filters for noisy scalar streams such as
//! tracked landmark coordinates.

pub mod consistency;
pub mod error;
pub mod filters;
pub mod landmarks;
pub mod registry;
pub mod simulator;
pub mod state_estimator;
pub mod statistics;

pub use error::{FilterError, Result};
pub use filters::{
    Aggregator, DESPFilter, DoubleExponentialFilter, Filter, MovingWindowFilter, OneEuroFilter,
    SingleExponentialFilter, Variant,
};
pub use landmarks::{HandSmoother, Handedness, LandmarkSmoother, Point3};
pub use registry::{AnyFilter, FilterConfig, FilterDescriptor, FilterKind, ParameterDescriptor};
pub use state_estimator::{ConstantValueKalmanFilter, GaussParams, LinearKalmanFilter, StateEstimator};
