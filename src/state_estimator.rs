pub mod constant_value;
pub mod kalman;

use crate::error::Result;

pub use constant_value::ConstantValueKalmanFilter;
pub use kalman::{GaussParams, LinearKalmanFilter};

pub trait StateEstimator {
    type Params;
    type Control;
    type Measurement;

    fn predict(&self, eststate: &Self::Params, u: &Self::Control) -> Result<Self::Params>;

    fn update(&self, z: &Self::Measurement, eststate: &Self::Params) -> Result<Self::Params>;
}
