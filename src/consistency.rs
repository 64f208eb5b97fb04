use crate::error::Result;

/// Statistical consistency checks used to tune noise parameters.
pub trait Consistency {
    type Params;
    type Measurement;
    type GroundTruth;

    /// Normalized innovation squared of `z` against a predicted state.
    fn NIS(&self, eststate: &Self::Params, z: &Self::Measurement) -> Result<f64>;

    /// Normalized estimation error squared against the true state.
    fn NEES(&self, eststate: &Self::Params, x_gt: &Self::GroundTruth) -> Result<f64>;
}
