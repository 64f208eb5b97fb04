use super::kalman::LinearKalmanFilter;
use crate::filters::Filter;
use nalgebra::{DMatrix, DVector};

#[derive(Debug, Clone)]
enum Stage {
    Uninitialized,
    Running(LinearKalmanFilter),
}

/// Kalman filter for a noisy scalar constant (`A = [1]`, `B = [0]`,
/// `H = [1]`).
///
/// The inner filter is built from the first sample, which is returned
/// unfiltered.
#[derive(Debug, Clone)]
pub struct ConstantValueKalmanFilter {
    /// Initial error covariance.
    pub p: f64,
    /// Process noise covariance.
    pub q: f64,
    /// Measurement noise covariance.
    pub r: f64,
    control: DVector<f64>,
    stage: Stage,
}

impl ConstantValueKalmanFilter {
    pub fn new(p: f64, q: f64, r: f64) -> Self {
        ConstantValueKalmanFilter {
            p,
            q,
            r,
            control: DVector::zeros(1),
            stage: Stage::Uninitialized,
        }
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.stage, Stage::Running(_))
    }

    /// Current error covariance, once running.
    pub fn covariance(&self) -> Option<f64> {
        match &self.stage {
            Stage::Uninitialized => None,
            Stage::Running(kf) => Some(kf.state().P[(0, 0)]),
        }
    }

    fn start(&self, x: f64) -> LinearKalmanFilter {
        let scalar = |v: f64| DMatrix::from_element(1, 1, v);
        LinearKalmanFilter::new(
            scalar(1.),
            scalar(0.),
            DMatrix::identity(1, 1),
            DVector::from_element(1, x),
            scalar(self.p),
            scalar(self.q),
            scalar(self.r),
        )
        .expect("1x1 model is always conformable")
    }
}

impl Filter for ConstantValueKalmanFilter {
    fn filter(&mut self, x: f64, _timestamp: Option<f64>) -> f64 {
        match &mut self.stage {
            Stage::Uninitialized => {
                tracing::debug!(x, p = self.p, q = self.q, r = self.r, "constant value kalman filter started");
                self.stage = Stage::Running(self.start(x));
                x
            }
            Stage::Running(kf) => {
                let z = DVector::from_element(1, x);
                kf.step(&self.control, &z)
                    .expect("1x1 model takes the scalar gain path")
                    .x[0]
            }
        }
    }
}
