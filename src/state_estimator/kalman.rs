use super::StateEstimator;
use crate::consistency::Consistency;
use crate::error::{FilterError, Result};
use nalgebra::{DMatrix, DVector};

#[derive(Debug, Clone, PartialEq)]
pub struct GaussParams {
    pub x: DVector<f64>,
    pub P: DMatrix<f64>,
}

impl GaussParams {
    pub fn new(x: DVector<f64>, P: DMatrix<f64>) -> Self {
        GaussParams { x, P }
    }
}

/// Discrete linear-Gaussian filter.
///
/// With `n` states, `m` controls and `k` rows in `H`:
/// `A` is n×n, `B` n×m, `H` k×n, `Q` n×n, `R` k×k.
///
/// The measurement is mapped through `H` and differenced against the
/// predicted *state*, `y = H·z - x⁻`, so a working model has `k == n` and
/// measurements of length `n`.
#[derive(Debug, Clone)]
pub struct LinearKalmanFilter {
    A: DMatrix<f64>,
    B: DMatrix<f64>,
    H: DMatrix<f64>,
    Q: DMatrix<f64>,
    R: DMatrix<f64>,
    state: GaussParams,
}

fn check_dim(context: &str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(FilterError::DimensionMismatch {
            context: context.to_string(),
            expected,
            actual,
        })
    }
}

fn check_shape(operation: &'static str, left: (usize, usize), right: (usize, usize)) -> Result<()> {
    if left.1 == right.0 {
        Ok(())
    } else {
        Err(FilterError::Shape {
            operation,
            left,
            right,
        })
    }
}

fn column(v: &DVector<f64>) -> (usize, usize) {
    (v.len(), 1)
}

impl LinearKalmanFilter {
    pub fn new(
        A: DMatrix<f64>,
        B: DMatrix<f64>,
        H: DMatrix<f64>,
        x: DVector<f64>,
        P: DMatrix<f64>,
        Q: DMatrix<f64>,
        R: DMatrix<f64>,
    ) -> Result<Self> {
        let n = x.len();
        let k = H.nrows();
        check_dim("rows of A", n, A.nrows())?;
        check_dim("columns of A", n, A.ncols())?;
        check_dim("rows of B", n, B.nrows())?;
        check_dim("columns of H", n, H.ncols())?;
        check_dim("rows of P", n, P.nrows())?;
        check_dim("columns of P", n, P.ncols())?;
        check_dim("rows of Q", n, Q.nrows())?;
        check_dim("columns of Q", n, Q.ncols())?;
        check_dim("rows of R", k, R.nrows())?;
        check_dim("columns of R", k, R.ncols())?;
        tracing::debug!(states = n, controls = B.ncols(), observations = k, "linear kalman filter");

        Ok(LinearKalmanFilter {
            A,
            B,
            H,
            Q,
            R,
            state: GaussParams::new(x, P),
        })
    }

    pub fn state(&self) -> &GaussParams {
        &self.state
    }

    /// Predict with control `u`, correct with measurement `z` and keep the
    /// result as the new state.
    pub fn step(&mut self, u: &DVector<f64>, z: &DVector<f64>) -> Result<&GaussParams> {
        let predicted = self.predict(&self.state, u)?;
        self.state = self.update(z, &predicted)?;
        Ok(&self.state)
    }

    /// Innovation `y = H·z - x⁻` and its covariance `S = H·P⁻·Hᵗ + R`.
    pub fn innovation(
        &self,
        eststate_pred: &GaussParams,
        z: &DVector<f64>,
    ) -> Result<(DVector<f64>, DMatrix<f64>)> {
        Self::check_params(eststate_pred)?;
        check_shape("H·x", self.H.shape(), column(&eststate_pred.x))?;
        check_shape("H·z", self.H.shape(), column(z))?;
        check_shape("H·P", self.H.shape(), eststate_pred.P.shape())?;
        let Hz = &self.H * z;
        if Hz.len() != eststate_pred.x.len() {
            return Err(FilterError::Shape {
                operation: "H·z - x",
                left: column(&Hz),
                right: column(&eststate_pred.x),
            });
        }
        let y = Hz - &eststate_pred.x;
        let S = &self.H * &eststate_pred.P * self.H.transpose() + &self.R;
        Ok((y, S))
    }

    /// `K = P⁻·Hᵗ·S⁻¹`.
    fn kalman_gain(&self, P_pred: &DMatrix<f64>, S: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        let PHt = P_pred * self.H.transpose();

        if S.shape() == (1, 1) {
            // Scalar pseudo-inverse, a zero innovation covariance carries no
            // information and yields a zero gain.
            let s = S[(0, 0)];
            let s_inv = if s == 0.0 { 0.0 } else { 1.0 / s };
            return Ok(PHt * s_inv);
        }

        // S is symmetric, so K = P⁻·Hᵗ·S⁻¹ solves S·Kᵗ = (P⁻·Hᵗ)ᵗ
        if let Some(chol) = S.clone().cholesky() {
            return Ok(chol.solve(&PHt.transpose()).transpose());
        }
        tracing::warn!(dim = S.nrows(), "innovation covariance not positive definite, using LU inverse");
        let S_inv = S.clone().try_inverse().ok_or_else(|| FilterError::SingularMatrix {
            context: format!("innovation covariance ({}x{})", S.nrows(), S.ncols()),
        })?;
        Ok(PHt * S_inv)
    }

    /// `P` must be square with one row per entry of `x`.
    fn check_params(eststate: &GaussParams) -> Result<()> {
        let n = eststate.x.len();
        if eststate.P.shape() == (n, n) {
            Ok(())
        } else {
            Err(FilterError::Shape {
                operation: "P against x",
                left: eststate.P.shape(),
                right: column(&eststate.x),
            })
        }
    }

    fn check_state(&self, eststate: &GaussParams) -> Result<()> {
        check_shape("A·x", self.A.shape(), column(&eststate.x))?;
        check_shape("A·P", self.A.shape(), eststate.P.shape())?;
        check_shape("P·Aᵗ", eststate.P.shape(), (self.A.ncols(), self.A.nrows()))
    }
}

impl StateEstimator for LinearKalmanFilter {
    type Params = GaussParams;
    type Control = DVector<f64>;
    type Measurement = DVector<f64>;

    fn predict(&self, eststate: &GaussParams, u: &DVector<f64>) -> Result<GaussParams> {
        self.check_state(eststate)?;
        check_shape("B·u", self.B.shape(), column(u))?;

        let x = &self.A * &eststate.x + &self.B * u;
        let P = &self.A * &eststate.P * self.A.transpose() + &self.Q;

        Ok(GaussParams::new(x, P))
    }

    fn update(&self, z: &DVector<f64>, eststate: &GaussParams) -> Result<GaussParams> {
        let (y, S) = self.innovation(eststate, z)?;
        let K = self.kalman_gain(&eststate.P, &S)?;

        let n = eststate.x.len();
        let I = DMatrix::<f64>::identity(n, n);

        let x = &eststate.x + &K * y;
        let P = (I - &K * &self.H) * &eststate.P;

        Ok(GaussParams::new(x, P))
    }
}

impl Consistency for LinearKalmanFilter {
    type Params = GaussParams;
    type Measurement = DVector<f64>;
    type GroundTruth = DVector<f64>;

    fn NIS(&self, eststate: &GaussParams, z: &DVector<f64>) -> Result<f64> {
        let (y, S) = self.innovation(eststate, z)?;
        let S_inv_y = S
            .cholesky()
            .ok_or_else(|| FilterError::SingularMatrix {
                context: "innovation covariance is not positive definite".to_string(),
            })?
            .solve(&y);
        Ok(y.dot(&S_inv_y))
    }

    fn NEES(&self, eststate: &GaussParams, x_gt: &DVector<f64>) -> Result<f64> {
        Self::check_params(eststate)?;
        if x_gt.len() != eststate.x.len() {
            return Err(FilterError::Shape {
                operation: "x - x_gt",
                left: column(&eststate.x),
                right: column(x_gt),
            });
        }
        let x_err = &eststate.x - x_gt;
        let P_inv_x_err = eststate
            .P
            .clone()
            .cholesky()
            .ok_or_else(|| FilterError::SingularMatrix {
                context: "state covariance is not positive definite".to_string(),
            })?
            .solve(&x_err);
        Ok(x_err.dot(&P_inv_x_err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(v: f64) -> DMatrix<f64> {
        DMatrix::from_element(1, 1, v)
    }

    fn constant_model(x0: f64, p: f64, q: f64, r: f64) -> LinearKalmanFilter {
        LinearKalmanFilter::new(
            scalar(1.),
            scalar(0.),
            DMatrix::identity(1, 1),
            DVector::from_element(1, x0),
            scalar(p),
            scalar(q),
            scalar(r),
        )
        .unwrap()
    }

    /// Two independent noisy constants, no control effect.
    fn diagonal_model() -> LinearKalmanFilter {
        LinearKalmanFilter::new(
            DMatrix::identity(2, 2),
            DMatrix::zeros(2, 1),
            DMatrix::identity(2, 2),
            DVector::from_row_slice(&[1., -1.]),
            DMatrix::identity(2, 2),
            DMatrix::zeros(2, 2),
            DMatrix::identity(2, 2),
        )
        .unwrap()
    }

    #[test]
    fn test_seeded_state_before_step() {
        let kf = diagonal_model();
        assert_eq!(kf.state().x, DVector::from_row_slice(&[1., -1.]));
    }

    #[test]
    fn test_scalar_step_by_hand() {
        let mut kf = constant_model(0., 1., 0., 1.);
        let u = DVector::zeros(1);
        let state = kf.step(&u, &DVector::from_element(1, 2.)).unwrap();
        // S = 2, K = 0.5
        assert!(state.x.relative_eq(&DVector::from_element(1, 1.), 1e-12, 1e-12));
        assert!(state.P.relative_eq(&scalar(0.5), 1e-12, 1e-12));
    }

    #[test]
    fn test_noise_free_constant_converges() {
        let mut kf = constant_model(0., 1., 0., 0.);
        let u = DVector::zeros(1);
        let z = DVector::from_element(1, 5.);
        let mut last_P = kf.state().P[(0, 0)];
        for _ in 0..20 {
            let state = kf.step(&u, &z).unwrap();
            let P = state.P[(0, 0)];
            assert!(state.x[0].is_finite());
            assert!(P <= last_P);
            last_P = P;
        }
        assert!((kf.state().x[0] - 5.).abs() < 1e-12);
    }

    #[test]
    fn test_zero_scalar_innovation_covariance() {
        let mut kf = constant_model(3., 0., 0., 0.);
        let u = DVector::zeros(1);
        let state = kf.step(&u, &DVector::from_element(1, 8.)).unwrap();
        assert_eq!(state.x[0], 3.);
        assert_eq!(state.P[(0, 0)], 0.);
    }

    #[test]
    fn test_matrix_step_by_hand() {
        let mut kf = diagonal_model();
        let u = DVector::zeros(1);
        let z = DVector::from_row_slice(&[3., 1.]);
        let state = kf.step(&u, &z).unwrap();
        // S = 2I, K = I/2
        let x_correct = DVector::from_row_slice(&[2., 0.]);
        let P_correct = DMatrix::identity(2, 2) * 0.5;
        assert!(x_correct.relative_eq(&state.x, 1e-12, 1e-12));
        assert!(P_correct.relative_eq(&state.P, 1e-12, 1e-12));
    }

    #[test]
    fn test_constant_velocity_with_control() {
        let dt = 0.1;
        let A = DMatrix::from_row_slice(2, 2, &[1., dt, 0., 1.]);
        let B = DMatrix::from_row_slice(2, 1, &[0.5 * dt * dt, dt]);
        let mut kf = LinearKalmanFilter::new(
            A,
            B,
            DMatrix::identity(2, 2),
            DVector::zeros(2),
            DMatrix::identity(2, 2),
            DMatrix::identity(2, 2) * 1e-4,
            DMatrix::identity(2, 2) * 1e-2,
        )
        .unwrap();
        let u = DVector::from_element(1, 0.);
        for k in 1..200 {
            let t = k as f64 * dt;
            kf.step(&u, &DVector::from_row_slice(&[2. * t, 2.])).unwrap();
        }
        let x = &kf.state().x;
        assert!((x[0] - 2. * 199. * dt).abs() < 0.05, "x = {}", x);
        assert!((x[1] - 2.).abs() < 0.05, "x = {}", x);
    }

    #[test]
    fn test_not_positive_definite_falls_back_to_lu() {
        let mut kf = LinearKalmanFilter::new(
            DMatrix::identity(2, 2),
            DMatrix::zeros(2, 1),
            DMatrix::identity(2, 2),
            DVector::zeros(2),
            DMatrix::zeros(2, 2),
            DMatrix::zeros(2, 2),
            DMatrix::from_diagonal(&DVector::from_row_slice(&[1., -1.])),
        )
        .unwrap();
        // P⁻ = 0 so the gain is zero whatever the inverse of S
        let state = kf.step(&DVector::zeros(1), &DVector::from_row_slice(&[4., 4.])).unwrap();
        assert_eq!(state.x, DVector::zeros(2));
    }

    #[test]
    fn test_singular_innovation_covariance() {
        let mut kf = LinearKalmanFilter::new(
            DMatrix::identity(2, 2),
            DMatrix::zeros(2, 1),
            DMatrix::identity(2, 2),
            DVector::zeros(2),
            DMatrix::zeros(2, 2),
            DMatrix::zeros(2, 2),
            DMatrix::zeros(2, 2),
        )
        .unwrap();
        let result = kf.step(&DVector::zeros(1), &DVector::zeros(2));
        assert!(matches!(result, Err(FilterError::SingularMatrix { .. })));
    }

    #[test]
    fn test_constructor_rejects_mismatched_model() {
        let result = LinearKalmanFilter::new(
            DMatrix::identity(2, 2),
            DMatrix::zeros(2, 1),
            DMatrix::identity(2, 2),
            DVector::zeros(2),
            DMatrix::identity(3, 3),
            DMatrix::zeros(2, 2),
            DMatrix::identity(2, 2),
        );
        assert_eq!(
            result.unwrap_err(),
            FilterError::DimensionMismatch {
                context: "rows of P".to_string(),
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_step_rejects_bad_operands() {
        let mut kf = diagonal_model();
        let before = kf.state().clone();

        let bad_control = kf.step(&DVector::zeros(3), &DVector::zeros(2));
        assert_eq!(
            bad_control.unwrap_err(),
            FilterError::Shape {
                operation: "B·u",
                left: (2, 1),
                right: (3, 1)
            }
        );
        let bad_measurement = kf.step(&DVector::zeros(1), &DVector::zeros(5));
        assert!(matches!(bad_measurement, Err(FilterError::Shape { operation: "H·z", .. })));
        assert_eq!(kf.state(), &before);
    }

    #[test]
    fn test_observation_rows_must_match_state() {
        let mut kf = LinearKalmanFilter::new(
            DMatrix::identity(2, 2),
            DMatrix::zeros(2, 1),
            DMatrix::from_row_slice(1, 2, &[1., 0.]),
            DVector::zeros(2),
            DMatrix::identity(2, 2),
            DMatrix::zeros(2, 2),
            scalar(1.),
        )
        .unwrap();
        let result = kf.step(&DVector::zeros(1), &DVector::zeros(2));
        assert!(matches!(result, Err(FilterError::Shape { operation: "H·z - x", .. })));
    }

    #[test]
    fn test_NIS_and_NEES() {
        let kf = diagonal_model();
        let eststate = kf.state().clone();
        // y = [2, 2], S = 2I
        let nis = kf.NIS(&eststate, &DVector::from_row_slice(&[3., 1.])).unwrap();
        assert!((nis - 4.).abs() < 1e-12);
        let nees = kf.NEES(&eststate, &DVector::from_row_slice(&[0., 0.])).unwrap();
        assert!((nees - 2.).abs() < 1e-12);
    }

    #[test]
    fn test_update_rejects_non_square_covariance() {
        let kf = diagonal_model();
        let eststate = GaussParams::new(DVector::zeros(2), DMatrix::identity(2, 3));
        let result = kf.update(&DVector::zeros(2), &eststate);
        assert_eq!(
            result.unwrap_err(),
            FilterError::Shape {
                operation: "P against x",
                left: (2, 3),
                right: (2, 1)
            }
        );
    }

    #[test]
    fn test_update_rejects_state_not_matching_H() {
        let kf = diagonal_model();
        let eststate = GaussParams::new(DVector::zeros(3), DMatrix::identity(3, 3));
        let result = kf.update(&DVector::zeros(2), &eststate);
        assert!(matches!(result, Err(FilterError::Shape { operation: "H·x", .. })));
    }

    #[test]
    fn test_NIS_and_NEES_reject_mismatched_covariance() {
        let kf = diagonal_model();
        let eststate = GaussParams::new(DVector::zeros(2), DMatrix::identity(3, 3));
        let nis = kf.NIS(&eststate, &DVector::zeros(2));
        assert!(matches!(nis, Err(FilterError::Shape { operation: "P against x", .. })));
        let nees = kf.NEES(&eststate, &DVector::zeros(2));
        assert!(matches!(nees, Err(FilterError::Shape { operation: "P against x", .. })));
    }
}
