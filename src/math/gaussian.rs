//! Gaussian-plus-offset model fit.
//!
//! The spatial profile of the illuminated line is modeled as
//!
//! ```text
//! f(x) = ymax · exp(-((x - x0) / sigma)^2) + c
//! ```
//!
//! and fitted by damped Gauss-Newton (Levenberg-Marquardt). Each iteration
//! solves a linearized least-squares subproblem; damping rows scaled by
//! `sqrt(λ · diag(JᵀJ))` are appended so the step degrades toward gradient
//! descent when the linearization is poor.

use nalgebra::{DMatrix, DVector};

use crate::math::ols::solve_least_squares;

/// Parameters of the Gaussian-plus-offset model, in fit order.
#[derive(Debug, Clone, Copy)]
pub struct GaussianParams {
    pub x0: f64,
    pub ymax: f64,
    pub sigma: f64,
    pub c: f64,
}

const MAX_ITERATIONS: usize = 200;
const STEP_TOLERANCE: f64 = 1e-10;
const LAMBDA_INIT: f64 = 1e-3;
const LAMBDA_UP: f64 = 10.0;
const LAMBDA_DOWN: f64 = 0.1;
const LAMBDA_MAX: f64 = 1e12;

/// Evaluate the model at `x`.
pub fn gaussian_offset(x: f64, p: &GaussianParams) -> f64 {
    let u = (x - p.x0) / p.sigma;
    p.ymax * (-u * u).exp() + p.c
}

/// Fit the model to samples `(i, y_i)` starting from `guess`.
///
/// Returns `None` when the optimizer fails to converge within the iteration
/// budget or the damping saturates. The caller decides how to surface that
/// (the pipeline maps it to `FitDivergence`); no default parameters are ever
/// substituted.
pub fn fit_gaussian_offset(y: &[f64], guess: GaussianParams) -> Option<GaussianParams> {
    if y.len() < 4 {
        return None;
    }

    let mut p = guess;
    if !p.sigma.is_finite() || p.sigma.abs() < 1e-6 {
        p.sigma = 1.0;
    }

    let mut lambda = LAMBDA_INIT;
    let mut sse = sum_sq_residuals(y, &p)?;

    for _ in 0..MAX_ITERATIONS {
        let (jac, res) = jacobian_and_residuals(y, &p)?;

        let Some(delta) = lm_step(&jac, &res, lambda) else {
            lambda *= LAMBDA_UP;
            if lambda > LAMBDA_MAX {
                return None;
            }
            continue;
        };

        let trial = GaussianParams {
            x0: p.x0 + delta[0],
            ymax: p.ymax + delta[1],
            sigma: p.sigma + delta[2],
            c: p.c + delta[3],
        };

        match sum_sq_residuals(y, &trial) {
            Some(trial_sse) if trial_sse <= sse => {
                let step = delta.norm();
                let p_norm =
                    (p.x0 * p.x0 + p.ymax * p.ymax + p.sigma * p.sigma + p.c * p.c).sqrt();
                let improved = sse - trial_sse;

                p = trial;
                sse = trial_sse;
                lambda = (lambda * LAMBDA_DOWN).max(1e-12);

                if step <= STEP_TOLERANCE * (1.0 + p_norm) || improved <= 1e-12 * (sse + 1e-12) {
                    return Some(p);
                }
            }
            _ => {
                lambda *= LAMBDA_UP;
                if lambda > LAMBDA_MAX {
                    return None;
                }
            }
        }
    }

    None
}

fn sum_sq_residuals(y: &[f64], p: &GaussianParams) -> Option<f64> {
    if p.sigma.abs() < 1e-12 {
        return None;
    }
    let mut sse = 0.0;
    for (i, &yi) in y.iter().enumerate() {
        let r = yi - gaussian_offset(i as f64, p);
        sse += r * r;
    }
    if sse.is_finite() { Some(sse) } else { None }
}

fn jacobian_and_residuals(y: &[f64], p: &GaussianParams) -> Option<(DMatrix<f64>, DVector<f64>)> {
    if p.sigma.abs() < 1e-12 {
        return None;
    }

    let n = y.len();
    let mut jac = DMatrix::<f64>::zeros(n, 4);
    let mut res = DVector::<f64>::zeros(n);

    for (i, &yi) in y.iter().enumerate() {
        let x = i as f64;
        let u = (x - p.x0) / p.sigma;
        let e = (-u * u).exp();

        jac[(i, 0)] = p.ymax * e * 2.0 * u / p.sigma;
        jac[(i, 1)] = e;
        jac[(i, 2)] = p.ymax * e * 2.0 * u * u / p.sigma;
        jac[(i, 3)] = 1.0;

        let r = yi - (p.ymax * e + p.c);
        if !r.is_finite() {
            return None;
        }
        res[i] = r;
    }

    Some((jac, res))
}

/// One damped step: solve the augmented system `[J; sqrt(λ·diag(JᵀJ))] δ = [r; 0]`.
fn lm_step(jac: &DMatrix<f64>, res: &DVector<f64>, lambda: f64) -> Option<DVector<f64>> {
    let n = jac.nrows();
    let m = jac.ncols();

    let mut a = DMatrix::<f64>::zeros(n + m, m);
    let mut b = DVector::<f64>::zeros(n + m);
    a.view_mut((0, 0), (n, m)).copy_from(jac);
    b.rows_mut(0, n).copy_from(res);

    for k in 0..m {
        let d = jac.column(k).norm_squared();
        a[(n + k, k)] = (lambda * d.max(1e-12)).sqrt();
    }

    solve_least_squares(&a, &b)
}
