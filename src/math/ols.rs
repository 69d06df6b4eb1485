//! Least-squares solvers.
//!
//! Two flavors are used in this project:
//!
//! - [`solve_least_squares`]: a general SVD-based solve for the linearized
//!   subproblems of the Gaussian profile fit (tall design matrices)
//! - [`linear_regression`]: the closed-form pixel-to-wavelength regression
//!   with standard errors propagated from the residuals

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
/// (Nalgebra's `QR::solve` is intended for square systems and will panic for
/// non-square matrices, so SVD it is; the parameter dimension here is tiny.)
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if the strict solve fails. The
    // damped Gauss-Newton steps can produce near-singular systems when the
    // profile is almost flat.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Ordinary least-squares line fit `y = slope·x + intercept`.
#[derive(Debug, Clone, Copy)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    /// Standard error of the slope (0 without residual degrees of freedom).
    pub slope_stderr: f64,
    /// Standard error of the intercept.
    pub intercept_stderr: f64,
}

/// Fit a straight line through `(x_i, y_i)` and propagate standard errors
/// from the regression residuals.
///
/// This is a direct closed-form computation with no failure mode beyond
/// degenerate input: `None` is returned when fewer than two points are given,
/// the lengths differ, or the x-values carry no variance.
pub fn linear_regression(x: &[f64], y: &[f64]) -> Option<LineFit> {
    let n = x.len();
    if n < 2 || y.len() != n {
        return None;
    }

    let nf = n as f64;
    let x_mean = x.iter().sum::<f64>() / nf;
    let y_mean = y.iter().sum::<f64>() / nf;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - x_mean;
        sxx += dx * dx;
        sxy += dx * (yi - y_mean);
    }
    if sxx <= 0.0 || !sxx.is_finite() {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    // Residual variance with n-2 degrees of freedom; a two-point fit is
    // exact and gets zero standard errors.
    let (slope_stderr, intercept_stderr) = if n > 2 {
        let sse: f64 = x
            .iter()
            .zip(y.iter())
            .map(|(&xi, &yi)| {
                let r = yi - (slope * xi + intercept);
                r * r
            })
            .sum();
        let s2 = sse / (nf - 2.0);
        let se_slope = (s2 / sxx).sqrt();
        let mean_sq = x.iter().map(|&xi| xi * xi).sum::<f64>() / nf;
        (se_slope, se_slope * mean_sq.sqrt())
    } else {
        (0.0, 0.0)
    };

    Some(LineFit {
        slope,
        intercept,
        slope_stderr,
        intercept_stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn regression_on_exact_line_has_zero_stderr() {
        let x = [50.0, 60.0, 70.5, 90.0, 120.0];
        let y: Vec<f64> = x.iter().map(|&xi| 0.34 * xi + 760.0).collect();

        let fit = linear_regression(&x, &y).unwrap();
        assert!((fit.slope - 0.34).abs() < 1e-10);
        assert!((fit.intercept - 760.0).abs() < 1e-8);
        assert!(fit.slope_stderr.abs() < 1e-8);
        assert!(fit.intercept_stderr.abs() < 1e-6);
    }

    #[test]
    fn regression_with_scatter_reports_positive_stderr() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [1.1, 1.9, 3.2, 3.8, 5.1];

        let fit = linear_regression(&x, &y).unwrap();
        assert!(fit.slope > 0.9 && fit.slope < 1.1);
        assert!(fit.slope_stderr > 0.0);
        assert!(fit.intercept_stderr > 0.0);
    }

    #[test]
    fn regression_rejects_degenerate_input() {
        assert!(linear_regression(&[1.0], &[2.0]).is_none());
        assert!(linear_regression(&[1.0, 1.0], &[2.0, 3.0]).is_none());
        assert!(linear_regression(&[1.0, 2.0], &[2.0]).is_none());
    }
}
