//! Closed-form ordinary least squares for straight lines.
//!
//! Card segments are fitted with the textbook normal-equation solution over the
//! running sums Σx, Σy, Σx², Σxy:
//!
//! ```text
//! slope     = (n·Σxy − Σx·Σy)   / (n·Σx² − (Σx)²)
//! intercept = (Σx²·Σy − Σx·Σxy) / (n·Σx² − (Σx)²)
//! ```
//!
//! The fit error is the mean squared vertical residual over the same points.

use crate::domain::{FittedLine, Point};
use crate::error::CardError;

/// Relative tolerance on the normal-equation denominator.
const DENOMINATOR_RTOL: f64 = 1e-12;

/// Fit `y = slope * x + intercept` to `points`.
///
/// Fails when there are no points, when every x is the same (the line is
/// vertical in this parameterization) or when the result is not finite.
pub fn fit_line(points: &[Point]) -> Result<FittedLine, CardError> {
    if points.is_empty() {
        return Err(CardError::DegenerateFit("no points to fit".to_string()));
    }

    let n = points.len() as f64;
    let (mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0);
    for p in points {
        sx += p.x;
        sy += p.y;
        sxx += p.x * p.x;
        sxy += p.x * p.y;
    }

    let denom = n * sxx - sx * sx;
    if !denom.is_finite() || denom.abs() <= DENOMINATOR_RTOL * (n * sxx) {
        return Err(CardError::DegenerateFit(format!(
            "x values have no spread over {} point(s)",
            points.len()
        )));
    }

    let slope = (n * sxy - sx * sy) / denom;
    let intercept = (sxx * sy - sx * sxy) / denom;

    let fit_error = points
        .iter()
        .map(|p| {
            let r = slope * p.x + intercept - p.y;
            r * r
        })
        .sum::<f64>()
        / n;

    if !(slope.is_finite() && intercept.is_finite() && fit_error.is_finite()) {
        return Err(CardError::DegenerateFit("non-finite regression result".to_string()));
    }

    Ok(FittedLine {
        slope,
        intercept,
        fit_error,
    })
}

/// Fit `x = slope * y + intercept`, i.e. the regression with axes swapped.
///
/// Near-vertical data is well conditioned in this form.
pub fn fit_inverse_line(points: &[Point]) -> Result<FittedLine, CardError> {
    let swapped: Vec<Point> = points.iter().map(Point::transposed).collect();
    fit_line(&swapped)
}
