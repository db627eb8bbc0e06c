// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Least-squares polynomial fitting.
//!
//! High-order polynomials in raw frequency units are horribly conditioned
//! (e.g. 1700^9 ~ 1e29), so the abscissa is mapped onto [-1, 1] before the
//! Vandermonde matrix is made. The space of polynomials is the same, so the fit
//! is too; only the coefficients' basis differs.

use nalgebra::{DMatrix, DVector};

use super::FitError;

/// Singular values smaller than this (relative to the largest) make the fit
/// rank deficient.
const RANK_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    /// Coefficients in increasing power of the scaled variable
    /// `t = (x - centre) / half_width`.
    coeffs: Vec<f64>,
    centre: f64,
    half_width: f64,
}

impl Polynomial {
    /// Fit a polynomial of the given degree to the points with linear least
    /// squares.
    pub fn fit(x: &[f64], y: &[f64], degree: usize) -> Result<Polynomial, FitError> {
        if x.len() != y.len() {
            return Err(FitError::LengthMismatch {
                num_x: x.len(),
                num_y: y.len(),
            });
        }
        if degree == 0 {
            return Err(FitError::ZeroDegree(degree));
        }
        if degree >= x.len() {
            return Err(FitError::DegreeTooLarge {
                degree,
                num_points: x.len(),
            });
        }

        let (min, max) = x
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &x| {
                (min.min(x), max.max(x))
            });
        let centre = (min + max) / 2.0;
        let half_width = (max - min) / 2.0;
        if half_width <= 0.0 {
            return Err(FitError::RankDeficient {
                degree,
                num_distinct: 1,
            });
        }

        let num_coeffs = degree + 1;
        let a = DMatrix::from_fn(x.len(), num_coeffs, |i, j| {
            ((x[i] - centre) / half_width).powi(j as i32)
        });
        let b = DVector::from_column_slice(y);
        let coeffs = solve_least_squares(a, &b).ok_or_else(|| {
            let mut distinct = x.to_vec();
            distinct.sort_by(f64::total_cmp);
            distinct.dedup();
            FitError::RankDeficient {
                degree,
                num_distinct: distinct.len(),
            }
        })?;

        Ok(Polynomial {
            coeffs,
            centre,
            half_width,
        })
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Evaluate the polynomial with Horner's method.
    pub fn eval(&self, x: f64) -> f64 {
        let t = (x - self.centre) / self.half_width;
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * t + c)
    }
}

/// Solve the overdetermined (or square) system `a c = b` in the least-squares
/// sense with an SVD. `None` is returned if `a` doesn't have full column rank.
fn solve_least_squares(a: DMatrix<f64>, b: &DVector<f64>) -> Option<Vec<f64>> {
    let num_cols = a.ncols();
    let svd = a.svd(true, true);
    let max_sv = svd.singular_values.max();
    if max_sv <= 0.0 || !max_sv.is_finite() {
        return None;
    }
    let eps = RANK_TOLERANCE * max_sv;
    if svd.rank(eps) < num_cols {
        return None;
    }
    let c = svd.solve(b, eps).ok()?;
    Some(c.iter().copied().collect())
}
