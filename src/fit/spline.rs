// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Cubic smoothing splines.
//!
//! The spline is a cubic B-spline with interior knots at the 3rd to the 3rd
//! last samples (the "not-a-knot" layout), so that with a smoothing factor of
//! `s = 0` it interpolates every sample. For `s > 0` the spline minimises the
//! sum of the squared jumps of its third derivative at the interior knots,
//! subject to the sum of squared residuals not exceeding `s` (Dierckx 1975).
//! Only a single cubic has no jumps, so once `s` is at least the residual of a
//! least-squares cubic, the spline is that cubic.
//!
//! Internally the penalised form `|y - B c|^2 + alpha |D c|^2` is solved for
//! the B-spline coefficients `c`, and `alpha` is searched for until the
//! residual matches `s`.

use nalgebra::{DMatrix, DVector};

use super::{FitError, Polynomial};

/// The degree of the spline pieces.
const DEGREE: usize = 3;

/// The number of geometric bisections used to pin down the penalty weight.
const NUM_BISECTIONS: usize = 60;

/// The largest and smallest power of ten tried when bracketing the penalty
/// weight. The penalty is scaled to be comparable with the residual term.
const MAX_BRACKET_EXPONENT: i32 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingSpline {
    /// The full knot vector in the scaled variable `t = (x - offset) / scale`.
    /// The boundary knots are repeated `DEGREE + 1` times.
    knots: Vec<f64>,
    /// B-spline coefficients.
    coeffs: Vec<f64>,
    offset: f64,
    scale: f64,
}

impl SmoothingSpline {
    pub fn fit(x: &[f64], y: &[f64], smoothing: f64) -> Result<SmoothingSpline, FitError> {
        if x.len() != y.len() {
            return Err(FitError::LengthMismatch {
                num_x: x.len(),
                num_y: y.len(),
            });
        }
        // A cubic has order 3; there must be more samples than that.
        if x.len() <= DEGREE {
            return Err(FitError::TooFewPointsForSpline(x.len()));
        }
        if !smoothing.is_finite() || smoothing < 0.0 {
            return Err(FitError::BadSmoothingFactor(smoothing));
        }

        let mut pairs: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        if let Some(w) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(FitError::DuplicateAbscissa(w[0].0));
        }
        let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let n = x.len();

        let offset = x[0];
        let scale = x[n - 1] - x[0];
        let t: Vec<f64> = x.iter().map(|&x| (x - offset) / scale).collect();
        let mut knots = vec![0.0; DEGREE + 1];
        knots.extend_from_slice(&t[2..n - 2]);
        knots.extend_from_slice(&[1.0; DEGREE + 1]);

        let basis = DMatrix::from_fn(n, n, |i, j| {
            let span = find_span(&knots, n, t[i]);
            match j.checked_sub(span - DEGREE) {
                Some(r) if r <= DEGREE => basis_funs(&knots, span, t[i])[r],
                _ => 0.0,
            }
        });
        let y = DVector::from_vec(y);

        // Anything at least as smooth as a cubic is a cubic.
        let cubic = Polynomial::fit(&x, y.as_slice(), DEGREE)?;
        let cubic_values = DVector::from_iterator(n, x.iter().map(|&x| cubic.eval(x)));
        let cubic_rss = (&y - &cubic_values).norm_squared();
        let coeffs = if smoothing >= cubic_rss {
            // The cubic is itself a spline on these knots; find its coefficients.
            basis
                .lu()
                .solve(&cubic_values)
                .ok_or(FitError::SingularSpline)?
        } else {
            let system = PenalisedSystem::new(basis, &knots, y);
            let alpha = if smoothing == 0.0 {
                0.0
            } else {
                system.find_alpha(smoothing)?
            };
            system.solve(alpha)?
        };

        Ok(SmoothingSpline {
            knots,
            coeffs: coeffs.iter().copied().collect(),
            offset,
            scale,
        })
    }

    /// Evaluate the spline. Beyond the first and last samples, the cubics of the
    /// first and last intervals are extrapolated.
    pub fn eval(&self, x: f64) -> f64 {
        let t = (x - self.offset) / self.scale;
        let span = find_span(&self.knots, self.coeffs.len(), t);
        basis_funs(&self.knots, span, t)
            .iter()
            .zip(&self.coeffs[span - DEGREE..=span])
            .map(|(b, c)| b * c)
            .sum()
    }
}

/// The index of the knot interval holding `t`, clamped to the first and last
/// non-empty intervals.
fn find_span(knots: &[f64], num_coeffs: usize, t: f64) -> usize {
    knots
        .partition_point(|&k| k <= t)
        .saturating_sub(1)
        .clamp(DEGREE, num_coeffs - 1)
}

/// The values of the `DEGREE + 1` B-splines that are non-zero on the interval
/// `span` at `t` (Cox-de Boor recursion). Outside the interval these are the
/// polynomial pieces of that interval.
fn basis_funs(knots: &[f64], span: usize, t: f64) -> [f64; DEGREE + 1] {
    let mut n = [0.0; DEGREE + 1];
    let mut left = [0.0; DEGREE + 1];
    let mut right = [0.0; DEGREE + 1];
    n[0] = 1.0;
    for j in 1..=DEGREE {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;
        let mut saved = 0.0;
        for r in 0..j {
            let temp = n[r] / (right[r + 1] + left[j - r]);
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n[j] = saved;
    }
    n
}

/// The pieces of the penalised least-squares problem that don't depend on the
/// penalty weight.
struct PenalisedSystem {
    basis: DMatrix<f64>,
    y: DVector<f64>,
    /// B^T B.
    btb: DMatrix<f64>,
    /// B^T y.
    bty: DVector<f64>,
    /// D^T D, scaled to have the same trace as B^T B.
    dtd: DMatrix<f64>,
}

impl PenalisedSystem {
    fn new(basis: DMatrix<f64>, knots: &[f64], y: DVector<f64>) -> PenalisedSystem {
        let num_coeffs = basis.ncols();

        // Each row of D holds the jumps of each B-spline's third derivative at an
        // interior knot u. With B_j = (t_{j+4} - t_j) [t_j..t_{j+4}] (. - x)^3_+,
        // the jump at a simple knot u = t_k is
        // 6 (t_{j+4} - t_j) / prod_{p != k} (u - t_p).
        let interior = DEGREE + 1..num_coeffs;
        let mut jumps = DMatrix::zeros(interior.len(), num_coeffs);
        for (row, k) in interior.enumerate() {
            let u = knots[k];
            for j in k.saturating_sub(DEGREE + 1)..=k.min(num_coeffs - 1) {
                let denom: f64 = (j..=j + DEGREE + 1)
                    .filter(|&p| p != k)
                    .map(|p| u - knots[p])
                    .product();
                jumps[(row, j)] = 6.0 * (knots[j + DEGREE + 1] - knots[j]) / denom;
            }
        }

        let btb = basis.transpose() * &basis;
        let bty = basis.transpose() * &y;
        let mut dtd = jumps.transpose() * &jumps;
        let dtd_trace = dtd.trace();
        if dtd_trace > 0.0 {
            dtd *= btb.trace() / dtd_trace;
        }

        PenalisedSystem {
            basis,
            y,
            btb,
            bty,
            dtd,
        }
    }

    /// Solve for the B-spline coefficients with the given penalty weight.
    fn solve(&self, alpha: f64) -> Result<DVector<f64>, FitError> {
        if alpha == 0.0 {
            return self
                .basis
                .clone()
                .lu()
                .solve(&self.y)
                .ok_or(FitError::SingularSpline);
        }

        let lhs = &self.btb + &self.dtd * alpha;
        match lhs.clone().cholesky() {
            Some(chol) => Ok(chol.solve(&self.bty)),
            None => lhs.lu().solve(&self.bty).ok_or(FitError::SingularSpline),
        }
    }

    fn rss(&self, alpha: f64) -> Result<f64, FitError> {
        let coeffs = self.solve(alpha)?;
        Ok((&self.y - &self.basis * coeffs).norm_squared())
    }

    /// Find the penalty weight whose residual is as large as possible without
    /// exceeding `smoothing`. The residual increases monotonically with the
    /// weight, from 0 (interpolation) to the residual of a cubic.
    fn find_alpha(&self, smoothing: f64) -> Result<f64, FitError> {
        // Bracket the target with powers of ten.
        let mut exponent = 0;
        let (mut lo, mut hi) = if self.rss(1.0)? <= smoothing {
            while exponent < MAX_BRACKET_EXPONENT
                && self.rss(10_f64.powi(exponent + 1))? <= smoothing
            {
                exponent += 1;
            }
            (10_f64.powi(exponent), 10_f64.powi(exponent + 1))
        } else {
            while exponent > -MAX_BRACKET_EXPONENT
                && self.rss(10_f64.powi(exponent - 1))? > smoothing
            {
                exponent -= 1;
            }
            (10_f64.powi(exponent - 1), 10_f64.powi(exponent))
        };

        for _ in 0..NUM_BISECTIONS {
            let mid = (lo * hi).sqrt();
            if self.rss(mid)? <= smoothing {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        // A tiny budget is only met by the interpolant.
        if self.rss(lo)? > smoothing {
            Ok(0.0)
        } else {
            Ok(lo)
        }
    }
}
