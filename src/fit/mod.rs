// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Smoothing a sparse sensitivity curve so that it can be evaluated at every
//! channel of a measurement set.

mod error;
mod polynomial;
mod spline;

pub use error::FitError;
pub use polynomial::Polynomial;
pub use spline::SmoothingSpline;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// How a sensitivity curve is smoothed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
pub enum SmoothMethod {
    /// A least-squares polynomial; the fit order is the polynomial degree.
    #[default]
    #[strum(to_string = "polynomial", serialize = "polyn", serialize = "poly")]
    #[serde(rename = "polynomial", alias = "polyn", alias = "poly")]
    Polynomial,

    /// A cubic smoothing spline; the fit order is the smoothing factor.
    #[strum(to_string = "spline")]
    #[serde(rename = "spline")]
    Spline,
}

/// A smooth curve fitted to sensitivity data.
#[derive(Debug, Clone, PartialEq)]
pub enum FittedCurve {
    Polynomial(Polynomial),
    Spline(SmoothingSpline),
}

impl FittedCurve {
    /// Fit the points with the given method. For a polynomial, `fit_order` is
    /// the degree; for a spline, it is the smoothing factor.
    pub fn fit(
        x: &[f64],
        y: &[f64],
        method: SmoothMethod,
        fit_order: usize,
    ) -> Result<FittedCurve, FitError> {
        match method {
            SmoothMethod::Polynomial => Polynomial::fit(x, y, fit_order).map(FittedCurve::Polynomial),
            SmoothMethod::Spline => {
                SmoothingSpline::fit(x, y, fit_order as f64).map(FittedCurve::Spline)
            }
        }
    }

    pub fn eval(&self, x: f64) -> f64 {
        match self {
            FittedCurve::Polynomial(p) => p.eval(x),
            FittedCurve::Spline(s) => s.eval(x),
        }
    }
}
