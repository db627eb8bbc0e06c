// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FitError {
    #[error("The fit order must be at least 1, but it is {0}")]
    ZeroDegree(usize),

    #[error("The fit order ({degree}) must be less than the number of samples ({num_points})")]
    DegreeTooLarge { degree: usize, num_points: usize },

    #[error("A cubic smoothing spline needs more than 3 samples, but only {0} were supplied")]
    TooFewPointsForSpline(usize),

    #[error("The spline smoothing factor must be a non-negative number, but it is {0}")]
    BadSmoothingFactor(f64),

    #[error("The frequency {0} appears more than once; a spline needs distinct frequencies")]
    DuplicateAbscissa(f64),

    #[error("The spline fit could not be solved; the frequencies may be too close together")]
    SingularSpline,

    #[error("The polynomial fit of order {degree} is rank deficient; only {num_distinct} distinct frequencies are available")]
    RankDeficient { degree: usize, num_distinct: usize },

    #[error("The x and y values to fit have different lengths ({num_x} and {num_y})")]
    LengthMismatch { num_x: usize, num_y: usize },
}
