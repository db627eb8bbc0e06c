// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all errors from this program. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

use super::weights::WeightsArgsError;
use crate::{
    estimate::{EstimateError, WeightsError},
    fit::FitError,
    freqs::FreqAxisError,
    io::StoreError,
    params::WeightsRunError,
    sensitivity::SensitivityError,
    write::WriteError,
};

/// The *only* publicly visible error from this program. Each variant is a
/// category of error, and the message of the underlying error is kept.
#[derive(Error, Debug)]
pub enum MsNoiseError {
    /// The supplied inputs (arguments, files or measurement set metadata) are
    /// invalid.
    #[error("{0}")]
    InvalidInput(String),

    /// The inputs are valid, but can't be used (e.g. a constant sensitivity
    /// curve can't be normalised).
    #[error("{0}")]
    DegenerateInput(String),

    /// The fit of the sensitivity curve couldn't be done with the requested
    /// order.
    #[error("{0}\n\nThe fit order can be changed with --fit-order, and the fit method with --smooth.")]
    FitDegree(String),

    /// A weight couldn't be made from the fitted noise.
    #[error("{0}")]
    DivisionByZero(String),

    /// An error from reading or writing the measurement set.
    #[error("{0}\n\nIf you don't know what this means, try turning up verbosity (-v or -vv) and maybe disabling progress bars.")]
    StoreAccess(String),

    /// An error related to argument files.
    #[error("{0}\n\nArgument files may be toml or json, and use the same names as the command-line arguments (with underscores instead of dashes).")]
    ArgFile(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<WeightsArgsError> for MsNoiseError {
    fn from(e: WeightsArgsError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

impl From<FreqAxisError> for MsNoiseError {
    fn from(e: FreqAxisError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

impl From<SensitivityError> for MsNoiseError {
    fn from(e: SensitivityError) -> Self {
        let s = e.to_string();
        if e.is_degenerate() {
            Self::DegenerateInput(s)
        } else {
            Self::InvalidInput(s)
        }
    }
}

impl From<FitError> for MsNoiseError {
    fn from(e: FitError) -> Self {
        let s = e.to_string();
        match e {
            FitError::ZeroDegree(_)
            | FitError::DegreeTooLarge { .. }
            | FitError::TooFewPointsForSpline(_)
            | FitError::RankDeficient { .. } => Self::FitDegree(s),
            FitError::BadSmoothingFactor(_)
            | FitError::DuplicateAbscissa(_)
            | FitError::SingularSpline => Self::InvalidInput(s),
            FitError::LengthMismatch { .. } => Self::Generic(s),
        }
    }
}

impl From<WeightsError> for MsNoiseError {
    fn from(e: WeightsError) -> Self {
        let s = e.to_string();
        match e {
            WeightsError::DivisionByZero { .. } => Self::DivisionByZero(s),
            WeightsError::NonPositiveNoise { .. } | WeightsError::InfiniteWeight { .. } => {
                Self::DegenerateInput(s)
            }
            WeightsError::LengthMismatch { .. } => Self::Generic(s),
        }
    }
}

impl From<EstimateError> for MsNoiseError {
    fn from(e: EstimateError) -> Self {
        match e {
            EstimateError::ModeNotAvailable => Self::InvalidInput(e.to_string()),
            EstimateError::FreqAxis(e) => Self::from(e),
            EstimateError::Sensitivity(e) => Self::from(e),
            EstimateError::Fit(e) => Self::from(e),
            EstimateError::Weights(e) => Self::from(e),
            EstimateError::Store(e) => Self::from(e),
        }
    }
}

impl From<StoreError> for MsNoiseError {
    fn from(e: StoreError) -> Self {
        Self::StoreAccess(e.to_string())
    }
}

impl From<WriteError> for MsNoiseError {
    fn from(e: WriteError) -> Self {
        let s = e.to_string();
        match e {
            WriteError::ZeroRowChunk => Self::InvalidInput(s),
            WriteError::WeightsLength { .. } => Self::StoreAccess(s),
            WriteError::Store(e) => Self::from(e),
        }
    }
}

impl From<WeightsRunError> for MsNoiseError {
    fn from(e: WeightsRunError) -> Self {
        match e {
            WeightsRunError::Estimate(e) => Self::from(e),
            WeightsRunError::Write(e) => Self::from(e),
            WeightsRunError::Store(e) => Self::from(e),
        }
    }
}

impl From<std::io::Error> for MsNoiseError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<toml::ser::Error> for MsNoiseError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Generic(format!("Couldn't serialise arguments to toml: {e}"))
    }
}
