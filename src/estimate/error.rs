// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::{
    fit::FitError, freqs::FreqAxisError, io::StoreError, sensitivity::SensitivityError,
};

#[derive(Error, Debug)]
pub enum WeightsError {
    #[error("The fitted noise at channel {chan} ({freq_hz} Hz) is zero; can't make a weight from it")]
    DivisionByZero { chan: usize, freq_hz: f64 },

    #[error("The fitted noise at channel {chan} ({freq_hz} Hz) is {noise}; noise must be positive. Is the fit order too high for the sensitivity curve?")]
    NonPositiveNoise {
        chan: usize,
        freq_hz: f64,
        noise: f64,
    },

    #[error("The fitted noise at channel {chan} ({freq_hz} Hz) is {noise}, which is too small to make a finite weight from")]
    InfiniteWeight {
        chan: usize,
        freq_hz: f64,
        noise: f64,
    },

    #[error("There are {num_noise} noise values but {num_freqs} channel frequencies")]
    LengthMismatch { num_noise: usize, num_freqs: usize },
}

#[derive(Error, Debug)]
pub enum EstimateError {
    #[error("Estimating noise from the visibilities themselves is not available yet; supply a sensitivity curve instead")]
    ModeNotAvailable,

    #[error(transparent)]
    FreqAxis(#[from] FreqAxisError),

    #[error(transparent)]
    Sensitivity(#[from] SensitivityError),

    #[error(transparent)]
    Fit(#[from] FitError),

    #[error(transparent)]
    Weights(#[from] WeightsError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
