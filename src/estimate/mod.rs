// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Estimating per-channel visibility noise and the inverse-variance weights
//! derived from it.
//!
//! A sparse sensitivity curve (e.g. SEFD against frequency) is optionally
//! normalised, smoothed with a polynomial or spline in MHz, and evaluated at
//! every channel of a [`FreqAxis`]. The weight of each channel is then
//! `1 / noise^2`.

mod error;
mod plot;
#[cfg(test)]
mod tests;

pub use error::{EstimateError, WeightsError};
pub use plot::PlotError;

use std::path::PathBuf;

use log::{debug, info, trace, warn};
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{DEFAULT_FIT_ORDER, DEFAULT_PLOT_SUFFIX, HZ_PER_MHZ},
    fit::{FittedCurve, SmoothMethod},
    freqs::FreqAxis,
    io::WeightStore,
    sensitivity::SensitivitySource,
};

/// How visibility noise is estimated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EstimationMode {
    /// From a curve proportional to the noise as a function of frequency.
    Curve(SensitivitySource),

    /// From differences between adjacent channels of the visibilities. This
    /// isn't available yet.
    FromData,
}

impl Default for EstimationMode {
    fn default() -> Self {
        EstimationMode::Curve(SensitivitySource::default())
    }
}

/// Where (and whether) to write a diagnostic plot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlotOutput {
    #[default]
    None,

    /// `<store identifier>-noise_weights.png`
    Default,

    Path(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EstimateParams {
    pub mode: EstimationMode,

    /// Divide the sensitivity curve by its maximum before fitting.
    pub normalise: bool,

    pub smooth: SmoothMethod,

    /// The polynomial degree, or the spline smoothing factor.
    pub fit_order: usize,

    pub plot: PlotOutput,
}

impl Default for EstimateParams {
    fn default() -> Self {
        EstimateParams {
            mode: EstimationMode::default(),
            normalise: true,
            smooth: SmoothMethod::default(),
            fit_order: DEFAULT_FIT_ORDER,
            plot: PlotOutput::None,
        }
    }
}

/// Per-channel noise and weights, aligned with the channels of a
/// [`FreqAxis`].
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseWeights {
    pub noise: Array1<f64>,
    pub weights: Array1<f64>,
}

pub struct NoiseEstimator {
    axis: FreqAxis,

    /// Used to name the default plot file.
    identifier: String,
}

impl NoiseEstimator {
    pub fn new(axis: FreqAxis, identifier: &str) -> NoiseEstimator {
        NoiseEstimator {
            axis,
            identifier: identifier.to_string(),
        }
    }

    /// Build the frequency axis from a store's spectral windows.
    pub fn from_store<S: WeightStore + ?Sized>(
        store: &mut S,
    ) -> Result<NoiseEstimator, EstimateError> {
        let summary = store.summary()?;
        let axis = summary.freq_axis()?;
        Ok(NoiseEstimator::new(axis, &store.identifier()))
    }

    pub fn freq_axis(&self) -> &FreqAxis {
        &self.axis
    }

    pub fn default_plot_path(&self) -> PathBuf {
        PathBuf::from(format!("{}{DEFAULT_PLOT_SUFFIX}", self.identifier))
    }

    pub fn estimate_weights(&self, params: &EstimateParams) -> Result<NoiseWeights, EstimateError> {
        let source = match &params.mode {
            EstimationMode::Curve(source) => source,
            EstimationMode::FromData => return Err(EstimateError::ModeNotAvailable),
        };
        let mut curve = source.load()?;
        debug!("Loaded sensitivity curve from {source} ({} points)", curve.len());
        if params.normalise {
            curve.normalise()?;
        }

        let extent = self.axis.extent_hz();
        curve.check_units(extent)?;
        if !curve.covers(extent) {
            warn!(
                "The channels ({:.3} to {:.3} MHz) aren't covered by the sensitivity curve; the fit is being extrapolated",
                extent.0 / HZ_PER_MHZ,
                extent.1 / HZ_PER_MHZ,
            );
        }

        let fitted = FittedCurve::fit(
            &curve.freqs_mhz(),
            curve.values(),
            params.smooth,
            params.fit_order,
        )?;
        trace!("Fitted curve: {fitted:?}");
        let noise = self.axis.freqs_mhz().mapv(|f| fitted.eval(f));
        let weights = compute_weights(noise.view(), self.axis.freqs_hz())?;

        let output = match &params.plot {
            PlotOutput::None => None,
            PlotOutput::Default => Some(self.default_plot_path()),
            PlotOutput::Path(p) => Some(p.clone()),
        };
        if let Some(output) = output {
            let fit_label = match params.smooth {
                SmoothMethod::Polynomial => format!("Polynomial fit: n={}", params.fit_order),
                SmoothMethod::Spline => format!("Spline fit: s={}", params.fit_order),
            };
            let data = plot::PlotData {
                curve_freqs_hz: curve.freqs_hz(),
                curve_values: curve.values(),
                freqs_hz: self.axis.freqs_hz(),
                noise: noise.view(),
                weights: weights.view(),
                fit_label,
            };
            // A failed plot only warrants a warning.
            match plot::plot_noise_weights(&data, &output) {
                Ok(()) => info!("Wrote noise/weights plot to {}", output.display()),
                Err(e) => warn!("Couldn't plot noise/weights to {}: {e}", output.display()),
            }
        }

        Ok(NoiseWeights { noise, weights })
    }
}

/// Convert per-channel noise to inverse-variance weights (`1 / noise^2`).
/// Every noise value must be positive, and every weight finite.
pub fn compute_weights(
    noise: ArrayView1<f64>,
    freqs_hz: ArrayView1<f64>,
) -> Result<Array1<f64>, WeightsError> {
    if noise.len() != freqs_hz.len() {
        return Err(WeightsError::LengthMismatch {
            num_noise: noise.len(),
            num_freqs: freqs_hz.len(),
        });
    }

    noise
        .iter()
        .zip(freqs_hz.iter())
        .enumerate()
        .map(|(chan, (&n, &freq_hz))| {
            if n == 0.0 {
                Err(WeightsError::DivisionByZero { chan, freq_hz })
            } else if !(n > 0.0 && n.is_finite()) {
                Err(WeightsError::NonPositiveNoise {
                    chan,
                    freq_hz,
                    noise: n,
                })
            } else {
                let weight = 1.0 / (n * n);
                if weight.is_finite() {
                    Ok(weight)
                } else {
                    Err(WeightsError::InfiniteWeight {
                        chan,
                        freq_hz,
                        noise: n,
                    })
                }
            }
        })
        .collect()
}
