// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sensitivity curves, i.e. sparse (frequency, sensitivity) pairs that are
//! proportional to the visibility noise as a function of frequency (e.g. SEFD).

mod builtin;
mod error;
mod read;

pub use builtin::BuiltinCurve;
pub use error::SensitivityError;
pub(crate) use read::CURVE_FILE_TYPES_COMMA_SEPARATED;

use std::path::PathBuf;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::constants::{HZ_PER_MHZ, MAX_UNIT_RATIO, MIN_NORMALISATION_MAX};

/// Where a sensitivity curve comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SensitivitySource {
    /// (frequency \[Hz\], sensitivity) pairs.
    Inline(Vec<[f64; 2]>),

    /// A file containing (frequency \[Hz\], sensitivity) pairs.
    File(PathBuf),

    /// A curve compiled into this crate.
    Builtin(BuiltinCurve),
}

impl Default for SensitivitySource {
    fn default() -> Self {
        SensitivitySource::Builtin(BuiltinCurve::default())
    }
}

impl SensitivitySource {
    pub fn load(&self) -> Result<SensitivityCurve, SensitivityError> {
        match self {
            SensitivitySource::Inline(pairs) => SensitivityCurve::new(pairs),
            SensitivitySource::File(file) => {
                let pairs = read::read_curve_file(file)?;
                SensitivityCurve::new(&pairs)
            }
            SensitivitySource::Builtin(curve) => {
                debug!(
                    "Using built-in sensitivity curve {} (version {})",
                    curve.name(),
                    curve.version()
                );
                SensitivityCurve::new(curve.data())
            }
        }
    }
}

impl std::fmt::Display for SensitivitySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensitivitySource::Inline(pairs) => write!(f, "{} user-supplied points", pairs.len()),
            SensitivitySource::File(file) => write!(f, "{}", file.display()),
            SensitivitySource::Builtin(curve) => write!(f, "built-in curve {curve}"),
        }
    }
}

/// A validated sensitivity curve. There are at least 2 points, all values are
/// finite and all frequencies are positive. The points are kept in the order
/// they were supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityCurve {
    freqs_hz: Vec<f64>,
    values: Vec<f64>,
}

impl SensitivityCurve {
    pub fn new(pairs: &[[f64; 2]]) -> Result<SensitivityCurve, SensitivityError> {
        if pairs.len() < 2 {
            return Err(SensitivityError::TooFewPoints(pairs.len()));
        }

        let mut freqs_hz = Vec::with_capacity(pairs.len());
        let mut values = Vec::with_capacity(pairs.len());
        for (index, &[freq, value]) in pairs.iter().enumerate() {
            if !freq.is_finite() || !value.is_finite() {
                return Err(SensitivityError::NotFinite { index, freq, value });
            }
            if freq <= 0.0 {
                return Err(SensitivityError::NonPositiveFreq { index, freq });
            }
            freqs_hz.push(freq);
            values.push(value);
        }
        trace!("Sensitivity curve has {} points", freqs_hz.len());

        Ok(SensitivityCurve { freqs_hz, values })
    }

    pub fn len(&self) -> usize {
        self.freqs_hz.len()
    }

    /// Always false; a curve has at least 2 points.
    pub fn is_empty(&self) -> bool {
        self.freqs_hz.is_empty()
    }

    pub fn freqs_hz(&self) -> &[f64] {
        &self.freqs_hz
    }

    pub fn freqs_mhz(&self) -> Vec<f64> {
        self.freqs_hz.iter().map(|f| f / HZ_PER_MHZ).collect()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Divide all values by the maximum value. Normalising an already-normalised
    /// curve does nothing.
    pub fn normalise(&mut self) -> Result<(), SensitivityError> {
        let max = self.max();
        if max < MIN_NORMALISATION_MAX {
            return Err(SensitivityError::NonPositiveMax(max));
        }
        if max - self.min() <= max * f64::EPSILON {
            return Err(SensitivityError::Constant(max));
        }

        trace!("Normalising sensitivity curve by {max}");
        self.values.iter_mut().for_each(|v| *v /= max);
        Ok(())
    }

    /// Check that this curve's frequencies are plausibly in the same unit as
    /// the supplied frequency extent \[Hz\]. A curve in MHz checked against
    /// frequencies in Hz fails, as does one in kHz.
    pub fn check_units(&self, (axis_min, axis_max): (f64, f64)) -> Result<(), SensitivityError> {
        let (curve_min, curve_max) = self
            .freqs_hz
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &f| {
                (min.min(f), max.max(f))
            });
        // Compare the centres of each span; the spans themselves can be wildly
        // different (e.g. a single channel against a wide-band curve).
        let curve_centre = (curve_min + curve_max) / 2.0;
        let axis_centre = (axis_min + axis_max) / 2.0;
        let ratio = curve_centre / axis_centre;
        if !(ratio > 1.0 / MAX_UNIT_RATIO && ratio < MAX_UNIT_RATIO) {
            return Err(SensitivityError::UnitMismatch {
                curve_min,
                curve_max,
                axis_min,
                axis_max,
            });
        }

        Ok(())
    }

    /// Is the supplied frequency extent \[Hz\] entirely covered by this curve?
    pub fn covers(&self, (min, max): (f64, f64)) -> bool {
        let curve_min = self.freqs_hz.iter().copied().fold(f64::INFINITY, f64::min);
        let curve_max = self
            .freqs_hz
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        curve_min <= min && max <= curve_max
    }
}
