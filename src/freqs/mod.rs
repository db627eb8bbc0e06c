// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The frequency axis of a measurement set.
//!
//! Every spectral window contributes `num_chans` channels, starting at its
//! reference frequency and separated by `total_bandwidth / num_chans`. All
//! spectral windows are concatenated in the order that they are declared; no
//! sorting is done and no gaps are inserted.

mod error;
#[cfg(test)]
mod tests;

pub use error::FreqAxisError;

use std::ops::Range;

use log::{debug, trace};
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};
use vec1::Vec1;

use crate::constants::HZ_PER_MHZ;

/// Metadata describing a single spectral window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralWindow {
    /// The frequency of the first channel \[Hz\].
    pub ref_freq_hz: f64,

    /// The total bandwidth covered by all channels \[Hz\].
    pub total_bandwidth_hz: f64,

    /// The number of channels in this spectral window.
    pub num_chans: usize,
}

impl SpectralWindow {
    /// The frequency separation between adjacent channels \[Hz\].
    pub fn chan_width_hz(&self) -> f64 {
        self.total_bandwidth_hz / self.num_chans as f64
    }

    /// Iterate over this spectral window's channel frequencies \[Hz\].
    pub fn chan_freqs_hz(&self) -> impl Iterator<Item = f64> + '_ {
        let width = self.chan_width_hz();
        (0..self.num_chans).map(move |i| self.ref_freq_hz + i as f64 * width)
    }
}

/// The channel frequencies of all spectral windows of a measurement set,
/// concatenated. This is computed once and does not change afterwards.
#[derive(Debug, Clone)]
pub struct FreqAxis {
    spws: Vec1<SpectralWindow>,

    /// All channel frequencies \[Hz\].
    freqs_hz: Array1<f64>,
}

impl FreqAxis {
    pub fn new(spws: &[SpectralWindow]) -> Result<FreqAxis, FreqAxisError> {
        let spws =
            Vec1::try_from_vec(spws.to_vec()).map_err(|_| FreqAxisError::NoSpectralWindows)?;
        for (i_spw, spw) in spws.iter().enumerate() {
            if !spw.ref_freq_hz.is_finite() || !spw.total_bandwidth_hz.is_finite() {
                return Err(FreqAxisError::NotFinite {
                    spw: i_spw,
                    ref_freq_hz: spw.ref_freq_hz,
                    bandwidth_hz: spw.total_bandwidth_hz,
                });
            }
            if spw.num_chans == 0 {
                return Err(FreqAxisError::NoChannels { spw: i_spw });
            }
            if spw.total_bandwidth_hz <= 0.0 {
                return Err(FreqAxisError::NonPositiveBandwidth {
                    spw: i_spw,
                    bandwidth_hz: spw.total_bandwidth_hz,
                });
            }
            trace!(
                "spw {i_spw}: {} channels from {} Hz, width {} Hz",
                spw.num_chans,
                spw.ref_freq_hz,
                spw.chan_width_hz()
            );
        }

        let freqs_hz: Array1<f64> = spws.iter().flat_map(|spw| spw.chan_freqs_hz()).collect();
        debug!(
            "Frequency axis: {} spectral window(s), {} channels",
            spws.len(),
            freqs_hz.len()
        );

        Ok(FreqAxis { spws, freqs_hz })
    }

    /// Make a [`FreqAxis`] from per-spectral-window columns, as they appear in
    /// a measurement set's SPECTRAL_WINDOW table. All slices must have the same
    /// length.
    pub fn from_columns(
        ref_freqs_hz: &[f64],
        total_bandwidths_hz: &[f64],
        num_chans: &[i64],
    ) -> Result<FreqAxis, FreqAxisError> {
        if ref_freqs_hz.len() != total_bandwidths_hz.len() || ref_freqs_hz.len() != num_chans.len()
        {
            return Err(FreqAxisError::MismatchedLengths {
                num_ref_freqs: ref_freqs_hz.len(),
                num_bandwidths: total_bandwidths_hz.len(),
                num_chan_counts: num_chans.len(),
            });
        }

        let spws = ref_freqs_hz
            .iter()
            .zip(total_bandwidths_hz)
            .zip(num_chans)
            .enumerate()
            .map(|(i_spw, ((&ref_freq_hz, &total_bandwidth_hz), &num_chans))| {
                let num_chans =
                    usize::try_from(num_chans).map_err(|_| FreqAxisError::NegativeChannelCount {
                        spw: i_spw,
                        num_chans,
                    })?;
                Ok(SpectralWindow {
                    ref_freq_hz,
                    total_bandwidth_hz,
                    num_chans,
                })
            })
            .collect::<Result<Vec<_>, FreqAxisError>>()?;
        FreqAxis::new(&spws)
    }

    /// The total number of channels across all spectral windows.
    pub fn len(&self) -> usize {
        self.freqs_hz.len()
    }

    /// Always false; a [`FreqAxis`] can't be constructed without channels.
    pub fn is_empty(&self) -> bool {
        self.freqs_hz.is_empty()
    }

    pub fn spws(&self) -> &[SpectralWindow] {
        &self.spws
    }

    pub fn freqs_hz(&self) -> ArrayView1<f64> {
        self.freqs_hz.view()
    }

    /// The channel frequencies in MHz. This is the unit that sensitivity curves
    /// are fitted and evaluated in.
    pub fn freqs_mhz(&self) -> Array1<f64> {
        self.freqs_hz.mapv(|f| f / HZ_PER_MHZ)
    }

    /// The frequency of the first channel \[Hz\].
    pub fn first(&self) -> f64 {
        self.freqs_hz[0]
    }

    /// The frequency of the last channel \[Hz\].
    pub fn last(&self) -> f64 {
        self.freqs_hz[self.freqs_hz.len() - 1]
    }

    /// The range of channel indices belonging to each spectral window.
    pub fn spw_ranges(&self) -> Vec<Range<usize>> {
        let mut start = 0;
        self.spws
            .iter()
            .map(|spw| {
                let range = start..start + spw.num_chans;
                start = range.end;
                range
            })
            .collect()
    }

    /// The lowest and highest channel frequencies \[Hz\]. Because spectral
    /// windows aren't sorted, these aren't necessarily the first and last
    /// channels.
    pub fn extent_hz(&self) -> (f64, f64) {
        self.freqs_hz
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &f| {
                (min.min(f), max.max(f))
            })
    }
}
