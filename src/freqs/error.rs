// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FreqAxisError {
    #[error("No spectral windows were supplied; at least one is required")]
    NoSpectralWindows,

    #[error("The spectral window metadata has mismatched lengths: {num_ref_freqs} reference frequencies, {num_bandwidths} bandwidths and {num_chan_counts} channel counts")]
    MismatchedLengths {
        num_ref_freqs: usize,
        num_bandwidths: usize,
        num_chan_counts: usize,
    },

    #[error("Spectral window {spw} has no channels")]
    NoChannels { spw: usize },

    #[error("Spectral window {spw} has a negative channel count ({num_chans})")]
    NegativeChannelCount { spw: usize, num_chans: i64 },

    #[error("Spectral window {spw} has a non-positive total bandwidth ({bandwidth_hz} Hz)")]
    NonPositiveBandwidth { spw: usize, bandwidth_hz: f64 },

    #[error("Spectral window {spw} has a non-finite reference frequency or bandwidth ({ref_freq_hz} Hz, {bandwidth_hz} Hz)")]
    NotFinite {
        spw: usize,
        ref_freq_hz: f64,
        bandwidth_hz: f64,
    },
}
