// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use ndarray::array;

use super::*;

fn spw(ref_freq_hz: f64, total_bandwidth_hz: f64, num_chans: usize) -> SpectralWindow {
    SpectralWindow {
        ref_freq_hz,
        total_bandwidth_hz,
        num_chans,
    }
}

#[test]
fn test_single_spw() {
    let axis = FreqAxis::new(&[spw(950e6, 100e6, 4)]).unwrap();
    assert_eq!(axis.len(), 4);
    assert_abs_diff_eq!(axis.freqs_hz(), array![950e6, 975e6, 1000e6, 1025e6].view());
    assert_abs_diff_eq!(axis.freqs_mhz(), array![950.0, 975.0, 1000.0, 1025.0]);
    assert_abs_diff_eq!(axis.first(), 950e6);
    assert_abs_diff_eq!(axis.last(), 1025e6);
}

#[test]
fn test_spws_are_concatenated_in_declaration_order() {
    // The second spectral window is lower in frequency than the first; it must
    // not be sorted in front of it.
    let spws = [spw(1e9, 4e6, 4), spw(500e6, 2e6, 2), spw(2e9, 3e6, 3)];
    let axis = FreqAxis::new(&spws).unwrap();
    assert_eq!(axis.len(), 9);
    assert_abs_diff_eq!(
        axis.freqs_hz(),
        array![1e9, 1.001e9, 1.002e9, 1.003e9, 500e6, 501e6, 2e9, 2.001e9, 2.002e9].view()
    );
    assert_eq!(axis.spw_ranges(), vec![0..4, 4..6, 6..9]);
    assert_eq!(axis.extent_hz(), (500e6, 2.002e9));
}

#[test]
fn test_length_and_monotonicity() {
    for spws in [
        vec![spw(856e6, 856e6, 4096)],
        vec![spw(100e6, 1e6, 1), spw(90e6, 30e6, 768)],
        vec![spw(1e9, 1.0, 7), spw(1e9, 1.0, 7), spw(3e9, 2e9, 13)],
    ] {
        let axis = FreqAxis::new(&spws).unwrap();
        let expected_len: usize = spws.iter().map(|s| s.num_chans).sum();
        assert_eq!(axis.len(), expected_len);

        for range in axis.spw_ranges() {
            let window = axis.freqs_hz().slice_move(ndarray::s![range]);
            for pair in window.windows(2) {
                assert!(pair[1] > pair[0]);
            }
        }
    }
}

#[test]
fn test_from_columns() {
    let axis = FreqAxis::from_columns(&[950e6, 2e9], &[100e6, 1e6], &[4, 2]).unwrap();
    assert_eq!(axis.len(), 6);
    assert_eq!(axis.spws()[1], spw(2e9, 1e6, 2));
}

#[test]
fn test_from_columns_mismatched_lengths() {
    let result = FreqAxis::from_columns(&[950e6, 2e9], &[100e6], &[4, 2]);
    assert!(matches!(
        result,
        Err(FreqAxisError::MismatchedLengths {
            num_ref_freqs: 2,
            num_bandwidths: 1,
            num_chan_counts: 2
        })
    ));
}

#[test]
fn test_from_columns_negative_chans() {
    let result = FreqAxis::from_columns(&[950e6], &[100e6], &[-4]);
    assert!(matches!(
        result,
        Err(FreqAxisError::NegativeChannelCount {
            spw: 0,
            num_chans: -4
        })
    ));
}

#[test]
fn test_malformed_spws() {
    assert!(matches!(
        FreqAxis::new(&[]),
        Err(FreqAxisError::NoSpectralWindows)
    ));
    assert!(matches!(
        FreqAxis::new(&[spw(1e9, 1e6, 2), spw(1e9, 1e6, 0)]),
        Err(FreqAxisError::NoChannels { spw: 1 })
    ));
    assert!(matches!(
        FreqAxis::new(&[spw(1e9, -1e6, 2)]),
        Err(FreqAxisError::NonPositiveBandwidth { spw: 0, .. })
    ));
    assert!(matches!(
        FreqAxis::new(&[spw(f64::NAN, 1e6, 2)]),
        Err(FreqAxisError::NotFinite { spw: 0, .. })
    ));
}
