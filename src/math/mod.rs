// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Some helper mathematics.
//!
//! The masked reductions here take a value array and a mask of the same shape;
//! a `true` in the mask means the corresponding value is flagged and ignored.
//! Reductions are accumulated in double precision regardless of the element
//! type.


use ndarray::{prelude::*, Zip};
use num_traits::{Float, NumCast};

/// Sum the unflagged values of a (row, channel, correlation) cube over the
/// channel axis. Lanes without any unflagged values sum to zero.
///
/// # Panics
///
/// Panics if `data` and `flags` have different shapes.
pub fn masked_sum_axis1<F: Float>(data: ArrayView3<F>, flags: ArrayView3<bool>) -> Array2<F> {
    Zip::from(data.lanes(Axis(1)))
        .and(flags.lanes(Axis(1)))
        .map_collect(|values, flags| {
            let sum: f64 = values
                .iter()
                .zip(flags.iter())
                .filter(|(_, &flagged)| !flagged)
                .filter_map(|(v, _)| v.to_f64())
                .sum();
            cast(sum)
        })
}

/// The population standard deviation (i.e. no degrees-of-freedom correction)
/// of the unflagged values of a (row, channel, correlation) cube over the
/// channel axis. Lanes without any unflagged values are given zero.
///
/// # Panics
///
/// Panics if `data` and `flags` have different shapes.
pub fn masked_std_axis1<F: Float>(data: ArrayView3<F>, flags: ArrayView3<bool>) -> Array2<F> {
    Zip::from(data.lanes(Axis(1)))
        .and(flags.lanes(Axis(1)))
        .map_collect(|values, flags| {
            let unflagged: Vec<f64> = values
                .iter()
                .zip(flags.iter())
                .filter(|(_, &flagged)| !flagged)
                .filter_map(|(v, _)| v.to_f64())
                .collect();
            if unflagged.is_empty() {
                return F::zero();
            }

            let n = unflagged.len() as f64;
            let mean = unflagged.iter().sum::<f64>() / n;
            let variance = unflagged.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            cast(variance.sqrt())
        })
}

/// Repeat per-channel weights over rows and correlations, giving a (row,
/// channel, correlation) cube in single precision.
pub fn broadcast_weights(weights: ArrayView1<f64>, num_rows: usize, num_corrs: usize) -> Array3<f32> {
    let num_chans = weights.len();
    Array3::from_shape_fn((num_rows, num_chans, num_corrs), |(_, i_chan, _)| {
        weights[i_chan] as f32
    })
}

fn cast<F: Float>(v: f64) -> F {
    // Every float type can represent an f64, even if only as infinity.
    <F as NumCast>::from(v).unwrap_or_else(F::nan)
}
