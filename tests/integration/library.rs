// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Estimating and writing weights through the library's public interface.

use approx::assert_relative_eq;

use ms_noise_weights::{
    io::StoreOp, write_weights, EstimateParams, MemoryStore, MsSummary, NoiseEstimator,
    ReductionStat, WeightColumns, WeightStore,
};

#[test]
fn test_estimate_then_write() {
    let mut store = MemoryStore::unflagged(
        "meerkat.ms",
        MsSummary {
            num_rows: 23,
            num_corrs: 2,
            ref_freqs_hz: vec![900e6, 1300e6],
            total_bandwidths_hz: vec![400e6, 400e6],
            num_chans: vec![16, 16],
        },
    );
    store.flags_mut()[(22, 5, 1)] = true;

    let estimator = NoiseEstimator::from_store(&mut store).unwrap();
    let nw = estimator
        .estimate_weights(&EstimateParams::default())
        .unwrap();
    assert_eq!(nw.weights.len(), 32);

    let summary = write_weights(
        &mut store,
        nw.weights.view(),
        &WeightColumns::default(),
        ReductionStat::Sum,
        None,
    )
    .unwrap();
    // 23 rows in chunks of 2.
    assert_eq!(summary.num_chunks, 12);
    assert!(store.is_closed());
    assert_eq!(store.ops().last(), Some(&StoreOp::Close));

    let total: f64 = nw.weights.sum();
    let scalar = store.scalar_column("WEIGHT").unwrap();
    assert_relative_eq!(f64::from(scalar[(0, 0)]), total, max_relative = 1e-5);
    assert_relative_eq!(
        f64::from(scalar[(22, 1)]),
        total - nw.weights[5],
        max_relative = 1e-5
    );

    // Everything has been released.
    assert!(store.summary().is_err());
}
