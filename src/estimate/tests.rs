// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use ndarray::array;
use tempfile::TempDir;

use super::*;
use crate::{
    fit::{FitError, Polynomial},
    freqs::SpectralWindow,
    io::{MemoryStore, MsSummary},
    sensitivity::{BuiltinCurve, SensitivityError},
};

fn sefd() -> Vec<[f64; 2]> {
    vec![[900e6, 578.0], [1000e6, 540.0], [1100e6, 443.0]]
}

fn small_axis() -> FreqAxis {
    FreqAxis::new(&[SpectralWindow {
        ref_freq_hz: 950e6,
        total_bandwidth_hz: 100e6,
        num_chans: 4,
    }])
    .unwrap()
}

fn params(pairs: Vec<[f64; 2]>, fit_order: usize) -> EstimateParams {
    EstimateParams {
        mode: EstimationMode::Curve(SensitivitySource::Inline(pairs)),
        fit_order,
        ..Default::default()
    }
}

/// Evaluate the quadratic through three points with Lagrange's formula.
fn lagrange(points: &[[f64; 2]; 3], x: f64) -> f64 {
    let mut sum = 0.0;
    for (i, [xi, yi]) in points.iter().enumerate() {
        let mut term = *yi;
        for (j, [xj, _]) in points.iter().enumerate() {
            if i != j {
                term *= (x - xj) / (xi - xj);
            }
        }
        sum += term;
    }
    sum
}

#[test]
fn test_defaults() {
    let params = EstimateParams::default();
    assert!(params.normalise);
    assert_eq!(params.smooth, SmoothMethod::Polynomial);
    assert_eq!(params.fit_order, 9);
    assert_eq!(params.plot, PlotOutput::None);
    assert_eq!(
        params.mode,
        EstimationMode::Curve(SensitivitySource::Builtin(BuiltinCurve::MeerKatLBandV1))
    );
}

#[test]
fn test_end_to_end_sefd() {
    let estimator = NoiseEstimator::new(small_axis(), "test.ms");
    let NoiseWeights { noise, weights } = estimator.estimate_weights(&params(sefd(), 2)).unwrap();
    assert_eq!(noise.len(), 4);
    assert_eq!(weights.len(), 4);

    // A quadratic through 3 points is the interpolating quadratic.
    let normalised = [
        [900.0, 1.0],
        [1000.0, 540.0 / 578.0],
        [1100.0, 443.0 / 578.0],
    ];
    for (&f, &n) in [950.0, 975.0, 1000.0, 1025.0].iter().zip(noise.iter()) {
        assert_abs_diff_eq!(n, lagrange(&normalised, f), epsilon = 1e-10);
    }
    for (&w, &n) in weights.iter().zip(noise.iter()) {
        assert_relative_eq!(w, 1.0 / (n * n), max_relative = 1e-12);
    }
}

#[test]
fn test_without_normalisation() {
    let estimator = NoiseEstimator::new(small_axis(), "test.ms");
    let mut p = params(sefd(), 2);
    p.normalise = false;
    let NoiseWeights { noise, .. } = estimator.estimate_weights(&p).unwrap();
    // 1000 MHz is a channel and a curve point.
    assert_abs_diff_eq!(noise[2], 540.0, epsilon = 1e-8);
}

#[test]
fn test_constant_curve_gives_constant_weights() {
    let estimator = NoiseEstimator::new(small_axis(), "test.ms");
    let mut p = params(
        vec![[900e6, 2.0], [1000e6, 2.0], [1100e6, 2.0], [1200e6, 2.0]],
        1,
    );
    p.normalise = false;
    let NoiseWeights { noise, weights } = estimator.estimate_weights(&p).unwrap();
    for (&n, &w) in noise.iter().zip(weights.iter()) {
        assert_abs_diff_eq!(n, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(w, 0.25, epsilon = 1e-12);
    }

    // A constant curve can't be normalised.
    p.normalise = true;
    assert!(matches!(
        estimator.estimate_weights(&p),
        Err(EstimateError::Sensitivity(SensitivityError::Constant(_)))
    ));
}

#[test]
fn test_weights_times_noise_squared_is_one() {
    // The MeerKAT L band, 64 channels in two spectral windows.
    let axis = FreqAxis::new(&[
        SpectralWindow {
            ref_freq_hz: 900e6,
            total_bandwidth_hz: 400e6,
            num_chans: 32,
        },
        SpectralWindow {
            ref_freq_hz: 1300e6,
            total_bandwidth_hz: 400e6,
            num_chans: 32,
        },
    ])
    .unwrap();
    let estimator = NoiseEstimator::new(axis, "test.ms");
    let NoiseWeights { noise, weights } =
        estimator.estimate_weights(&EstimateParams::default()).unwrap();
    assert_eq!(noise.len(), 64);
    for (&n, &w) in noise.iter().zip(weights.iter()) {
        assert!(n > 0.0);
        assert_relative_eq!(w * n * n, 1.0, max_relative = 1e-12);
    }
}

#[test]
fn test_spline_smoothing() {
    let estimator = NoiseEstimator::new(small_axis(), "test.ms");
    let p = EstimateParams {
        mode: EstimationMode::Curve(SensitivitySource::Inline(vec![
            [900e6, 578.0],
            [950e6, 559.0],
            [1000e6, 540.0],
            [1050e6, 492.0],
            [1100e6, 443.0],
        ])),
        smooth: SmoothMethod::Spline,
        // An interpolating spline.
        fit_order: 0,
        ..Default::default()
    };
    let NoiseWeights { noise, .. } = estimator.estimate_weights(&p).unwrap();
    assert_abs_diff_eq!(noise[0], 559.0 / 578.0, epsilon = 1e-10);
    assert_abs_diff_eq!(noise[2], 540.0 / 578.0, epsilon = 1e-10);
}

#[test]
fn test_heavy_spline_smoothing_is_a_cubic() {
    let estimator = NoiseEstimator::new(small_axis(), "test.ms");
    let pairs = vec![
        [900e6, 578.0],
        [950e6, 559.0],
        [1000e6, 520.0],
        [1050e6, 492.0],
        [1100e6, 443.0],
    ];
    let p = EstimateParams {
        mode: EstimationMode::Curve(SensitivitySource::Inline(pairs.clone())),
        smooth: SmoothMethod::Spline,
        fit_order: 1000,
        ..Default::default()
    };
    let NoiseWeights { noise, .. } = estimator.estimate_weights(&p).unwrap();

    let x: Vec<f64> = pairs.iter().map(|p| p[0] / 1e6).collect();
    let y: Vec<f64> = pairs.iter().map(|p| p[1] / 578.0).collect();
    let cubic = Polynomial::fit(&x, &y, 3).unwrap();
    for (&f, &n) in [950.0, 975.0, 1000.0, 1025.0].iter().zip(noise.iter()) {
        assert_abs_diff_eq!(n, cubic.eval(f), epsilon = 1e-9);
    }
}

#[test]
fn test_data_mode_is_not_available() {
    let estimator = NoiseEstimator::new(small_axis(), "test.ms");
    let p = EstimateParams {
        mode: EstimationMode::FromData,
        ..Default::default()
    };
    assert!(matches!(
        estimator.estimate_weights(&p),
        Err(EstimateError::ModeNotAvailable)
    ));
}

#[test]
fn test_fit_order_errors() {
    let estimator = NoiseEstimator::new(small_axis(), "test.ms");
    assert!(matches!(
        estimator.estimate_weights(&params(sefd(), 3)),
        Err(EstimateError::Fit(FitError::DegreeTooLarge {
            degree: 3,
            num_points: 3
        }))
    ));
    assert!(matches!(
        estimator.estimate_weights(&params(sefd(), 0)),
        Err(EstimateError::Fit(FitError::ZeroDegree(0)))
    ));
}

#[test]
fn test_curve_in_the_wrong_unit() {
    let estimator = NoiseEstimator::new(small_axis(), "test.ms");
    let mhz = vec![[900.0, 578.0], [1000.0, 540.0], [1100.0, 443.0]];
    assert!(matches!(
        estimator.estimate_weights(&params(mhz, 2)),
        Err(EstimateError::Sensitivity(
            SensitivityError::UnitMismatch { .. }
        ))
    ));

    // Caught before the fit is extrapolated into negative noise.
    let khz = vec![[900e3, 578.0], [1000e3, 540.0], [1100e3, 443.0]];
    assert!(matches!(
        estimator.estimate_weights(&params(khz, 2)),
        Err(EstimateError::Sensitivity(
            SensitivityError::UnitMismatch { .. }
        ))
    ));
}

#[test]
fn test_invalid_curves() {
    let estimator = NoiseEstimator::new(small_axis(), "test.ms");
    assert!(matches!(
        estimator.estimate_weights(&params(vec![[900e6, 1.0]], 1)),
        Err(EstimateError::Sensitivity(SensitivityError::TooFewPoints(1)))
    ));
    assert!(matches!(
        estimator.estimate_weights(&params(vec![[900e6, 0.0], [1000e6, 0.0]], 1)),
        Err(EstimateError::Sensitivity(SensitivityError::NonPositiveMax(_)))
    ));
}

#[test]
fn test_zero_noise_is_an_error() {
    let freqs = array![1e9, 2e9, 3e9];
    let result = compute_weights(array![1.0, 0.0, 2.0].view(), freqs.view());
    assert!(matches!(
        result,
        Err(WeightsError::DivisionByZero { chan: 1, .. })
    ));

    let result = compute_weights(array![1.0, 2.0, -0.5].view(), freqs.view());
    assert!(matches!(
        result,
        Err(WeightsError::NonPositiveNoise { chan: 2, .. })
    ));

    let result = compute_weights(array![1.0, f64::NAN, 1.0].view(), freqs.view());
    assert!(matches!(
        result,
        Err(WeightsError::NonPositiveNoise { chan: 1, .. })
    ));

    // Tiny but positive noise would give an infinite weight.
    let result = compute_weights(array![1.0, 1e-200, 1.0].view(), freqs.view());
    assert!(matches!(
        result,
        Err(WeightsError::InfiniteWeight { chan: 1, .. })
    ));

    let weights = compute_weights(array![1.0, 2.0, 0.5].view(), freqs.view()).unwrap();
    assert_abs_diff_eq!(weights, array![1.0, 0.25, 4.0]);
}

#[test]
fn test_estimation_is_deterministic() {
    let estimator = NoiseEstimator::new(small_axis(), "test.ms");
    let a = estimator.estimate_weights(&params(sefd(), 2)).unwrap();
    let b = estimator.estimate_weights(&params(sefd(), 2)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_from_store() {
    let mut store = MemoryStore::unflagged(
        "/data/obs.ms",
        MsSummary {
            num_rows: 2,
            num_corrs: 4,
            ref_freqs_hz: vec![950e6],
            total_bandwidths_hz: vec![100e6],
            num_chans: vec![4],
        },
    );
    let estimator = NoiseEstimator::from_store(&mut store).unwrap();
    assert_eq!(estimator.freq_axis().len(), 4);
    assert_eq!(
        estimator.default_plot_path(),
        PathBuf::from("/data/obs.ms-noise_weights.png")
    );
}

#[test]
fn test_plot_failure_does_not_fail_estimation() {
    let dir = TempDir::new().unwrap();
    let estimator = NoiseEstimator::new(small_axis(), "test.ms");
    let mut p = params(sefd(), 2);
    p.plot = PlotOutput::Path(dir.path().join("does/not/exist/plot.png"));
    let with_plot = estimator.estimate_weights(&p).unwrap();
    p.plot = PlotOutput::None;
    let without_plot = estimator.estimate_weights(&p).unwrap();
    assert_eq!(with_plot, without_plot);
}
