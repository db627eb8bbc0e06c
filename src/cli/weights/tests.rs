// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{fs::File, io::Write, path::PathBuf};

use clap::Parser;
use indoc::indoc;
use serial_test::serial;
use tempfile::TempDir;

use super::*;
use crate::{cli::common::num_pending_warnings, sensitivity::BuiltinCurve};

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
#[serial]
fn test_defaults() {
    let params = WeightsArgs::parse_from(["weights", "obs.ms"]).parse().unwrap();
    assert_eq!(params.ms, PathBuf::from("obs.ms"));
    assert_eq!(params.estimate, EstimateParams::default());
    assert_eq!(params.columns, WeightColumns::default());
    assert_eq!(params.stat, ReductionStat::Sum);
    assert_eq!(params.row_chunk, None);
}

#[test]
#[serial]
fn test_all_arguments() {
    #[rustfmt::skip]
    let args = WeightsArgs::parse_from([
        "weights", "obs.ms",
        "--mode", "specs",
        "--builtin-curve", "meerkat-l-band",
        "--no-normalise",
        "--smooth", "spline",
        "--fit-order", "3",
        "--plot-file", "plot.png",
        "--columns", "W", "WS",
        "--stat", "std",
        "--rowchunk", "100",
    ]);
    let params = args.parse().unwrap();
    assert_eq!(
        params.estimate.mode,
        EstimationMode::Curve(SensitivitySource::Builtin(BuiltinCurve::MeerKatLBandV1))
    );
    assert!(!params.estimate.normalise);
    assert_eq!(params.estimate.smooth, SmoothMethod::Spline);
    assert_eq!(params.estimate.fit_order, 3);
    if cfg!(feature = "plotting") {
        assert_eq!(
            params.estimate.plot,
            PlotOutput::Path(PathBuf::from("plot.png"))
        );
    } else {
        assert_eq!(params.estimate.plot, PlotOutput::None);
    }
    assert_eq!(
        params.columns,
        WeightColumns {
            scalar: "W".to_string(),
            spectral: "WS".to_string()
        }
    );
    assert_eq!(params.stat, ReductionStat::StdDev);
    assert_eq!(params.row_chunk, Some(100));
}

#[test]
#[serial]
fn test_data_mode() {
    let params = WeightsArgs::parse_from(["weights", "obs.ms", "--mode", "calc"])
        .parse()
        .unwrap();
    assert_eq!(params.estimate.mode, EstimationMode::FromData);
}

#[test]
#[serial]
fn test_plot_stats_uses_the_default_path() {
    let params = WeightsArgs::parse_from(["weights", "obs.ms", "--plot-stats"])
        .parse()
        .unwrap();
    if cfg!(feature = "plotting") {
        assert_eq!(params.estimate.plot, PlotOutput::Default);
    }
}

#[test]
#[serial]
fn test_invalid_choices() {
    for args in [
        vec!["weights", "obs.ms", "--mode", "guess"],
        vec!["weights", "obs.ms", "--smooth", "lowess"],
        vec!["weights", "obs.ms", "--stat", "mean"],
        vec!["weights", "obs.ms", "--builtin-curve", "vla"],
    ] {
        let result = WeightsArgs::parse_from(args).parse();
        assert!(matches!(result, Err(MsNoiseError::InvalidInput(_))));
    }

    let result = WeightsArgs::parse_from(["weights", "obs.ms", "--stat", "mean"]).parse();
    let message = result.err().unwrap().to_string();
    assert!(message.contains("'mean' is not a valid statistic"));
    assert!(message.contains("sum, stddev"));
}

#[test]
#[serial]
fn test_bad_columns_and_rowchunk() {
    let result =
        WeightsArgs::parse_from(["weights", "obs.ms", "--columns", "WEIGHT", "WEIGHT"]).parse();
    assert!(matches!(result, Err(MsNoiseError::InvalidInput(_))));

    let args = WeightsArgs {
        ms: Some(PathBuf::from("obs.ms")),
        columns: Some(vec!["WEIGHT".to_string()]),
        ..Default::default()
    };
    assert!(matches!(args.parse(), Err(MsNoiseError::InvalidInput(_))));

    let result = WeightsArgs::parse_from(["weights", "obs.ms", "--rowchunk", "0"]).parse();
    assert!(matches!(result, Err(MsNoiseError::InvalidInput(_))));
}

#[test]
#[serial]
fn test_no_ms() {
    let result = WeightsArgs::default().parse();
    assert!(matches!(result, Err(MsNoiseError::InvalidInput(_))));
}

#[test]
#[serial]
fn test_sensitivity_file_takes_precedence() {
    let dir = TempDir::new().unwrap();
    let curve = write_file(&dir, "sefd.csv", "900e6,578\n1000e6,540\n1100e6,443\n");
    let curve_str = curve.display().to_string();
    let params = WeightsArgs::parse_from([
        "weights",
        "obs.ms",
        "--sensitivity",
        &curve_str,
        "--builtin-curve",
        "meerkat-l-band-v1",
    ])
    .parse()
    .unwrap();
    assert_eq!(
        params.estimate.mode,
        EstimationMode::Curve(SensitivitySource::File(curve))
    );
    // The "ignored" warning was displayed (and so cleared).
    assert_eq!(num_pending_warnings(), 0);

    let missing = dir.path().join("missing.csv").display().to_string();
    let result = WeightsArgs::parse_from(["weights", "obs.ms", "--sensitivity", &missing]).parse();
    assert!(matches!(result, Err(MsNoiseError::InvalidInput(_))));
}

#[test]
fn test_merge_toml() {
    let dir = TempDir::new().unwrap();
    let arg_file = write_file(
        &dir,
        "args.toml",
        indoc! {r#"
            ms = "from_file.ms"
            smooth = "spline"
            fit_order = 2
            stat = "stddev"
            rowchunk = 5
            columns = ["W", "WS"]
            no_normalise = true
        "#},
    );
    let arg_file_str = arg_file.display().to_string();

    let args = WeightsArgs::parse_from(["weights", "cli.ms", &arg_file_str, "--rowchunk", "7"])
        .merge()
        .unwrap();
    // CLI arguments win.
    assert_eq!(args.ms, Some(PathBuf::from("cli.ms")));
    assert_eq!(args.rowchunk, Some(7));
    // Everything else comes from the file.
    assert_eq!(args.smooth.as_deref(), Some("spline"));
    assert_eq!(args.fit_order, Some(2));
    assert_eq!(args.stat.as_deref(), Some("stddev"));
    assert_eq!(args.columns, Some(vec!["W".to_string(), "WS".to_string()]));
    assert!(args.no_normalise);
    assert!(args.args_file.is_none());
}

#[test]
fn test_merge_json_given_in_place_of_the_ms() {
    let dir = TempDir::new().unwrap();
    let arg_file = write_file(
        &dir,
        "args.json",
        indoc! {r#"
            {
                "ms": "from_file.ms",
                "mode": "curve",
                "plot_stats": true
            }
        "#},
    );
    let arg_file_str = arg_file.display().to_string();

    let args = WeightsArgs::parse_from(["weights", &arg_file_str])
        .merge()
        .unwrap();
    assert_eq!(args.ms, Some(PathBuf::from("from_file.ms")));
    assert_eq!(args.mode.as_deref(), Some("curve"));
    assert!(args.plot_stats);
}

#[test]
fn test_bad_arg_files() {
    let dir = TempDir::new().unwrap();

    let arg_file = write_file(&dir, "args.yaml", "ms: obs.ms\n");
    let arg_file_str = arg_file.display().to_string();
    let result = WeightsArgs::parse_from(["weights", "obs.ms", &arg_file_str]).merge();
    assert!(matches!(result, Err(MsNoiseError::ArgFile(_))));

    let arg_file = write_file(&dir, "args.toml", "fit_order = \"nine\"\n");
    let arg_file_str = arg_file.display().to_string();
    let result = WeightsArgs::parse_from(["weights", "obs.ms", &arg_file_str]).merge();
    assert!(matches!(result, Err(MsNoiseError::ArgFile(_))));

    let missing = dir.path().join("missing.json").display().to_string();
    let result = WeightsArgs::parse_from(["weights", "obs.ms", &missing]).merge();
    assert!(matches!(result, Err(MsNoiseError::Generic(_))));
}

#[test]
fn test_merged_args_round_trip_through_toml() {
    #[rustfmt::skip]
    let args = WeightsArgs::parse_from([
        "weights", "obs.ms",
        "--smooth", "polynomial",
        "--columns", "W", "WS",
    ]);
    let toml_str = toml::to_string(&args).unwrap();
    let from_toml: WeightsArgs = toml::from_str(&toml_str).unwrap();
    assert_eq!(from_toml.ms, args.ms);
    assert_eq!(from_toml.smooth, args.smooth);
    assert_eq!(from_toml.columns, args.columns);
}

#[test]
fn test_is_arg_file() {
    assert!(is_arg_file(std::path::Path::new("args.toml")));
    assert!(is_arg_file(std::path::Path::new("args.JSON")));
    assert!(!is_arg_file(std::path::Path::new("obs.ms")));
    assert!(!is_arg_file(std::path::Path::new("obs.ms/")));
}
