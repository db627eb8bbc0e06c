// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests of the command-line interface that don't need a measurement set.

use std::fs::read_to_string;

use tempfile::TempDir;

use crate::{get_cmd_output, ms_noise_weights};

#[test]
fn test_help() {
    let cmd = ms_noise_weights().arg("--help").ok();
    assert!(cmd.is_ok());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("weights"));
    assert!(stdout.contains("curves"));

    let cmd = ms_noise_weights().args(["weights", "--help"]).ok();
    assert!(cmd.is_ok());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("--rowchunk"));
    assert!(stdout.contains("--fit-order"));
}

#[test]
fn test_alias() {
    let cmd = ms_noise_weights()
        .args(["estimate-weights", "--help"])
        .ok();
    assert!(cmd.is_ok());
}

#[test]
fn test_missing_ms() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let ms = tmp_dir.path().join("missing.ms");
    let cmd = ms_noise_weights()
        .args(["--no-progress-bars", "weights", &ms.display().to_string()])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error: Supplied file path"), "{stderr}");
}

#[test]
fn test_invalid_statistic() {
    let cmd = ms_noise_weights()
        .args(["weights", "obs.ms", "--stat", "median"])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("'median' is not a valid statistic"), "{stderr}");
}

#[test]
fn test_bad_arg_file_extension() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let arg_file = tmp_dir.path().join("args.yaml");
    std::fs::write(&arg_file, "rowchunk: 5\n").unwrap();
    let cmd = ms_noise_weights()
        .args(["weights", "obs.ms", &arg_file.display().to_string()])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(
        stderr.contains("doesn't have a recognised file extension"),
        "{stderr}"
    );
}

#[test]
fn test_save_toml() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let ms = tmp_dir.path().join("missing.ms");
    let toml = tmp_dir.path().join("args.toml");
    #[rustfmt::skip]
    let cmd = ms_noise_weights()
        .args([
            "--dry-run",
            "--save-toml", &toml.display().to_string(),
            "weights", &ms.display().to_string(),
            "--rowchunk", "5",
            "--stat", "stddev",
        ])
        .ok();
    // There's no measurement set, but the arguments are saved before it is
    // needed.
    assert!(cmd.is_err());
    let contents = read_to_string(&toml).unwrap();
    assert!(contents.contains("rowchunk = 5"), "{contents}");
    assert!(contents.contains("stat = \"stddev\""), "{contents}");

    // The saved arguments can be used as an arguments file.
    let cmd = ms_noise_weights()
        .args(["--dry-run", "weights", &toml.display().to_string()])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error: Supplied file path"), "{stderr}");
}
