// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SensitivityError {
    #[error("A sensitivity curve needs at least 2 points, but {0} were supplied")]
    TooFewPoints(usize),

    #[error("Sensitivity curve point {index} is not finite: ({freq}, {value})")]
    NotFinite { index: usize, freq: f64, value: f64 },

    #[error("Sensitivity curve point {index} has a non-positive frequency ({freq} Hz)")]
    NonPositiveFreq { index: usize, freq: f64 },

    #[error("Sensitivity curve file '{file}' doesn't have a recognised file extension! Valid extensions are: {}", *super::read::CURVE_FILE_TYPES_COMMA_SEPARATED)]
    UnknownFileType { file: PathBuf },

    #[error("Line {line} of sensitivity curve file '{file}' must contain exactly 2 values (frequency and sensitivity), but it has {num}")]
    WrongNumColumns {
        file: PathBuf,
        line: usize,
        num: usize,
    },

    #[error("Couldn't parse '{value}' on line {line} of sensitivity curve file '{file}' as a number")]
    ParseFloat {
        file: PathBuf,
        line: usize,
        value: String,
    },

    #[error("Couldn't decode json structure from {file}:\n{err}")]
    Json {
        file: PathBuf,
        err: serde_json::Error,
    },

    #[error("Couldn't decode toml structure from {file}:\n{err}")]
    Toml {
        file: PathBuf,
        err: toml::de::Error,
    },

    #[error("Couldn't decode yaml structure from {file}:\n{err}")]
    Yaml {
        file: PathBuf,
        err: serde_yaml::Error,
    },

    #[error("Couldn't read sensitivity curve file '{file}': {err}")]
    IO { file: PathBuf, err: std::io::Error },

    #[error("Cannot normalise the sensitivity curve; its maximum ({0}) is zero, negative or too close to zero")]
    NonPositiveMax(f64),

    #[error("Cannot normalise the sensitivity curve; all of its values are the same ({0})")]
    Constant(f64),

    #[error("The sensitivity curve spans {curve_min} to {curve_max}, but the measurement set spans {axis_min} Hz to {axis_max} Hz; are the curve's frequencies in Hz?")]
    UnitMismatch {
        curve_min: f64,
        curve_max: f64,
        axis_min: f64,
        axis_max: f64,
    },
}

impl SensitivityError {
    /// Is this error because of a curve that can't be normalised, rather than
    /// a curve that couldn't be read?
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            SensitivityError::NonPositiveMax(_) | SensitivityError::Constant(_)
        )
    }
}
