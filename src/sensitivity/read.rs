// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading sensitivity curves from files.
//!
//! Plain-text files have one (frequency \[Hz\], sensitivity) pair per line,
//! separated by whitespace and/or a comma. Blank lines and anything after a `#`
//! are ignored. json and yaml files contain a list of pairs, and toml files put
//! that list under the key "curve".

use std::{path::Path, str::FromStr};

use itertools::Itertools;
use log::debug;
use serde::Deserialize;
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString};

use super::SensitivityError;

lazy_static::lazy_static! {
    pub(crate) static ref CURVE_FILE_TYPES_COMMA_SEPARATED: String = CurveFileType::iter()
        .flat_map(|t| t.extensions().iter())
        .join(", ");
}

#[derive(Debug, Clone, Copy, EnumIter, EnumString)]
pub(crate) enum CurveFileType {
    #[strum(serialize = "txt", serialize = "dat", serialize = "csv", serialize = "tsv")]
    Text,
    #[strum(serialize = "json")]
    Json,
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "yaml", serialize = "yml")]
    Yaml,
}

impl CurveFileType {
    fn extensions(self) -> &'static [&'static str] {
        match self {
            CurveFileType::Text => &["txt", "dat", "csv", "tsv"],
            CurveFileType::Json => &["json"],
            CurveFileType::Toml => &["toml"],
            CurveFileType::Yaml => &["yaml", "yml"],
        }
    }
}

#[derive(Deserialize)]
struct TomlCurve {
    curve: Vec<[f64; 2]>,
}

/// Read the (frequency, sensitivity) pairs out of a file. No validation of the
/// values is done here.
pub(super) fn read_curve_file(file: &Path) -> Result<Vec<[f64; 2]>, SensitivityError> {
    let file_type = file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .and_then(|e| CurveFileType::from_str(&e).ok())
        .ok_or_else(|| SensitivityError::UnknownFileType {
            file: file.to_path_buf(),
        })?;
    debug!(
        "Reading sensitivity curve file {} as {file_type:?}",
        file.display()
    );

    let contents = std::fs::read_to_string(file).map_err(|err| SensitivityError::IO {
        file: file.to_path_buf(),
        err,
    })?;
    match file_type {
        CurveFileType::Text => parse_text(&contents, file),
        CurveFileType::Json => {
            serde_json::from_str(&contents).map_err(|err| SensitivityError::Json {
                file: file.to_path_buf(),
                err,
            })
        }
        CurveFileType::Toml => toml::from_str::<TomlCurve>(&contents)
            .map(|t| t.curve)
            .map_err(|err| SensitivityError::Toml {
                file: file.to_path_buf(),
                err,
            }),
        CurveFileType::Yaml => {
            serde_yaml::from_str(&contents).map_err(|err| SensitivityError::Yaml {
                file: file.to_path_buf(),
                err,
            })
        }
    }
}

fn parse_text(contents: &str, file: &Path) -> Result<Vec<[f64; 2]>, SensitivityError> {
    let mut pairs = vec![];
    for (i_line, line) in contents.lines().enumerate() {
        let line = match line.split_once('#') {
            Some((before, _)) => before,
            None => line,
        };
        let values: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .collect();
        match values.as_slice() {
            [] => continue,
            [freq, value] => {
                let parse = |s: &str| {
                    s.parse::<f64>().map_err(|_| SensitivityError::ParseFloat {
                        file: file.to_path_buf(),
                        line: i_line + 1,
                        value: s.to_string(),
                    })
                };
                pairs.push([parse(freq)?, parse(value)?]);
            }
            _ => {
                return Err(SensitivityError::WrongNumColumns {
                    file: file.to_path_buf(),
                    line: i_line + 1,
                    num: values.len(),
                })
            }
        }
    }

    Ok(pairs)
}
