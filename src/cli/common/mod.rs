// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Things shared between command-line interfaces, e.g. argument files and
//! pretty printers.

mod printers;
#[cfg(test)]
mod tests;

pub(super) use printers::InfoPrinter;
pub(crate) use printers::{display_warnings, Warn};
#[cfg(test)]
pub(super) use printers::num_pending_warnings;

use itertools::Itertools;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    constants::{DEFAULT_FIT_ORDER, DEFAULT_NUM_ROW_CHUNKS},
    fit::SmoothMethod,
    sensitivity::{BuiltinCurve, CURVE_FILE_TYPES_COMMA_SEPARATED},
    write::ReductionStat,
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    pub(super) static ref SENSITIVITY_HELP: String =
        format!("A file of (frequency [Hz], sensitivity) pairs, e.g. SEFD against frequency. Supported formats: {}", *CURVE_FILE_TYPES_COMMA_SEPARATED);

    pub(super) static ref BUILTIN_CURVE_HELP: String =
        format!("Use a sensitivity curve built into this program. Ignored if a sensitivity file is given. Valid curves are: {}. Default: {}", BuiltinCurve::iter().join(", "), BuiltinCurve::default());

    pub(super) static ref SMOOTH_HELP: String =
        format!("How the sensitivity curve is smoothed before it is evaluated at each channel. Valid methods are: {}. Default: {}", SmoothMethod::iter().join(", "), SmoothMethod::default());

    pub(super) static ref FIT_ORDER_HELP: String =
        format!("The order of the polynomial fit, or the smoothing factor of the spline fit. Default: {DEFAULT_FIT_ORDER}");

    pub(super) static ref STAT_HELP: String =
        format!("The statistic used to reduce each row's spectral weights (excluding flagged samples) to scalar weights. Valid statistics are: {}. Default: {}", ReductionStat::iter().join(", "), ReductionStat::default());

    pub(super) static ref ROWCHUNK_HELP: String =
        format!("The number of rows written at a time. Default: the number of rows divided by {DEFAULT_NUM_ROW_CHUNKS}");
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(MsNoiseError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(MsNoiseError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(MsNoiseError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}
