// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#[cfg(test)]
mod tests;

use std::{borrow::Cow, fmt, path::PathBuf, str::FromStr};

use clap::Parser;
use itertools::Itertools;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::common::{
    display_warnings, InfoPrinter, Warn, ARG_FILE_HELP, BUILTIN_CURVE_HELP, FIT_ORDER_HELP,
    ROWCHUNK_HELP, SENSITIVITY_HELP, SMOOTH_HELP, STAT_HELP,
};
use crate::{
    cli::common::ArgFileTypes,
    constants::DEFAULT_PLOT_SUFFIX,
    estimate::{EstimateParams, EstimationMode, PlotOutput},
    fit::SmoothMethod,
    params::WeightsParams,
    sensitivity::SensitivitySource,
    write::{ReductionStat, WeightColumns},
    MsNoiseError,
};

/// How noise is estimated, as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
pub(super) enum ModeArg {
    /// From a sensitivity curve.
    #[strum(to_string = "curve", serialize = "specs")]
    Curve,

    /// From the visibilities.
    #[strum(to_string = "data", serialize = "calc")]
    Data,
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct WeightsArgs {
    /// Path to the measurement set to estimate weights for and write them
    /// into.
    #[clap(name = "MS", parse(from_os_str))]
    pub(super) ms: Option<PathBuf>,

    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// How the visibility noise is estimated; "curve" uses a sensitivity
    /// curve, "data" uses the visibilities themselves (not yet available).
    /// Default: curve
    #[clap(long, help_heading = "NOISE ESTIMATION")]
    pub(super) mode: Option<String>,

    #[clap(short, long, help = SENSITIVITY_HELP.as_str(), help_heading = "NOISE ESTIMATION")]
    pub(super) sensitivity: Option<PathBuf>,

    #[clap(long, help = BUILTIN_CURVE_HELP.as_str(), help_heading = "NOISE ESTIMATION")]
    pub(super) builtin_curve: Option<String>,

    /// Don't divide the sensitivity curve by its maximum before fitting it.
    #[clap(long, help_heading = "NOISE ESTIMATION")]
    #[serde(default)]
    pub(super) no_normalise: bool,

    #[clap(long, help = SMOOTH_HELP.as_str(), help_heading = "NOISE ESTIMATION")]
    pub(super) smooth: Option<String>,

    #[clap(long, help = FIT_ORDER_HELP.as_str(), help_heading = "NOISE ESTIMATION")]
    pub(super) fit_order: Option<usize>,

    /// Plot the sensitivity curve, its fit and the weights to
    /// "<MS>-noise_weights.png".
    #[clap(long, help_heading = "PLOTTING")]
    #[serde(default)]
    pub(super) plot_stats: bool,

    /// Plot to this file rather than the default. Implies --plot-stats.
    #[clap(long, help_heading = "PLOTTING")]
    pub(super) plot_file: Option<PathBuf>,

    /// The columns to write the scalar (per-correlation) and spectral
    /// (per-channel and correlation) weights into. They are created if they
    /// don't exist. Default: WEIGHT WEIGHT_SPECTRUM
    #[clap(
        long,
        number_of_values = 2,
        value_names = &["SCALAR", "SPECTRAL"],
        help_heading = "OUTPUT"
    )]
    pub(super) columns: Option<Vec<String>>,

    #[clap(long, help = STAT_HELP.as_str(), help_heading = "OUTPUT")]
    pub(super) stat: Option<String>,

    #[clap(long, help = ROWCHUNK_HELP.as_str(), help_heading = "OUTPUT")]
    pub(super) rowchunk: Option<usize>,
}

impl WeightsArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// If no arguments file was given but the "measurement set" has an
    /// argument-file extension, it is used as the arguments file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<WeightsArgs, MsNoiseError> {
        debug!("Merging command-line arguments with the argument file");

        let mut cli_args = self;
        if cli_args.args_file.is_none() && cli_args.ms.as_deref().map_or(false, is_arg_file) {
            cli_args.args_file = cli_args.ms.take();
        }

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let WeightsArgs {
                ms,
                args_file: _,
                mode,
                sensitivity,
                builtin_curve,
                no_normalise,
                smooth,
                fit_order,
                plot_stats,
                plot_file,
                columns,
                stat,
                rowchunk,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(WeightsArgs {
                ms: cli_args.ms.or(ms),
                args_file: None,
                mode: cli_args.mode.or(mode),
                sensitivity: cli_args.sensitivity.or(sensitivity),
                builtin_curve: cli_args.builtin_curve.or(builtin_curve),
                no_normalise: cli_args.no_normalise || no_normalise,
                smooth: cli_args.smooth.or(smooth),
                fit_order: cli_args.fit_order.or(fit_order),
                plot_stats: cli_args.plot_stats || plot_stats,
                plot_file: cli_args.plot_file.or(plot_file),
                columns: cli_args.columns.or(columns),
                stat: cli_args.stat.or(stat),
                rowchunk: cli_args.rowchunk.or(rowchunk),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<WeightsParams, MsNoiseError> {
        debug!("{:#?}", self);

        let Self {
            ms,
            args_file: _,
            mode,
            sensitivity,
            builtin_curve,
            no_normalise,
            smooth,
            fit_order,
            plot_stats,
            plot_file,
            columns,
            stat,
            rowchunk,
        } = self;

        let ms = ms.ok_or(WeightsArgsError::NoMeasurementSet)?;
        let mut printer = InfoPrinter::new("Weight estimation".into());
        printer.push_line(format!("Measurement set: {}", ms.display()).into());

        let mode = match mode {
            Some(s) => parse_choice::<ModeArg>("estimation mode", &s)?,
            None => ModeArg::Curve,
        };
        let mode = match mode {
            ModeArg::Data => {
                if sensitivity.is_some() || builtin_curve.is_some() {
                    "Estimating noise from the data doesn't use a sensitivity curve; ignoring it"
                        .warn();
                }
                printer.push_line("Noise from: the visibilities".into());
                EstimationMode::FromData
            }

            ModeArg::Curve => {
                let source = match (sensitivity, builtin_curve) {
                    (Some(file), builtin) => {
                        if let Some(builtin) = builtin {
                            format!("A sensitivity file was supplied; ignoring the built-in curve '{builtin}'").warn();
                        }
                        if !file.exists() {
                            return Err(WeightsArgsError::MissingSensitivityFile(file).into());
                        }
                        SensitivitySource::File(file)
                    }
                    (None, Some(name)) => {
                        SensitivitySource::Builtin(parse_choice("built-in curve", &name)?)
                    }
                    (None, None) => SensitivitySource::default(),
                };
                printer.push_line(format!("Noise from: {source}").into());
                EstimationMode::Curve(source)
            }
        };

        let smooth = match smooth {
            Some(s) => parse_choice::<SmoothMethod>("smoothing method", &s)?,
            None => SmoothMethod::default(),
        };
        let mut estimate = EstimateParams {
            mode,
            normalise: !no_normalise,
            smooth,
            plot: match plot_file {
                Some(file) => PlotOutput::Path(file),
                None if plot_stats => PlotOutput::Default,
                None => PlotOutput::None,
            },
            ..Default::default()
        };
        if let Some(fit_order) = fit_order {
            estimate.fit_order = fit_order;
        }
        let fit_label = match smooth {
            SmoothMethod::Polynomial => "order",
            SmoothMethod::Spline => "smoothing factor",
        };
        printer.push_block(vec![
            format!("Smoothing: {smooth} ({fit_label} {})", estimate.fit_order).into(),
            format!("Normalise curve: {}", estimate.normalise).into(),
        ]);
        if cfg!(not(feature = "plotting")) && estimate.plot != PlotOutput::None {
            "This program was not compiled with the \"plotting\" feature; no plot will be made"
                .warn();
            estimate.plot = PlotOutput::None;
        }
        match &estimate.plot {
            PlotOutput::None => (),
            PlotOutput::Default => {
                printer.push_line(format!("Plot: {}{DEFAULT_PLOT_SUFFIX}", ms.display()).into())
            }
            PlotOutput::Path(p) => printer.push_line(format!("Plot: {}", p.display()).into()),
        }

        let columns = match columns {
            None => WeightColumns::default(),
            Some(columns) => match <[String; 2]>::try_from(columns) {
                Ok([scalar, spectral]) => {
                    if scalar == spectral {
                        return Err(WeightsArgsError::SameColumns(scalar).into());
                    }
                    WeightColumns { scalar, spectral }
                }
                Err(columns) => {
                    return Err(WeightsArgsError::WrongNumColumns(columns.len()).into())
                }
            },
        };
        let stat = match stat {
            Some(s) => parse_choice::<ReductionStat>("statistic", &s)?,
            None => ReductionStat::default(),
        };
        if rowchunk == Some(0) {
            return Err(WeightsArgsError::ZeroRowChunk.into());
        }
        let mut output_block: Vec<Cow<'static, str>> = vec![
            format!("Spectral weight column: {}", columns.spectral).into(),
            format!("Scalar weight column: {} ({stat})", columns.scalar).into(),
        ];
        if let Some(rowchunk) = rowchunk {
            output_block.push(format!("Rows per chunk: {rowchunk}").into());
        }
        printer.push_block(output_block);

        printer.display();
        display_warnings();

        Ok(WeightsParams {
            ms,
            estimate,
            columns,
            stat,
            row_chunk: rowchunk,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), MsNoiseError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;
        params.run(dry_run)?;
        Ok(())
    }
}

/// Does this path look like an arguments file?
fn is_arg_file(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ArgFileTypes::from_str(&e.to_lowercase()).is_ok())
        .unwrap_or(false)
}

fn parse_choice<T>(what: &'static str, s: &str) -> Result<T, WeightsArgsError>
where
    T: FromStr + IntoEnumIterator + fmt::Display,
{
    T::from_str(&s.to_lowercase()).map_err(|_| WeightsArgsError::InvalidChoice {
        what,
        got: s.to_string(),
        valid: T::iter().join(", "),
    })
}

#[derive(thiserror::Error, Debug)]
pub(super) enum WeightsArgsError {
    #[error("No measurement set was specified")]
    NoMeasurementSet,

    #[error("'{got}' is not a valid {what}; valid choices are: {valid}")]
    InvalidChoice {
        what: &'static str,
        got: String,
        valid: String,
    },

    #[error("Sensitivity curve file {0} does not exist or is not readable")]
    MissingSensitivityFile(PathBuf),

    #[error("Exactly 2 weight columns (scalar and spectral) must be given, but {0} were given")]
    WrongNumColumns(usize),

    #[error("The scalar and spectral weights can't both be written to column {0}")]
    SameColumns(String),

    #[error("The row chunk size must be at least 1")]
    ZeroRowChunk,
}
