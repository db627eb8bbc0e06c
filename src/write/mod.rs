// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writing per-channel weights into the weight columns of a [`WeightStore`].
//!
//! Rows are written in chunks. For each chunk, the weights are repeated over
//! rows and correlations and written to the spectral column; the same cube,
//! with flagged samples masked out, is then reduced over channels and written
//! to the scalar column. Chunks that were written before a failure are kept.

mod error;

pub use error::WriteError;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info, warn};
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    constants::{
        DEFAULT_NUM_ROW_CHUNKS, DEFAULT_SCALAR_WEIGHT_COLUMN, DEFAULT_SPECTRAL_WEIGHT_COLUMN,
    },
    io::{StoreError, WeightStore},
    math::{broadcast_weights, masked_std_axis1, masked_sum_axis1},
    PROGRESS_BARS,
};

/// The names of the columns that weights are written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightColumns {
    /// One weight per row and correlation.
    pub scalar: String,

    /// One weight per row, channel and correlation.
    pub spectral: String,
}

impl Default for WeightColumns {
    fn default() -> Self {
        WeightColumns {
            scalar: DEFAULT_SCALAR_WEIGHT_COLUMN.to_string(),
            spectral: DEFAULT_SPECTRAL_WEIGHT_COLUMN.to_string(),
        }
    }
}

/// How the spectral weights of a row are reduced to scalar weights.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
pub enum ReductionStat {
    #[default]
    #[strum(to_string = "sum")]
    #[serde(rename = "sum")]
    Sum,

    /// The population standard deviation.
    #[strum(to_string = "stddev", serialize = "std")]
    #[serde(rename = "stddev", alias = "std")]
    StdDev,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub num_chunks: usize,
    pub num_rows: usize,
}

/// Describe a chunk of rows with an inclusive end, e.g. "rows 0 to 9".
fn row_range(row_offset: usize, num_rows: usize) -> String {
    format!("rows {row_offset} to {}", row_offset + num_rows.saturating_sub(1))
}

/// The number of rows written at a time when none is specified. There are
/// [`DEFAULT_NUM_ROW_CHUNKS`] chunks, unless there are fewer rows than that.
pub fn default_row_chunk(num_rows: usize) -> usize {
    (num_rows / DEFAULT_NUM_ROW_CHUNKS).max(1)
}

/// Write `weights` (one per channel) to the weight columns of `store`,
/// creating the columns if necessary. The store is closed afterwards, even if
/// writing failed.
pub fn write_weights<S: WeightStore + ?Sized>(
    store: &mut S,
    weights: ArrayView1<f64>,
    columns: &WeightColumns,
    stat: ReductionStat,
    row_chunk: Option<usize>,
) -> Result<WriteSummary, WriteError> {
    let result = write_chunks(store, weights, columns, stat, row_chunk);
    let close_result = store.close();
    match (result, close_result) {
        (Err(e), close_result) => {
            if let Err(close_err) = close_result {
                warn!("Couldn't close {} after a failed write: {close_err}", store.identifier());
            }
            Err(e)
        }
        (Ok(_), Err(close_err)) => Err(WriteError::from(close_err)),
        (Ok(summary), Ok(())) => Ok(summary),
    }
}

fn write_chunks<S: WeightStore + ?Sized>(
    store: &mut S,
    weights: ArrayView1<f64>,
    columns: &WeightColumns,
    stat: ReductionStat,
    row_chunk: Option<usize>,
) -> Result<WriteSummary, WriteError> {
    let summary = store.summary()?;
    let num_rows = summary.num_rows;
    let num_corrs = summary.num_corrs;
    let num_chans = summary.total_num_chans();
    if weights.len() != num_chans {
        return Err(WriteError::WeightsLength {
            num_weights: weights.len(),
            num_chans,
        });
    }
    let row_chunk = match row_chunk {
        Some(0) => return Err(WriteError::ZeroRowChunk),
        Some(c) => c,
        None => default_row_chunk(num_rows),
    };

    store.ensure_column(&columns.scalar, &[num_corrs])?;
    store.ensure_column(&columns.spectral, &[num_chans, num_corrs])?;

    let num_chunks = num_rows.div_ceil(row_chunk);
    info!(
        "Writing {} weights to {num_rows} rows in {num_chunks} chunks of up to {row_chunk} rows",
        stat
    );
    let draw_target = if PROGRESS_BARS.load() {
        ProgressDrawTarget::stdout()
    } else {
        ProgressDrawTarget::hidden()
    };
    let progress = ProgressBar::with_draw_target(Some(num_chunks as _), draw_target)
        .with_style(
            ProgressStyle::default_bar()
                .template("{msg:17}: [{wide_bar:.blue}] {pos:2}/{len:2} chunks ({elapsed_precise}<{eta_precise})").unwrap()
                .progress_chars("=> "),
        )
        .with_position(0)
        .with_message("Writing weights");

    for row_offset in (0..num_rows).step_by(row_chunk) {
        let chunk_rows = row_chunk.min(num_rows - row_offset);
        let cube = broadcast_weights(weights, chunk_rows, num_corrs);
        let flags = store.read_flags(row_offset, chunk_rows)?;
        if flags.dim() != cube.dim() {
            return Err(StoreError::BadShape {
                what: format!("flags of {}", row_range(row_offset, chunk_rows)),
                expected: cube.shape().to_vec(),
                got: flags.shape().to_vec(),
            }
            .into());
        }

        debug!(
            "Populating {} column ({})",
            columns.spectral,
            row_range(row_offset, chunk_rows)
        );
        store.write_spectral(&columns.spectral, cube.view(), row_offset)?;

        let reduced = match stat {
            ReductionStat::Sum => masked_sum_axis1(cube.view(), flags.view()),
            ReductionStat::StdDev => masked_std_axis1(cube.view(), flags.view()),
        };
        debug!(
            "Populating {} column ({})",
            columns.scalar,
            row_range(row_offset, chunk_rows)
        );
        store.write_scalar(&columns.scalar, reduced.view(), row_offset)?;

        progress.inc(1);
    }
    progress.abandon_with_message("Finished writing weights");

    Ok(WriteSummary {
        num_chunks,
        num_rows,
    })
}
