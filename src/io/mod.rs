// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read metadata and flags from, and write weights to, a store of
//! visibilities (normally a measurement set).

mod error;
mod memory;
mod ms;

pub use error::StoreError;
pub use memory::{MemoryStore, StoreOp};
pub use ms::MsStore;

use ndarray::prelude::*;
use serde::Serialize;

use crate::freqs::{FreqAxis, FreqAxisError};

/// The metadata of a store needed to estimate and write weights. The
/// per-spectral-window values are kept as they appear in the store; they are
/// validated when a [`FreqAxis`] is made from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MsSummary {
    /// The number of rows in the main table.
    pub num_rows: usize,

    /// The number of correlations (polarisations) per visibility.
    pub num_corrs: usize,

    /// The frequency of the first channel of each spectral window \[Hz\].
    pub ref_freqs_hz: Vec<f64>,

    /// The total bandwidth of each spectral window \[Hz\].
    pub total_bandwidths_hz: Vec<f64>,

    /// The number of channels in each spectral window.
    pub num_chans: Vec<i64>,
}

impl MsSummary {
    pub fn freq_axis(&self) -> Result<FreqAxis, FreqAxisError> {
        FreqAxis::from_columns(
            &self.ref_freqs_hz,
            &self.total_bandwidths_hz,
            &self.num_chans,
        )
    }

    /// The total number of channels over all spectral windows. Negative
    /// channel counts don't contribute.
    pub fn total_num_chans(&self) -> usize {
        self.num_chans
            .iter()
            .map(|&n| usize::try_from(n).unwrap_or(0))
            .sum()
    }
}

/// A narrow interface to something that holds visibility flags and weight
/// columns. All methods take `&mut self`; the underlying tables are stateful.
pub trait WeightStore {
    /// Something identifying this store, e.g. the path to a measurement set.
    /// Diagnostic plots are named after it.
    fn identifier(&self) -> String;

    fn summary(&mut self) -> Result<MsSummary, StoreError>;

    /// Read flags for `num_rows` rows starting at `row_offset`. The returned
    /// array has dimensions (row, channel, correlation); `true` means flagged.
    fn read_flags(&mut self, row_offset: usize, num_rows: usize)
        -> Result<Array3<bool>, StoreError>;

    /// Create a single-precision float column with the given per-row shape if
    /// it doesn't already exist. A shape with one element is a per-correlation
    /// column, a shape with two is (channel, correlation). Calling this again
    /// with the same arguments does nothing.
    fn ensure_column(&mut self, column: &str, shape: &[usize]) -> Result<(), StoreError>;

    /// Write (row, channel, correlation) weights to a column, starting at
    /// `row_offset`.
    fn write_spectral(
        &mut self,
        column: &str,
        data: ArrayView3<f32>,
        row_offset: usize,
    ) -> Result<(), StoreError>;

    /// Write (row, correlation) weights to a column, starting at `row_offset`.
    fn write_scalar(
        &mut self,
        column: &str,
        data: ArrayView2<f32>,
        row_offset: usize,
    ) -> Result<(), StoreError>;

    /// Release the store. Nothing else may be done with it afterwards.
    fn close(&mut self) -> Result<(), StoreError>;
}

/// Check that `num_rows` rows from `row_offset` fit in a store with
/// `total_rows` rows.
fn check_row_range(
    row_offset: usize,
    num_rows: usize,
    total_rows: usize,
) -> Result<(), StoreError> {
    match row_offset.checked_add(num_rows) {
        Some(end) if end <= total_rows => Ok(()),
        _ => Err(StoreError::RowsOutOfRange {
            row_offset,
            num_rows,
            total_rows,
        }),
    }
}
