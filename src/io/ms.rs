// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to interface with CASA measurement sets.

use std::path::{Path, PathBuf};

use log::{debug, trace};
use marlu::rubbl_casatables::{GlueDataType, Table, TableOpenMode};
use ndarray::prelude::*;

use super::{check_row_range, MsSummary, StoreError, WeightStore};

/// Open a measurement set table. If `table` is `None`, then open the base
/// table.
fn open_table(ms: &Path, table: Option<&str>, mode: TableOpenMode) -> Result<Table, StoreError> {
    let t = Table::open(format!("{}/{}", ms.display(), table.unwrap_or("")), mode)?;
    Ok(t)
}

pub struct MsStore {
    /// The path to the measurement set on disk.
    path: PathBuf,

    /// The main table. This is `None` once the store is closed.
    main_table: Option<Table>,

    /// If true, the measurement set was opened read only and no columns can
    /// be added or written.
    read_only: bool,
}

impl MsStore {
    pub fn open<P: AsRef<Path>>(ms: P, read_only: bool) -> Result<MsStore, StoreError> {
        fn inner(ms: &Path, read_only: bool) -> Result<MsStore, StoreError> {
            debug!("Using measurement set: {}", ms.display());
            if !ms.exists() {
                return Err(StoreError::BadFile(ms.to_path_buf()));
            }

            let mode = if read_only {
                TableOpenMode::Read
            } else {
                TableOpenMode::ReadWrite
            };
            let main_table = open_table(ms, None, mode)?;
            Ok(MsStore {
                path: ms.to_path_buf(),
                main_table: Some(main_table),
                read_only,
            })
        }
        inner(ms.as_ref(), read_only)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn main_table(&mut self) -> Result<&mut Table, StoreError> {
        self.main_table.as_mut().ok_or(StoreError::Closed)
    }

    fn writable_main_table(&mut self, column: &str) -> Result<&mut Table, StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly {
                column: column.to_string(),
            });
        }
        self.main_table()
    }

    /// Get the number of correlations from the POLARIZATION table, or failing
    /// that, from the shape of the first FLAG cell.
    fn num_corrs(&mut self) -> Result<usize, StoreError> {
        if let Ok(mut pol_table) = open_table(&self.path, Some("POLARIZATION"), TableOpenMode::Read)
        {
            if pol_table.n_rows() > 0 {
                let num_corrs: i32 = pol_table.get_cell("NUM_CORR", 0)?;
                return usize::try_from(num_corrs)
                    .map_err(|_| StoreError::NegativeCorrelations(num_corrs));
            }
        }

        let main_table = self.main_table()?;
        if main_table.n_rows() == 0 {
            return Err(StoreError::NoCorrelations);
        }
        let flags: Array2<bool> = main_table.get_cell("FLAG", 0)?;
        Ok(flags.len_of(Axis(1)))
    }
}

impl WeightStore for MsStore {
    fn identifier(&self) -> String {
        // Trailing slashes would put a plot inside the measurement set.
        let s = self.path.display().to_string();
        s.trim_end_matches('/').to_string()
    }

    fn summary(&mut self) -> Result<MsSummary, StoreError> {
        let num_rows = self.main_table()?.n_rows() as usize;
        let num_corrs = self.num_corrs()?;

        let mut spw_table = open_table(&self.path, Some("SPECTRAL_WINDOW"), TableOpenMode::Read)?;
        let ref_freqs_hz: Vec<f64> = spw_table.get_col_as_vec("REF_FREQUENCY")?;
        let total_bandwidths_hz: Vec<f64> = spw_table.get_col_as_vec("TOTAL_BANDWIDTH")?;
        let num_chans: Vec<i32> = spw_table.get_col_as_vec("NUM_CHAN")?;
        debug!(
            "MS has {num_rows} rows, {num_corrs} correlations and {} spectral window(s)",
            ref_freqs_hz.len()
        );

        Ok(MsSummary {
            num_rows,
            num_corrs,
            ref_freqs_hz,
            total_bandwidths_hz,
            num_chans: num_chans.into_iter().map(i64::from).collect(),
        })
    }

    fn read_flags(
        &mut self,
        row_offset: usize,
        num_rows: usize,
    ) -> Result<Array3<bool>, StoreError> {
        let main_table = self.main_table()?;
        check_row_range(row_offset, num_rows, main_table.n_rows() as usize)?;

        // The flag array of each row is arranged [frequency][correlation].
        let mut rows = Vec::with_capacity(num_rows);
        for row in row_offset..row_offset + num_rows {
            let flags: Array2<bool> = main_table.get_cell("FLAG", row as u64)?;
            rows.push(flags);
        }
        trace!(
            "Read flags for rows {row_offset} to {}",
            row_offset + num_rows.saturating_sub(1)
        );

        let views: Vec<ArrayView2<bool>> = rows.iter().map(|a| a.view()).collect();
        let flags = ndarray::stack(Axis(0), &views)?;
        Ok(flags)
    }

    fn ensure_column(&mut self, column: &str, shape: &[usize]) -> Result<(), StoreError> {
        if !(1..=2).contains(&shape.len()) {
            return Err(StoreError::UnsupportedColumnShape {
                column: column.to_string(),
                shape: shape.to_vec(),
            });
        }

        let main_table = self.writable_main_table(column)?;
        if main_table.column_names()?.iter().any(|c| c == column) {
            debug!("Column {column} already exists");
            return Ok(());
        }

        let comment = format!(
            "added by {} {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        let shape: Vec<u64> = shape.iter().map(|&s| s as u64).collect();
        debug!("Adding column {column} with shape {shape:?}");
        main_table.add_array_column(
            GlueDataType::TpFloat,
            column,
            Some(comment.as_str()),
            Some(&shape),
            false,
            false,
        )?;
        Ok(())
    }

    fn write_spectral(
        &mut self,
        column: &str,
        data: ArrayView3<f32>,
        row_offset: usize,
    ) -> Result<(), StoreError> {
        let main_table = self.writable_main_table(column)?;
        check_row_range(row_offset, data.len_of(Axis(0)), main_table.n_rows() as usize)?;
        for (i_row, cell) in data.outer_iter().enumerate() {
            main_table.put_cell(column, (row_offset + i_row) as u64, &cell.to_owned())?;
        }
        Ok(())
    }

    fn write_scalar(
        &mut self,
        column: &str,
        data: ArrayView2<f32>,
        row_offset: usize,
    ) -> Result<(), StoreError> {
        let main_table = self.writable_main_table(column)?;
        check_row_range(row_offset, data.len_of(Axis(0)), main_table.n_rows() as usize)?;
        for (i_row, cell) in data.outer_iter().enumerate() {
            main_table.put_cell(column, (row_offset + i_row) as u64, &cell.to_owned())?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), StoreError> {
        // Dropping the table flushes and closes it.
        if self.main_table.take().is_some() {
            debug!("Closed {}", self.path.display());
        }
        Ok(())
    }
}
