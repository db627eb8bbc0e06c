// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A [`WeightStore`] held entirely in memory.
//!
//! Every operation is recorded, and writes can be made to fail from a given
//! row onwards, so the order and extent of writes can be inspected.

use std::collections::BTreeMap;

use log::trace;
use ndarray::prelude::*;

use super::{check_row_range, MsSummary, StoreError, WeightStore};

/// An operation performed on a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Summary,
    ReadFlags {
        row_offset: usize,
        num_rows: usize,
    },
    EnsureColumn {
        column: String,
        created: bool,
    },
    WriteSpectral {
        column: String,
        row_offset: usize,
        num_rows: usize,
    },
    WriteScalar {
        column: String,
        row_offset: usize,
        num_rows: usize,
    },
    Close,
}

#[derive(Debug, Clone)]
enum Column {
    /// (row, correlation)
    Scalar(Array2<f32>),
    /// (row, channel, correlation)
    Spectral(Array3<f32>),
}

impl Column {
    fn cell_shape(&self) -> Vec<usize> {
        match self {
            Column::Scalar(a) => a.shape()[1..].to_vec(),
            Column::Spectral(a) => a.shape()[1..].to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryStore {
    name: String,
    summary: MsSummary,

    /// (row, channel, correlation)
    flags: Array3<bool>,

    columns: BTreeMap<String, Column>,
    ops: Vec<StoreOp>,

    /// Writes starting at or beyond this row are rejected.
    fail_writes_from_row: Option<usize>,

    closed: bool,
}

impl MemoryStore {
    /// Make a new store. The flags must have dimensions (row, channel,
    /// correlation) consistent with the summary.
    pub fn new(
        name: &str,
        summary: MsSummary,
        flags: Array3<bool>,
    ) -> Result<MemoryStore, StoreError> {
        let expected = vec![
            summary.num_rows,
            summary.total_num_chans(),
            summary.num_corrs,
        ];
        if flags.shape() != expected.as_slice() {
            return Err(StoreError::BadShape {
                what: "flags".to_string(),
                expected,
                got: flags.shape().to_vec(),
            });
        }

        Ok(MemoryStore {
            name: name.to_string(),
            summary,
            flags,
            columns: BTreeMap::new(),
            ops: vec![],
            fail_writes_from_row: None,
            closed: false,
        })
    }

    /// Make a store whose rows are all unflagged.
    pub fn unflagged(name: &str, summary: MsSummary) -> MemoryStore {
        let flags = Array3::from_elem(
            (
                summary.num_rows,
                summary.total_num_chans(),
                summary.num_corrs,
            ),
            false,
        );
        MemoryStore {
            name: name.to_string(),
            summary,
            flags,
            columns: BTreeMap::new(),
            ops: vec![],
            fail_writes_from_row: None,
            closed: false,
        }
    }

    /// Reject every write that starts at or beyond `row`.
    pub fn fail_writes_from_row(mut self, row: usize) -> MemoryStore {
        self.fail_writes_from_row = Some(row);
        self
    }

    pub fn flags_mut(&mut self) -> ArrayViewMut3<bool> {
        self.flags.view_mut()
    }

    /// All operations performed on this store, in order.
    pub fn ops(&self) -> &[StoreOp] {
        &self.ops
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The contents of a spectral column, if it exists.
    pub fn spectral_column(&self, column: &str) -> Option<ArrayView3<f32>> {
        match self.columns.get(column) {
            Some(Column::Spectral(a)) => Some(a.view()),
            _ => None,
        }
    }

    /// The contents of a scalar column, if it exists.
    pub fn scalar_column(&self, column: &str) -> Option<ArrayView2<f32>> {
        match self.columns.get(column) {
            Some(Column::Scalar(a)) => Some(a.view()),
            _ => None,
        }
    }

    fn check_open(&self) -> Result<(), StoreError> {
        if self.closed {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }

    fn check_write(
        &self,
        column: &str,
        row_offset: usize,
        num_rows: usize,
        cell_shape: &[usize],
    ) -> Result<(), StoreError> {
        self.check_open()?;
        check_row_range(row_offset, num_rows, self.summary.num_rows)?;
        let existing = self
            .columns
            .get(column)
            .ok_or_else(|| StoreError::NoSuchColumn {
                column: column.to_string(),
            })?
            .cell_shape();
        if existing != cell_shape {
            return Err(StoreError::BadShape {
                what: format!("cells of column {column}"),
                expected: existing,
                got: cell_shape.to_vec(),
            });
        }
        if let Some(fail_row) = self.fail_writes_from_row {
            if row_offset >= fail_row {
                return Err(StoreError::WriteRejected {
                    column: column.to_string(),
                    row_offset,
                    num_rows,
                    reason: format!("writes from row {fail_row} are rejected"),
                });
            }
        }
        Ok(())
    }
}

impl WeightStore for MemoryStore {
    fn identifier(&self) -> String {
        self.name.clone()
    }

    fn summary(&mut self) -> Result<MsSummary, StoreError> {
        self.check_open()?;
        self.ops.push(StoreOp::Summary);
        Ok(self.summary.clone())
    }

    fn read_flags(
        &mut self,
        row_offset: usize,
        num_rows: usize,
    ) -> Result<Array3<bool>, StoreError> {
        self.check_open()?;
        check_row_range(row_offset, num_rows, self.summary.num_rows)?;
        self.ops.push(StoreOp::ReadFlags {
            row_offset,
            num_rows,
        });
        Ok(self
            .flags
            .slice(s![row_offset..row_offset + num_rows, .., ..])
            .to_owned())
    }

    fn ensure_column(&mut self, column: &str, shape: &[usize]) -> Result<(), StoreError> {
        self.check_open()?;
        if let Some(existing) = self.columns.get(column) {
            let existing = existing.cell_shape();
            if existing != shape {
                return Err(StoreError::ColumnShapeMismatch {
                    column: column.to_string(),
                    existing,
                    requested: shape.to_vec(),
                });
            }
            self.ops.push(StoreOp::EnsureColumn {
                column: column.to_string(),
                created: false,
            });
            return Ok(());
        }

        let num_rows = self.summary.num_rows;
        let new_column = match *shape {
            [num_corrs] => Column::Scalar(Array2::zeros((num_rows, num_corrs))),
            [num_chans, num_corrs] => {
                Column::Spectral(Array3::zeros((num_rows, num_chans, num_corrs)))
            }
            _ => {
                return Err(StoreError::UnsupportedColumnShape {
                    column: column.to_string(),
                    shape: shape.to_vec(),
                })
            }
        };
        trace!("Created in-memory column {column} with shape {shape:?}");
        self.columns.insert(column.to_string(), new_column);
        self.ops.push(StoreOp::EnsureColumn {
            column: column.to_string(),
            created: true,
        });
        Ok(())
    }

    fn write_spectral(
        &mut self,
        column: &str,
        data: ArrayView3<f32>,
        row_offset: usize,
    ) -> Result<(), StoreError> {
        let num_rows = data.len_of(Axis(0));
        self.check_write(column, row_offset, num_rows, &data.shape()[1..])?;
        if let Some(Column::Spectral(a)) = self.columns.get_mut(column) {
            a.slice_mut(s![row_offset..row_offset + num_rows, .., ..])
                .assign(&data);
        }
        self.ops.push(StoreOp::WriteSpectral {
            column: column.to_string(),
            row_offset,
            num_rows,
        });
        Ok(())
    }

    fn write_scalar(
        &mut self,
        column: &str,
        data: ArrayView2<f32>,
        row_offset: usize,
    ) -> Result<(), StoreError> {
        let num_rows = data.len_of(Axis(0));
        self.check_write(column, row_offset, num_rows, &data.shape()[1..])?;
        if let Some(Column::Scalar(a)) = self.columns.get_mut(column) {
            a.slice_mut(s![row_offset..row_offset + num_rows, ..])
                .assign(&data);
        }
        self.ops.push(StoreOp::WriteScalar {
            column: column.to_string(),
            row_offset,
            num_rows,
        });
        Ok(())
    }

    fn close(&mut self) -> Result<(), StoreError> {
        if !self.closed {
            self.closed = true;
            self.ops.push(StoreOp::Close);
        }
        Ok(())
    }
}
