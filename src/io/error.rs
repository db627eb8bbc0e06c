// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with reading from and writing to weight stores.

use std::path::PathBuf;

use marlu::rubbl_casatables;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Supplied file path {0} does not exist or is not readable!")]
    BadFile(PathBuf),

    #[error("The measurement set was opened read only; can't modify column {column}")]
    ReadOnly { column: String },

    #[error("The store has already been closed")]
    Closed,

    #[error("Column {column} does not exist")]
    NoSuchColumn { column: String },

    #[error("Column {column} already exists with shape {existing:?}, but shape {requested:?} was requested")]
    ColumnShapeMismatch {
        column: String,
        existing: Vec<usize>,
        requested: Vec<usize>,
    },

    #[error("Weight columns must be 1- or 2-dimensional per row, but column {column} was requested with shape {shape:?}")]
    UnsupportedColumnShape { column: String, shape: Vec<usize> },

    #[error("Couldn't determine the number of correlations; the POLARIZATION table is empty and the main table has no rows")]
    NoCorrelations,

    #[error("Found a negative number of correlations ({0}) in the POLARIZATION table")]
    NegativeCorrelations(i32),

    #[error("Requested rows {row_offset}..{} but there are only {total_rows} rows", .row_offset + .num_rows)]
    RowsOutOfRange {
        row_offset: usize,
        num_rows: usize,
        total_rows: usize,
    },

    #[error("Expected {what} with shape {expected:?}, but got shape {got:?}")]
    BadShape {
        what: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Writing rows {row_offset}..{} of column {column} failed: {reason}", .row_offset + .num_rows)]
    WriteRejected {
        column: String,
        row_offset: usize,
        num_rows: usize,
        reason: String,
    },

    #[error("Flag cells in the measurement set don't all have the same shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Error when trying to interface with measurement set: {0}")]
    Table(#[from] rubbl_casatables::TableError),

    #[error("Error from casacore: {0}")]
    Casacore(#[from] rubbl_casatables::CasacoreError),
}
