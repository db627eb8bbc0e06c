// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use log::{debug, info, warn};
use thiserror::Error;

use crate::{
    constants::HZ_PER_MHZ,
    estimate::{EstimateError, EstimateParams, NoiseEstimator, NoiseWeights},
    io::{MsStore, StoreError, WeightStore},
    write::{write_weights, ReductionStat, WeightColumns, WriteError, WriteSummary},
};

pub(crate) struct WeightsParams {
    pub(crate) ms: PathBuf,
    pub(crate) estimate: EstimateParams,
    pub(crate) columns: WeightColumns,
    pub(crate) stat: ReductionStat,

    /// If `None`, a tenth of the rows are written at a time.
    pub(crate) row_chunk: Option<usize>,
}

impl WeightsParams {
    /// Estimate weights for the measurement set and, unless this is a dry run,
    /// write them. A dry run opens the measurement set read only.
    pub(crate) fn run(&self, dry_run: bool) -> Result<Option<WriteSummary>, WeightsRunError> {
        let mut store = MsStore::open(&self.ms, dry_run)?;
        self.run_on_store(&mut store, dry_run)
    }

    pub(crate) fn run_on_store<S: WeightStore + ?Sized>(
        &self,
        store: &mut S,
        dry_run: bool,
    ) -> Result<Option<WriteSummary>, WeightsRunError> {
        let NoiseWeights { noise, weights } = match self.estimate(store) {
            Ok(nw) => nw,
            Err(e) => {
                if let Err(close_err) = store.close() {
                    warn!("Couldn't close {}: {close_err}", store.identifier());
                }
                return Err(e);
            }
        };

        let (min_noise, max_noise) = min_max(noise.iter().copied());
        let (min_weight, max_weight) = min_max(weights.iter().copied());
        info!("Noise ranges from {min_noise:.4} to {max_noise:.4}");
        info!("Weights range from {min_weight:.4} to {max_weight:.4}");

        if dry_run {
            info!("Dry run -- not writing weights.");
            store.close()?;
            return Ok(None);
        }

        let summary = write_weights(
            store,
            weights.view(),
            &self.columns,
            self.stat,
            self.row_chunk,
        )?;
        info!(
            "Wrote weights to columns {} and {} of {} ({} rows in {} chunks)",
            self.columns.scalar,
            self.columns.spectral,
            store.identifier(),
            summary.num_rows,
            summary.num_chunks
        );
        Ok(Some(summary))
    }

    fn estimate<S: WeightStore + ?Sized>(&self, store: &mut S) -> Result<NoiseWeights, WeightsRunError> {
        let estimator = NoiseEstimator::from_store(store)?;
        let axis = estimator.freq_axis();
        info!(
            "{} has {} channels in {} spectral windows, from {:.3} to {:.3} MHz",
            store.identifier(),
            axis.len(),
            axis.spws().len(),
            axis.first() / HZ_PER_MHZ,
            axis.last() / HZ_PER_MHZ,
        );
        debug!("Estimating weights with {:?}", self.estimate);
        Ok(estimator.estimate_weights(&self.estimate)?)
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        (min.min(v), max.max(v))
    })
}

#[derive(Error, Debug)]
pub(crate) enum WeightsRunError {
    #[error(transparent)]
    Estimate(#[from] EstimateError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
