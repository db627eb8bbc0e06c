// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Estimate frequency-dependent visibility weights from a sensitivity curve (e.g.
a system equivalent flux density against frequency) and write them into the
weight columns of a measurement set.
 */

mod cli;
pub mod constants;
pub mod estimate;
pub mod fit;
pub mod freqs;
pub mod io;
pub mod math;
mod params;
pub mod sensitivity;
pub mod write;

use crossbeam_utils::atomic::AtomicCell;

lazy_static::lazy_static! {
    /// Should progress bars be drawn? Set once by the command-line interface.
    pub(crate) static ref PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);
}

// Re-exports.
pub use cli::{MsNoise, MsNoiseError};
pub use estimate::{EstimateParams, EstimationMode, NoiseEstimator, NoiseWeights, PlotOutput};
pub use fit::SmoothMethod;
pub use freqs::{FreqAxis, SpectralWindow};
pub use io::{MemoryStore, MsStore, MsSummary, WeightStore};
pub use sensitivity::{BuiltinCurve, SensitivityCurve, SensitivitySource};
pub use write::{write_weights, ReductionStat, WeightColumns, WriteSummary};
