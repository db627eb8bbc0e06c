// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

Estimation is done in double precision. Weights are only converted to single
precision when they are written to a measurement set.
 */

/// The number of Hz in a MHz. Sensitivity curves and channel frequencies are
/// both converted to MHz before fitting.
pub const HZ_PER_MHZ: f64 = 1e6;

/// The number of Hz in a GHz. Used for the diagnostic plot's x axis.
pub const HZ_PER_GHZ: f64 = 1e9;

/// The default polynomial degree (or spline smoothing factor) used when fitting
/// a sensitivity curve.
pub const DEFAULT_FIT_ORDER: usize = 9;

/// The default column for per-row, per-correlation weights.
pub const DEFAULT_SCALAR_WEIGHT_COLUMN: &str = "WEIGHT";

/// The default column for per-row, per-channel, per-correlation weights.
pub const DEFAULT_SPECTRAL_WEIGHT_COLUMN: &str = "WEIGHT_SPECTRUM";

/// Without a user-specified row chunk size, the rows of a measurement set are
/// written in this many chunks.
pub const DEFAULT_NUM_ROW_CHUNKS: usize = 10;

/// The suffix appended to a measurement set's name to make the default
/// diagnostic plot filename.
pub const DEFAULT_PLOT_SUFFIX: &str = "-noise_weights.png";

/// If the centre frequencies of a sensitivity curve and a measurement set
/// differ by this factor or more, the curve is assumed to not be in Hz. This
/// is well short of the factor of 1000 between Hz, kHz, MHz and GHz.
pub const MAX_UNIT_RATIO: f64 = 10.0;

/// Normalising sensitivities with a maximum smaller than this is refused.
pub const MIN_NORMALISATION_MAX: f64 = f64::EPSILON;
