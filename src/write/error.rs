// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::io::StoreError;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("The row chunk size must be at least 1")]
    ZeroRowChunk,

    #[error("There are {num_weights} weights, but the measurement set has {num_chans} channels")]
    WeightsLength { num_weights: usize, num_chans: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}
