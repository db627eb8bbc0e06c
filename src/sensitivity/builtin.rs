// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reference sensitivity curves that are compiled into the binary.
//!
//! Each curve is immutable and carries a version; if a curve is ever revised,
//! a new variant should be added rather than the existing data changed, so that
//! old results remain reproducible.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// MeerKAT L-band system equivalent flux density \[Jy\] against frequency
/// \[Hz\].
const MEERKAT_L_BAND_SEFD_V1: [[f64; 2]; 18] = [
    [856e6, 580.0],
    [900e6, 578.0],
    [950e6, 559.0],
    [1000e6, 540.0],
    [1050e6, 492.0],
    [1100e6, 443.0],
    [1150e6, 443.0],
    [1200e6, 443.0],
    [1250e6, 443.0],
    [1300e6, 453.0],
    [1350e6, 443.0],
    [1400e6, 424.0],
    [1450e6, 415.0],
    [1500e6, 405.0],
    [1550e6, 405.0],
    [1600e6, 405.0],
    [1650e6, 424.0],
    [1711e6, 421.0],
];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
pub enum BuiltinCurve {
    #[default]
    #[strum(to_string = "meerkat-l-band-v1", serialize = "meerkat-l-band")]
    #[serde(rename = "meerkat-l-band-v1", alias = "meerkat-l-band")]
    MeerKatLBandV1,
}

impl BuiltinCurve {
    /// The unversioned name of the curve.
    pub fn name(self) -> &'static str {
        match self {
            BuiltinCurve::MeerKatLBandV1 => "meerkat-l-band",
        }
    }

    pub fn version(self) -> u32 {
        match self {
            BuiltinCurve::MeerKatLBandV1 => 1,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BuiltinCurve::MeerKatLBandV1 => "MeerKAT L-band SEFD [Jy], 856 MHz to 1711 MHz",
        }
    }

    /// The (frequency \[Hz\], sensitivity) pairs of the curve.
    pub fn data(self) -> &'static [[f64; 2]] {
        match self {
            BuiltinCurve::MeerKatLBandV1 => &MEERKAT_L_BAND_SEFD_V1,
        }
    }
}
