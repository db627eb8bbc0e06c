// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Listing the sensitivity curves built into this program.

use std::borrow::Cow;

use clap::Parser;
use strum::IntoEnumIterator;

use super::common::InfoPrinter;
use crate::{constants::HZ_PER_MHZ, sensitivity::BuiltinCurve};

#[derive(Parser, Debug, Default)]
pub(super) struct CurvesArgs {
    /// Also print the (frequency, sensitivity) pairs of each curve.
    #[clap(short, long)]
    data: bool,
}

impl CurvesArgs {
    pub(super) fn run(self) {
        for curve in BuiltinCurve::iter() {
            let mut printer = InfoPrinter::new(curve.to_string().into());
            for block in curve_blocks(curve, self.data) {
                printer.push_block(block);
            }
            printer.display();
        }
    }
}

fn curve_blocks(curve: BuiltinCurve, data: bool) -> Vec<Vec<Cow<'static, str>>> {
    let points = curve.data();
    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), [f, _]| {
            (min.min(*f), max.max(*f))
        });
    let mut blocks = vec![
        vec![curve.description().into()],
        vec![
            format!("Name: {} (version {})", curve.name(), curve.version()).into(),
            format!(
                "{} points from {:.1} to {:.1} MHz",
                points.len(),
                min / HZ_PER_MHZ,
                max / HZ_PER_MHZ
            )
            .into(),
        ],
    ];
    if data {
        blocks.push(
            points
                .iter()
                .map(|[f, s]| format!("{:>8.1} MHz: {s}", f / HZ_PER_MHZ).into())
                .collect(),
        );
    }
    blocks
}
