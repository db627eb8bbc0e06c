// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A diagnostic plot of a sensitivity curve, its fit and the resulting weights.

use std::path::Path;

use ndarray::prelude::*;
use thiserror::Error;

/// Everything drawn on the diagnostic plot.
pub(crate) struct PlotData<'a> {
    /// The (possibly normalised) sensitivity curve \[Hz\].
    pub(crate) curve_freqs_hz: &'a [f64],
    pub(crate) curve_values: &'a [f64],

    /// The channel frequencies \[Hz\] and the fitted noise and weights at each.
    pub(crate) freqs_hz: ArrayView1<'a, f64>,
    pub(crate) noise: ArrayView1<'a, f64>,
    pub(crate) weights: ArrayView1<'a, f64>,

    pub(crate) fit_label: String,
}

#[derive(Error, Debug)]
pub enum PlotError {
    #[cfg(not(feature = "plotting"))]
    #[error("ms_noise_weights was not compiled with the \"plotting\" feature; no plot can be made")]
    NoPlottingFeature,

    #[cfg(feature = "plotting")]
    #[error("Error from the plotters library: {0}")]
    Draw(String),
}

/// The min and max of some values, ignoring non-finite ones.
fn finite_extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
        })
}

/// Widen a range by a fraction of its width on either side. A zero-width range
/// is given some width.
fn pad((min, max): (f64, f64), fraction: f64) -> (f64, f64) {
    let width = max - min;
    if width > 0.0 {
        (min - width * fraction, max + width * fraction)
    } else {
        let half = if min == 0.0 { 1.0 } else { min.abs() * 0.5 };
        (min - half, max + half)
    }
}

/// The limits of the weights axis. These come from the unsmoothed curve, as
/// `1 / y^2`, with a 10% margin.
fn weight_limits(data: &PlotData) -> (f64, f64) {
    let from_curve = finite_extent(data.curve_values.iter().map(|y| 1.0 / (y * y)));
    let (min, max) = from_curve
        .or_else(|| finite_extent(data.weights.iter().copied()))
        .unwrap_or((0.0, 1.0));
    if max > min {
        (min * 0.9, max * 1.1)
    } else {
        pad((min, max), 0.1)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "plotting")] {
        use plotters::prelude::*;

        use crate::constants::HZ_PER_GHZ;

        /// The number of X pixels on the plot.
        const X_PIXELS: u32 = 1200;
        /// The number of Y pixels on the plot.
        const Y_PIXELS: u32 = 900;

        pub(crate) fn plot_noise_weights(data: &PlotData, output: &Path) -> Result<(), PlotError> {
            let draw_err = |e: &dyn std::fmt::Display| PlotError::Draw(e.to_string());

            let curve_ghz: Vec<(f64, f64)> = data
                .curve_freqs_hz
                .iter()
                .zip(data.curve_values)
                .map(|(&f, &y)| (f / HZ_PER_GHZ, y))
                .collect();
            let freqs_ghz: Vec<f64> = data.freqs_hz.iter().map(|f| f / HZ_PER_GHZ).collect();

            let x_range = pad(
                finite_extent(curve_ghz.iter().map(|p| p.0).chain(freqs_ghz.iter().copied()))
                    .unwrap_or((0.0, 1.0)),
                0.02,
            );
            let y_range = pad(
                finite_extent(curve_ghz.iter().map(|p| p.1).chain(data.noise.iter().copied()))
                    .unwrap_or((0.0, 1.0)),
                0.05,
            );
            let w_range = weight_limits(data);

            let root = BitMapBackend::new(output, (X_PIXELS, Y_PIXELS)).into_drawing_area();
            root.fill(&WHITE).map_err(|e| draw_err(&e))?;

            let mut chart = ChartBuilder::on(&root)
                .margin(20)
                .x_label_area_size(60)
                .y_label_area_size(80)
                .right_y_label_area_size(80)
                .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
                .map_err(|e| draw_err(&e))?
                .set_secondary_coord(x_range.0..x_range.1, w_range.0..w_range.1);

            chart
                .configure_mesh()
                .disable_mesh()
                .x_desc("Freq [GHz]")
                .y_desc("Norm Noise")
                .draw()
                .map_err(|e| draw_err(&e))?;
            chart
                .configure_secondary_axes()
                .y_desc("Weight")
                .draw()
                .map_err(|e| draw_err(&e))?;

            chart
                .draw_series(PointSeries::of_element(
                    curve_ghz.iter().copied(),
                    6,
                    &RED,
                    &|coord, size, style| EmptyElement::at(coord) + Cross::new((0, 0), size, style),
                ))
                .map_err(|e| draw_err(&e))?
                .label("Norm. Noise")
                .legend(|(x, y)| Cross::new((x + 10, y), 6, &RED));

            chart
                .draw_series(LineSeries::new(
                    freqs_ghz.iter().copied().zip(data.noise.iter().copied()),
                    &BLACK,
                ))
                .map_err(|e| draw_err(&e))?
                .label(data.fit_label.as_str())
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLACK));

            chart
                .draw_secondary_series(LineSeries::new(
                    freqs_ghz.iter().copied().zip(data.weights.iter().copied()),
                    &GREEN,
                ))
                .map_err(|e| draw_err(&e))?
                .label("Weights")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &GREEN));

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(|e| draw_err(&e))?;

            root.present().map_err(|e| draw_err(&e))?;
            Ok(())
        }
    } else {
        pub(crate) fn plot_noise_weights(_data: &PlotData, _output: &Path) -> Result<(), PlotError> {
            Err(PlotError::NoPlottingFeature)
        }
    }
}
