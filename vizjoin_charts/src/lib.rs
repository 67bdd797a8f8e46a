// Copyright 2025 the VizJoin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart series for `vizjoin_core`.
//!
//! This crate is the layout half of the chart pipeline:
//! - **Scales** map data values into angles and radii.
//! - **Series** turn records into a layout model and reconcile that model onto the scene, in two
//!   phases: [`Series::process_data`] then [`Series::update`].
//! - The [`Chart`] host owns the scene and the layout-pending flag that series respect.
//!
//! [`PieSeries`] is the radial series: one sector group per datum, each holding a wedge, a
//! callout line and a label.
//!
//! ```
//! use kurbo::Size;
//! use vizjoin_charts::{Chart, PieSeries, Row, Series};
//!
//! let mut chart = Chart::new(Size::new(240.0, 240.0));
//! let mut pie = PieSeries::new(&mut chart);
//! pie.set_angle_field(&mut chart, Some("share"));
//! pie.set_data(
//!     &mut chart,
//!     vec![Row::new().with("share", 1.0), Row::new().with("share", 3.0)],
//! );
//! chart.perform_layout(&mut [&mut pie]);
//!
//! assert_eq!(pie.sectors().len(), 2);
//! assert_eq!(chart.scene().children(pie.group()).len(), 2);
//! ```

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod angle;
mod chart;
// Test builds link `std`, whose inherent float methods take precedence.
#[cfg(all(not(feature = "std"), not(test)))]
mod float;
mod logging;
mod pie_series;
#[cfg(test)]
mod pie_tests;
mod record;
mod scale;
mod series;

pub use angle::{normalize_angle180, normalize_angle360, polar, to_degrees, to_radians};
pub use chart::Chart;
pub use pie_series::{
    CALLOUT_TAG, Callout, DEFAULT_PIE_COLORS, LABEL_TAG, PieSeries, SECTOR_TAG, SectorDatum,
    SectorLabel, label_alignment,
};
pub use record::{Record, Row, Value};
pub use scale::ScaleLinear;
pub use series::{PolarGeometry, Series};
