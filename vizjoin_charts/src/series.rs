// Copyright 2025 the VizJoin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The two-phase render contract shared by all series.

use kurbo::{Point, Rect, Vec2};
use vizjoin_core::NodeId;

use crate::chart::Chart;

/// A chart series.
///
/// Rendering happens in two phases:
/// 1. [`Series::process_data`] turns the configured data into a layout model. It is pure with
///    respect to the scene and idempotent for unchanged inputs.
/// 2. [`Series::update`] reconciles the layout model onto the series group in the chart scene,
///    creating and removing nodes only where the data changed.
///
/// Setters on concrete series run both phases, so a series is always consistent with its
/// configuration once a setter returns (unless the chart is mid-layout, in which case
/// [`Chart::perform_layout`] finishes the job).
pub trait Series {
    /// The group node that owns this series' nodes.
    fn group(&self) -> NodeId;

    /// Recomputes the layout model. Returns `false` if no usable model could be produced, for
    /// example because a mandatory field is unset.
    fn process_data(&mut self) -> bool;

    /// Writes the layout model into the scene. Does nothing while the chart layout is pending.
    fn update(&mut self, chart: &mut Chart);

    /// Receives the rectangle assigned to this series by the chart layout.
    fn set_layout(&mut self, bounds: Rect);
}

/// Center, offset and radius of a radial series.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PolarGeometry {
    /// Center assigned by layout.
    pub center: Point,
    /// User offset from the center.
    pub offset: Vec2,
    /// Outer radius.
    pub radius: f64,
}

impl PolarGeometry {
    /// Translation applied to the series group.
    pub fn translation(&self) -> Vec2 {
        self.center.to_vec2() + self.offset
    }

    /// Centers the geometry in `bounds` and uses the largest radius that fits.
    pub fn fit(&mut self, bounds: Rect) {
        self.center = bounds.center();
        self.radius = (bounds.width().min(bounds.height()) / 2.0).max(0.0);
    }
}
