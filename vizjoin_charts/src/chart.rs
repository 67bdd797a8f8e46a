// Copyright 2025 the VizJoin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chart host that owns the scene.

use kurbo::{Rect, Size};
use vizjoin_core::{Group, NodeId, Scene};

use crate::logging::debug;
use crate::series::Series;

/// Owns the scene and the layout state that series render into.
///
/// While a layout is pending, series skip [`Series::update`]; the next
/// [`Chart::perform_layout`] renders them all once the geometry is settled.
#[derive(Debug)]
pub struct Chart {
    scene: Scene,
    series_root: NodeId,
    size: Size,
    padding: f64,
    layout_pending: bool,
}

impl Chart {
    /// Creates a chart of the given size with an empty series layer.
    ///
    /// The chart starts with a pending layout.
    pub fn new(size: Size) -> Self {
        let mut scene = Scene::new();
        let series_root = scene.add_root_child(Group::default());
        Self {
            scene,
            series_root,
            size,
            padding: 20.0,
            layout_pending: true,
        }
    }

    /// Returns the scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Returns the scene mutably.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The group under which each series creates its own group.
    pub fn series_root(&self) -> NodeId {
        self.series_root
    }

    /// Returns the chart size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Resizes the chart. A different size marks the layout as pending.
    pub fn set_size(&mut self, size: Size) {
        if self.size != size {
            self.size = size;
            self.layout_pending = true;
        }
    }

    /// Returns the padding between the chart edge and the series area.
    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Sets the padding. A different value marks the layout as pending.
    pub fn set_padding(&mut self, padding: f64) {
        if self.padding != padding {
            self.padding = padding;
            self.layout_pending = true;
        }
    }

    /// Returns `true` while the chart is waiting for (or running) a layout pass.
    pub fn is_layout_pending(&self) -> bool {
        self.layout_pending
    }

    /// Overrides the pending-layout flag.
    pub fn set_layout_pending(&mut self, pending: bool) {
        self.layout_pending = pending;
    }

    /// The rectangle available to series: the chart bounds inset by the padding.
    pub fn series_rect(&self) -> Rect {
        Rect::from_origin_size((0.0, 0.0), self.size).inset(-self.padding)
    }

    /// Lays out every series and renders it.
    ///
    /// The layout is pending while bounds are assigned, so nothing renders halfway; afterwards
    /// each series runs [`Series::process_data`] and, if that succeeds, [`Series::update`].
    pub fn perform_layout(&mut self, series: &mut [&mut dyn Series]) {
        self.layout_pending = true;
        let bounds = self.series_rect();
        for s in series.iter_mut() {
            s.set_layout(bounds);
        }
        self.layout_pending = false;
        debug!(count = series.len(), "chart layout done");

        for s in series.iter_mut() {
            if s.process_data() {
                s.update(self);
            }
        }
    }

    /// Creates a group for a new series under the series layer.
    ///
    /// If the series layer was removed from the scene, a fresh one is created first.
    pub(crate) fn create_series_group(&mut self) -> NodeId {
        if let Ok(id) = self.scene.append(self.series_root, Group::default()) {
            return id;
        }
        self.series_root = self.scene.add_root_child(Group::default());
        match self.scene.append(self.series_root, Group::default()) {
            Ok(id) => id,
            Err(_) => self.scene.add_root_child(Group::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn resizing_marks_layout_pending_only_on_change() {
        let mut chart = Chart::new(Size::new(100.0, 100.0));
        chart.set_layout_pending(false);
        chart.set_size(Size::new(100.0, 100.0));
        assert!(!chart.is_layout_pending());
        chart.set_size(Size::new(200.0, 100.0));
        assert!(chart.is_layout_pending());
    }

    #[test]
    fn series_rect_is_inset_by_padding() {
        let mut chart = Chart::new(Size::new(300.0, 200.0));
        chart.set_padding(10.0);
        assert_eq!(chart.series_rect(), Rect::new(10.0, 10.0, 290.0, 190.0));
    }

    #[test]
    fn series_groups_survive_a_removed_layer() {
        let mut chart = Chart::new(Size::new(10.0, 10.0));
        let first = chart.create_series_group();
        assert_eq!(chart.scene().parent(first), Some(chart.series_root()));

        let old_root = chart.series_root();
        chart.scene_mut().remove(old_root);
        let second = chart.create_series_group();
        assert_ne!(chart.series_root(), old_root);
        assert_eq!(chart.scene().parent(second), Some(chart.series_root()));
    }
}
