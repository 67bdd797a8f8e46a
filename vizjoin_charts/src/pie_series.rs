// Copyright 2025 the VizJoin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pie series: radial layout plus reconciliation onto arc / callout / label nodes.
//!
//! Each datum becomes one sector. A sector is rendered as a group with three tagged children:
//! an [`Arc`] ([`SECTOR_TAG`]), a callout [`Line`] ([`CALLOUT_TAG`]) and a label [`Text`]
//! ([`LABEL_TAG`]). Re-rendering re-binds the existing groups positionally, so nodes are only
//! created when the data grows and only removed when it shrinks.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use kurbo::{Point, Rect, Vec2};
use peniko::color::palette::css;
use peniko::{Brush, Color};
use vizjoin_core::{
    Arc, ArcType, DropShadow, Font, Group, Join, JoinStats, Line, LineJoin, NodeId, Selection, Tag,
    Text, TextAlign, TextBaseline,
};

use crate::angle::{normalize_angle180, polar, to_radians};
use crate::chart::Chart;
use crate::logging::{debug, debug_span, trace};
use crate::record::Record;
use crate::scale::ScaleLinear;
use crate::series::{PolarGeometry, Series};

/// Tag of the arc child of a sector group.
pub const SECTOR_TAG: Tag = Tag(0);
/// Tag of the callout line child of a sector group.
pub const CALLOUT_TAG: Tag = Tag(1);
/// Tag of the label text child of a sector group.
pub const LABEL_TAG: Tag = Tag(2);

/// Fill palette used when none (or an empty one) is configured.
pub const DEFAULT_PIE_COLORS: [Color; 6] = [
    Color::from_rgba8(0x5b, 0xc0, 0xeb, 0xff),
    Color::from_rgba8(0xfd, 0xe7, 0x4c, 0xff),
    Color::from_rgba8(0x9b, 0xc5, 0x3d, 0xff),
    Color::from_rgba8(0xe5, 0x59, 0x34, 0xff),
    Color::from_rgba8(0xfa, 0x79, 0x21, 0xff),
    Color::from_rgba8(0xfa, 0x30, 0x81, 0xff),
];

/// Text and position of a sector label, relative to the pie center.
#[derive(Clone, Debug, PartialEq)]
pub struct SectorLabel {
    /// Label text.
    pub text: String,
    /// Anchor position.
    pub pos: Point,
}

/// A callout line from the rim of a sector outwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Callout {
    /// Point on the rim.
    pub start: Point,
    /// Outer end.
    pub end: Point,
}

/// Layout of a single pie sector.
///
/// Angles are radians, radius and positions are relative to the pie center.
#[derive(Clone, Debug, PartialEq)]
pub struct SectorDatum {
    /// Position of the source datum.
    pub index: usize,
    /// Outer radius.
    pub radius: f64,
    /// Start angle; equal to the previous sector's end angle.
    pub start_angle: f64,
    /// End angle.
    pub end_angle: f64,
    /// Bisector angle, in `(-π, π]`.
    pub mid_angle: f64,
    /// Fill paint.
    pub fill: Brush,
    /// Outline paint.
    pub stroke: Brush,
    /// Outline width.
    pub line_width: f64,
    /// Optional drop shadow.
    pub shadow: Option<DropShadow>,
    /// Present only for labelled sectors wide enough to carry a label.
    pub label: Option<SectorLabel>,
    /// Present exactly when `label` is.
    pub callout: Option<Callout>,
}

impl SectorDatum {
    /// Absolute angular extent.
    pub fn span(&self) -> f64 {
        (self.end_angle - self.start_angle).abs()
    }
}

/// Label alignment for a sector bisecting at `mid_angle`.
///
/// The circle is split into four 90° quadrants centered on the top, right, bottom and left, and
/// each one anchors the label on the side facing the pie.
pub fn label_alignment(mid_angle: f64) -> (TextAlign, TextBaseline) {
    if (-3.0 * FRAC_PI_4..-FRAC_PI_4).contains(&mid_angle) {
        (TextAlign::Center, TextBaseline::Bottom)
    } else if (-FRAC_PI_4..FRAC_PI_4).contains(&mid_angle) {
        (TextAlign::Left, TextBaseline::Middle)
    } else if (FRAC_PI_4..3.0 * FRAC_PI_4).contains(&mid_angle) {
        (TextAlign::Center, TextBaseline::Hanging)
    } else {
        (TextAlign::Right, TextBaseline::Middle)
    }
}

/// A pie chart series over records of type `D`.
///
/// All configuration goes through `set_*` methods that take the owning [`Chart`]; a setter that
/// changes a value re-runs [`Series::process_data`] and, on success, [`Series::update`].
#[derive(Debug)]
pub struct PieSeries<D> {
    group: NodeId,
    geometry: PolarGeometry,
    data: Vec<D>,

    angle_field: Option<String>,
    radius_field: Option<String>,
    label_field: Option<String>,
    rotation: f64,

    label_font: Font,
    label_color: Brush,
    label_min_angle: f64,

    callout_color: Brush,
    callout_width: f64,
    callout_length: f64,
    callout_padding: f64,

    colors: Vec<Color>,
    stroke: Brush,
    line_width: f64,
    shadow: Option<DropShadow>,

    angle_scale: ScaleLinear,
    radius_scale: ScaleLinear,
    sectors: Vec<SectorDatum>,
    selection: Selection<SectorDatum>,
    last_join: Option<JoinStats>,
}

impl<D: Record> PieSeries<D> {
    /// Creates an empty series with its own group in `chart`.
    pub fn new(chart: &mut Chart) -> Self {
        let group = chart.create_series_group();
        Self {
            group,
            geometry: PolarGeometry::default(),
            data: Vec::new(),
            angle_field: None,
            radius_field: None,
            label_field: None,
            rotation: 0.0,
            label_font: Font::default(),
            label_color: css::BLACK.into(),
            label_min_angle: 20.0,
            callout_color: css::BLACK.into(),
            callout_width: 2.0,
            callout_length: 10.0,
            callout_padding: 3.0,
            colors: DEFAULT_PIE_COLORS.to_vec(),
            stroke: css::BLACK.into(),
            line_width: 2.0,
            shadow: None,
            // Ratios in [0, 1] cover a full turn, starting at 12 o'clock.
            angle_scale: ScaleLinear::new((0.0, 1.0), (-PI + FRAC_PI_2, PI + FRAC_PI_2)),
            radius_scale: ScaleLinear::default(),
            sectors: Vec::new(),
            selection: Selection::empty(group, None),
            last_join: None,
        }
    }

    fn apply<T: PartialEq>(&mut self, chart: &mut Chart, value: T, field: fn(&mut Self) -> &mut T) {
        let slot = field(self);
        if *slot == value {
            return;
        }
        *slot = value;
        self.refresh(chart);
    }

    fn refresh(&mut self, chart: &mut Chart) {
        if self.process_data() {
            self.update(chart);
        }
    }

    /// Replaces the data and re-renders.
    pub fn set_data(&mut self, chart: &mut Chart, data: Vec<D>) {
        self.data = data;
        self.refresh(chart);
    }

    /// Returns the data.
    pub fn data(&self) -> &[D] {
        &self.data
    }

    /// Sets the numeric field that sizes the sectors. Without it there is no layout.
    pub fn set_angle_field(&mut self, chart: &mut Chart, field: Option<&str>) {
        self.apply(chart, field.map(String::from), |s| &mut s.angle_field);
    }

    /// Returns the angle field.
    pub fn angle_field(&self) -> Option<&str> {
        self.angle_field.as_deref()
    }

    /// Sets the numeric field that scales each sector's radius; `None` means a uniform radius.
    pub fn set_radius_field(&mut self, chart: &mut Chart, field: Option<&str>) {
        self.apply(chart, field.map(String::from), |s| &mut s.radius_field);
    }

    /// Returns the radius field.
    pub fn radius_field(&self) -> Option<&str> {
        self.radius_field.as_deref()
    }

    /// Sets the field used for label text; `None` disables labels and callouts.
    pub fn set_label_field(&mut self, chart: &mut Chart, field: Option<&str>) {
        self.apply(chart, field.map(String::from), |s| &mut s.label_field);
    }

    /// Returns the label field.
    pub fn label_field(&self) -> Option<&str> {
        self.label_field.as_deref()
    }

    /// Sets the rotation in degrees.
    ///
    /// The converted radians are added to the sector ratios before they are mapped to angles.
    pub fn set_rotation(&mut self, chart: &mut Chart, degrees: f64) {
        self.apply(chart, degrees, |s| &mut s.rotation);
    }

    /// Returns the rotation in degrees.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Sets the minimum sector span, in degrees, that gets a label and callout.
    pub fn set_label_min_angle(&mut self, chart: &mut Chart, degrees: f64) {
        self.apply(chart, degrees, |s| &mut s.label_min_angle);
    }

    /// Returns the minimum labelled span in degrees.
    pub fn label_min_angle(&self) -> f64 {
        self.label_min_angle
    }

    /// Sets the label font.
    pub fn set_label_font(&mut self, chart: &mut Chart, font: Font) {
        self.apply(chart, font, |s| &mut s.label_font);
    }

    /// Returns the label font.
    pub fn label_font(&self) -> &Font {
        &self.label_font
    }

    /// Sets the label color.
    pub fn set_label_color(&mut self, chart: &mut Chart, color: impl Into<Brush>) {
        self.apply(chart, color.into(), |s| &mut s.label_color);
    }

    /// Returns the label color.
    pub fn label_color(&self) -> &Brush {
        &self.label_color
    }

    /// Sets the callout stroke color.
    pub fn set_callout_color(&mut self, chart: &mut Chart, color: impl Into<Brush>) {
        self.apply(chart, color.into(), |s| &mut s.callout_color);
    }

    /// Returns the callout color.
    pub fn callout_color(&self) -> &Brush {
        &self.callout_color
    }

    /// Sets the callout stroke width.
    pub fn set_callout_width(&mut self, chart: &mut Chart, width: f64) {
        self.apply(chart, width, |s| &mut s.callout_width);
    }

    /// Returns the callout width.
    pub fn callout_width(&self) -> f64 {
        self.callout_width
    }

    /// Sets how far callouts extend beyond the rim.
    pub fn set_callout_length(&mut self, chart: &mut Chart, length: f64) {
        self.apply(chart, length, |s| &mut s.callout_length);
    }

    /// Returns the callout length.
    pub fn callout_length(&self) -> f64 {
        self.callout_length
    }

    /// Sets the gap between a callout's end and its label.
    pub fn set_callout_padding(&mut self, chart: &mut Chart, padding: f64) {
        self.apply(chart, padding, |s| &mut s.callout_padding);
    }

    /// Returns the callout padding.
    pub fn callout_padding(&self) -> f64 {
        self.callout_padding
    }

    /// Sets the cyclic fill palette. An empty palette falls back to [`DEFAULT_PIE_COLORS`].
    pub fn set_colors(&mut self, chart: &mut Chart, colors: Vec<Color>) {
        self.apply(chart, colors, |s| &mut s.colors);
    }

    /// Returns the palette.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Sets the sector outline color.
    pub fn set_stroke(&mut self, chart: &mut Chart, stroke: impl Into<Brush>) {
        self.apply(chart, stroke.into(), |s| &mut s.stroke);
    }

    /// Returns the sector outline color.
    pub fn stroke(&self) -> &Brush {
        &self.stroke
    }

    /// Sets the sector outline width.
    pub fn set_line_width(&mut self, chart: &mut Chart, width: f64) {
        self.apply(chart, width, |s| &mut s.line_width);
    }

    /// Returns the sector outline width.
    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Sets the sector drop shadow.
    pub fn set_shadow(&mut self, chart: &mut Chart, shadow: Option<DropShadow>) {
        self.apply(chart, shadow, |s| &mut s.shadow);
    }

    /// Returns the sector drop shadow.
    pub fn shadow(&self) -> Option<DropShadow> {
        self.shadow
    }

    /// Sets the pie center. Normally assigned by [`Chart::perform_layout`].
    pub fn set_center(&mut self, chart: &mut Chart, center: Point) {
        self.apply(chart, center, |s| &mut s.geometry.center);
    }

    /// Sets an offset from the center.
    pub fn set_offset(&mut self, chart: &mut Chart, offset: Vec2) {
        self.apply(chart, offset, |s| &mut s.geometry.offset);
    }

    /// Sets the outer radius. Normally assigned by [`Chart::perform_layout`].
    pub fn set_radius(&mut self, chart: &mut Chart, radius: f64) {
        self.apply(chart, radius, |s| &mut s.geometry.radius);
    }

    /// Returns the center, offset and radius.
    pub fn geometry(&self) -> PolarGeometry {
        self.geometry
    }

    /// The sector model from the last [`Series::process_data`].
    pub fn sectors(&self) -> &[SectorDatum] {
        &self.sectors
    }

    /// Partition sizes of the last reconciliation, if any ran.
    pub fn last_join(&self) -> Option<JoinStats> {
        self.last_join
    }

    /// The angle domain (always the unit interval of ratios).
    pub fn domain_x(&self) -> (f64, f64) {
        self.angle_scale.domain()
    }

    /// The radius domain from the last layout with a radius field.
    pub fn domain_y(&self) -> (f64, f64) {
        self.radius_scale.domain()
    }

    /// The sector groups currently bound, in data order.
    pub fn sector_groups(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.selection.nodes()
    }
}

/// Reads a numeric field, substituting `0.0` for missing, non-numeric and non-finite values.
fn numeric_field<D: Record>(datum: &D, field: &str) -> f64 {
    match datum.number(field) {
        Some(v) if v.is_finite() => v,
        _ => {
            debug!(field, "non-numeric field value; using 0");
            0.0
        }
    }
}

impl<D: Record> Series for PieSeries<D> {
    fn group(&self) -> NodeId {
        self.group
    }

    fn process_data(&mut self) -> bool {
        let _span = debug_span!("pie_series.process_data", rows = self.data.len()).entered();

        self.sectors.clear();
        let Some(angle_field) = self.angle_field.as_deref() else {
            debug!("pie series has no angle field");
            return false;
        };

        let angle_values: Vec<f64> = self
            .data
            .iter()
            .map(|d| numeric_field(d, angle_field))
            .collect();
        let total: f64 = angle_values.iter().sum();

        // Radii never go negative: a negative wedge would be drawn through the center.
        let outer_radius = self.geometry.radius.max(0.0);
        let radius_field = self.radius_field.as_deref();
        let radius_values: Vec<f64> = match radius_field {
            Some(field) => self
                .data
                .iter()
                .map(|d| numeric_field(d, field).max(0.0))
                .collect(),
            None => Vec::new(),
        };
        if radius_field.is_some() {
            let max = radius_values.iter().copied().fold(1.0, f64::max);
            self.radius_scale = ScaleLinear::new((0.0, max), (0.0, outer_radius));
        }

        if total == 0.0 || !total.is_finite() {
            debug!(total, "angle total is zero or not finite; no sectors");
            return true;
        }

        let label_field = self.label_field.as_deref();
        let rotation = to_radians(self.rotation);
        let label_min_angle = to_radians(self.label_min_angle);
        let colors: &[Color] = if self.colors.is_empty() {
            &DEFAULT_PIE_COLORS
        } else {
            &self.colors
        };

        let mut sectors = Vec::with_capacity(angle_values.len());
        let mut start = 0.0;
        let mut sum = 0.0;
        for (index, value) in angle_values.iter().enumerate() {
            sum += value / total;
            let end = sum;

            let radius = match radius_field {
                Some(_) => radius_values
                    .get(index)
                    .map_or(0.0, |&v| self.radius_scale.convert(v)),
                None => outer_radius,
            };
            let start_angle = self.angle_scale.convert(start + rotation);
            let end_angle = self.angle_scale.convert(end + rotation);
            let mid_angle = (start_angle + end_angle) / 2.0;
            let span = (end_angle - start_angle).abs();

            let (label, callout) = match label_field {
                Some(field) if span > label_min_angle => {
                    let text = self
                        .data
                        .get(index)
                        .and_then(|d| d.text(field))
                        .unwrap_or_default();
                    let label = SectorLabel {
                        text,
                        pos: polar(
                            mid_angle,
                            radius + self.callout_length + self.callout_padding,
                        ),
                    };
                    let callout = Callout {
                        start: polar(mid_angle, radius),
                        end: polar(mid_angle, radius + self.callout_length),
                    };
                    (Some(label), Some(callout))
                }
                _ => (None, None),
            };

            sectors.push(SectorDatum {
                index,
                radius,
                start_angle,
                end_angle,
                mid_angle: normalize_angle180(mid_angle),
                fill: colors[index % colors.len()].into(),
                stroke: self.stroke.clone(),
                line_width: self.line_width,
                shadow: self.shadow,
                label,
                callout,
            });
            start = end;
        }

        trace!(sectors = sectors.len(), total, "pie layout computed");
        self.sectors = sectors;
        true
    }

    fn update(&mut self, chart: &mut Chart) {
        if chart.is_layout_pending() {
            debug!(group = self.group.to_raw(), "layout pending; pie update skipped");
            return;
        }
        let _span = debug_span!("pie_series.update", sectors = self.sectors.len()).entered();

        let scene = chart.scene_mut();
        if let Some(group) = scene.get_mut::<Group>(self.group) {
            group.translation = self.geometry.translation();
        }

        let previous = core::mem::replace(&mut self.selection, Selection::empty(self.group, None));
        let join = previous.set_data(self.sectors.clone());
        self.last_join = Some(join.stats());
        let Join {
            enter,
            update,
            exit,
        } = join;
        exit.remove(scene);

        let entered = enter.append::<Group>(scene);
        entered.append::<Arc>(scene, Some(SECTOR_TAG));
        entered.append::<Line>(scene, Some(CALLOUT_TAG));
        entered.append::<Text>(scene, Some(LABEL_TAG));
        let sectors = update.merge(entered);

        sectors
            .select_by_tag::<Arc>(scene, SECTOR_TAG)
            .each(scene, |arc: &mut Arc, d: &SectorDatum, _| {
                arc.center = Point::ORIGIN;
                arc.arc_type = ArcType::Round;
                arc.radii = Vec2::new(d.radius, d.radius);
                arc.start_angle = d.start_angle;
                arc.end_angle = d.end_angle;
                arc.fill = Some(d.fill.clone());
                arc.stroke = Some(d.stroke.clone());
                arc.line_width = d.line_width;
                arc.line_join = LineJoin::Round;
                arc.shadow = d.shadow;
            });

        let callout_color = &self.callout_color;
        let callout_width = self.callout_width;
        sectors
            .select_by_tag::<Line>(scene, CALLOUT_TAG)
            .each(scene, |line: &mut Line, d: &SectorDatum, _| match d.callout {
                Some(callout) => {
                    line.stroke = Some(callout_color.clone());
                    line.line_width = callout_width;
                    line.p0 = callout.start;
                    line.p1 = callout.end;
                }
                None => line.stroke = None,
            });

        let label_font = &self.label_font;
        let label_color = &self.label_color;
        sectors
            .select_by_tag::<Text>(scene, LABEL_TAG)
            .each(scene, |text: &mut Text, d: &SectorDatum, _| {
                let (align, baseline) = label_alignment(d.mid_angle);
                text.align = align;
                text.baseline = baseline;
                match &d.label {
                    Some(label) => {
                        text.font = label_font.clone();
                        text.fill = Some(label_color.clone());
                        text.text.clone_from(&label.text);
                        text.pos = label.pos;
                    }
                    None => text.fill = None,
                }
            });

        self.selection = sectors;
    }

    fn set_layout(&mut self, bounds: Rect) {
        self.geometry.fit(bounds);
    }
}
