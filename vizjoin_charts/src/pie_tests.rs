// Copyright 2025 the VizJoin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate std;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use kurbo::{Point, Size, Vec2};
use peniko::Brush;
use peniko::color::palette::css;
use vizjoin_core::{
    Arc, ArcType, Group, JoinStats, Line, LineJoin, NodeId, Text, TextAlign, TextBaseline,
};

use crate::{CALLOUT_TAG, Chart, LABEL_TAG, PieSeries, Row, SECTOR_TAG, Series};

const EPS: f64 = 1e-9;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

/// A 240x240 chart with the default padding: the pie gets radius 100 at (120, 120).
fn laid_out(values: &[f64]) -> (Chart, PieSeries<Row>) {
    let mut chart = Chart::new(Size::new(240.0, 240.0));
    let mut pie = PieSeries::new(&mut chart);
    pie.set_angle_field(&mut chart, Some("value"));
    pie.set_data(&mut chart, rows(values));
    chart.perform_layout(&mut [&mut pie]);
    (chart, pie)
}

fn rows(values: &[f64]) -> Vec<Row> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            Row::new()
                .with("value", v)
                .with("name", alloc::format!("item {i}"))
        })
        .collect()
}

fn sector_parts(chart: &Chart, group: NodeId) -> (NodeId, NodeId, NodeId) {
    let scene = chart.scene();
    let [arc, line, text] = scene.children(group) else {
        panic!("sector group should hold three children");
    };
    assert_eq!(scene.node(*arc).unwrap().tag, Some(SECTOR_TAG));
    assert_eq!(scene.node(*line).unwrap().tag, Some(CALLOUT_TAG));
    assert_eq!(scene.node(*text).unwrap().tag, Some(LABEL_TAG));
    (*arc, *line, *text)
}

#[test]
fn quarter_quarter_half_layout() {
    let (_chart, pie) = laid_out(&[1.0, 1.0, 2.0]);
    let s = pie.sectors();
    assert_eq!(s.len(), 3);

    assert_eq!(s[0].start_angle, -FRAC_PI_2);
    assert_eq!(s[0].end_angle, 0.0);
    assert_eq!(s[1].end_angle, FRAC_PI_2);
    assert_close(s[2].end_angle, 3.0 * FRAC_PI_2);

    assert_eq!(s[0].span(), FRAC_PI_2);
    assert_eq!(s[1].span(), FRAC_PI_2);
    assert_eq!(s[2].span(), PI);

    assert_close(s[0].mid_angle, -FRAC_PI_4);
    assert_close(s[1].mid_angle, FRAC_PI_4);
    assert_close(s[2].mid_angle, PI);

    for sector in s {
        assert_eq!(sector.radius, 100.0);
        assert!(sector.label.is_none());
    }
}

#[test]
fn spans_cover_a_full_turn_and_sectors_are_contiguous() {
    let (_chart, pie) = laid_out(&[3.0, 7.0, 1.5, 0.25, 9.0, 4.0]);
    let s = pie.sectors();
    for pair in s.windows(2) {
        assert_eq!(pair[0].end_angle.to_bits(), pair[1].start_angle.to_bits());
    }
    let total: f64 = s.iter().map(|d| d.span()).sum();
    assert_close(total, 2.0 * PI);
    for sector in s {
        assert!(sector.mid_angle > -PI && sector.mid_angle <= PI);
    }
}

#[test]
fn colors_cycle_through_the_palette() {
    let mut chart = Chart::new(Size::new(240.0, 240.0));
    let mut pie = PieSeries::new(&mut chart);
    pie.set_angle_field(&mut chart, Some("value"));
    pie.set_colors(&mut chart, vec![css::RED, css::BLUE]);
    pie.set_data(&mut chart, rows(&[1.0; 5]));

    let fills: Vec<Brush> = pie.sectors().iter().map(|d| d.fill.clone()).collect();
    let red = Brush::from(css::RED);
    let blue = Brush::from(css::BLUE);
    assert_eq!(fills, vec![red.clone(), blue.clone(), red.clone(), blue, red]);
}

#[test]
fn only_sectors_wider_than_the_minimum_angle_are_labelled() {
    let (mut chart, mut pie) = laid_out(&[1.0, 1.0, 2.0]);
    pie.set_label_min_angle(&mut chart, 90.0);
    assert!(pie.sectors().iter().all(|d| d.label.is_none()));

    pie.set_label_field(&mut chart, Some("name"));
    let labelled: Vec<usize> = pie
        .sectors()
        .iter()
        .filter(|d| d.label.is_some())
        .map(|d| d.index)
        .collect();
    assert_eq!(labelled, vec![2]);
    for d in pie.sectors() {
        assert_eq!(d.label.is_some(), d.callout.is_some());
    }

    let label = pie.sectors()[2].label.as_ref().unwrap();
    assert_eq!(label.text, "item 2");
    assert_close(label.pos.x, -113.0);
    assert_close(label.pos.y, 0.0);
    let callout = pie.sectors()[2].callout.unwrap();
    assert_close(callout.start.x, -100.0);
    assert_close(callout.end.x, -110.0);

    let groups: Vec<NodeId> = pie.sector_groups().collect();
    let scene = chart.scene();
    for (i, &group) in groups.iter().enumerate() {
        let (_, line, text) = sector_parts(&chart, group);
        let line = scene.get::<Line>(line).unwrap();
        let text = scene.get::<Text>(text).unwrap();
        if i == 2 {
            assert_eq!(line.stroke, Some(Brush::from(css::BLACK)));
            assert_eq!(line.line_width, 2.0);
            assert_eq!(text.text, "item 2");
            assert_eq!(text.fill, Some(Brush::from(css::BLACK)));
            assert_eq!(text.align, TextAlign::Right);
            assert_eq!(text.baseline, TextBaseline::Middle);
            assert_eq!(alloc::format!("{}", text.font), "14px Verdana");
        } else {
            assert_eq!(line.stroke, None);
            assert_eq!(text.fill, None);
        }
    }
}

#[test]
fn radius_field_scales_against_the_largest_value() {
    let mut chart = Chart::new(Size::new(240.0, 240.0));
    let mut pie = PieSeries::new(&mut chart);
    pie.set_angle_field(&mut chart, Some("value"));
    pie.set_radius_field(&mut chart, Some("r"));
    let data = [2.0, 4.0, 8.0]
        .iter()
        .map(|&r| Row::new().with("value", 1.0).with("r", r))
        .collect();
    pie.set_data(&mut chart, data);
    chart.perform_layout(&mut [&mut pie]);

    assert_eq!(pie.domain_y(), (0.0, 8.0));
    assert_eq!(pie.domain_x(), (0.0, 1.0));
    let radii: Vec<f64> = pie.sectors().iter().map(|d| d.radius).collect();
    assert_eq!(radii, vec![25.0, 50.0, 100.0]);

    let groups: Vec<NodeId> = pie.sector_groups().collect();
    let (arc, _, _) = sector_parts(&chart, groups[0]);
    let arc = chart.scene().get::<Arc>(arc).unwrap();
    assert_eq!(arc.radii, Vec2::new(25.0, 25.0));
}

#[test]
fn radius_domain_never_shrinks_below_one() {
    let mut chart = Chart::new(Size::new(240.0, 240.0));
    let mut pie = PieSeries::new(&mut chart);
    pie.set_angle_field(&mut chart, Some("value"));
    pie.set_radius_field(&mut chart, Some("r"));
    let data = [0.25, 0.5]
        .iter()
        .map(|&r| Row::new().with("value", 1.0).with("r", r))
        .collect();
    pie.set_data(&mut chart, data);
    chart.perform_layout(&mut [&mut pie]);

    assert_eq!(pie.domain_y(), (0.0, 1.0));
    assert_eq!(pie.sectors()[1].radius, 50.0);
}

#[test]
fn negative_radius_values_collapse_to_the_center() {
    let mut chart = Chart::new(Size::new(240.0, 240.0));
    let mut pie = PieSeries::new(&mut chart);
    pie.set_angle_field(&mut chart, Some("value"));
    pie.set_radius_field(&mut chart, Some("r"));
    pie.set_label_field(&mut chart, Some("name"));
    let data = [-4.0, 2.0]
        .iter()
        .map(|&r| Row::new().with("value", 1.0).with("r", r).with("name", "x"))
        .collect();
    pie.set_data(&mut chart, data);
    chart.perform_layout(&mut [&mut pie]);

    assert_eq!(pie.domain_y(), (0.0, 2.0));
    let radii: Vec<f64> = pie.sectors().iter().map(|d| d.radius).collect();
    assert_eq!(radii, vec![0.0, 100.0]);

    // The label of the collapsed sector still sits on its own side of the pie.
    let d = &pie.sectors()[0];
    let label = d.label.as_ref().unwrap();
    let expected = crate::polar(d.mid_angle, 13.0);
    assert_close(label.pos.x, expected.x);
    assert_close(label.pos.y, expected.y);
}

#[test]
fn negative_outer_radius_is_clamped() {
    let (mut chart, mut pie) = laid_out(&[1.0, 1.0]);
    pie.set_radius(&mut chart, -50.0);
    assert!(pie.sectors().iter().all(|d| d.radius == 0.0));
}

#[test]
fn rebinding_the_same_data_is_idempotent() {
    let (mut chart, mut pie) = laid_out(&[1.0, 2.0, 3.0]);
    let before_model = pie.sectors().to_vec();
    let before_nodes: Vec<NodeId> = pie.sector_groups().collect();
    let count = chart.scene().node_count();

    pie.set_data(&mut chart, rows(&[1.0, 2.0, 3.0]));
    assert_eq!(pie.sectors(), &before_model[..]);
    assert_eq!(pie.sector_groups().collect::<Vec<_>>(), before_nodes);
    assert_eq!(
        pie.last_join(),
        Some(JoinStats {
            enter: 0,
            update: 3,
            exit: 0
        })
    );
    assert_eq!(chart.scene().node_count(), count);
}

#[test]
fn growing_and_shrinking_reuses_sector_groups() {
    let (mut chart, mut pie) = laid_out(&[1.0, 1.0, 1.0]);
    // root, series layer, pie group
    let base = 3;
    assert_eq!(chart.scene().node_count(), base + 3 * 4);
    let first: Vec<NodeId> = pie.sector_groups().collect();

    pie.set_data(&mut chart, rows(&[1.0; 5]));
    assert_eq!(
        pie.last_join(),
        Some(JoinStats {
            enter: 2,
            update: 3,
            exit: 0
        })
    );
    assert_eq!(chart.scene().node_count(), base + 5 * 4);
    let grown: Vec<NodeId> = pie.sector_groups().collect();
    assert_eq!(&grown[..3], &first[..]);
    assert_eq!(chart.scene().children(pie.group()), &grown[..]);

    pie.set_data(&mut chart, rows(&[1.0, 1.0]));
    assert_eq!(
        pie.last_join(),
        Some(JoinStats {
            enter: 0,
            update: 2,
            exit: 3
        })
    );
    assert_eq!(chart.scene().node_count(), base + 2 * 4);
    assert_eq!(chart.scene().children(pie.group()), &first[..2]);
    assert!(!chart.scene().contains(grown[4]));
}

#[test]
fn zero_total_removes_all_sectors() {
    let (mut chart, mut pie) = laid_out(&[1.0, 2.0]);
    assert_eq!(chart.scene().children(pie.group()).len(), 2);

    pie.set_data(&mut chart, rows(&[0.0, 0.0]));
    assert!(pie.sectors().is_empty());
    assert!(chart.scene().children(pie.group()).is_empty());
    assert_eq!(chart.scene().node_count(), 3);

    pie.set_data(&mut chart, Vec::new());
    assert!(pie.process_data());
    assert!(pie.sectors().is_empty());
}

#[test]
fn clearing_the_angle_field_keeps_the_last_render() {
    let (mut chart, mut pie) = laid_out(&[1.0, 2.0]);
    pie.set_angle_field(&mut chart, None);
    assert!(!pie.process_data());
    assert!(pie.sectors().is_empty());
    assert_eq!(chart.scene().children(pie.group()).len(), 2);
}

#[test]
fn updates_wait_for_a_pending_layout() {
    let mut chart = Chart::new(Size::new(240.0, 240.0));
    let mut pie = PieSeries::new(&mut chart);
    pie.set_angle_field(&mut chart, Some("value"));
    pie.set_data(&mut chart, rows(&[1.0, 1.0]));
    assert!(chart.is_layout_pending());
    assert_eq!(pie.sectors().len(), 2);
    assert!(chart.scene().children(pie.group()).is_empty());
    assert_eq!(pie.last_join(), None);

    chart.perform_layout(&mut [&mut pie]);
    assert!(!chart.is_layout_pending());
    assert_eq!(chart.scene().children(pie.group()).len(), 2);

    chart.set_size(Size::new(440.0, 240.0));
    pie.set_line_width(&mut chart, 3.0);
    let (arc, _, _) = sector_parts(&chart, pie.sector_groups().next().unwrap());
    assert_eq!(chart.scene().get::<Arc>(arc).unwrap().line_width, 2.0);

    chart.perform_layout(&mut [&mut pie]);
    assert_eq!(chart.scene().get::<Arc>(arc).unwrap().line_width, 3.0);
    assert_eq!(pie.geometry().center, Point::new(220.0, 120.0));
}

#[test]
fn group_translation_follows_center_and_offset() {
    let (mut chart, mut pie) = laid_out(&[1.0]);
    let group = pie.group();
    assert_eq!(
        chart.scene().get::<Group>(group).unwrap().translation,
        Vec2::new(120.0, 120.0)
    );

    pie.set_offset(&mut chart, Vec2::new(5.0, -10.0));
    assert_eq!(
        chart.scene().get::<Group>(group).unwrap().translation,
        Vec2::new(125.0, 110.0)
    );
}

#[test]
fn arcs_are_round_wedges_with_sector_styling() {
    let (mut chart, mut pie) = laid_out(&[1.0, 3.0]);
    pie.set_stroke(&mut chart, css::WHITE);

    let groups: Vec<NodeId> = pie.sector_groups().collect();
    let (arc, _, _) = sector_parts(&chart, groups[1]);
    let arc = chart.scene().get::<Arc>(arc).unwrap();
    let d = &pie.sectors()[1];
    assert_eq!(arc.arc_type, ArcType::Round);
    assert_eq!(arc.line_join, LineJoin::Round);
    assert_eq!(arc.center, Point::ORIGIN);
    assert_eq!(arc.start_angle, d.start_angle);
    assert_eq!(arc.end_angle, d.end_angle);
    assert_eq!(arc.fill, Some(d.fill.clone()));
    assert_eq!(arc.stroke, Some(Brush::from(css::WHITE)));
    assert_eq!(arc.line_width, 2.0);
    assert_eq!(arc.shadow, None);
}

#[test]
fn rotation_is_added_to_the_ratio() {
    let (mut chart, mut pie) = laid_out(&[1.0, 1.0]);
    let spans: Vec<f64> = pie.sectors().iter().map(|d| d.span()).collect();
    let start = pie.sectors()[0].start_angle;

    pie.set_rotation(&mut chart, 90.0);
    assert_eq!(pie.rotation(), 90.0);
    // The converted radians shift the ratio, so the angles move by 2π · π/2.
    assert_close(pie.sectors()[0].start_angle, start + 2.0 * PI * FRAC_PI_2);
    for (d, span) in pie.sectors().iter().zip(spans) {
        assert_close(d.span(), span);
    }
}

#[test]
fn rotated_sectors_stay_contiguous() {
    let (mut chart, mut pie) = laid_out(&[3.0, 7.0, 1.5, 0.25, 9.0, 4.0]);
    pie.set_rotation(&mut chart, 37.0);
    let s = pie.sectors();
    assert_eq!(s.len(), 6);
    for pair in s.windows(2) {
        assert_eq!(pair[0].end_angle.to_bits(), pair[1].start_angle.to_bits());
    }
    let total: f64 = s.iter().map(|d| d.span()).sum();
    assert_close(total, 2.0 * PI);
    for sector in s {
        assert!(sector.mid_angle > -PI && sector.mid_angle <= PI);
    }
}

#[test]
fn labels_use_the_configured_style() {
    let (mut chart, mut pie) = laid_out(&[1.0]);
    pie.set_label_field(&mut chart, Some("name"));
    pie.set_label_color(&mut chart, css::NAVY);
    pie.set_label_font(&mut chart, vizjoin_core::Font::new(10.0, "Arial"));
    pie.set_callout_length(&mut chart, 20.0);
    pie.set_callout_padding(&mut chart, 5.0);

    let d = &pie.sectors()[0];
    let label = d.label.as_ref().unwrap();
    let expected = crate::polar(d.mid_angle, 125.0);
    assert_close(label.pos.x, expected.x);
    assert_close(label.pos.y, expected.y);

    let (_, _, text) = sector_parts(&chart, pie.sector_groups().next().unwrap());
    let text = chart.scene().get::<Text>(text).unwrap();
    assert_eq!(text.fill, Some(Brush::from(css::NAVY)));
    assert_eq!(text.font.family, String::from("Arial"));
    assert_eq!(text.font.size, 10.0);
}
