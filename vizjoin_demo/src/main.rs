// Copyright 2025 the VizJoin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pie chart demo for `vizjoin_charts`.
//!
//! Renders one pie through a few data updates and writes the final scene as SVG.

mod svg;

use kurbo::Size;
use peniko::color::palette::css;
use vizjoin_charts::{Chart, PieSeries, Row};
use vizjoin_core::DropShadow;

fn fruit(name: &str, count: f64, weight: f64) -> Row {
    Row::new()
        .with("name", name)
        .with("count", count)
        .with("weight", weight)
}

fn report(step: &str, chart: &Chart, pie: &PieSeries<Row>) {
    let stats = pie.last_join().unwrap_or_default();
    println!(
        "{step:<10} sectors={} enter={} update={} exit={} nodes={}",
        pie.sectors().len(),
        stats.enter,
        stats.update,
        stats.exit,
        chart.scene().node_count(),
    );
}

fn main() -> std::io::Result<()> {
    let size = Size::new(480.0, 360.0);
    let mut chart = Chart::new(size);
    let mut pie = PieSeries::new(&mut chart);
    pie.set_angle_field(&mut chart, Some("count"));
    pie.set_label_field(&mut chart, Some("name"));
    pie.set_stroke(&mut chart, css::WHITE);
    pie.set_shadow(&mut chart, Some(DropShadow::default()));
    pie.set_data(
        &mut chart,
        vec![
            fruit("apples", 12.0, 3.0),
            fruit("pears", 5.0, 2.0),
            fruit("plums", 8.0, 1.0),
        ],
    );
    // Nothing is rendered until the first layout assigns the center and radius.
    chart.set_padding(40.0);
    chart.perform_layout(&mut [&mut pie]);
    report("initial", &chart, &pie);

    pie.set_data(
        &mut chart,
        vec![
            fruit("apples", 12.0, 3.0),
            fruit("pears", 5.0, 2.0),
            fruit("plums", 8.0, 1.0),
            fruit("figs", 2.0, 4.0),
            fruit("kiwis", 6.0, 2.5),
        ],
    );
    report("grow", &chart, &pie);

    pie.set_data(
        &mut chart,
        vec![fruit("apples", 10.0, 3.0), fruit("figs", 4.0, 4.0)],
    );
    report("shrink", &chart, &pie);

    pie.set_data(
        &mut chart,
        vec![
            fruit("cherries", 7.0, 1.5),
            fruit("grapes", 9.0, 2.0),
            fruit("limes", 3.0, 0.5),
            fruit("dates", 1.0, 3.5),
        ],
    );
    pie.set_radius_field(&mut chart, Some("weight"));
    pie.set_rotation(&mut chart, 0.1);
    report("relabel", &chart, &pie);

    let svg = svg::to_svg_string(chart.scene(), size);
    std::fs::write("vizjoin_demo.svg", svg)?;
    println!("wrote vizjoin_demo.svg");
    Ok(())
}
