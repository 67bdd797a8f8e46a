// Copyright 2025 the VizJoin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump of a `vizjoin_core` scene.

use kurbo::{Size, Vec2};
use peniko::Brush;
use vizjoin_core::{Arc, LineJoin, NodeId, NodeKind, Scene, Text, TextAlign, TextBaseline};

const ARC_TOLERANCE: f64 = 0.1;

/// Renders the whole scene, depth first, in child order.
pub(crate) fn to_svg_string(scene: &Scene, size: Size) -> String {
    let mut out = String::new();
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
    out.push_str(&format!(
        r#"viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
        w = size.width,
        h = size.height,
    ));
    out.push('\n');
    write_node(&mut out, scene, scene.root(), 1);
    out.push_str("</svg>\n");
    out
}

fn write_node(out: &mut String, scene: &Scene, id: NodeId, depth: usize) {
    let Some(node) = scene.node(id) else {
        return;
    };
    if !node.visible {
        return;
    }
    let indent = "  ".repeat(depth);
    match node.kind() {
        NodeKind::Group(group) => {
            if group.translation == Vec2::ZERO {
                out.push_str(&format!("{indent}<g>\n"));
            } else {
                out.push_str(&format!(
                    r#"{indent}<g transform="translate({} {})">"#,
                    group.translation.x, group.translation.y
                ));
                out.push('\n');
            }
            for &child in scene.children(id) {
                write_node(out, scene, child, depth + 1);
            }
            out.push_str(&format!("{indent}</g>\n"));
        }
        NodeKind::Arc(arc) => write_arc(out, &indent, arc),
        NodeKind::Line(line) => {
            let Some(stroke) = &line.stroke else {
                return;
            };
            out.push_str(&format!(
                r#"{indent}<line x1="{}" y1="{}" x2="{}" y2="{}""#,
                line.p0.x, line.p0.y, line.p1.x, line.p1.y
            ));
            write_paint_attr(out, "stroke", stroke);
            out.push_str(&format!(r#" stroke-width="{}"/>"#, line.line_width));
            out.push('\n');
        }
        NodeKind::Text(text) => write_text(out, &indent, text),
    }
}

fn write_arc(out: &mut String, indent: &str, arc: &Arc) {
    let d = arc.to_path(ARC_TOLERANCE).to_svg();
    out.push_str(&format!(r#"{indent}<path d="{d}""#));
    match &arc.fill {
        Some(fill) => write_paint_attr(out, "fill", fill),
        None => out.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = &arc.stroke {
        if arc.line_width > 0.0 {
            write_paint_attr(out, "stroke", stroke);
            out.push_str(&format!(r#" stroke-width="{}""#, arc.line_width));
            out.push_str(match arc.line_join {
                LineJoin::Miter => r#" stroke-linejoin="miter""#,
                LineJoin::Round => r#" stroke-linejoin="round""#,
                LineJoin::Bevel => r#" stroke-linejoin="bevel""#,
            });
        }
    }
    out.push_str("/>\n");
}

fn write_text(out: &mut String, indent: &str, text: &Text) {
    let Some(fill) = &text.fill else {
        return;
    };
    let anchor = match text.align {
        TextAlign::Start | TextAlign::Left => "start",
        TextAlign::End | TextAlign::Right => "end",
        TextAlign::Center => "middle",
    };
    let baseline = match text.baseline {
        TextBaseline::Top | TextBaseline::Hanging => "hanging",
        TextBaseline::Middle => "middle",
        TextBaseline::Alphabetic => "alphabetic",
        TextBaseline::Ideographic => "ideographic",
        TextBaseline::Bottom => "text-after-edge",
    };
    out.push_str(&format!(
        r#"{indent}<text x="{}" y="{}" font-size="{}" font-family="{}""#,
        text.pos.x,
        text.pos.y,
        text.font.size,
        escape_xml(&text.font.family),
    ));
    out.push_str(&format!(r#" text-anchor="{anchor}" dominant-baseline="{baseline}""#));
    write_paint_attr(out, "fill", fill);
    out.push('>');
    out.push_str(&escape_xml(&text.text));
    out.push_str("</text>\n");
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let fill_opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, fill_opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
