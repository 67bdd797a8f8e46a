// Copyright 2025 the VizJoin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed node payloads.
//!
//! Every node kind is a plain struct with a fixed set of geometry and style fields. Renderers
//! read these directly; the chart layer writes them through a [`Selection`](crate::Selection).

extern crate alloc;

use alloc::string::String;
use core::fmt;

use kurbo::{BezPath, PathEl, Point, Shape, Vec2};
use peniko::color::palette::css;
use peniko::{Brush, Color};

/// A container node. Its translation applies to the whole subtree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    /// Offset applied to all descendants.
    pub translation: Vec2,
}

/// How the ends of an [`Arc`] are closed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArcType {
    /// Only the curve itself.
    #[default]
    Open,
    /// The curve closed by a straight chord.
    Chord,
    /// The curve closed through the center (a pie slice).
    Round,
}

/// Corner style where stroked segments meet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineJoin {
    /// Sharp corners.
    #[default]
    Miter,
    /// Rounded corners.
    Round,
    /// Cut-off corners.
    Bevel,
}

/// A blurred, offset shadow drawn beneath a shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropShadow {
    /// Shadow color.
    pub color: Color,
    /// Offset from the shape in scene coordinates.
    pub offset: Vec2,
    /// Blur radius in scene coordinates.
    pub blur: f64,
}

impl Default for DropShadow {
    fn default() -> Self {
        Self {
            color: Color::from_rgba8(0, 0, 0, 128),
            offset: Vec2::ZERO,
            blur: 5.0,
        }
    }
}

/// An elliptical arc, optionally closed into a chord or a pie slice.
///
/// Angles are in radians, measured clockwise from the positive x axis (y points down).
#[derive(Clone, Debug, PartialEq)]
pub struct Arc {
    /// Center in local coordinates.
    pub center: Point,
    /// Horizontal and vertical radii.
    pub radii: Vec2,
    /// Start angle in radians.
    pub start_angle: f64,
    /// End angle in radians.
    pub end_angle: f64,
    /// Closure style.
    pub arc_type: ArcType,
    /// Fill paint, `None` disables filling.
    pub fill: Option<Brush>,
    /// Stroke paint, `None` disables stroking.
    pub stroke: Option<Brush>,
    /// Stroke width.
    pub line_width: f64,
    /// Stroke corner style.
    pub line_join: LineJoin,
    /// Optional drop shadow.
    pub shadow: Option<DropShadow>,
}

impl Default for Arc {
    fn default() -> Self {
        Self {
            center: Point::ORIGIN,
            radii: Vec2::new(10.0, 10.0),
            start_angle: 0.0,
            end_angle: core::f64::consts::TAU,
            arc_type: ArcType::Open,
            fill: Some(css::BLACK.into()),
            stroke: None,
            line_width: 0.0,
            line_join: LineJoin::Miter,
            shadow: None,
        }
    }
}

impl Arc {
    /// Signed angular extent of the arc.
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Flattens the arc into a path according to its [`ArcType`].
    pub fn to_path(&self, tolerance: f64) -> BezPath {
        let arc = kurbo::Arc::new(self.center, self.radii, self.start_angle, self.sweep(), 0.0);
        let mut path = BezPath::new();
        let mut elements = arc.path_elements(tolerance);
        match self.arc_type {
            ArcType::Open => path.extend(elements),
            ArcType::Chord => {
                path.extend(elements);
                path.close_path();
            }
            ArcType::Round => {
                path.move_to(self.center);
                if let Some(PathEl::MoveTo(start)) = elements.next() {
                    path.line_to(start);
                }
                path.extend(elements);
                path.close_path();
            }
        }
        path
    }
}

/// A straight line segment.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    /// Start point.
    pub p0: Point,
    /// End point.
    pub p1: Point,
    /// Stroke paint, `None` hides the line.
    pub stroke: Option<Brush>,
    /// Stroke width.
    pub line_width: f64,
}

impl Default for Line {
    fn default() -> Self {
        Self::new(Point::ORIGIN, Point::ORIGIN)
    }
}

impl Line {
    /// Creates a black, 1-unit wide line.
    pub fn new(p0: Point, p1: Point) -> Self {
        Self {
            p0,
            p1,
            stroke: Some(css::BLACK.into()),
            line_width: 1.0,
        }
    }

    /// Returns the geometric segment.
    pub fn segment(&self) -> kurbo::Line {
        kurbo::Line::new(self.p0, self.p1)
    }
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    /// Start of the line (left for LTR text).
    #[default]
    Start,
    /// End of the line.
    End,
    /// Left edge at the anchor.
    Left,
    /// Right edge at the anchor.
    Right,
    /// Centered on the anchor.
    Center,
}

/// Vertical text alignment relative to the anchor point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextBaseline {
    /// Top of the em box.
    Top,
    /// Hanging baseline.
    Hanging,
    /// Middle of the em box.
    Middle,
    /// Alphabetic baseline.
    #[default]
    Alphabetic,
    /// Ideographic baseline.
    Ideographic,
    /// Bottom of the em box.
    Bottom,
}

/// A font request. Shaping is left to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    /// Size in scene units.
    pub size: f64,
    /// Family name.
    pub family: String,
}

impl Font {
    /// Creates a font request.
    pub fn new(size: f64, family: impl Into<String>) -> Self {
        Self {
            size,
            family: family.into(),
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new(14.0, "Verdana")
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px {}", self.size, self.family)
    }
}

/// A single line of text anchored at a point.
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    /// Content.
    pub text: String,
    /// Anchor position.
    pub pos: Point,
    /// Font request.
    pub font: Font,
    /// Fill paint, `None` hides the text.
    pub fill: Option<Brush>,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Vertical alignment.
    pub baseline: TextBaseline,
}

impl Default for Text {
    fn default() -> Self {
        Self {
            text: String::new(),
            pos: Point::ORIGIN,
            font: Font::default(),
            fill: Some(css::BLACK.into()),
            align: TextAlign::Start,
            baseline: TextBaseline::Alphabetic,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;
    use core::f64::consts::{FRAC_PI_2, PI};

    use super::*;

    #[test]
    fn round_arc_starts_and_ends_at_the_center() {
        let arc = Arc {
            center: Point::new(5.0, 5.0),
            radii: Vec2::new(10.0, 10.0),
            start_angle: 0.0,
            end_angle: FRAC_PI_2,
            arc_type: ArcType::Round,
            ..Arc::default()
        };
        let path = arc.to_path(0.1);
        let elements = path.elements();
        assert_eq!(elements.first(), Some(&PathEl::MoveTo(Point::new(5.0, 5.0))));
        assert_eq!(elements.last(), Some(&PathEl::ClosePath));
        let PathEl::LineTo(start) = elements[1] else {
            panic!("expected a spoke to the arc start");
        };
        assert!((start.x - 15.0).abs() < 1e-9, "{start:?}");
        assert!((start.y - 5.0).abs() < 1e-9, "{start:?}");
    }

    #[test]
    fn open_arc_is_not_closed() {
        let arc = Arc {
            end_angle: PI,
            ..Arc::default()
        };
        let path = arc.to_path(0.1);
        assert!(matches!(path.elements().first(), Some(PathEl::MoveTo(_))));
        assert_ne!(path.elements().last(), Some(&PathEl::ClosePath));
    }

    #[test]
    fn font_displays_like_a_css_shorthand() {
        assert_eq!(Font::default().to_string(), "14px Verdana");
        assert_eq!(Font::new(9.5, "Inter").to_string(), "9.5px Inter");
    }
}
