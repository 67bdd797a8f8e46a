// Copyright 2025 the VizJoin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Angle helpers shared by radial layouts.
//!
//! Angles are radians unless a name says otherwise. Screen space has y pointing down, so
//! positive angles turn clockwise and `-π/2` points at 12 o'clock.

use core::f64::consts::{PI, TAU};

use kurbo::Point;

#[cfg(all(not(feature = "std"), not(test)))]
use crate::float::FloatExt;

/// Converts degrees to radians.
pub fn to_radians(degrees: f64) -> f64 {
    degrees / 180.0 * PI
}

/// Converts radians to degrees.
pub fn to_degrees(radians: f64) -> f64 {
    radians / PI * 180.0
}

/// Wraps an angle into `[0, 2π)`.
pub fn normalize_angle360(radians: f64) -> f64 {
    let r = radians % TAU;
    if r < 0.0 { r + TAU } else { r }
}

/// Wraps an angle into `(-π, π]`.
pub fn normalize_angle180(radians: f64) -> f64 {
    let r = radians % TAU;
    if r <= -PI {
        r + TAU
    } else if r > PI {
        r - TAU
    } else {
        r
    }
}

/// The point at `angle` and distance `radius` from the origin.
pub fn polar(angle: f64, radius: f64) -> Point {
    Point::new(angle.cos() * radius, angle.sin() * radius)
}
