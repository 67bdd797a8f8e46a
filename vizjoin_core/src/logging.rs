// Copyright 2025 the VizJoin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logging shims.
//!
//! With the `tracing` feature these are the `tracing` macros. Without it they expand to a unit
//! expression, so they are usable both as statements and as `match` arms.

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use {debug, trace};
