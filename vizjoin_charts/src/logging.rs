// Copyright 2025 the VizJoin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logging shims.
//!
//! With the `tracing` feature these are the `tracing` macros. Without it the event macros expand
//! to a unit expression and `debug_span!` yields a [`NoopSpan`].

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, debug_span, trace};

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_span {
    ($($arg:tt)*) => {
        $crate::logging::NoopSpan
    };
}

#[cfg(not(feature = "tracing"))]
pub(crate) use {debug, debug_span, trace};

/// Stand-in for a `tracing` span when the feature is off.
#[cfg(not(feature = "tracing"))]
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Enters the span; the guard does nothing.
    pub(crate) fn entered(self) -> NoopGuard {
        NoopGuard
    }
}

/// Guard returned by [`NoopSpan::entered`].
#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub(crate) struct NoopGuard;
