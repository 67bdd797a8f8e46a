// Copyright 2025 the VizJoin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear scales.

/// A linear mapping from a continuous domain to a continuous range.
///
/// Both intervals may be descending. A degenerate domain (`d0 == d1`) is not special-cased:
/// [`ScaleLinear::convert`] then yields a non-finite value, so callers must guard against it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl Default for ScaleLinear {
    fn default() -> Self {
        Self::new((0.0, 1.0), (0.0, 1.0))
    }
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Returns the domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns the range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Replaces the domain.
    pub fn set_domain(&mut self, domain: (f64, f64)) {
        self.domain = domain;
    }

    /// Replaces the range.
    pub fn set_range(&mut self, range: (f64, f64)) {
        self.range = range;
    }

    /// Maps a value from domain space into range space.
    pub fn convert(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (x - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Maps a value from range space back into domain space.
    pub fn invert(&self, y: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        d0 + (y - r0) / (r1 - r0) * (d1 - d0)
    }
}
