// Copyright 2025 the VizJoin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained scene graph and data joins for VizJoin.
//!
//! This crate is the persistent half of the chart pipeline:
//! - **Scene** is an arena of nodes (`Group`, `Arc`, `Line`, `Text`) addressed by stable
//!   [`NodeId`]s. A group exclusively owns its children.
//! - **Selection** binds an ordered data collection to the children of a group and partitions
//!   the result into enter / update / exit, so re-renders only create or destroy the nodes that
//!   actually changed.
//!
//! Painting is out of scope; renderers walk the scene and read the typed node properties.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod logging;
mod node;
mod scene;
mod selection;
mod shape;

pub use node::{Node, NodeId, NodeKind, SceneNode, Tag};
pub use scene::{Scene, SceneError};
pub use selection::{Enter, Exit, Join, JoinStats, Selection};
pub use shape::{
    Arc, ArcType, DropShadow, Font, Group, Line, LineJoin, Text, TextAlign, TextBaseline,
};
