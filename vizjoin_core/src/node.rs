// Copyright 2025 the VizJoin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene nodes and their identities.

use kurbo::{Rect, Shape};
use smallvec::SmallVec;

use crate::shape::{Arc, Group, Line, Text};

/// Stable identity of a node inside a [`Scene`](crate::Scene).
///
/// Ids are never reused within a scene, so an id that outlives its node simply stops resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    /// Builds an id from its raw value.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

/// A user-assigned label used to address sub-nodes of a composite node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tag(pub u32);

/// The typed payload of a node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// A container that owns child nodes.
    Group(Group),
    /// An elliptical arc or pie slice.
    Arc(Arc),
    /// A straight line segment.
    Line(Line),
    /// A single line of unshaped text.
    Text(Text),
}

impl NodeKind {
    /// Returns a short name for the node kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Group(_) => "group",
            Self::Arc(_) => "arc",
            Self::Line(_) => "line",
            Self::Text(_) => "text",
        }
    }
}

/// A node kind that can be created by, and addressed through, a selection.
pub trait SceneNode: Sized {
    /// Borrows `Self` out of a node payload if the kind matches.
    fn from_kind(kind: &NodeKind) -> Option<&Self>;
    /// Mutably borrows `Self` out of a node payload if the kind matches.
    fn from_kind_mut(kind: &mut NodeKind) -> Option<&mut Self>;
    /// Wraps `self` into a node payload.
    fn into_kind(self) -> NodeKind;
}

macro_rules! impl_scene_node {
    ($ty:ident) => {
        impl SceneNode for $ty {
            fn from_kind(kind: &NodeKind) -> Option<&Self> {
                match kind {
                    NodeKind::$ty(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_kind_mut(kind: &mut NodeKind) -> Option<&mut Self> {
                match kind {
                    NodeKind::$ty(inner) => Some(inner),
                    _ => None,
                }
            }

            fn into_kind(self) -> NodeKind {
                NodeKind::$ty(self)
            }
        }

        impl From<$ty> for NodeKind {
            fn from(value: $ty) -> Self {
                Self::$ty(value)
            }
        }
    };
}

impl_scene_node!(Group);
impl_scene_node!(Arc);
impl_scene_node!(Line);
impl_scene_node!(Text);

/// A node in the scene tree.
#[derive(Clone, Debug)]
pub struct Node {
    /// Optional tag used by [`Selection::select_by_tag`](crate::Selection::select_by_tag).
    pub tag: Option<Tag>,
    /// Hidden nodes (and their subtrees) are skipped by renderers.
    pub visible: bool,
    kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: SmallVec<[NodeId; 4]>,
}

impl Node {
    /// Creates a detached, visible, untagged node.
    pub fn new(kind: impl Into<NodeKind>) -> Self {
        Self {
            tag: None,
            visible: true,
            kind: kind.into(),
            parent: None,
            children: SmallVec::new(),
        }
    }

    /// Sets the tag.
    pub fn with_tag(mut self, tag: Option<Tag>) -> Self {
        self.tag = tag;
        self
    }

    /// Returns the payload.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns the payload mutably.
    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// Returns the payload as `K`, if the kind matches.
    pub fn get<K: SceneNode>(&self) -> Option<&K> {
        K::from_kind(&self.kind)
    }

    /// Returns the payload as `K` mutably, if the kind matches.
    pub fn get_mut<K: SceneNode>(&mut self) -> Option<&mut K> {
        K::from_kind_mut(&mut self.kind)
    }

    /// Returns the parent id, or `None` for the scene root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the children in draw order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Coarse local-space bounds of this node alone.
    ///
    /// Groups and text have no intrinsic bounds (text is never measured here).
    pub fn bounds(&self) -> Option<Rect> {
        match &self.kind {
            NodeKind::Group(_) | NodeKind::Text(_) => None,
            NodeKind::Arc(arc) => Some(arc.to_path(0.1).bounding_box()),
            NodeKind::Line(line) => Some(Rect::from_points(line.p0, line.p1)),
        }
    }
}
