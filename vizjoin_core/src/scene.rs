// Copyright 2025 the VizJoin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The node arena.

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use hashbrown::{HashMap, HashSet};

use crate::logging::trace;
use crate::node::{Node, NodeId, NodeKind, SceneNode, Tag};
use crate::shape::Group;

/// Errors returned by fallible [`Scene`] insertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    /// The parent id does not resolve to a live node.
    MissingParent(NodeId),
    /// The parent exists but is not a group, so it cannot own children.
    NotAGroup(NodeId),
    /// The insertion reference node is not a child of the parent.
    NotAChild {
        /// The requested parent.
        parent: NodeId,
        /// The node that was expected among its children.
        child: NodeId,
    },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParent(id) => write!(f, "parent node {} does not exist", id.0),
            Self::NotAGroup(id) => write!(f, "node {} is not a group", id.0),
            Self::NotAChild { parent, child } => {
                write!(f, "node {} is not a child of node {}", child.0, parent.0)
            }
        }
    }
}

impl core::error::Error for SceneError {}

/// A tree of nodes rooted at a group.
///
/// The root always exists; every other node has exactly one parent, which owns it. Removing a
/// node drops its whole subtree.
#[derive(Debug)]
pub struct Scene {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_id: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates a scene containing only an empty root group.
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, Node::new(Group::default()));
        Self {
            nodes,
            root,
            next_id: 1,
        }
    }

    /// Returns the root group.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Returns a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Returns a node mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Returns a node payload as `K`.
    pub fn get<K: SceneNode>(&self, id: NodeId) -> Option<&K> {
        self.nodes.get(&id).and_then(Node::get)
    }

    /// Returns a node payload as `K`, mutably.
    pub fn get_mut<K: SceneNode>(&mut self, id: NodeId) -> Option<&mut K> {
        self.nodes.get_mut(&id).and_then(Node::get_mut)
    }

    /// Returns the parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Returns the children of a node in draw order (empty for unknown ids).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[][..], Node::children)
    }

    /// Appends a child to the root group. This cannot fail.
    pub fn add_root_child(&mut self, node: impl Into<NodeKind>) -> NodeId {
        let id = self.alloc();
        let mut node = Node::new(node);
        node.parent = Some(self.root);
        self.nodes.insert(id, node);
        if let Some(root) = self.nodes.get_mut(&self.root) {
            root.children.push(id);
        }
        id
    }

    /// Appends `node` as the last child of `parent`.
    pub fn append(
        &mut self,
        parent: NodeId,
        node: impl Into<NodeKind>,
    ) -> Result<NodeId, SceneError> {
        self.insert(parent, Node::new(node), None)
    }

    /// Inserts `node` under `parent`, before `before` or last if `before` is `None`.
    pub fn insert(
        &mut self,
        parent: NodeId,
        mut node: Node,
        before: Option<NodeId>,
    ) -> Result<NodeId, SceneError> {
        let Some(owner) = self.nodes.get(&parent) else {
            return Err(SceneError::MissingParent(parent));
        };
        if !matches!(owner.kind(), NodeKind::Group(_)) {
            return Err(SceneError::NotAGroup(parent));
        }
        let position = match before {
            Some(child) => Some(
                owner
                    .children
                    .iter()
                    .position(|&c| c == child)
                    .ok_or(SceneError::NotAChild { parent, child })?,
            ),
            None => None,
        };

        let id = self.alloc();
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.insert(id, node);
        if let Some(owner) = self.nodes.get_mut(&parent) {
            match position {
                Some(i) => owner.children.insert(i, id),
                None => owner.children.push(id),
            }
        }
        Ok(id)
    }

    /// Inserts a batch of nodes under `parent`, each before its reference sibling or last.
    ///
    /// Nodes sharing a reference keep their batch order. A reference that is not a child of
    /// `parent` places the node last. The cost is linear in the batch size plus the number of
    /// existing children. Returns the new ids in batch order.
    pub fn insert_batch(
        &mut self,
        parent: NodeId,
        batch: Vec<(Node, Option<NodeId>)>,
    ) -> Result<Vec<NodeId>, SceneError> {
        let Some(owner) = self.nodes.get(&parent) else {
            return Err(SceneError::MissingParent(parent));
        };
        if !matches!(owner.kind(), NodeKind::Group(_)) {
            return Err(SceneError::NotAGroup(parent));
        }
        let members: HashSet<NodeId> = owner.children.iter().copied().collect();

        let mut ids = Vec::with_capacity(batch.len());
        let mut placed: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        let mut last = Vec::new();
        for (mut node, before) in batch {
            let id = self.alloc();
            node.parent = Some(parent);
            node.children.clear();
            self.nodes.insert(id, node);
            ids.push(id);
            match before {
                Some(child) if members.contains(&child) => {
                    placed.entry(child).or_default().push(id);
                }
                Some(_child) => {
                    trace!(child = _child.0, "insertion reference is not a child; appending");
                    last.push(id);
                }
                None => last.push(id),
            }
        }

        if let Some(owner) = self.nodes.get_mut(&parent) {
            if !placed.is_empty() {
                let old = core::mem::take(&mut owner.children);
                owner.children.reserve(old.len() + ids.len());
                for child in old {
                    if let Some(new) = placed.remove(&child) {
                        owner.children.extend(new);
                    }
                    owner.children.push(child);
                }
            }
            owner.children.extend(last);
        }
        Ok(ids)
    }

    /// Removes a node and its subtree. Returns `false` for the root or unknown ids.
    pub fn remove(&mut self, id: NodeId) -> bool {
        self.remove_all(&[id]) > 0
    }

    /// Removes several nodes and their subtrees, returning how many nodes were dropped.
    ///
    /// Each affected parent's child list is compacted once, so the cost is linear in the number
    /// of removed nodes plus the sizes of the affected child lists.
    pub fn remove_all(&mut self, ids: &[NodeId]) -> usize {
        let mut detached: HashMap<NodeId, HashSet<NodeId>> = HashMap::new();
        let mut dropped = 0;
        for &id in ids {
            if id == self.root {
                continue;
            }
            let Some(parent) = self.nodes.get(&id).map(|n| n.parent) else {
                continue;
            };
            dropped += self.drop_subtree(id);
            if let Some(parent) = parent {
                detached.entry(parent).or_default().insert(id);
            }
        }
        for (parent, gone) in detached {
            if let Some(owner) = self.nodes.get_mut(&parent) {
                owner.children.retain(|c| !gone.contains(c));
            }
        }
        trace!(requested = ids.len(), dropped, "removed nodes");
        dropped
    }

    /// Descendants of `id` carrying `tag`, in pre-order (excluding `id` itself).
    pub fn descendants_with_tag(&self, id: NodeId, tag: Tag) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            let Some(node) = self.nodes.get(&next) else {
                continue;
            };
            if node.tag == Some(tag) {
                out.push(next);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Rewrites the slots occupied by `ordered` in `parent`'s child list so they appear in the
    /// given order. Children not listed keep their positions.
    pub(crate) fn reorder_children(&mut self, parent: NodeId, ordered: &[NodeId]) {
        let members: HashSet<NodeId> = ordered.iter().copied().collect();
        let Some(owner) = self.nodes.get_mut(&parent) else {
            return;
        };
        let mut next = ordered.iter().copied();
        for slot in owner.children.iter_mut() {
            if members.contains(slot)
                && let Some(id) = next.next()
            {
                *slot = id;
            }
        }
    }

    fn alloc(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn drop_subtree(&mut self, id: NodeId) -> usize {
        let mut dropped = 0;
        let mut stack = alloc::vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                dropped += 1;
                stack.extend(node.children);
            }
        }
        dropped
    }
}
