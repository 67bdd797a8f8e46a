// Copyright 2025 the VizJoin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data joins between ordered collections and scene nodes.
//!
//! A [`Selection`] is a list of nodes, each optionally bound to a datum and to that datum's
//! position in its collection. Binding a new collection with [`Selection::set_data`] (positional)
//! or [`Selection::set_data_by`] (keyed) yields a [`Join`]:
//! - **enter**: data with no node yet; materialize them with [`Enter::append`],
//! - **update**: nodes kept and re-bound to new data,
//! - **exit**: nodes with no datum left; drop them with [`Exit::remove`].
//!
//! Entries are always kept in data order, which is also the draw order of the nodes they create.

extern crate alloc;

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::logging::{debug, trace};
use crate::node::{Node, NodeId, SceneNode, Tag};
use crate::scene::Scene;

#[derive(Clone, Debug)]
struct Entry<D> {
    node: NodeId,
    index: usize,
    datum: Option<D>,
}

/// Nodes, optionally bound to data, scoped to the children of a parent node.
#[derive(Clone, Debug)]
pub struct Selection<D> {
    parent: NodeId,
    tag: Option<Tag>,
    entries: Vec<Entry<D>>,
}

/// Sizes of the three partitions produced by a join.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JoinStats {
    /// Data without a node.
    pub enter: usize,
    /// Nodes kept and re-bound.
    pub update: usize,
    /// Nodes without data.
    pub exit: usize,
}

/// The result of binding data to a selection.
#[derive(Debug)]
#[must_use = "entering data and exiting nodes are only applied when `append` / `remove` run"]
pub struct Join<D> {
    /// Data that needs new nodes.
    pub enter: Enter<D>,
    /// Existing nodes re-bound to new data.
    pub update: Selection<D>,
    /// Existing nodes with no datum left.
    pub exit: Exit,
}

impl<D> Join<D> {
    /// Returns the partition sizes.
    pub fn stats(&self) -> JoinStats {
        JoinStats {
            enter: self.enter.len(),
            update: self.update.len(),
            exit: self.exit.len(),
        }
    }
}

#[derive(Debug)]
struct Pending<D> {
    index: usize,
    datum: D,
    before: Option<NodeId>,
}

/// Data that has no node yet.
#[derive(Debug)]
pub struct Enter<D> {
    parent: NodeId,
    tag: Option<Tag>,
    pending: Vec<Pending<D>>,
}

/// Nodes whose datum disappeared.
#[derive(Debug, Default)]
pub struct Exit {
    nodes: Vec<NodeId>,
}

impl<D> Selection<D> {
    /// An empty selection scoped to the children of `parent` carrying `tag`.
    pub fn empty(parent: NodeId, tag: Option<Tag>) -> Self {
        Self {
            parent,
            tag,
            entries: Vec::new(),
        }
    }

    /// Selects the current children of `parent`, optionally only those carrying `tag`.
    ///
    /// The nodes start unbound. A positional join reuses them in order; a keyed join has no key
    /// for them and sends them to exit.
    pub fn select_all(scene: &Scene, parent: NodeId, tag: Option<Tag>) -> Self {
        let entries = scene
            .children(parent)
            .iter()
            .copied()
            .filter(|&id| tag.is_none() || scene.node(id).and_then(|n| n.tag) == tag)
            .enumerate()
            .map(|(index, node)| Entry {
                node,
                index,
                datum: None,
            })
            .collect();
        Self {
            parent,
            tag,
            entries,
        }
    }

    /// The node this selection is scoped to.
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    /// Number of nodes, bound or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no nodes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selected nodes in data order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|e| e.node)
    }

    /// Bound data in data order.
    pub fn data(&self) -> impl Iterator<Item = &D> + '_ {
        self.entries.iter().filter_map(|e| e.datum.as_ref())
    }

    /// Bound `(node, datum, index)` triples in data order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &D, usize)> + '_ {
        self.entries
            .iter()
            .filter_map(|e| e.datum.as_ref().map(|d| (e.node, d, e.index)))
    }

    /// Binds `data` by position: the `i`-th node is re-bound to `data[i]`.
    ///
    /// Runs in `O(max(old, new))`.
    pub fn set_data(self, data: Vec<D>) -> Join<D> {
        let Self {
            parent,
            tag,
            entries,
        } = self;
        let mut old = entries.into_iter();
        let mut update = Vec::with_capacity(data.len().min(old.len()));
        let mut pending = Vec::new();
        for (index, datum) in data.into_iter().enumerate() {
            match old.next() {
                Some(entry) => update.push(Entry {
                    node: entry.node,
                    index,
                    datum: Some(datum),
                }),
                None => pending.push(Pending {
                    index,
                    datum,
                    before: None,
                }),
            }
        }
        let exit = Exit {
            nodes: old.map(|e| e.node).collect(),
        };
        trace!(
            enter = pending.len(),
            update = update.len(),
            exit = exit.len(),
            "positional join"
        );
        Join {
            enter: Enter {
                parent,
                tag,
                pending,
            },
            update: Self {
                parent,
                tag,
                entries: update,
            },
            exit,
        }
    }

    /// Binds `data` by key: a node is kept when its old datum and a new datum share a key.
    ///
    /// `key` receives each datum and its position. Unbound nodes and nodes with a duplicate old
    /// key exit; a duplicate new key enters. Entering nodes are placed before the node bound to
    /// the next data position so that draw order follows data order; call
    /// [`Selection::order`] afterwards if kept nodes may have changed relative order.
    pub fn set_data_by<K, F>(self, data: Vec<D>, key: F) -> Join<D>
    where
        K: Hash + Eq,
        F: Fn(&D, usize) -> K,
    {
        let Self {
            parent,
            tag,
            entries,
        } = self;

        let mut old_nodes = Vec::with_capacity(entries.len());
        let mut claimed = Vec::with_capacity(entries.len());
        let mut by_key: HashMap<K, usize> = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.into_iter().enumerate() {
            old_nodes.push(entry.node);
            claimed.push(false);
            let Some(datum) = entry.datum else {
                continue;
            };
            by_key.entry(key(&datum, i)).or_insert(i);
        }

        let mut update = Vec::new();
        let mut pending = Vec::new();
        let mut slots: Vec<Option<NodeId>> = Vec::with_capacity(data.len());
        for (index, datum) in data.into_iter().enumerate() {
            match by_key.remove(&key(&datum, index)) {
                Some(i) => {
                    claimed[i] = true;
                    slots.push(Some(old_nodes[i]));
                    update.push(Entry {
                        node: old_nodes[i],
                        index,
                        datum: Some(datum),
                    });
                }
                None => {
                    slots.push(None);
                    pending.push(Pending {
                        index,
                        datum,
                        before: None,
                    });
                }
            }
        }

        let mut next = None;
        let mut entering = pending.iter_mut().rev();
        for slot in slots.iter().rev() {
            match slot {
                Some(node) => next = Some(*node),
                None => {
                    if let Some(p) = entering.next() {
                        p.before = next;
                    }
                }
            }
        }

        let exit = Exit {
            nodes: old_nodes
                .into_iter()
                .zip(claimed)
                .filter_map(|(node, kept)| (!kept).then_some(node))
                .collect(),
        };
        trace!(
            enter = pending.len(),
            update = update.len(),
            exit = exit.len(),
            "keyed join"
        );
        Join {
            enter: Enter {
                parent,
                tag,
                pending,
            },
            update: Self {
                parent,
                tag,
                entries: update,
            },
            exit,
        }
    }

    /// Combines two selections over the same data, keeping data order.
    ///
    /// Typically `update.merge(entered)`.
    pub fn merge(self, other: Self) -> Self {
        let mut entries = Vec::with_capacity(self.entries.len() + other.entries.len());
        let mut a = self.entries.into_iter().peekable();
        let mut b = other.entries.into_iter().peekable();
        loop {
            let take_a = match (a.peek(), b.peek()) {
                (Some(x), Some(y)) => x.index <= y.index,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            let next = if take_a { a.next() } else { b.next() };
            entries.extend(next);
        }
        Self {
            parent: self.parent,
            tag: self.tag,
            entries,
        }
    }

    /// Applies `f` to every bound node of kind `K`, in data order.
    pub fn each<K, F>(&self, scene: &mut Scene, mut f: F)
    where
        K: SceneNode,
        F: FnMut(&mut K, &D, usize),
    {
        for entry in &self.entries {
            let Some(datum) = entry.datum.as_ref() else {
                continue;
            };
            if let Some(node) = scene.get_mut::<K>(entry.node) {
                f(node, datum, entry.index);
            }
        }
    }

    /// Applies `f` to every bound node regardless of kind, in data order.
    pub fn each_node<F>(&self, scene: &mut Scene, mut f: F)
    where
        F: FnMut(&mut Node, &D, usize),
    {
        for entry in &self.entries {
            let Some(datum) = entry.datum.as_ref() else {
                continue;
            };
            if let Some(node) = scene.node_mut(entry.node) {
                f(node, datum, entry.index);
            }
        }
    }

    /// Reorders the selected nodes within their parents to match data order.
    pub fn order(&self, scene: &mut Scene) {
        let mut by_parent: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for entry in &self.entries {
            if let Some(parent) = scene.parent(entry.node) {
                by_parent.entry(parent).or_default().push(entry.node);
            }
        }
        for (parent, ordered) in by_parent {
            scene.reorder_children(parent, &ordered);
        }
    }
}

impl<D: Clone> Selection<D> {
    /// Appends a default `K` child, tagged `tag`, under every bound node.
    ///
    /// The returned selection binds each new child to its parent's datum.
    pub fn append<K>(&self, scene: &mut Scene, tag: Option<Tag>) -> Self
    where
        K: SceneNode + Default,
    {
        let mut entries = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let Some(datum) = entry.datum.as_ref() else {
                continue;
            };
            let child = Node::new(K::default().into_kind()).with_tag(tag);
            match scene.insert(entry.node, child, None) {
                Ok(node) => entries.push(Entry {
                    node,
                    index: entry.index,
                    datum: Some(datum.clone()),
                }),
                Err(_err) => debug!(error = %_err, "skipping child append"),
            }
        }
        Self {
            parent: self.parent,
            tag,
            entries,
        }
    }

    /// Narrows to descendants carrying `tag` whose payload is a `K`.
    ///
    /// Each descendant inherits the datum of the selected node it was found under.
    pub fn select_by_tag<K: SceneNode>(&self, scene: &Scene, tag: Tag) -> Self {
        let mut entries = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let Some(datum) = entry.datum.as_ref() else {
                continue;
            };
            for node in scene.descendants_with_tag(entry.node, tag) {
                if scene.get::<K>(node).is_some() {
                    entries.push(Entry {
                        node,
                        index: entry.index,
                        datum: Some(datum.clone()),
                    });
                }
            }
        }
        Self {
            parent: self.parent,
            tag: Some(tag),
            entries,
        }
    }
}

impl<D> Enter<D> {
    /// Number of entering data.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing enters.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Entering data in data order.
    pub fn data(&self) -> impl Iterator<Item = &D> + '_ {
        self.pending.iter().map(|p| &p.datum)
    }

    /// Creates one node per entering datum with `make` and binds it.
    ///
    /// Nodes carry the selection's tag and are inserted at their data position among their
    /// siblings, in a single pass over the parent's children. If the parent no longer exists
    /// nothing is created.
    pub fn append_with<K, F>(self, scene: &mut Scene, mut make: F) -> Selection<D>
    where
        K: SceneNode,
        F: FnMut(&D, usize) -> K,
    {
        let mut batch = Vec::with_capacity(self.pending.len());
        let mut bound = Vec::with_capacity(self.pending.len());
        for p in self.pending {
            let node = Node::new(make(&p.datum, p.index).into_kind()).with_tag(self.tag);
            batch.push((node, p.before));
            bound.push((p.index, p.datum));
        }
        let entries = match scene.insert_batch(self.parent, batch) {
            Ok(ids) => ids
                .into_iter()
                .zip(bound)
                .map(|(node, (index, datum))| Entry {
                    node,
                    index,
                    datum: Some(datum),
                })
                .collect(),
            Err(_err) => {
                debug!(error = %_err, count = bound.len(), "skipping enter append");
                Vec::new()
            }
        };
        Selection {
            parent: self.parent,
            tag: self.tag,
            entries,
        }
    }

    /// Creates one default `K` per entering datum and binds it.
    pub fn append<K>(self, scene: &mut Scene) -> Selection<D>
    where
        K: SceneNode + Default,
    {
        self.append_with(scene, |_, _| K::default())
    }
}

impl Exit {
    /// Number of exiting nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if nothing exits.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Exiting nodes in their previous order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Detaches and drops every exiting node with its subtree. Returns the number of nodes
    /// dropped (subtrees included).
    pub fn remove(self, scene: &mut Scene) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        scene.remove_all(&self.nodes)
    }
}
