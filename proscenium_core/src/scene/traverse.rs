// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use super::id::{INVALID, NodeId};
use super::store::Scene;

/// An iterator over the direct children of a node, bottom-most first.
///
/// Created by [`Scene::children`].
#[derive(Debug)]
pub struct Children<'a> {
    scene: &'a Scene,
    slots: core::slice::Iter<'a, u32>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.slots.next().map(|&idx| self.scene.id_at(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<NodeId> {
        self.slots.next_back().map(|&idx| self.scene.id_at(idx))
    }
}

impl ExactSizeIterator for Children<'_> {}

/// An iterator from a node's container up to the root.
///
/// Created by [`Scene::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a> {
    scene: &'a Scene,
    current: u32,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.scene.parent[idx as usize];
        Some(self.scene.id_at(idx))
    }
}

impl Scene {
    /// Returns the container of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        if p == INVALID {
            None
        } else {
            Some(self.id_at(p))
        }
    }

    /// Returns an iterator over the direct children of a node in paint
    /// order. Reverse it for hit-test order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children {
            scene: self,
            slots: self.children[id.idx as usize].iter(),
        }
    }

    /// Returns the number of direct children.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.validate(id);
        self.children[id.idx as usize].len()
    }

    /// Returns the child at `index`, if any.
    #[must_use]
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.validate(id);
        self.children[id.idx as usize]
            .get(index)
            .map(|&idx| self.id_at(idx))
    }

    /// Returns the position of `child` in the child list of `id`.
    #[must_use]
    pub fn child_index(&self, id: NodeId, child: NodeId) -> Option<usize> {
        self.validate(id);
        if !self.is_alive(child) {
            return None;
        }
        self.position_of(id.idx, child.idx)
    }

    /// Returns an iterator over the ancestors of a node, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        self.validate(id);
        Ancestors {
            scene: self,
            current: self.parent[id.idx as usize],
        }
    }

    /// Returns whether `ancestor` is `id` or one of its ancestors.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.validate(ancestor);
        self.validate(id);
        self.is_within(id.idx, ancestor.idx)
    }

    pub(crate) fn position_of(&self, parent: u32, child: u32) -> Option<usize> {
        self.children[parent as usize]
            .iter()
            .position(|&c| c == child)
    }

    /// Whether `root` is `idx` or an ancestor of it.
    pub(crate) fn is_within(&self, idx: u32, root: u32) -> bool {
        let mut cur = idx;
        while cur != INVALID {
            if cur == root {
                return true;
            }
            cur = self.parent[cur as usize];
        }
        false
    }

    /// Depth-first pre-order slots of the subtree rooted at `idx`.
    pub(crate) fn subtree(&self, idx: u32) -> Vec<u32> {
        let mut out = Vec::new();
        let mut stack = vec![idx];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            // Push in reverse so children pop in ascending order.
            stack.extend(self.children[cur as usize].iter().rev());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::scene::test_scene;

    #[test]
    fn children_iterate_both_ways() {
        let mut scene = test_scene();
        let parent = scene.create_container();
        let a = scene.create_object();
        let b = scene.create_object();
        scene.add_child(parent, a);
        scene.add_child(parent, b);

        let forward: Vec<_> = scene.children(parent).collect();
        let backward: Vec<_> = scene.children(parent).rev().collect();
        assert_eq!(forward, vec![a, b]);
        assert_eq!(backward, vec![b, a]);
        assert_eq!(scene.children(parent).len(), 2);
    }

    #[test]
    fn ancestors_walk_to_root() {
        let mut scene = test_scene();
        let stage = scene.stage();
        let outer = scene.create_container();
        let inner = scene.create_object();
        scene.add_child(stage, outer);
        scene.add_child(outer, inner);

        let up: Vec<_> = scene.ancestors(inner).collect();
        assert_eq!(up, vec![outer, stage]);
        assert!(scene.contains(stage, inner));
        assert!(!scene.contains(inner, outer));
    }

    #[test]
    fn subtree_is_pre_order() {
        let mut scene = test_scene();
        let root = scene.create_container();
        let a = scene.create_container();
        let a1 = scene.create_object();
        let b = scene.create_object();
        scene.add_child(root, a);
        scene.add_child(a, a1);
        scene.add_child(root, b);

        let order = scene.subtree(root.index());
        assert_eq!(order, vec![root.index(), a.index(), a1.index(), b.index()]);
    }
}
