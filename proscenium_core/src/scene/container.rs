// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Child-list mutation and ancestor resolution.
//!
//! Every mutation funnels through two primitives, `link` and `unlink`, which
//! keep `parent` and `children` in lockstep: a slot appears in a container's
//! child list exactly when its `parent` names that container. Insertion and
//! removal add lifecycle work on top (cache invalidation, layer stamping,
//! events); reordering uses the primitives alone.
//!
//! Child order is paint order. Index 0 is bottom-most.

use core::ops::{Bound, RangeBounds};

use understory_dirty::EagerPolicy;

use super::id::{INVALID, NodeId, NodeKind, STAGE};
use super::store::Scene;
use crate::dirty;
use crate::error::{Mutation, SceneError, reported};
use crate::event::{EventKind, EventPayload};

impl Scene {
    // -- Insertion --

    /// Appends `child` to `parent`, making it top-most.
    ///
    /// A child that already has a container is evicted from it first. Returns
    /// `false` (and logs) when a rule or the parent's
    /// [`before_add_child`](crate::behavior::Behavior::before_add_child) hook
    /// declines.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        reported(self.insert_child(parent, child, None))
    }

    /// Inserts `child` into `parent` at `index`.
    ///
    /// The index is interpreted against the child list after any eviction of
    /// `child` from it; `index == len` appends.
    pub fn add_child_at(&mut self, parent: NodeId, child: NodeId, index: usize) -> bool {
        reported(self.insert_child(parent, child, Some(index)))
    }

    // -- Removal --

    /// Removes `child` from `parent`.
    ///
    /// Removing a node that is not a child of `parent` changes nothing and
    /// fires no events.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        reported(self.try_remove_child(parent, child))
    }

    /// Removes the child at `index`.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> bool {
        reported(self.try_remove_child_at(parent, index))
    }

    /// Removes every child in `range` (clamped to the child count) in one
    /// mutation.
    ///
    /// The removal hook is not consulted. Each removed child receives
    /// `Removed`; the container receives a single `ChildrenChanged`.
    pub fn remove_children(&mut self, parent: NodeId, range: impl RangeBounds<usize>) -> bool {
        reported(self.try_remove_children(parent, range))
    }

    // -- Reordering --

    /// Exchanges the positions of two children.
    pub fn swap_children(&mut self, parent: NodeId, a: NodeId, b: NodeId) -> bool {
        reported(self.try_swap_children(parent, a, b))
    }

    /// Exchanges the children at two indices.
    pub fn swap_children_at(&mut self, parent: NodeId, i: usize, j: usize) -> bool {
        reported(self.try_swap_children_at(parent, i, j))
    }

    /// Moves `child` to `index`. Negative indices clamp to the bottom,
    /// indices at or past the end clamp to the top.
    pub fn set_child_index(&mut self, parent: NodeId, child: NodeId, index: isize) -> bool {
        reported(self.try_set_child_index(parent, child, index))
    }

    /// Places `child` directly above `neighbor`, or top-most when `neighbor`
    /// is `None`. A node is never placed relative to itself.
    pub fn set_top(&mut self, parent: NodeId, child: NodeId, neighbor: Option<NodeId>) -> bool {
        reported(self.try_set_top(parent, child, neighbor))
    }

    /// Places `child` directly below `neighbor`, or bottom-most when
    /// `neighbor` is `None`. A node is never placed relative to itself.
    pub fn set_bottom(
        &mut self,
        parent: NodeId,
        child: NodeId,
        neighbor: Option<NodeId>,
    ) -> bool {
        reported(self.try_set_bottom(parent, child, neighbor))
    }

    // -- Destruction --

    /// Destroys a childless node, detaching it first.
    ///
    /// Destroying a node that still has children is a logged no-op; see
    /// [`destroy_subtree`](Self::destroy_subtree).
    pub fn destroy(&mut self, id: NodeId) -> bool {
        reported(self.try_destroy(id, false))
    }

    /// Destroys a node and every descendant, children before parents.
    pub fn destroy_subtree(&mut self, id: NodeId) -> bool {
        reported(self.try_destroy(id, true))
    }

    // -- Ancestor resolution --

    /// Returns the stage this node is attached to, if any.
    ///
    /// The first lookup walks ancestors until one resolves, then caches the
    /// result on every node visited. Caches are invalidated on detach.
    #[must_use]
    pub fn stage_of(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let s = self.resolve_stage(id.idx);
        (s != INVALID).then(|| self.id_at(s))
    }

    /// Returns the layer whose surface this node paints into, if any. A
    /// layer is its own layer.
    #[must_use]
    pub fn layer_of(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let l = self.enclosing_layer(id.idx);
        (l != INVALID).then(|| self.id_at(l))
    }

    // -- Primitives --

    /// Inserts a detached slot into `p` at `pos`.
    fn link(&mut self, p: u32, c: u32, pos: usize) {
        self.children[p as usize].insert(pos, c);
        self.parent[c as usize] = p;

        // Child depends on parent for TRANSFORM and ALPHA.
        let _ = self.dirty.add_dependency(c, p, dirty::TRANSFORM);
        let _ = self.dirty.add_dependency(c, p, dirty::ALPHA);
        self.mark_inherited(c);

        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Removes a slot from its container's child list, returning the
    /// container and the position it held.
    fn unlink(&mut self, c: u32) -> Option<(u32, usize)> {
        let p = self.parent[c as usize];
        if p == INVALID {
            return None;
        }
        let pos = self.position_of(p, c)?;
        self.children[p as usize].remove(pos);
        self.parent[c as usize] = INVALID;

        self.dirty.remove_dependency(c, p, dirty::TRANSFORM);
        self.dirty.remove_dependency(c, p, dirty::ALPHA);
        self.mark_inherited(c);

        self.dirty.mark(p, dirty::TOPOLOGY);
        Some((p, pos))
    }

    /// The subtree under `c` inherits from a new parent (or none).
    fn mark_inherited(&mut self, c: u32) {
        self.dirty.mark_with(c, dirty::TRANSFORM, &EagerPolicy);
        self.dirty.mark_with(c, dirty::ALPHA, &EagerPolicy);
    }

    // -- Lifecycle --

    fn insert_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: Option<usize>,
    ) -> Result<bool, SceneError> {
        let (p, c) = self.check_add(parent, child)?;
        let old = self.parent[c as usize];
        let len = self.children[p as usize].len() - usize::from(old == p);
        let pos = match index {
            None => len,
            Some(i) if i <= len => i,
            Some(index) => {
                return Err(SceneError::IndexOutOfRange { parent, index, len });
            }
        };
        if old == p {
            let from = self.position_of(p, c).unwrap_or(pos);
            return Ok(self.move_child(p, from, pos));
        }
        if old != INVALID {
            self.check_remove(old, c)?;
            self.detach(c);
            self.children_changed(old);
        }
        self.attach(p, c, pos);
        Ok(true)
    }

    fn try_remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<bool, SceneError> {
        let p = self.check(parent)?;
        let c = self.check(child)?;
        if self.parent[c as usize] != p {
            return Err(SceneError::NotAChild { parent, child });
        }
        self.remove_slot(p, c)
    }

    fn try_remove_child_at(&mut self, parent: NodeId, index: usize) -> Result<bool, SceneError> {
        let p = self.check(parent)?;
        let len = self.children[p as usize].len();
        let Some(&c) = self.children[p as usize].get(index) else {
            return Err(SceneError::IndexOutOfRange { parent, index, len });
        };
        self.remove_slot(p, c)
    }

    fn try_remove_children(
        &mut self,
        parent: NodeId,
        range: impl RangeBounds<usize>,
    ) -> Result<bool, SceneError> {
        let p = self.check(parent)?;
        let len = self.children[p as usize].len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .min(len);
        if start >= end {
            return Err(SceneError::EmptyRange {
                parent,
                start,
                end,
                len,
            });
        }
        let removed = self.children[p as usize][start..end].to_vec();
        for c in removed {
            self.detach(c);
        }
        self.children_changed(p);
        Ok(true)
    }

    fn remove_slot(&mut self, p: u32, c: u32) -> Result<bool, SceneError> {
        self.check_remove(p, c)?;
        self.detach(c);
        self.children_changed(p);
        Ok(true)
    }

    /// Consults the container's
    /// [`before_remove_child`](crate::behavior::Behavior::before_remove_child)
    /// hook. Eviction by a re-parenting add goes through here too.
    fn check_remove(&mut self, p: u32, c: u32) -> Result<(), SceneError> {
        let child = self.id_at(c);
        let allowed = self.behaviors[p as usize]
            .as_mut()
            .is_none_or(|b| b.before_remove_child(child));
        if allowed {
            Ok(())
        } else {
            Err(SceneError::Vetoed {
                parent: self.id_at(p),
                child,
                mutation: Mutation::Remove,
                reason: "before_remove_child",
            })
        }
    }

    fn try_swap_children(
        &mut self,
        parent: NodeId,
        a: NodeId,
        b: NodeId,
    ) -> Result<bool, SceneError> {
        let p = self.check(parent)?;
        let i = self.child_position(parent, a)?;
        let j = self.child_position(parent, b)?;
        Ok(self.swap_positions(p, i, j))
    }

    fn try_swap_children_at(
        &mut self,
        parent: NodeId,
        i: usize,
        j: usize,
    ) -> Result<bool, SceneError> {
        let p = self.check(parent)?;
        let len = self.children[p as usize].len();
        if let Some(index) = [i, j].into_iter().find(|&index| index >= len) {
            return Err(SceneError::IndexOutOfRange { parent, index, len });
        }
        Ok(self.swap_positions(p, i, j))
    }

    fn try_set_child_index(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: isize,
    ) -> Result<bool, SceneError> {
        let p = self.check(parent)?;
        let from = self.child_position(parent, child)?;
        let last = self.children[p as usize].len() - 1;
        let to = usize::try_from(index).map_or(0, |i| i.min(last));
        Ok(self.move_child(p, from, to))
    }

    fn try_set_top(
        &mut self,
        parent: NodeId,
        child: NodeId,
        neighbor: Option<NodeId>,
    ) -> Result<bool, SceneError> {
        if neighbor == Some(child) {
            return Ok(false);
        }
        let p = self.check(parent)?;
        let from = self.child_position(parent, child)?;
        let to = match neighbor {
            Some(n) => {
                let at = self.child_position(parent, n)?;
                if from < at { at } else { at + 1 }
            }
            None => self.children[p as usize].len() - 1,
        };
        Ok(self.move_child(p, from, to))
    }

    fn try_set_bottom(
        &mut self,
        parent: NodeId,
        child: NodeId,
        neighbor: Option<NodeId>,
    ) -> Result<bool, SceneError> {
        if neighbor == Some(child) {
            return Ok(false);
        }
        let p = self.check(parent)?;
        let from = self.child_position(parent, child)?;
        let to = match neighbor {
            Some(n) => {
                let at = self.child_position(parent, n)?;
                if from > at { at } else { at - 1 }
            }
            None => 0,
        };
        Ok(self.move_child(p, from, to))
    }

    fn try_destroy(&mut self, id: NodeId, recursive: bool) -> Result<bool, SceneError> {
        let idx = self.check(id)?;
        let kind = self.kind[idx as usize];
        if kind == NodeKind::Stage {
            return Err(SceneError::WrongKind {
                node: id,
                kind,
                expected: "a destroyable node",
            });
        }
        if !recursive && !self.children[idx as usize].is_empty() {
            return Err(SceneError::HasChildren(id));
        }
        let order = self.subtree(idx);
        for &n in order.iter().rev() {
            self.destroy_slot(n);
        }
        Ok(true)
    }

    /// Runs the add policy, in order: liveness, container capability,
    /// parentable kind, cycles, layer nesting, then the parent's hook.
    fn check_add(&mut self, parent: NodeId, child: NodeId) -> Result<(u32, u32), SceneError> {
        let p = self.check(parent)?;
        let c = self.check(child)?;
        let child_kind = self.kind[c as usize];
        if !self.kind[p as usize].is_container() {
            return Err(SceneError::NotAContainer(parent));
        }
        if matches!(child_kind, NodeKind::Stage | NodeKind::Cover) {
            return Err(SceneError::WrongKind {
                node: child,
                kind: child_kind,
                expected: "a node that can be parented",
            });
        }
        if self.is_within(p, c) {
            return Err(SceneError::Cycle { parent, child });
        }
        let carries_layer = self
            .subtree(c)
            .iter()
            .any(|&n| self.kind[n as usize] == NodeKind::Layer);
        let under_layer = self
            .ancestors_inclusive(p)
            .any(|n| self.kind[n as usize] == NodeKind::Layer);
        if carries_layer && under_layer {
            return Err(SceneError::Vetoed {
                parent,
                child,
                mutation: Mutation::Add,
                reason: "layers cannot nest",
            });
        }
        let allowed = self.behaviors[p as usize]
            .as_mut()
            .is_none_or(|b| b.before_add_child(child, child_kind));
        if !allowed {
            return Err(SceneError::Vetoed {
                parent,
                child,
                mutation: Mutation::Add,
                reason: "before_add_child",
            });
        }
        Ok((p, c))
    }

    /// Links a detached slot and runs attach lifecycle work.
    fn attach(&mut self, p: u32, c: u32, pos: usize) {
        self.link(p, c, pos);
        self.mark_subtree_inherited_dirty(c);
        self.mark_needs_paint(c);

        let (parent, child) = (self.id_at(p), self.id_at(c));
        self.notify(c, EventKind::Added, EventPayload::Node(parent));
        self.notify(p, EventKind::ChildAdded, EventPayload::Node(child));
        self.children_changed(p);

        let layer = self.enclosing_layer(p);
        if layer != INVALID {
            self.stamp_layer(c, layer);
        }
        if self.resolve_stage(p) != INVALID {
            self.announce_to_stage(c);
        }
    }

    /// Unlinks a slot and runs detach lifecycle work, except
    /// `ChildrenChanged`, which callers fire once per mutation.
    pub(crate) fn detach(&mut self, c: u32) -> Option<u32> {
        let (p, _) = self.unlink(c)?;
        self.mark_subtree_inherited_dirty(c);
        self.invalidate_caches(c);
        self.mark_needs_paint(p);

        let (parent, child) = (self.id_at(p), self.id_at(c));
        self.notify(c, EventKind::Removed, EventPayload::Node(parent));
        self.notify(p, EventKind::ChildRemoved, EventPayload::Node(child));
        Some(p)
    }

    pub(crate) fn children_changed(&mut self, p: u32) {
        self.notify(p, EventKind::ChildrenChanged, EventPayload::None);
        if p == STAGE {
            self.update_cover_z();
        }
    }

    fn swap_positions(&mut self, p: u32, i: usize, j: usize) -> bool {
        if i == j {
            return false;
        }
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let a = self.children[p as usize][lo];
        let b = self.children[p as usize][hi];
        self.unlink(b);
        self.unlink(a);
        self.link(p, b, lo);
        self.link(p, a, hi);
        self.mark_needs_paint(p);
        self.children_changed(p);
        true
    }

    fn move_child(&mut self, p: u32, from: usize, to: usize) -> bool {
        if from == to {
            return false;
        }
        let c = self.children[p as usize][from];
        self.unlink(c);
        self.link(p, c, to);
        self.mark_needs_paint(p);
        self.children_changed(p);
        true
    }

    fn child_position(&self, parent: NodeId, child: NodeId) -> Result<usize, SceneError> {
        let c = self.check(child)?;
        self.position_of(parent.idx, c)
            .ok_or(SceneError::NotAChild { parent, child })
    }

    fn destroy_slot(&mut self, idx: u32) {
        self.unregister_cover(idx);
        if let Some(p) = self.detach(idx) {
            self.children_changed(p);
        }
        self.free(idx);
    }

    // -- Cached relations --

    /// Resolves the stage slot for `idx`, memoizing along the way.
    pub(crate) fn resolve_stage(&self, idx: u32) -> u32 {
        let mut visited = Vec::new();
        let mut cur = idx;
        let found = loop {
            let cached = self.stage_cache[cur as usize].get();
            if cached != INVALID {
                break cached;
            }
            visited.push(cur);
            // Registered covers hang off the stage outside its child list.
            if cur == STAGE || self.stage.covers.contains(&cur) {
                break STAGE;
            }
            let p = self.parent[cur as usize];
            if p == INVALID {
                return INVALID;
            }
            cur = p;
        };
        for v in visited {
            self.stage_cache[v as usize].set(found);
        }
        found
    }

    pub(crate) fn enclosing_layer(&self, idx: u32) -> u32 {
        if self.kind[idx as usize] == NodeKind::Layer {
            idx
        } else {
            self.layer[idx as usize]
        }
    }

    /// Clears stage caches in a detached subtree, and layer stamps that point
    /// outside it.
    pub(crate) fn invalidate_caches(&mut self, root: u32) {
        for n in self.subtree(root) {
            self.stage_cache[n as usize].set(INVALID);
            let l = self.layer[n as usize];
            if l != INVALID && !self.is_within(l, root) {
                self.layer[n as usize] = INVALID;
            }
        }
    }

    fn stamp_layer(&mut self, root: u32, layer: u32) {
        let layer_id = self.id_at(layer);
        for n in self.subtree(root) {
            self.layer[n as usize] = layer;
            self.notify(n, EventKind::AppendedToLayer, EventPayload::Node(layer_id));
        }
    }

    /// Fires `AppendedToStage` over a subtree: each node before its
    /// children, children top-most first.
    pub(crate) fn announce_to_stage(&mut self, root: u32) {
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            self.notify(n, EventKind::AppendedToStage, EventPayload::None);
            stack.extend(self.children[n as usize].iter());
        }
    }

    fn ancestors_inclusive(&self, idx: u32) -> impl Iterator<Item = u32> + '_ {
        core::iter::successors(Some(idx), |&n| {
            let p = self.parent[n as usize];
            (p != INVALID).then_some(p)
        })
    }
}
