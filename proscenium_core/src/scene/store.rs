// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, properties, and repaint marking.

use core::any::Any;
use core::cell::Cell;

use kurbo::{Affine, Point};
use tracing::{trace, warn};
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::{INVALID, NodeId, NodeKind, STAGE};
use super::layer::LayerSurface;
use super::stage::{StageConfig, StageState};
use crate::behavior::Behavior;
use crate::dirty;
use crate::error::{SceneError, reported};
use crate::event::{Event, EventKind, EventPayload, Handler, Listener, ListenerId};
use crate::hit::HitRegion;
use crate::host::Host;
use crate::transform::LocalTransform;

/// The scene: every node plus the stage that roots them.
///
/// Nodes are addressed by [`NodeId`] handles. Internally each node occupies a
/// slot in parallel arrays; destroyed nodes are recycled via a free list and
/// generation counters detect stale handles.
///
/// Read-only getters panic on a stale handle. Mutators never panic: misuse is
/// logged and the call returns `false`.
pub struct Scene {
    // -- Topology --
    pub(crate) kind: Vec<NodeKind>,
    pub(crate) parent: Vec<u32>,
    pub(crate) children: Vec<Vec<u32>>,

    // -- Identity --
    pub(crate) name: Vec<String>,
    pub(crate) class_name: Vec<String>,

    // -- Local properties (set by callers) --
    pub(crate) local_transform: Vec<LocalTransform>,
    pub(crate) alpha: Vec<f64>,
    pub(crate) visible: Vec<bool>,
    pub(crate) interactive: Vec<bool>,
    pub(crate) hit_region: Vec<Option<HitRegion>>,

    // -- Computed properties (written by evaluate) --
    pub(crate) world_transform: Vec<Affine>,
    pub(crate) effective_alpha: Vec<f64>,
    pub(crate) effective_hidden: Vec<bool>,

    // -- Cached relations --
    pub(crate) stage_cache: Vec<Cell<u32>>,
    pub(crate) layer: Vec<u32>,

    // -- Repaint debt (node and ancestors) --
    pub(crate) needs_paint: Vec<bool>,

    // -- Extension points --
    pub(crate) behaviors: Vec<Option<Box<dyn Behavior>>>,
    pub(crate) listeners: Vec<Vec<Listener>>,
    pub(crate) surfaces: Vec<Option<LayerSurface>>,
    pub(crate) next_listener: u64,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) alive: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Traversal cache --
    pub(crate) traversal_order: Vec<u32>,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,

    // -- Stage --
    pub(crate) stage: StageState,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scene")
            .field("len", &self.len)
            .field("free", &self.free_list.len())
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Creates a scene whose stage is driven by `host`.
    #[must_use]
    pub fn new(config: StageConfig, host: impl Host + 'static) -> Self {
        let stage = StageState::new(config, Box::new(host));
        let mut scene = Self {
            kind: Vec::new(),
            parent: Vec::new(),
            children: Vec::new(),
            name: Vec::new(),
            class_name: Vec::new(),
            local_transform: Vec::new(),
            alpha: Vec::new(),
            visible: Vec::new(),
            interactive: Vec::new(),
            hit_region: Vec::new(),
            world_transform: Vec::new(),
            effective_alpha: Vec::new(),
            effective_hidden: Vec::new(),
            stage_cache: Vec::new(),
            layer: Vec::new(),
            needs_paint: Vec::new(),
            behaviors: Vec::new(),
            listeners: Vec::new(),
            surfaces: Vec::new(),
            next_listener: 0,
            generation: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            traversal_order: Vec::new(),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
            stage,
        };
        let id = scene.allocate(NodeKind::Stage);
        debug_assert_eq!(id.idx, STAGE, "stage occupies the first slot");
        scene.stage_cache[STAGE as usize].set(STAGE);
        scene
    }

    /// Returns the stage handle.
    #[must_use]
    pub fn stage(&self) -> NodeId {
        self.id_at(STAGE)
    }

    // -- Allocation API --

    /// Creates a leaf display object.
    pub fn create_object(&mut self) -> NodeId {
        self.allocate(NodeKind::Object)
    }

    /// Creates a grouping container.
    pub fn create_container(&mut self) -> NodeId {
        self.allocate(NodeKind::Container)
    }

    /// Creates a paintable, interactive container.
    pub fn create_sprite(&mut self) -> NodeId {
        self.allocate(NodeKind::Sprite)
    }

    /// Creates a cover. It starts hidden and unregistered; see
    /// [`add_cover`](Self::add_cover).
    pub fn create_cover(&mut self) -> NodeId {
        let id = self.allocate(NodeKind::Cover);
        self.visible[id.idx as usize] = false;
        self.effective_hidden[id.idx as usize] = true;
        id
    }

    /// Allocates a slot for a node of `kind`.
    ///
    /// The node starts detached with an identity transform, full alpha,
    /// visible, no behavior, and no listeners.
    pub(crate) fn allocate(&mut self, kind: NodeKind) -> NodeId {
        let caps = kind.capabilities();
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let i = idx as usize;
            self.generation[i] += 1;
            self.alive[i] = true;
            self.kind[i] = kind;
            self.parent[i] = INVALID;
            self.children[i].clear();
            self.name[i].clear();
            kind.class_name().clone_into(&mut self.class_name[i]);
            self.local_transform[i] = LocalTransform::IDENTITY;
            self.alpha[i] = 1.0;
            self.visible[i] = true;
            self.interactive[i] = caps.interactive;
            self.hit_region[i] = None;
            self.world_transform[i] = Affine::IDENTITY;
            self.effective_alpha[i] = 1.0;
            self.effective_hidden[i] = false;
            self.stage_cache[i].set(INVALID);
            self.layer[i] = INVALID;
            self.needs_paint[i] = true;
            self.behaviors[i] = None;
            self.listeners[i].clear();
            self.surfaces[i] = None;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.kind.push(kind);
            self.parent.push(INVALID);
            self.children.push(Vec::new());
            self.name.push(String::new());
            self.class_name.push(kind.class_name().to_owned());
            self.local_transform.push(LocalTransform::IDENTITY);
            self.alpha.push(1.0);
            self.visible.push(true);
            self.interactive.push(caps.interactive);
            self.hit_region.push(None);
            self.world_transform.push(Affine::IDENTITY);
            self.effective_alpha.push(1.0);
            self.effective_hidden.push(false);
            self.stage_cache.push(Cell::new(INVALID));
            self.layer.push(INVALID);
            self.needs_paint.push(true);
            self.behaviors.push(None);
            self.listeners.push(Vec::new());
            self.surfaces.push(None);
            self.generation.push(0);
            self.alive.push(true);
            idx
        };

        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);

        self.id_at(idx)
    }

    /// Releases a detached, childless slot.
    pub(crate) fn free(&mut self, idx: u32) {
        let i = idx as usize;
        debug_assert!(self.parent[i] == INVALID && self.children[i].is_empty());

        self.dirty.remove_key(idx);
        self.behaviors[i] = None;
        self.listeners[i].clear();
        self.surfaces[i] = None;
        self.hit_region[i] = None;
        self.stage_cache[i].set(INVALID);
        self.layer[i] = INVALID;
        self.stage.hovered.retain(|&h| h != idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[i] += 1;
        self.alive[i] = false;

        self.free_list.push(idx);
        self.pending_removed.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        id.idx < self.len
            && self.alive[id.idx as usize]
            && self.generation[id.idx as usize] == id.generation
    }

    /// Returns the number of live nodes, the stage included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Property getters (read-only, no dirty marking) --

    /// Returns the kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.validate(id);
        self.kind[id.idx as usize]
    }

    /// Returns the instance name of a node (empty by default).
    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        self.validate(id);
        &self.name[id.idx as usize]
    }

    /// Returns the class tag of a node (the kind name by default).
    #[must_use]
    pub fn class_name(&self, id: NodeId) -> &str {
        self.validate(id);
        &self.class_name[id.idx as usize]
    }

    /// Returns the local transform of a node.
    #[must_use]
    pub fn transform(&self, id: NodeId) -> LocalTransform {
        self.validate(id);
        self.local_transform[id.idx as usize]
    }

    /// Returns the position of a node in its container's space.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Point {
        let t = self.transform(id);
        Point::new(t.x, t.y)
    }

    /// Returns the local alpha of a node.
    #[must_use]
    pub fn alpha(&self, id: NodeId) -> f64 {
        self.validate(id);
        self.alpha[id.idx as usize]
    }

    /// Returns the visibility flag of a node.
    #[must_use]
    pub fn visible(&self, id: NodeId) -> bool {
        self.validate(id);
        self.visible[id.idx as usize]
    }

    /// Returns whether the node takes part in pointer routing.
    #[must_use]
    pub fn interactive(&self, id: NodeId) -> bool {
        self.validate(id);
        self.interactive[id.idx as usize]
    }

    /// Returns the hit region of a node.
    #[must_use]
    pub fn hit_region(&self, id: NodeId) -> Option<&HitRegion> {
        self.validate(id);
        self.hit_region[id.idx as usize].as_ref()
    }

    /// Returns the computed world transform of a node.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn world_transform(&self, id: NodeId) -> Affine {
        self.validate(id);
        self.world_transform[id.idx as usize]
    }

    /// Returns the computed effective alpha of a node: the product of alphas
    /// from its enclosing layer down. This is the value paint hands the
    /// backend.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn effective_alpha(&self, id: NodeId) -> f64 {
        self.validate(id);
        self.effective_alpha[id.idx as usize]
    }

    /// Returns whether the node is hidden, by itself or by an ancestor.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn effective_hidden(&self, id: NodeId) -> bool {
        self.validate(id);
        self.effective_hidden[id.idx as usize]
    }

    /// Returns whether the node or a descendant changed since its layer last
    /// painted.
    #[must_use]
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.validate(id);
        self.needs_paint[id.idx as usize]
    }

    /// Returns the node's behavior if it has one of type `T`.
    #[must_use]
    pub fn behavior<T: Behavior>(&self, id: NodeId) -> Option<&T> {
        self.validate(id);
        let b = self.behaviors[id.idx as usize].as_deref()?;
        let any: &dyn Any = b;
        any.downcast_ref::<T>()
    }

    // -- Mutation API (auto-marks dirty) --

    /// Sets the instance name.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> bool {
        reported(self.check(id).map(|idx| {
            self.name[idx as usize] = name.into();
            true
        }))
    }

    /// Sets the class tag.
    pub fn set_class_name(&mut self, id: NodeId, class_name: impl Into<String>) -> bool {
        reported(self.check(id).map(|idx| {
            self.class_name[idx as usize] = class_name.into();
            true
        }))
    }

    /// Replaces the local transform.
    pub fn set_transform(&mut self, id: NodeId, transform: LocalTransform) -> bool {
        reported(self.write_transform(id, "transform", |t| *t = transform))
    }

    /// Moves a node within its container.
    pub fn set_position(&mut self, id: NodeId, x: f64, y: f64) -> bool {
        reported(self.write_transform(id, "position", |t| {
            t.x = x;
            t.y = y;
        }))
    }

    /// Sets the scale factors.
    pub fn set_scale(&mut self, id: NodeId, scale_x: f64, scale_y: f64) -> bool {
        reported(self.write_transform(id, "scale", |t| {
            t.scale_x = scale_x;
            t.scale_y = scale_y;
        }))
    }

    /// Sets the rotation in radians.
    pub fn set_rotation(&mut self, id: NodeId, rotation: f64) -> bool {
        reported(self.write_transform(id, "rotation", |t| t.rotation = rotation))
    }

    /// Sets the local alpha, clamping it to `[0, 1]`.
    pub fn set_alpha(&mut self, id: NodeId, alpha: f64) -> bool {
        reported(self.write_alpha(id, alpha))
    }

    /// Shows or hides a node and its subtree.
    ///
    /// Cover visibility belongs to the stage; writing it here is rejected.
    /// Use [`show_cover`](Self::show_cover) and [`hide_cover`](Self::hide_cover).
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> bool {
        reported(self.check(id).and_then(|idx| {
            if self.kind[idx as usize] == NodeKind::Cover {
                return Err(SceneError::ReadOnly {
                    node: id,
                    attribute: "visible",
                });
            }
            Ok(self.apply_visible(idx, visible))
        }))
    }

    /// Includes or excludes a node from pointer routing.
    ///
    /// A non-interactive container still forwards events to its children.
    pub fn set_interactive(&mut self, id: NodeId, interactive: bool) -> bool {
        reported(self.check(id).map(|idx| {
            let slot = &mut self.interactive[idx as usize];
            let changed = *slot != interactive;
            *slot = interactive;
            changed
        }))
    }

    /// Sets or clears the hit region used by pointer routing.
    pub fn set_hit_region(&mut self, id: NodeId, region: Option<HitRegion>) -> bool {
        reported(self.check(id).map(|idx| {
            self.hit_region[idx as usize] = region;
            true
        }))
    }

    /// Attaches a behavior, replacing any previous one.
    pub fn set_behavior(&mut self, id: NodeId, behavior: impl Behavior) -> bool {
        reported(self.check(id).map(|idx| {
            self.behaviors[idx as usize] = Some(Box::new(behavior));
            self.mark_needs_paint(idx);
            true
        }))
    }

    /// Detaches and returns the node's behavior.
    pub fn take_behavior(&mut self, id: NodeId) -> Option<Box<dyn Behavior>> {
        match self.check(id) {
            Ok(idx) => {
                let taken = self.behaviors[idx as usize].take();
                if taken.is_some() {
                    self.mark_needs_paint(idx);
                }
                taken
            }
            Err(e) => {
                e.report();
                None
            }
        }
    }

    /// Mutates the node's behavior in place and posts a change.
    ///
    /// This is the data setter for embedding code: `f` runs only when the
    /// behavior has type `T`, and its result is returned.
    pub fn update_behavior<T: Behavior, R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        let idx = match self.check(id) {
            Ok(idx) => idx,
            Err(e) => {
                e.report();
                return None;
            }
        };
        let b = self.behaviors[idx as usize].as_deref_mut()?;
        let any: &mut dyn Any = b;
        let Some(typed) = any.downcast_mut::<T>() else {
            warn!(node = ?id, expected = core::any::type_name::<T>(), "behavior type mismatch");
            return None;
        };
        let result = f(typed);
        self.mark_needs_paint(idx);
        Some(result)
    }

    /// Records that a node's appearance changed.
    ///
    /// Marks the node and every ancestor, so the enclosing layer repaints on
    /// the next `REDRAW`.
    pub fn post_change(&mut self, id: NodeId) -> bool {
        reported(self.check(id).map(|idx| {
            self.mark_needs_paint(idx);
            true
        }))
    }

    // -- Coordinate spaces --

    /// Maps a point from a node's local space to stage space.
    #[must_use]
    pub fn local_to_global(&self, id: NodeId, point: Point) -> Point {
        self.validate(id);
        let mut p = point;
        let mut cur = id.idx;
        while cur != INVALID {
            p = self.local_transform[cur as usize].to_affine() * p;
            cur = self.parent[cur as usize];
        }
        p
    }

    /// Maps a point from stage space to a node's local space.
    #[must_use]
    pub fn global_to_local(&self, id: NodeId, point: Point) -> Point {
        self.validate(id);
        let mut chain = Vec::new();
        let mut cur = id.idx;
        while cur != INVALID {
            chain.push(cur);
            cur = self.parent[cur as usize];
        }
        chain
            .iter()
            .rev()
            .fold(point, |p, &idx| self.local_transform[idx as usize].to_local(p))
    }

    // -- Events --

    /// Registers a handler for `kind` on a node.
    ///
    /// Returns `None` if the handle is stale.
    pub fn on(
        &mut self,
        id: NodeId,
        kind: EventKind,
        handler: impl FnMut(&Event) + 'static,
    ) -> Option<ListenerId> {
        match self.check(id) {
            Ok(idx) => {
                let listener = ListenerId(self.next_listener);
                self.next_listener += 1;
                let handler: Handler = Box::new(handler);
                self.listeners[idx as usize].push(Listener {
                    id: listener,
                    kind,
                    handler,
                });
                Some(listener)
            }
            Err(e) => {
                e.report();
                None
            }
        }
    }

    /// Removes a handler. Returns `false` if it was not registered on `id`.
    pub fn off(&mut self, id: NodeId, listener: ListenerId) -> bool {
        reported(self.check(id).map(|idx| {
            let list = &mut self.listeners[idx as usize];
            let before = list.len();
            list.retain(|l| l.id != listener);
            list.len() != before
        }))
    }

    /// Delivers `event` to the handlers registered on its target for its
    /// kind, in registration order. Returns how many ran.
    pub fn emit(&mut self, event: &Event) -> usize {
        match self.check(event.target) {
            Ok(idx) => self.deliver(idx, event),
            Err(e) => {
                e.report();
                0
            }
        }
    }

    // -- Internal helpers --

    /// Returns the current handle for a live slot.
    pub(crate) fn id_at(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            self.is_alive(id),
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Returns the slot of a live handle.
    pub(crate) fn check(&self, id: NodeId) -> Result<u32, SceneError> {
        if self.is_alive(id) {
            Ok(id.idx)
        } else {
            Err(SceneError::StaleNode(id))
        }
    }

    /// Emits `kind` on a slot if anything listens for it.
    pub(crate) fn notify(&mut self, idx: u32, kind: EventKind, payload: EventPayload) {
        if !self.listeners[idx as usize].iter().any(|l| l.kind == kind) {
            return;
        }
        let event = Event::new(kind, self.id_at(idx)).with_payload(payload);
        self.deliver(idx, &event);
    }

    fn deliver(&mut self, idx: u32, event: &Event) -> usize {
        let mut ran = 0;
        for listener in &mut self.listeners[idx as usize] {
            if listener.kind == event.kind {
                (listener.handler)(event);
                ran += 1;
            }
        }
        ran
    }

    /// Marks a slot and all its ancestors as owing a repaint.
    pub(crate) fn mark_needs_paint(&mut self, idx: u32) {
        trace!(node = ?self.id_at(idx), "post_change");
        let mut cur = idx;
        while cur != INVALID {
            self.needs_paint[cur as usize] = true;
            cur = self.parent[cur as usize];
        }
    }

    fn write_transform(
        &mut self,
        id: NodeId,
        attribute: &'static str,
        f: impl FnOnce(&mut LocalTransform),
    ) -> Result<bool, SceneError> {
        let idx = self.check(id)?;
        let mut next = self.local_transform[idx as usize];
        f(&mut next);
        if !next.is_finite() {
            return Err(SceneError::NonFinite {
                node: id,
                attribute,
            });
        }
        if next == self.local_transform[idx as usize] {
            return Ok(false);
        }
        self.local_transform[idx as usize] = next;
        self.dirty.mark_with(idx, dirty::TRANSFORM, &EagerPolicy);
        self.mark_needs_paint(idx);
        Ok(true)
    }

    fn write_alpha(&mut self, id: NodeId, requested: f64) -> Result<bool, SceneError> {
        let idx = self.check(id)?;
        if requested.is_nan() {
            return Err(SceneError::NonFinite {
                node: id,
                attribute: "alpha",
            });
        }
        let alpha = requested.clamp(0.0, 1.0);
        if alpha != requested {
            warn!(node = ?id, requested, effective = alpha, "alpha outside [0, 1], clamped");
        }
        if alpha == self.alpha[idx as usize] {
            return Ok(false);
        }
        self.alpha[idx as usize] = alpha;
        self.dirty.mark_with(idx, dirty::ALPHA, &EagerPolicy);
        self.mark_needs_paint(idx);
        Ok(true)
    }

    /// Writes the visibility flag without the cover guard.
    pub(crate) fn apply_visible(&mut self, idx: u32, visible: bool) -> bool {
        if self.visible[idx as usize] == visible {
            return false;
        }
        self.visible[idx as usize] = visible;
        // Visibility rides the TRANSFORM channel so effective hidden state
        // is recomputed with world transforms.
        self.dirty.mark_with(idx, dirty::TRANSFORM, &EagerPolicy);
        self.mark_needs_paint(idx);
        true
    }

    /// Marks the subtree rooted at `idx` dirty for inherited channels.
    pub(crate) fn mark_subtree_inherited_dirty(&mut self, idx: u32) {
        self.dirty.mark_with(idx, dirty::TRANSFORM, &EagerPolicy);
        self.dirty.mark_with(idx, dirty::ALPHA, &EagerPolicy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::test_scene;
    use crate::test_support::{at_level, capture_logs};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn stage_exists_from_the_start() {
        let scene = test_scene();
        let stage = scene.stage();
        assert!(scene.is_alive(stage));
        assert_eq!(scene.kind(stage), NodeKind::Stage);
        assert_eq!(scene.node_count(), 1);
    }

    #[test]
    fn create_and_destroy() {
        let mut scene = test_scene();
        let id = scene.create_object();
        assert!(scene.is_alive(id));
        assert!(scene.destroy(id));
        assert!(!scene.is_alive(id));
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut scene = test_scene();
        let id1 = scene.create_sprite();
        scene.destroy(id1);
        let id2 = scene.create_sprite();
        assert!(!scene.is_alive(id1));
        assert!(scene.is_alive(id2));
        assert_eq!(id1.index(), id2.index());
        assert_ne!(id1.generation(), id2.generation());
    }

    #[test]
    fn reused_slot_starts_fresh() {
        let mut scene = test_scene();
        let id = scene.create_object();
        scene.set_alpha(id, 0.25);
        scene.set_name(id, "old");
        scene.destroy(id);
        let fresh = scene.create_container();
        assert_eq!(scene.alpha(fresh), 1.0);
        assert_eq!(scene.name(fresh), "");
        assert_eq!(scene.class_name(fresh), "DisplayObjectContainer");
        assert!(!scene.interactive(fresh));
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn destroyed_handle_panics_on_getter() {
        let mut scene = test_scene();
        let id = scene.create_object();
        scene.destroy(id);
        let _ = scene.alpha(id);
    }

    #[test]
    fn destroyed_handle_is_logged_on_setter() {
        let mut scene = test_scene();
        let id = scene.create_object();
        scene.destroy(id);
        let logs = capture_logs(|| {
            assert!(!scene.set_position(id, 1.0, 2.0));
        });
        assert_eq!(at_level(&logs, tracing::Level::ERROR).len(), 1);
    }

    #[test]
    fn alpha_is_clamped_with_warning() {
        let mut scene = test_scene();
        let id = scene.create_object();
        let logs = capture_logs(|| {
            assert!(!scene.set_alpha(id, 1.5), "clamps to the current value");
            assert!(scene.set_alpha(id, -3.0));
        });
        assert_eq!(scene.alpha(id), 0.0);
        let warns = at_level(&logs, tracing::Level::WARN);
        assert_eq!(warns.len(), 2);
        assert_eq!(warns[1].field("effective"), Some("0.0"));
    }

    #[test]
    fn non_finite_transform_rejected() {
        let mut scene = test_scene();
        let id = scene.create_object();
        assert!(!scene.set_rotation(id, f64::INFINITY));
        assert_eq!(scene.transform(id).rotation, 0.0);
    }

    #[test]
    fn unchanged_write_reports_no_change() {
        let mut scene = test_scene();
        let id = scene.create_object();
        assert!(scene.set_position(id, 3.0, 4.0));
        assert!(!scene.set_position(id, 3.0, 4.0));
        assert_eq!(scene.position(id), Point::new(3.0, 4.0));
    }

    #[test]
    fn post_change_marks_ancestors() {
        let mut scene = test_scene();
        let outer = scene.create_container();
        let inner = scene.create_container();
        let leaf = scene.create_object();
        scene.add_child(outer, inner);
        scene.add_child(inner, leaf);
        for id in [outer, inner, leaf] {
            scene.needs_paint[id.index() as usize] = false;
        }
        scene.post_change(leaf);
        assert!(scene.is_dirty(leaf));
        assert!(scene.is_dirty(inner));
        assert!(scene.is_dirty(outer));
    }

    #[test]
    fn cover_visibility_is_read_only() {
        let mut scene = test_scene();
        let cover = scene.create_cover();
        let logs = capture_logs(|| {
            assert!(!scene.set_visible(cover, true));
        });
        assert!(!scene.visible(cover));
        assert_eq!(at_level(&logs, tracing::Level::ERROR).len(), 1);
    }

    #[test]
    fn local_global_round_trip() {
        let mut scene = test_scene();
        let outer = scene.create_container();
        let inner = scene.create_object();
        scene.add_child(scene.stage(), outer);
        scene.add_child(outer, inner);
        scene.set_position(outer, 100.0, 50.0);
        scene.set_scale(outer, 2.0, 2.0);
        scene.set_position(inner, 10.0, 10.0);

        let global = scene.local_to_global(inner, Point::new(1.0, 1.0));
        assert_eq!(global, Point::new(122.0, 72.0));
        let back = scene.global_to_local(inner, global);
        assert!((back - Point::new(1.0, 1.0)).hypot() < 1e-9);
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let mut scene = test_scene();
        let id = scene.create_object();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let a = seen.clone();
        let first = scene.on(id, EventKind::Custom("ping"), move |_| a.borrow_mut().push(1));
        let b = seen.clone();
        scene.on(id, EventKind::Custom("ping"), move |_| b.borrow_mut().push(2));
        scene.on(id, EventKind::Custom("other"), |_| panic!("wrong kind"));

        let ran = scene.emit(&Event::new(EventKind::Custom("ping"), id));
        assert_eq!(ran, 2);
        assert_eq!(*seen.borrow(), vec![1, 2]);

        assert!(scene.off(id, first.expect("registered")));
        scene.emit(&Event::new(EventKind::Custom("ping"), id));
        assert_eq!(*seen.borrow(), vec![1, 2, 2]);
    }

    #[test]
    fn update_behavior_downcasts_and_posts_change() {
        struct Counter(u32);
        impl Behavior for Counter {}

        let mut scene = test_scene();
        let id = scene.create_sprite();
        scene.set_behavior(id, Counter(1));
        scene.needs_paint[id.index() as usize] = false;

        let out = scene.update_behavior::<Counter, _>(id, |c| {
            c.0 += 1;
            c.0
        });
        assert_eq!(out, Some(2));
        assert!(scene.is_dirty(id));
        assert_eq!(scene.behavior::<Counter>(id).map(|c| c.0), Some(2));

        struct Other;
        impl Behavior for Other {}
        assert!(scene.update_behavior::<Other, _>(id, |_| ()).is_none());
    }
}
