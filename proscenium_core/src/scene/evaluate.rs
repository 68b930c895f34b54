// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derived-state evaluation.
//!
//! [`Scene::evaluate`] brings every computed property up to date and reports
//! what moved. The paint traversal reads its results directly:
//!
//! | Computed            | Rule                                               | Read by                  |
//! |---------------------|----------------------------------------------------|--------------------------|
//! | `world_transform`   | parent world · local, in stage space               | [`Scene::layer_placement`] |
//! | `effective_hidden`  | parent hidden, or not visible                      | layer selection, paint   |
//! | `effective_alpha`   | product of alphas from the enclosing layer down    | paint                    |
//! | traversal order     | pre-order from the stage, then covers, then orphans| layer paint order        |
//!
//! Effective alpha stops at a layer boundary: a layer's own alpha is where its
//! surface starts, and anything above the layer is the host's business when
//! it composites the surface.

use kurbo::Affine;

use super::id::{INVALID, NodeId, NodeKind, STAGE};
use super::store::Scene;
use crate::dirty;

/// What one [`Scene::evaluate`] call changed.
///
/// Entries are raw slot indices, usable with
/// [`Scene::traversal_order`] and the change lists of the next call.
#[derive(Clone, Debug, Default)]
pub struct SceneChanges {
    /// Nodes whose world transform was recomputed.
    pub transforms: Vec<u32>,
    /// Nodes whose effective alpha was recomputed.
    pub alphas: Vec<u32>,
    /// Nodes that became effectively hidden.
    pub hidden: Vec<u32>,
    /// Nodes that stopped being effectively hidden.
    pub unhidden: Vec<u32>,
    /// Nodes created since the last evaluation.
    pub added: Vec<u32>,
    /// Nodes destroyed since the last evaluation.
    pub removed: Vec<u32>,
    /// Whether the traversal order was rebuilt.
    pub topology_changed: bool,
}

impl SceneChanges {
    /// Empties every list.
    pub fn clear(&mut self) {
        for list in [
            &mut self.transforms,
            &mut self.alphas,
            &mut self.hidden,
            &mut self.unhidden,
            &mut self.added,
            &mut self.removed,
        ] {
            list.clear();
        }
        self.topology_changed = false;
    }

    /// Whether the evaluation found nothing to do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.topology_changed
            && [
                &self.transforms,
                &self.alphas,
                &self.hidden,
                &self.unhidden,
                &self.added,
                &self.removed,
            ]
            .iter()
            .all(|list| list.is_empty())
    }
}

impl Scene {
    /// Recomputes dirty derived properties and returns what changed.
    pub fn evaluate(&mut self) -> SceneChanges {
        let mut changes = SceneChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but fills a caller-provided buffer.
    ///
    /// A layer that stops being hidden owes a full repaint and is flagged
    /// here.
    pub fn evaluate_into(&mut self, changes: &mut SceneChanges) {
        changes.clear();

        let structural = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .count();
        if structural > 0 {
            self.rebuild_traversal_order();
            changes.topology_changed = true;
        }

        changes.transforms.extend(
            self.dirty
                .drain(dirty::TRANSFORM)
                .affected()
                .deterministic()
                .run(),
        );
        for &idx in &changes.transforms {
            match self.place(idx) {
                Some(true) => changes.hidden.push(idx),
                Some(false) => {
                    if self.kind[idx as usize] == NodeKind::Layer {
                        self.needs_paint[idx as usize] = true;
                    }
                    changes.unhidden.push(idx);
                }
                None => {}
            }
        }

        changes.alphas.extend(
            self.dirty
                .drain(dirty::ALPHA)
                .affected()
                .deterministic()
                .run(),
        );
        for &idx in &changes.alphas {
            let (i, p) = (idx as usize, self.parent[idx as usize]);
            // Layers start a new surface.
            let inherited = if p == INVALID || self.kind[i] == NodeKind::Layer {
                1.0
            } else {
                self.effective_alpha[p as usize]
            };
            self.effective_alpha[i] = inherited * self.alpha[i];
        }

        changes.added.append(&mut self.pending_added);
        changes.removed.append(&mut self.pending_removed);
    }

    /// Depth-first pre-order of every live node: the stage subtree, then each
    /// registered cover subtree, then detached roots by slot.
    ///
    /// Reflects the last [`evaluate`](Self::evaluate).
    #[must_use]
    pub fn traversal_order(&self) -> &[u32] {
        &self.traversal_order
    }

    /// The stage-space transform at which the host should composite a
    /// layer's surface, as of the last evaluation. `None` for other kinds.
    #[must_use]
    pub fn layer_placement(&self, id: NodeId) -> Option<Affine> {
        self.validate(id);
        (self.kind[id.idx as usize] == NodeKind::Layer)
            .then(|| self.world_transform[id.idx as usize])
    }

    /// Recomputes world transform and effective hidden for one slot. Returns
    /// the new hidden state when it flipped.
    fn place(&mut self, idx: u32) -> Option<bool> {
        let i = idx as usize;
        let (base, parent_hidden) = match self.parent[i] {
            INVALID => (Affine::IDENTITY, false),
            p => (
                self.world_transform[p as usize],
                self.effective_hidden[p as usize],
            ),
        };
        self.world_transform[i] = base * self.local_transform[i].to_affine();
        let hidden = parent_hidden || !self.visible[i];
        (core::mem::replace(&mut self.effective_hidden[i], hidden) != hidden).then_some(hidden)
    }

    fn rebuild_traversal_order(&mut self) {
        let mut roots = vec![STAGE];
        roots.extend(self.stage.covers.iter().copied());
        roots.extend((0..self.len).filter(|&n| {
            n != STAGE
                && self.alive[n as usize]
                && self.parent[n as usize] == INVALID
                && !self.stage.covers.contains(&n)
        }));
        self.traversal_order = roots.into_iter().flat_map(|r| self.subtree(r)).collect();
    }
}
