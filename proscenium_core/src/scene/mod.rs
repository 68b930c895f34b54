// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene graph.
//!
//! A *node* is an entry in a display tree rooted at the stage. Each node has:
//!
//! - An identity ([`NodeId`]), a generational handle that becomes stale when
//!   the node is destroyed, plus a free-form name and class tag.
//! - A [`NodeKind`] fixing its [`Capabilities`]: whether it holds children,
//!   paints, receives pointer events, or owns a raster surface.
//! - Topology: a parent and an ordered child list. Index 0 is bottom-most;
//!   child order is both paint order and, reversed, pointer order.
//! - **Local properties** set by the caller: [`transform`](Scene::set_transform),
//!   [`alpha`](Scene::set_alpha), [`visible`](Scene::set_visible),
//!   [`interactive`](Scene::set_interactive), and a
//!   [`hit region`](Scene::set_hit_region).
//! - **Computed properties** produced by [`evaluate`](Scene::evaluate):
//!   world transform, effective hidden state, and effective alpha (relative
//!   to the enclosing layer).
//! - An optional [`Behavior`](crate::behavior::Behavior) and any number of
//!   event listeners.
//!
//! Nodes are stored in struct-of-arrays layout with index-based handles.
//!
//! # Dirty tracking
//!
//! Property mutations mark the matching channel (see [`dirty`](crate::dirty))
//! and post a change, which flags the node and all its ancestors. A layer
//! whose flag is clear at `REDRAW` skips its repaint.

mod container;
mod evaluate;
mod id;
mod layer;
mod paint;
mod pointer;
mod stage;
mod store;
mod traverse;

pub use evaluate::SceneChanges;
pub use id::{Capabilities, INVALID, NodeId, NodeKind};
pub use layer::{LayerConfig, LayerSurface};
pub use stage::{DispatchPolicy, StageConfig};
pub use store::Scene;
pub use traverse::{Ancestors, Children};

#[cfg(test)]
pub(crate) fn test_scene() -> Scene {
    Scene::new(StageConfig::default(), crate::host::HeadlessHost::default())
}
