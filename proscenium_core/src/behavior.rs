// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node extension points.
//!
//! A node's kind fixes its capabilities; a [`Behavior`] supplies what it
//! does with them. Every method has a default, so an implementation only
//! overrides the hooks it cares about:
//!
//! | Hook                    | Called when                                   |
//! |-------------------------|-----------------------------------------------|
//! | `paint`                 | the owning layer repaints (paintable kinds)   |
//! | `enter_frame`           | every frame, pre-order                        |
//! | `hit_test`              | a pointer event is offered to the node        |
//! | `pointer`               | after hit-testing, for every offered event    |
//! | `before_add_child`      | a child is about to be inserted               |
//! | `before_remove_child`   | a child is about to be removed                |
//!
//! Behaviors get no access to the scene. State changes they want the engine
//! to see are signalled through return values ([`Redraw`], [`Propagation`])
//! or made from outside through
//! [`Scene::update_behavior`](crate::scene::Scene::update_behavior).

use core::any::Any;

use kurbo::Point;

use crate::event::{EventKind, PointerButton};
use crate::frame::FrameTick;
use crate::graphics::PaintContext;
use crate::scene::{NodeId, NodeKind};

/// Whether a frame tick changed what the node paints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Redraw {
    /// Nothing visible changed.
    #[default]
    Unchanged,
    /// The node's appearance changed; its layer must repaint.
    Changed,
}

/// Whether pointer fan-out continues after a node handled an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Propagation {
    /// Offer the event to the remaining nodes.
    #[default]
    Continue,
    /// Stop offering the event.
    Stop,
}

/// A pointer event as seen by one node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// The event name.
    pub kind: EventKind,
    /// The receiving node.
    pub target: NodeId,
    /// Position in the receiving node's local space.
    pub local: Point,
    /// Position in stage space.
    pub stage: Point,
    /// The button, for button events.
    pub button: Option<PointerButton>,
    /// Whether the position falls inside the node.
    pub hit: bool,
}

/// Custom logic attached to a node.
pub trait Behavior: Any {
    /// Paints the node's own content in local space.
    ///
    /// The context already carries the node's transform and effective alpha.
    /// Levels pushed here must be popped before returning.
    fn paint(&mut self, ctx: &mut PaintContext<'_>) {
        _ = ctx;
    }

    /// Advances per-frame logic.
    fn enter_frame(&mut self, tick: &FrameTick) -> Redraw {
        _ = tick;
        Redraw::Unchanged
    }

    /// Returns whether a local point lies inside the node.
    ///
    /// Combined with the node's hit region: either one reporting a hit is a
    /// hit.
    fn hit_test(&self, local: Point) -> bool {
        _ = local;
        false
    }

    /// Receives a pointer event, hit or not.
    fn pointer(&mut self, event: &PointerEvent) -> Propagation {
        _ = event;
        Propagation::Continue
    }

    /// Veto hook consulted before a child is inserted.
    fn before_add_child(&mut self, child: NodeId, kind: NodeKind) -> bool {
        _ = (child, kind);
        true
    }

    /// Veto hook consulted before a child is removed.
    fn before_remove_child(&mut self, child: NodeId) -> bool {
        _ = child;
        true
    }
}
