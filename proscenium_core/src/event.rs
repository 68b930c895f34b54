// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node publish/subscribe events.
//!
//! Host input (pointer, resize, orientation) and lifecycle notifications
//! (attach, children-changed, removed) travel through the same primitive:
//! [`Scene::on`](crate::scene::Scene::on) registers a handler for an
//! [`EventKind`] on one node and [`Scene::emit`](crate::scene::Scene::emit)
//! delivers an [`Event`] to that node's handlers in registration order.
//!
//! Handlers receive `&Event` and nothing else. They cannot reach the scene,
//! so a handler can never mutate the tree while a traversal is running.

use kurbo::Point;

use crate::frame::FrameTick;
use crate::host::Orientation;
use crate::scene::NodeId;

/// Where an event originated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventOrigin {
    /// Delivered by the host platform (pointer, resize, orientation).
    Host,
    /// Produced by the engine itself (tree mutation, frame phases).
    Lifecycle,
}

/// The name of an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// This node was inserted into a container.
    Added,
    /// This node was removed from its container.
    Removed,
    /// A child was inserted into this container.
    ChildAdded,
    /// A child was removed from this container.
    ChildRemoved,
    /// This container's child sequence changed. Fired once per mutation.
    ChildrenChanged,
    /// This node became reachable from the stage.
    AppendedToStage,
    /// This node was stamped with a layer.
    AppendedToLayer,
    /// Logic phase of a frame.
    EnterFrame,
    /// Paint phase of a frame; on a layer, it was repainted.
    Redraw,
    /// The host changed orientation.
    OrientationChange,
    /// The host surface changed size.
    Resize,
    /// The pointer moved over this node.
    MouseMove,
    /// The pointer entered this node.
    MouseOver,
    /// The pointer left this node.
    MouseOut,
    /// A click landed on this node.
    Click,
    /// A double click landed on this node.
    DoubleClick,
    /// A context-menu request landed on this node.
    ContextMenu,
    /// A button was pressed over this node.
    MouseDown,
    /// A button was released over this node.
    MouseUp,
    /// An application-defined event.
    Custom(&'static str),
}

impl EventKind {
    /// Classifies the event by origin.
    #[must_use]
    pub const fn origin(self) -> EventOrigin {
        match self {
            Self::OrientationChange
            | Self::Resize
            | Self::MouseMove
            | Self::MouseOver
            | Self::MouseOut
            | Self::Click
            | Self::DoubleClick
            | Self::ContextMenu
            | Self::MouseDown
            | Self::MouseUp => EventOrigin::Host,
            _ => EventOrigin::Lifecycle,
        }
    }

    /// Returns whether this is a pointer event.
    #[must_use]
    pub const fn is_pointer(self) -> bool {
        matches!(
            self,
            Self::MouseMove
                | Self::MouseOver
                | Self::MouseOut
                | Self::Click
                | Self::DoubleClick
                | Self::ContextMenu
                | Self::MouseDown
                | Self::MouseUp
        )
    }
}

/// A pointer button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// The primary (usually left) button.
    #[default]
    Primary,
    /// The secondary (usually right) button.
    Secondary,
    /// The auxiliary (usually middle) button.
    Auxiliary,
}

/// Data carried by an [`Event`].
#[derive(Clone, Debug, PartialEq)]
pub enum EventPayload {
    /// No data.
    None,
    /// Another node: the child for `ChildAdded`/`ChildRemoved`, the container
    /// for `Added`/`Removed`, the layer for `AppendedToLayer`.
    Node(NodeId),
    /// Pointer position in the receiver's local space and in stage space.
    Pointer {
        /// Position in the receiving node's local space.
        local: Point,
        /// Position in stage space.
        stage: Point,
        /// The button, for button events.
        button: Option<PointerButton>,
    },
    /// A logical size.
    Size {
        /// Width in logical pixels.
        width: f64,
        /// Height in logical pixels.
        height: f64,
    },
    /// A new orientation and the surface size that goes with it.
    Orientation {
        /// The new orientation.
        orientation: Orientation,
        /// Width in logical pixels.
        width: f64,
        /// Height in logical pixels.
        height: f64,
    },
    /// The frame that triggered the phase.
    Frame(FrameTick),
}

/// A named notification delivered to one node.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// The node the event is delivered to.
    pub target: NodeId,
    /// Associated data.
    pub payload: EventPayload,
}

impl Event {
    /// Creates an event with no payload.
    #[must_use]
    pub const fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            payload: EventPayload::None,
        }
    }

    /// Attaches a payload.
    #[must_use]
    pub fn with_payload(mut self, payload: EventPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Returns the local pointer position, for pointer events.
    #[must_use]
    pub fn local_point(&self) -> Option<Point> {
        match self.payload {
            EventPayload::Pointer { local, .. } => Some(local),
            _ => None,
        }
    }
}

/// Identifies a registered handler so it can be removed with
/// [`Scene::off`](crate::scene::Scene::off).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

/// A boxed event handler.
pub type Handler = Box<dyn FnMut(&Event)>;

pub(crate) struct Listener {
    pub(crate) id: ListenerId,
    pub(crate) kind: EventKind,
    pub(crate) handler: Handler,
}

impl core::fmt::Debug for Listener {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
