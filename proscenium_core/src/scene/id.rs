// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identity and kind types.

use core::fmt;

/// Sentinel value indicating "no node" in index fields.
pub const INVALID: u32 = u32::MAX;

/// Slot of the stage, which is created with the scene and never destroyed.
pub(crate) const STAGE: u32 = 0;

/// A handle to a node in a [`Scene`](super::Scene).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a node is destroyed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    /// Slot index into the scene's arrays.
    pub(crate) idx: u32,
    /// Generation counter; must match the scene's generation for this slot.
    pub(crate) generation: u32,
}

impl NodeId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}@gen{})", self.idx, self.generation)
    }
}

/// The role a node plays in the scene.
///
/// Roles are fixed at creation. Each maps to a [`Capabilities`] set; there is
/// no inheritance between kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A leaf display object.
    Object,
    /// A grouping node with an ordered child list and no content of its own.
    Container,
    /// A paintable, interactive container.
    Sprite,
    /// A container bound to one raster surface.
    Layer,
    /// The unique tree root.
    Stage,
    /// A modal full-surface overlay kept outside the stage's child order.
    Cover,
}

/// What a node of a given [`NodeKind`] is able to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Capabilities {
    /// Holds an ordered child list.
    pub container: bool,
    /// Its behavior's `paint` is invoked during the paint traversal.
    pub paintable: bool,
    /// Receives pointer events unless switched off per node.
    pub interactive: bool,
    /// Owns a raster surface.
    pub surface: bool,
}

impl NodeKind {
    /// Returns the capability set of this kind.
    #[must_use]
    pub const fn capabilities(self) -> Capabilities {
        match self {
            Self::Object => Capabilities {
                container: false,
                paintable: true,
                interactive: true,
                surface: false,
            },
            Self::Container => Capabilities {
                container: true,
                paintable: false,
                interactive: false,
                surface: false,
            },
            Self::Sprite | Self::Cover => Capabilities {
                container: true,
                paintable: true,
                interactive: true,
                surface: false,
            },
            Self::Layer => Capabilities {
                container: true,
                paintable: false,
                interactive: true,
                surface: true,
            },
            Self::Stage => Capabilities {
                container: true,
                paintable: false,
                interactive: true,
                surface: false,
            },
        }
    }

    /// Shorthand for `capabilities().container`.
    #[inline]
    #[must_use]
    pub const fn is_container(self) -> bool {
        self.capabilities().container
    }

    /// The default class name given to new nodes of this kind.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Object => "DisplayObject",
            Self::Container => "DisplayObjectContainer",
            Self::Sprite => "Sprite",
            Self::Layer => "Layer",
            Self::Stage => "Stage",
            Self::Cover => "Cover",
        }
    }
}
