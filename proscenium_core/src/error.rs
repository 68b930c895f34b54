// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene misuse taxonomy.
//!
//! Nothing here is fatal. Public mutators on [`Scene`](crate::scene::Scene)
//! never return these errors; they [`report`](SceneError::report) them
//! through `tracing` and return `false`, so the frame loop keeps running
//! regardless of what an individual caller got wrong.

use tracing::{debug, error, warn};

use crate::scene::{NodeId, NodeKind};

/// Which tree mutation a veto applied to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mutation {
    /// Inserting a child.
    Add,
    /// Removing a child.
    Remove,
}

/// A detected misuse of the scene API.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SceneError {
    /// The handle refers to a destroyed node.
    #[error("stale node handle {0:?}")]
    StaleNode(NodeId),

    /// A policy check declined the mutation.
    #[error("{parent:?} declined {mutation:?} of {child:?}: {reason}")]
    Vetoed {
        /// The container that was asked to change.
        parent: NodeId,
        /// The child being added or removed.
        child: NodeId,
        /// The declined mutation.
        mutation: Mutation,
        /// Which rule or hook declined it.
        reason: &'static str,
    },

    /// The node cannot hold children.
    #[error("{0:?} is not a container")]
    NotAContainer(NodeId),

    /// The node is not a child of the given container.
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The container.
        parent: NodeId,
        /// The node that was expected in its child list.
        child: NodeId,
    },

    /// A positional argument was outside the child list.
    #[error("index {index} out of range for {len} children of {parent:?}")]
    IndexOutOfRange {
        /// The container.
        parent: NodeId,
        /// The offending index.
        index: usize,
        /// The child count at the time of the call.
        len: usize,
    },

    /// A range argument selected no children.
    #[error("range {start}..{end} selects no children of {parent:?} (len {len})")]
    EmptyRange {
        /// The container.
        parent: NodeId,
        /// Range start after clamping.
        start: usize,
        /// Range end after clamping.
        end: usize,
        /// The child count at the time of the call.
        len: usize,
    },

    /// The mutation would make a node its own ancestor.
    #[error("adding {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// The would-be container.
        parent: NodeId,
        /// The would-be child.
        child: NodeId,
    },

    /// The attribute is derived or owned elsewhere and cannot be written.
    #[error("{attribute} of {node:?} is read-only")]
    ReadOnly {
        /// The node written to.
        node: NodeId,
        /// The attribute name.
        attribute: &'static str,
    },

    /// A non-finite value was written to a numeric attribute.
    #[error("{attribute} of {node:?} must be finite")]
    NonFinite {
        /// The node written to.
        node: NodeId,
        /// The attribute name.
        attribute: &'static str,
    },

    /// Destroying a node requires removing its children first.
    #[error("{0:?} still has children")]
    HasChildren(NodeId),

    /// The operation does not apply to this kind of node.
    #[error("{node:?} is a {kind:?}, expected {expected}")]
    WrongKind {
        /// The node.
        node: NodeId,
        /// Its actual kind.
        kind: NodeKind,
        /// What the operation needed.
        expected: &'static str,
    },
}

impl SceneError {
    /// Logs the error at the level its category calls for.
    ///
    /// Policy outcomes and idempotent no-ops are `debug`; bad positional or
    /// numeric input is `warn`; everything else is `error`.
    pub fn report(&self) {
        match self {
            Self::Vetoed { .. } | Self::NotAChild { .. } => {
                debug!(error = %self, "scene mutation skipped");
            }
            Self::IndexOutOfRange { .. }
            | Self::EmptyRange { .. }
            | Self::HasChildren(_)
            | Self::NonFinite { .. } => warn!(error = %self, "scene mutation ignored"),
            Self::StaleNode(_)
            | Self::NotAContainer(_)
            | Self::Cycle { .. }
            | Self::ReadOnly { .. }
            | Self::WrongKind { .. } => error!(error = %self, "scene mutation rejected"),
        }
    }
}

/// Converts an internal result into the public `bool` convention, reporting
/// any error.
pub(crate) fn reported(result: Result<bool, SceneError>) -> bool {
    match result {
        Ok(changed) => changed,
        Err(e) => {
            e.report();
            false
        }
    }
}
