// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Proscenium tracks two kinds of invalidation.
//!
//! Derived properties use multi-channel dirty tracking (via
//! [`understory_dirty`]). Each channel represents an independent category of
//! change:
//!
//! - **Propagating**: [`TRANSFORM`] and [`ALPHA`] use
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and have dependency edges
//!   from child to parent. Marking a parent dirty automatically marks all
//!   descendants, because world transforms, effective alphas, and effective
//!   hidden state are inherited. Visibility changes are routed through
//!   [`TRANSFORM`] so one drain pass recomputes both.
//! - **Structural**: [`TOPOLOGY`] is marked whenever a child list, the set
//!   of live nodes, or the cover registry changes. It triggers a
//!   traversal-order rebuild during evaluation but does not propagate.
//!
//! Repaint debt flows the other way. [`post_change`](crate::scene::Scene::post_change)
//! marks a node and every ancestor, so a layer's own flag answers whether
//! anything beneath it changed since its last paint.

use understory_dirty::Channel;

/// Transform or visibility changed; descendants need world transform and
/// effective hidden recomputation.
pub const TRANSFORM: Channel = Channel::new(0);

/// Alpha changed; descendants need effective alpha recomputation.
pub const ALPHA: Channel = Channel::new(1);

/// Tree topology changed; triggers a traversal order rebuild.
pub const TOPOLOGY: Channel = Channel::new(2);
