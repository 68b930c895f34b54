// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained-mode 2D scene graph with frame scheduling and pointer routing.
//!
//! `proscenium_core` manages a tree of display objects rooted at a stage,
//! repaints layer surfaces only when something beneath them changed, and
//! routes host pointer input through the tree in z-order. Nodes live in
//! struct-of-arrays storage addressed by generational handles.
//!
//! # Architecture
//!
//! The crate is organized around a frame loop driven by host events:
//!
//! ```text
//!   Host event loop
//!       │
//!       ▼
//!   HostEvent ──► Scene::handle()
//!       │              │
//!       │ pointer      │ timer
//!       ▼              ▼
//!   route top-most   FrameClock::poll() ──► FrameTick
//!   first, local                                │
//!   coordinates        ┌────────────────────────┘
//!                      ▼
//!               ENTER_FRAME (pre-order tick, behaviors post changes)
//!                      │
//!                      ▼
//!               REDRAW: Scene::evaluate() ──► SceneChanges
//!                      │
//!                      ▼
//!               paint dirty layers ──► PaintContext ──► dyn Graphics
//! ```
//!
//! **[`scene`]**: Struct-of-arrays node arena with generational handles,
//! container operations, layers, the stage, covers, pointer routing, and the
//! paint traversal.
//!
//! **[`dirty`]**: Multi-channel dirty tracking via `understory_dirty`.
//! TRANSFORM and ALPHA propagate to descendants; TOPOLOGY triggers a
//! traversal rebuild. Repaint debt flows upward to the enclosing layer.
//!
//! **[`frame`]**: Frame-rate clamping and the timer-driven frame clock.
//!
//! **[`behavior`]**: Per-node extension points: paint, tick, hit-test,
//! pointer, and child veto hooks.
//!
//! **[`event`]**: Per-node publish/subscribe for host and lifecycle events.
//!
//! **[`graphics`]**: The [`Graphics`](graphics::Graphics) collaborator and
//! the explicit state stack passed down the paint traversal.
//!
//! **[`host`]**: The injected [`Host`](host::Host) adapter and the
//! [`HostEvent`](host::HostEvent) ingestion type.
//!
//! **[`error`]**: Misuse taxonomy. Public mutators log these and return
//! `false`; nothing is thrown across the API.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Logging
//!
//! Diagnostics go through `tracing`. The crate never installs a subscriber.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod behavior;
pub mod dirty;
pub mod error;
pub mod event;
pub mod frame;
pub mod graphics;
pub mod hit;
pub mod host;
pub mod scene;
pub mod time;
pub mod trace;
pub mod transform;

#[cfg(test)]
mod test_support;
