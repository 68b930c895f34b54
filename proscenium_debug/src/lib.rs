// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and scene dumps for proscenium diagnostics.
//!
//! - [`pretty::PrettyPrintSink`]: a [`TraceSink`](proscenium_core::trace::TraceSink)
//!   writing one line per frame-loop event.
//! - [`tree::outline`]: an indented text rendering of the display tree.
//! - [`tree::to_json`]: the same tree as a `serde_json` value, including
//!   covers and computed properties.

pub mod pretty;
pub mod tree;

pub use pretty::PrettyPrintSink;
pub use tree::{outline, to_json};
