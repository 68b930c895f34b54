// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Host times
//! are printed in milliseconds, intervals in microseconds.

use std::io::Write;

use proscenium_core::time::HostTime;
use proscenium_core::trace::{
    FrameTickEvent, LayerPaintEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    skipped_layers: u64,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("skipped_layers", &self.skipped_layers)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            skipped_layers: 0,
        }
    }

    /// Number of layer paint decisions that skipped a repaint.
    #[must_use]
    pub fn skipped_layers(&self) -> u64 {
        self.skipped_layers
    }

    /// Consumes the sink, returning the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn host_ms(t: HostTime) -> f64 {
    t.nanos() as f64 / 1_000_000.0
}

fn phase_name(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::EnterFrame => "enter",
        PhaseKind::Evaluate => "eval",
        PhaseKind::Redraw => "redraw",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        let _ = writeln!(
            self.writer,
            "[tick] frame={} now={:.3}ms interval={:.1}µs",
            e.frame_index,
            host_ms(e.now),
            e.interval.as_micros_f64(),
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {} at {:.3}ms",
            e.frame_index,
            phase_name(e.phase),
            host_ms(e.now),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {} at {:.3}ms",
            e.frame_index,
            phase_name(e.phase),
            host_ms(e.now),
        );
    }

    fn on_layer_paint(&mut self, e: &LayerPaintEvent) {
        let outcome = if e.repainted {
            "repaint"
        } else {
            self.skipped_layers += 1;
            "skip"
        };
        let _ = writeln!(
            self.writer,
            "[layer] frame={} node={} {outcome}",
            e.frame_index,
            e.layer.index(),
        );
    }
}
