// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instrumentation hooks for the frame loop.
//!
//! [`TraceSink`] has one method per event, each defaulting to a no-op, so a
//! sink implements only what it cares about.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies.

use crate::frame::FrameTick;
use crate::scene::NodeId;
use crate::time::{Duration, HostTime};

/// Which phase of a frame is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Pre-order `ENTER_FRAME` tick of the tree.
    EnterFrame,
    /// Dirty-state evaluation at the start of the paint phase.
    Evaluate,
    /// Layer paint traversals.
    Redraw,
}

/// Emitted once per produced frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTickEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Host time of the timer callback.
    pub now: HostTime,
    /// Nominal frame interval.
    pub interval: Duration,
}

impl From<&FrameTick> for FrameTickEvent {
    fn from(tick: &FrameTick) -> Self {
        Self {
            frame_index: tick.frame_index,
            now: tick.now,
            interval: tick.interval,
        }
    }
}

/// Emitted when a phase starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// The phase.
    pub phase: PhaseKind,
    /// Host time at phase start.
    pub now: HostTime,
}

/// Emitted when a phase ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// The phase.
    pub phase: PhaseKind,
    /// Host time at phase end.
    pub now: HostTime,
}

/// Emitted for each on-stage layer during the paint phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerPaintEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// The layer.
    pub layer: NodeId,
    /// `false` when the layer had nothing to repaint.
    pub repainted: bool,
}

/// Receives frame-loop instrumentation events.
///
/// All methods have default no-op implementations.
pub trait TraceSink {
    /// Called once per produced frame, before any phase.
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        _ = e;
    }

    /// Called when a phase starts.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called when a phase ends.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called with each layer's paint decision.
    fn on_layer_paint(&mut self, e: &LayerPaintEvent) {
        _ = e;
    }
}

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameTickEvent`].
    #[inline]
    pub fn frame_tick(&mut self, e: &FrameTickEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_tick(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LayerPaintEvent`].
    #[inline]
    pub fn layer_paint(&mut self, e: &LayerPaintEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layer_paint(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tick() -> FrameTickEvent {
        FrameTickEvent {
            frame_index: 42,
            now: HostTime(1_000_000),
            interval: Duration::per_frame(60),
        }
    }

    #[test]
    fn frame_tick_event_from_frame_tick() {
        let tick = FrameTick {
            frame_index: 7,
            now: HostTime(9),
            interval: Duration(5),
        };
        let evt = FrameTickEvent::from(&tick);
        assert_eq!(evt.frame_index, 7);
        assert_eq!(evt.now, HostTime(9));
        assert_eq!(evt.interval, Duration(5));
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.frame_tick(&sample_tick());
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index: 0,
            phase: PhaseKind::Redraw,
            now: HostTime(0),
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        struct RecordingSink {
            ticks: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_frame_tick(&mut self, e: &FrameTickEvent) {
                self.ticks.push(e.frame_index);
            }
        }

        let mut sink = RecordingSink { ticks: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.frame_tick(&sample_tick());
        drop(tracer);
        assert_eq!(sink.ticks, &[42]);
    }
}
