// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-rate clamping and the timer-driven frame clock.
//!
//! The [`FrameClock`] turns host timer callbacks into [`FrameTick`]s at a
//! bounded rate. Each tick drives two logically separate phases on the
//! stage: `ENTER_FRAME` (logic) followed by `REDRAW` (paint). Both phases are
//! derived from the same tick, so they are frame-rate locked.
//!
//! ```text
//!   HostEvent::Timer(now) ──► FrameClock::poll(now) ──► Option<FrameTick>
//!                                                          │
//!                         ┌────────────────────────────────┘
//!                         ▼
//!   Scene::run_frame ──► ENTER_FRAME (pre-order tick) ──► REDRAW (evaluate + paint)
//! ```

use tracing::{debug, info, warn};

use crate::time::{Duration, HostTime};

/// Lowest accepted frame rate.
pub const MIN_FPS: u32 = 12;

/// Highest accepted frame rate.
pub const MAX_FPS: u32 = 60;

/// Frame rate used when none is configured.
pub const DEFAULT_FPS: u32 = 60;

/// Clamps a requested frame rate to [`MIN_FPS`]`..=`[`MAX_FPS`].
///
/// Out-of-range requests are not errors; they are clamped and a warning is
/// logged.
#[must_use]
pub fn clamp_fps(requested: u32) -> u32 {
    if requested < MIN_FPS {
        warn!(requested, effective = MIN_FPS, "frame rate below minimum, clamped");
        MIN_FPS
    } else if requested > MAX_FPS {
        warn!(requested, effective = MAX_FPS, "frame rate above maximum, clamped");
        MAX_FPS
    } else {
        requested
    }
}

/// A frame opportunity produced by the [`FrameClock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTick {
    /// Monotonically increasing frame counter, starting at zero.
    pub frame_index: u64,
    /// Host time of the timer callback that produced this tick.
    pub now: HostTime,
    /// Nominal interval between frames at the current rate.
    pub interval: Duration,
}

/// Timer-driven frame source owned by the stage.
///
/// The clock never polls a timer. The host calls [`poll`](Self::poll) from
/// its own timer callback; the clock decides whether a frame is due.
///
/// The first poll after construction or [`start`](Self::start) produces a
/// frame immediately. A poll that arrives late produces a single frame and
/// re-anchors the schedule to `now`, so a stalled host never receives a
/// burst of catch-up frames.
#[derive(Clone, Debug)]
pub struct FrameClock {
    fps: u32,
    interval: Duration,
    next_due: Option<HostTime>,
    frame_index: u64,
    running: bool,
}

impl FrameClock {
    /// Creates a running clock at `fps` (clamped).
    #[must_use]
    pub fn new(fps: u32) -> Self {
        let fps = clamp_fps(fps);
        Self {
            fps,
            interval: Duration::per_frame(fps),
            next_due: None,
            frame_index: 0,
            running: true,
        }
    }

    /// Returns the effective frame rate.
    #[must_use]
    pub const fn fps(&self) -> u32 {
        self.fps
    }

    /// Returns the interval between frames at the effective rate.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the number of frames produced so far.
    #[must_use]
    pub const fn frames_produced(&self) -> u64 {
        self.frame_index
    }

    /// Returns whether the clock produces frames.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Changes the frame rate, clamping it, and returns the effective rate.
    ///
    /// The next due time is kept; the new interval applies from the next
    /// produced frame onward.
    pub fn set_fps(&mut self, requested: u32) -> u32 {
        self.fps = clamp_fps(requested);
        self.interval = Duration::per_frame(self.fps);
        info!(fps = self.fps, "stage frame rate set");
        self.fps
    }

    /// Stops producing frames. Dispatch already in progress is unaffected.
    pub fn stop(&mut self) {
        self.running = false;
        self.next_due = None;
    }

    /// Re-arms a stopped clock. The next poll produces a frame.
    pub fn start(&mut self) {
        self.running = true;
        self.next_due = None;
    }

    /// Offers a timer callback at `now` and returns a tick if a frame is due.
    pub fn poll(&mut self, now: HostTime) -> Option<FrameTick> {
        if !self.running {
            return None;
        }
        match self.next_due {
            Some(due) if now < due => None,
            due => {
                let mut next = due.unwrap_or(now).saturating_add(self.interval);
                if next <= now {
                    let late = now.saturating_duration_since(next);
                    debug!(late_ns = late.nanos(), "frame clock re-anchored after a stall");
                    next = now.saturating_add(self.interval);
                }
                self.next_due = Some(next);
                let tick = FrameTick {
                    frame_index: self.frame_index,
                    now,
                    interval: self.interval,
                };
                self.frame_index += 1;
                Some(tick)
            }
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_law() {
        for v in [0, 1, 5, 11, 12, 13, 30, 59, 60, 61, 120, u32::MAX] {
            assert_eq!(clamp_fps(v), v.clamp(MIN_FPS, MAX_FPS), "clamp of {v}");
        }
    }

    #[test]
    fn first_poll_fires_immediately() {
        let mut clock = FrameClock::new(60);
        let tick = clock.poll(HostTime(5)).expect("first poll produces a frame");
        assert_eq!(tick.frame_index, 0);
        assert_eq!(tick.now, HostTime(5));
    }

    #[test]
    fn frames_are_paced_by_interval() {
        let mut clock = FrameClock::new(50);
        let interval = clock.interval();
        assert_eq!(interval, Duration(20_000_000));

        assert!(clock.poll(HostTime(0)).is_some(), "t=0 fires");
        assert!(clock.poll(HostTime(10_000_000)).is_none(), "half interval");
        let tick = clock.poll(HostTime(20_000_000)).expect("due at one interval");
        assert_eq!(tick.frame_index, 1);
        assert_eq!(clock.frames_produced(), 2);
    }

    #[test]
    fn late_poll_does_not_burst() {
        let mut clock = FrameClock::new(50);
        let _ = clock.poll(HostTime(0));
        // Host stalled for ten intervals.
        let logs = crate::test_support::capture_logs(|| {
            assert!(clock.poll(HostTime(200_000_000)).is_some(), "late frame fires");
        });
        let debugs = crate::test_support::at_level(&logs, tracing::Level::DEBUG);
        assert_eq!(debugs.len(), 1);
        assert_eq!(debugs[0].field("late_ns"), Some("160000000"));
        assert!(
            clock.poll(HostTime(200_000_001)).is_none(),
            "no catch-up frames after a stall"
        );
        assert!(clock.poll(HostTime(220_000_000)).is_some(), "re-anchored to now");
    }

    #[test]
    fn stopped_clock_produces_nothing() {
        let mut clock = FrameClock::new(60);
        clock.stop();
        assert!(!clock.is_running());
        assert!(clock.poll(HostTime(0)).is_none(), "stopped");
        clock.start();
        assert!(clock.poll(HostTime(1)).is_some(), "restarted clock fires at once");
    }

    #[test]
    fn set_fps_clamps_and_updates_interval() {
        let mut clock = FrameClock::new(30);
        assert_eq!(clock.set_fps(200), MAX_FPS);
        assert_eq!(clock.interval(), Duration::per_frame(MAX_FPS));
        assert_eq!(clock.set_fps(1), MIN_FPS);
        assert_eq!(clock.fps(), MIN_FPS);
    }
}
