// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stage: frame scheduling, host-event ingestion, and covers.
//!
//! One timer drives both frame phases:
//!
//! ```text
//!   HostEvent::Timer ──► FrameClock::poll ──► run_frame(tick)
//!                                               │
//!        ┌──────────────────────────────────────┤
//!        ▼                                      ▼
//!   ENTER_FRAME                              REDRAW
//!   stage event, then a pre-order            stage event, evaluate, then
//!   tick of the stage subtree and            paint every on-stage layer in
//!   every cover subtree                      traversal order
//! ```
//!
//! Covers are modal overlays registered on the stage but kept out of its
//! child list. At most one is visible; while one is, it receives pointer
//! events in place of the stage's children. Each cover's z-index sits in a
//! band above ordinary content: `(cover_index + child_count) * 10`.

use kurbo::{Point, Size};

use super::evaluate::SceneChanges;
use super::id::{INVALID, NodeId, NodeKind, STAGE};
use super::store::Scene;
use crate::behavior::Redraw;
use crate::dirty;
use crate::error::{SceneError, reported};
use crate::event::{EventKind, EventPayload};
use crate::frame::{DEFAULT_FPS, FrameClock, FrameTick};
use crate::host::{Host, HostEvent, Orientation};
use crate::trace::{FrameTickEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, Tracer};

/// How a pointer event fans out once something reports a hit.
///
/// By default every interactive node under the pointer receives the event,
/// so overlapping nodes all react to one click. A node can still end the
/// fan-out by returning [`Propagation::Stop`](crate::behavior::Propagation::Stop).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DispatchPolicy {
    /// Offer the event to every node, top-most first.
    #[default]
    Broadcast,
    /// Stop after the first (top-most) node that reports a hit.
    StopOnFirstHit,
}

/// Configuration for the stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageConfig {
    /// Requested frame rate, clamped to
    /// [`MIN_FPS`](crate::frame::MIN_FPS)..=[`MAX_FPS`](crate::frame::MAX_FPS).
    pub fps: u32,
    /// Pointer fan-out policy.
    pub dispatch: DispatchPolicy,
    /// How many container levels a move event descends below each layer
    /// before nested containers stop forwarding it.
    pub move_budget: u32,
}

impl StageConfig {
    /// 60 fps, broadcast dispatch, move budget 2.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            fps: DEFAULT_FPS,
            dispatch: DispatchPolicy::Broadcast,
            move_budget: 2,
        }
    }

    /// Like [`standard`](Self::standard), but only the top-most hit receives
    /// each pointer event.
    #[must_use]
    pub const fn top_most_hit() -> Self {
        Self {
            dispatch: DispatchPolicy::StopOnFirstHit,
            ..Self::standard()
        }
    }

    /// Replaces the requested frame rate.
    #[must_use]
    pub const fn with_fps(self, fps: u32) -> Self {
        Self { fps, ..self }
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Stage-owned state: scheduler, host, pointer, covers.
pub(crate) struct StageState {
    pub(crate) config: StageConfig,
    pub(crate) clock: FrameClock,
    pub(crate) host: Box<dyn Host>,
    pub(crate) size: Size,
    pub(crate) orientation: Orientation,
    pub(crate) pixel_ratio: f64,
    pub(crate) pointer: Option<Point>,
    /// Registered covers in registration order.
    pub(crate) covers: Vec<u32>,
    /// Z-index of each cover, parallel to `covers`.
    pub(crate) cover_z: Vec<u32>,
    /// Slots that reported a hit on the last pointer move.
    pub(crate) hovered: Vec<u32>,
    /// What the last frame's evaluation changed.
    pub(crate) frame_changes: SceneChanges,
}

impl core::fmt::Debug for StageState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StageState")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("size", &self.size)
            .field("orientation", &self.orientation)
            .field("pixel_ratio", &self.pixel_ratio)
            .field("pointer", &self.pointer)
            .field("covers", &self.covers)
            .field("hovered", &self.hovered)
            .finish_non_exhaustive()
    }
}

impl StageState {
    pub(crate) fn new(mut config: StageConfig, host: Box<dyn Host>) -> Self {
        let clock = FrameClock::new(config.fps);
        config.fps = clock.fps();
        Self {
            config,
            clock,
            size: host.screen_size(),
            orientation: host.orientation(),
            pixel_ratio: host.device_pixel_ratio(),
            host,
            pointer: None,
            covers: Vec::new(),
            cover_z: Vec::new(),
            hovered: Vec::new(),
            frame_changes: SceneChanges::default(),
        }
    }
}

impl Scene {
    // -- Scheduler --

    /// The effective frame rate.
    #[must_use]
    pub fn fps(&self) -> u32 {
        self.stage.clock.fps()
    }

    /// Requests a frame rate. Values outside the supported range are clamped
    /// with a warning; the effective rate is returned.
    pub fn set_fps(&mut self, fps: u32) -> u32 {
        let effective = self.stage.clock.set_fps(fps);
        self.stage.config.fps = effective;
        effective
    }

    /// The stage configuration, with the effective frame rate.
    #[must_use]
    pub fn stage_config(&self) -> StageConfig {
        self.stage.config
    }

    /// Switches the pointer fan-out policy.
    pub fn set_dispatch_policy(&mut self, dispatch: DispatchPolicy) {
        self.stage.config.dispatch = dispatch;
    }

    /// Tears the scheduler down; timer events stop producing frames.
    pub fn stop(&mut self) {
        self.stage.clock.stop();
    }

    /// Re-arms a stopped scheduler. The next timer event produces a frame.
    pub fn start(&mut self) {
        self.stage.clock.start();
    }

    /// Whether timer events produce frames.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.stage.clock.is_running()
    }

    /// Number of frames produced so far.
    #[must_use]
    pub fn frames_produced(&self) -> u64 {
        self.stage.clock.frames_produced()
    }

    // -- Host state --

    /// The injected host adapter.
    #[must_use]
    pub fn host(&self) -> &dyn Host {
        self.stage.host.as_ref()
    }

    /// The last pointer position in stage space, if the pointer is over the
    /// surface.
    #[must_use]
    pub fn pointer_position(&self) -> Option<Point> {
        self.stage.pointer
    }

    /// The logical size of the host surface.
    #[must_use]
    pub fn stage_size(&self) -> Size {
        self.stage.size
    }

    /// The current orientation.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.stage.orientation
    }

    /// The current device pixel ratio.
    #[must_use]
    pub fn pixel_ratio(&self) -> f64 {
        self.stage.pixel_ratio
    }

    /// Ingests one host event.
    ///
    /// Timer events poll the frame clock and, when a frame is due, run it and
    /// return its tick.
    pub fn handle(&mut self, event: HostEvent) -> Option<FrameTick> {
        self.handle_traced(event, &mut Tracer::none())
    }

    /// Like [`handle`](Self::handle), with frame instrumentation.
    pub fn handle_traced(
        &mut self,
        event: HostEvent,
        tracer: &mut Tracer<'_>,
    ) -> Option<FrameTick> {
        match event {
            HostEvent::Timer(now) => {
                let tick = self.stage.clock.poll(now)?;
                self.run_frame_traced(&tick, tracer);
                return Some(tick);
            }
            HostEvent::Resize(size) => {
                self.stage.size = size;
                self.notify(
                    STAGE,
                    EventKind::Resize,
                    EventPayload::Size {
                        width: size.width,
                        height: size.height,
                    },
                );
            }
            HostEvent::OrientationChange { orientation, size } => {
                self.stage.orientation = orientation;
                self.stage.size = size;
                self.notify(
                    STAGE,
                    EventKind::OrientationChange,
                    EventPayload::Orientation {
                        orientation,
                        width: size.width,
                        height: size.height,
                    },
                );
            }
            HostEvent::PixelRatioChange(ratio) => {
                self.stage.pixel_ratio = ratio;
                self.refresh_pixel_ratio(ratio);
            }
            HostEvent::PointerMove(point) => self.pointer_move(point),
            HostEvent::PointerButton {
                action,
                position,
                button,
            } => self.pointer_button(action, position, button),
            HostEvent::PointerLeave => self.pointer_leave(),
        }
        None
    }

    // -- Frame phases --

    /// Runs both phases of one frame.
    pub fn run_frame(&mut self, tick: &FrameTick) {
        self.run_frame_traced(tick, &mut Tracer::none());
    }

    /// Runs both phases of one frame with instrumentation.
    pub fn run_frame_traced(&mut self, tick: &FrameTick, tracer: &mut Tracer<'_>) {
        let frame_index = tick.frame_index;
        tracer.frame_tick(&FrameTickEvent::from(tick));

        self.phase_begin(tracer, frame_index, PhaseKind::EnterFrame);
        self.enter_frame(tick);
        self.phase_end(tracer, frame_index, PhaseKind::EnterFrame);

        self.phase_begin(tracer, frame_index, PhaseKind::Redraw);
        self.notify(STAGE, EventKind::Redraw, EventPayload::Frame(*tick));

        self.phase_begin(tracer, frame_index, PhaseKind::Evaluate);
        let mut changes = core::mem::take(&mut self.stage.frame_changes);
        self.evaluate_into(&mut changes);
        self.stage.frame_changes = changes;
        self.phase_end(tracer, frame_index, PhaseKind::Evaluate);

        let order = self.traversal_order.clone();
        for &idx in &order {
            if self.kind[idx as usize] == NodeKind::Layer
                && !self.effective_hidden[idx as usize]
                && self.resolve_stage(idx) == STAGE
            {
                self.paint_layer(idx, frame_index, tracer);
            }
        }
        // On-stage nodes outside any layer have no surface to owe.
        for &idx in &order {
            if self.layer[idx as usize] == INVALID
                && self.kind[idx as usize] != NodeKind::Layer
                && self.resolve_stage(idx) == STAGE
            {
                self.needs_paint[idx as usize] = false;
            }
        }
        self.phase_end(tracer, frame_index, PhaseKind::Redraw);
    }

    /// Ticks the stage subtree, then each cover subtree, pre-order.
    fn enter_frame(&mut self, tick: &FrameTick) {
        let mut roots = vec![STAGE];
        roots.extend(self.stage.covers.iter().copied());
        for root in roots {
            for idx in self.subtree(root) {
                if !self.alive[idx as usize] {
                    continue;
                }
                let changed = self.behaviors[idx as usize]
                    .as_mut()
                    .map(|b| b.enter_frame(tick));
                if changed == Some(Redraw::Changed) {
                    self.mark_needs_paint(idx);
                }
                self.notify(idx, EventKind::EnterFrame, EventPayload::Frame(*tick));
            }
        }
    }

    fn phase_begin(&self, tracer: &mut Tracer<'_>, frame_index: u64, phase: PhaseKind) {
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase,
            now: self.stage.host.now(),
        });
    }

    fn phase_end(&self, tracer: &mut Tracer<'_>, frame_index: u64, phase: PhaseKind) {
        tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase,
            now: self.stage.host.now(),
        });
    }

    /// What the evaluation inside the last [`run_frame`](Self::run_frame)
    /// changed. Hosts read this to re-place layer surfaces that moved.
    #[must_use]
    pub fn frame_changes(&self) -> &SceneChanges {
        &self.stage.frame_changes
    }

    // -- Covers --

    /// Registers a cover on the stage. It stays hidden until shown.
    pub fn add_cover(&mut self, cover: NodeId) -> bool {
        reported(self.check_cover(cover).map(|idx| {
            if self.stage.covers.contains(&idx) {
                return false;
            }
            self.stage.covers.push(idx);
            self.dirty.mark(idx, dirty::TOPOLOGY);
            self.invalidate_caches(idx);
            self.update_cover_z();
            self.announce_to_stage(idx);
            true
        }))
    }

    /// Unregisters a cover, hiding it.
    pub fn remove_cover(&mut self, cover: NodeId) -> bool {
        reported(self.check_cover(cover).map(|idx| {
            if !self.stage.covers.contains(&idx) {
                return false;
            }
            self.apply_visible(idx, false);
            self.unregister_cover(idx);
            true
        }))
    }

    /// Shows `cover` and hides every other registered cover.
    pub fn show_cover(&mut self, cover: NodeId) -> bool {
        reported(self.check_registered_cover(cover).map(|idx| {
            let others: Vec<u32> = self
                .stage
                .covers
                .iter()
                .copied()
                .filter(|&c| c != idx)
                .collect();
            let mut changed = false;
            for other in others {
                changed |= self.apply_visible(other, false);
            }
            changed | self.apply_visible(idx, true)
        }))
    }

    /// Hides `cover`. Other covers are left alone.
    pub fn hide_cover(&mut self, cover: NodeId) -> bool {
        reported(
            self.check_registered_cover(cover)
                .map(|idx| self.apply_visible(idx, false)),
        )
    }

    /// Registered covers in registration order.
    #[must_use]
    pub fn covers(&self) -> Vec<NodeId> {
        self.stage.covers.iter().map(|&c| self.id_at(c)).collect()
    }

    /// The visible cover, if any.
    #[must_use]
    pub fn visible_cover(&self) -> Option<NodeId> {
        self.visible_cover_slot().map(|c| self.id_at(c))
    }

    /// The z-index of a registered cover.
    #[must_use]
    pub fn cover_z_index(&self, cover: NodeId) -> Option<u32> {
        self.validate(cover);
        let pos = self.stage.covers.iter().position(|&c| c == cover.idx)?;
        self.stage.cover_z.get(pos).copied()
    }

    pub(crate) fn visible_cover_slot(&self) -> Option<u32> {
        self.stage
            .covers
            .iter()
            .copied()
            .find(|&c| self.visible[c as usize])
    }

    /// Recomputes every cover's z-index against the stage's child count.
    pub(crate) fn update_cover_z(&mut self) {
        let base = self.children[STAGE as usize].len();
        self.stage.cover_z = (0..self.stage.covers.len())
            .map(|i| u32::try_from((i + base) * 10).unwrap_or(u32::MAX))
            .collect();
    }

    /// Drops `idx` from the cover registry, if present.
    pub(crate) fn unregister_cover(&mut self, idx: u32) {
        let Some(pos) = self.stage.covers.iter().position(|&c| c == idx) else {
            return;
        };
        self.stage.covers.remove(pos);
        self.dirty.mark(idx, dirty::TOPOLOGY);
        self.invalidate_caches(idx);
        self.update_cover_z();
    }

    fn check_cover(&self, cover: NodeId) -> Result<u32, SceneError> {
        let idx = self.check(cover)?;
        let kind = self.kind[idx as usize];
        if kind == NodeKind::Cover {
            Ok(idx)
        } else {
            Err(SceneError::WrongKind {
                node: cover,
                kind,
                expected: "a cover",
            })
        }
    }

    fn check_registered_cover(&self, cover: NodeId) -> Result<u32, SceneError> {
        let idx = self.check_cover(cover)?;
        if self.stage.covers.contains(&idx) {
            Ok(idx)
        } else {
            Err(SceneError::WrongKind {
                node: cover,
                kind: NodeKind::Cover,
                expected: "a cover registered on the stage",
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use kurbo::Size;

    use super::*;
    use crate::behavior::Behavior;
    use crate::event::Event;
    use crate::host::HeadlessHost;
    use crate::scene::test_scene;
    use crate::test_support::{at_level, capture_logs};
    use crate::time::{Duration, HostTime};

    fn tick(frame_index: u64) -> FrameTick {
        FrameTick {
            frame_index,
            now: HostTime(0),
            interval: Duration::per_frame(60),
        }
    }

    #[test]
    fn low_frame_rate_is_clamped_with_one_warning() {
        let mut scene = None;
        let logs = capture_logs(|| {
            scene = Some(Scene::new(
                StageConfig::standard().with_fps(5),
                HeadlessHost::default(),
            ));
        });
        let scene = scene.expect("scene constructed");
        assert_eq!(scene.fps(), 12);
        assert_eq!(scene.stage_config().fps, 12);
        assert_eq!(at_level(&logs, tracing::Level::WARN).len(), 1);
    }

    #[test]
    fn set_fps_reports_effective_rate() {
        let mut scene = test_scene();
        assert_eq!(scene.set_fps(30), 30);
        assert_eq!(scene.set_fps(144), 60);
        assert_eq!(scene.fps(), 60);
    }

    #[test]
    fn timer_events_drive_frames() {
        let mut scene = test_scene();
        let frames = Rc::new(RefCell::new(0_u32));
        let sink = frames.clone();
        scene.on(scene.stage(), EventKind::EnterFrame, move |_| {
            *sink.borrow_mut() += 1;
        });

        assert!(scene.handle(HostEvent::Timer(HostTime(0))).is_some());
        assert!(scene.handle(HostEvent::Timer(HostTime(1))).is_none(), "not due");
        scene.stop();
        assert!(scene.handle(HostEvent::Timer(HostTime(1_000_000_000))).is_none());
        scene.start();
        let t = scene
            .handle(HostEvent::Timer(HostTime(2_000_000_000)))
            .expect("restarted");
        assert_eq!(t.frame_index, 1);
        assert_eq!(*frames.borrow(), 2);
        assert_eq!(scene.frames_produced(), 2);
    }

    #[test]
    fn enter_frame_ticks_pre_order_and_posts_changes() {
        struct Spin {
            log: Rc<RefCell<Vec<&'static str>>>,
            name: &'static str,
        }
        impl Behavior for Spin {
            fn enter_frame(&mut self, _: &FrameTick) -> Redraw {
                self.log.borrow_mut().push(self.name);
                Redraw::Changed
            }
        }

        let mut scene = test_scene();
        let log = Rc::new(RefCell::new(Vec::new()));
        let outer = scene.create_sprite();
        let inner = scene.create_sprite();
        let after = scene.create_sprite();
        for (id, name) in [(outer, "outer"), (inner, "inner"), (after, "after")] {
            scene.set_behavior(
                id,
                Spin {
                    log: log.clone(),
                    name,
                },
            );
        }
        let stage = scene.stage();
        scene.add_child(stage, outer);
        scene.add_child(outer, inner);
        scene.add_child(stage, after);
        scene.run_frame(&tick(0));
        for id in [outer, inner, after] {
            scene.needs_paint[id.index() as usize] = false;
        }

        scene.run_frame(&tick(1));
        assert_eq!(
            &log.borrow()[3..],
            &["outer", "inner", "after"],
            "pre-order, current child order"
        );
        // Off-layer nodes have their debt cleared at the end of REDRAW.
        assert!(!scene.is_dirty(inner));
    }

    #[test]
    fn host_events_update_stage_state() {
        let mut scene = test_scene();
        let stage = scene.stage();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for kind in [EventKind::Resize, EventKind::OrientationChange] {
            let sink = seen.clone();
            scene.on(stage, kind, move |e: &Event| sink.borrow_mut().push(e.payload.clone()));
        }

        scene.handle(HostEvent::Resize(Size::new(800.0, 600.0)));
        scene.handle(HostEvent::OrientationChange {
            orientation: Orientation::Portrait,
            size: Size::new(600.0, 800.0),
        });

        assert_eq!(scene.orientation(), Orientation::Portrait);
        assert_eq!(scene.stage_size(), Size::new(600.0, 800.0));
        assert_eq!(
            *seen.borrow(),
            vec![
                EventPayload::Size {
                    width: 800.0,
                    height: 600.0
                },
                EventPayload::Orientation {
                    orientation: Orientation::Portrait,
                    width: 600.0,
                    height: 800.0
                },
            ]
        );
    }

    #[test]
    fn show_cover_is_exclusive() {
        let mut scene = test_scene();
        let covers: Vec<_> = (0..3).map(|_| scene.create_cover()).collect();
        for &c in &covers {
            assert!(scene.add_cover(c));
        }

        assert!(scene.show_cover(covers[0]));
        assert!(scene.show_cover(covers[2]));
        let visible: Vec<_> = covers.iter().filter(|&&c| scene.visible(c)).collect();
        assert_eq!(visible, vec![&covers[2]]);
        assert_eq!(scene.visible_cover(), Some(covers[2]));

        assert!(scene.hide_cover(covers[2]));
        assert_eq!(scene.visible_cover(), None);
        assert!(!scene.hide_cover(covers[2]), "already hidden");
    }

    #[test]
    fn hide_cover_leaves_siblings_alone() {
        let mut scene = test_scene();
        let a = scene.create_cover();
        let b = scene.create_cover();
        scene.add_cover(a);
        scene.add_cover(b);
        scene.show_cover(a);
        assert!(!scene.hide_cover(b));
        assert!(scene.visible(a));
    }

    #[test]
    fn cover_z_index_tracks_stage_children() {
        let mut scene = test_scene();
        let stage = scene.stage();
        let a = scene.create_cover();
        let b = scene.create_cover();
        scene.add_cover(a);
        scene.add_cover(b);
        assert_eq!(scene.cover_z_index(a), Some(0));
        assert_eq!(scene.cover_z_index(b), Some(10));

        for _ in 0..3 {
            let child = scene.create_object();
            scene.add_child(stage, child);
        }
        assert_eq!(scene.cover_z_index(a), Some(30));
        assert_eq!(scene.cover_z_index(b), Some(40));

        scene.remove_cover(a);
        assert_eq!(scene.cover_z_index(a), None);
        assert_eq!(scene.cover_z_index(b), Some(30));
    }

    #[test]
    fn cover_api_rejects_other_kinds() {
        let mut scene = test_scene();
        let sprite = scene.create_sprite();
        let loose = scene.create_cover();
        let logs = capture_logs(|| {
            assert!(!scene.add_cover(sprite));
            assert!(!scene.show_cover(loose), "not registered");
        });
        assert_eq!(at_level(&logs, tracing::Level::ERROR).len(), 2);
    }

    #[test]
    fn cover_subtree_resolves_to_stage() {
        let mut scene = test_scene();
        let cover = scene.create_cover();
        let panel = scene.create_sprite();
        scene.add_child(cover, panel);
        assert_eq!(scene.stage_of(panel), None);

        scene.add_cover(cover);
        assert_eq!(scene.stage_of(panel), Some(scene.stage()));

        scene.remove_cover(cover);
        assert_eq!(scene.stage_of(panel), None);
    }

    #[test]
    fn frame_changes_report_a_moved_layer() {
        use crate::graphics::testing::CountingGraphics;
        use crate::scene::LayerConfig;

        let mut scene = test_scene();
        let stage = scene.stage();
        let (g, _) = CountingGraphics::new();
        let layer = scene.create_layer(LayerConfig::default(), g);
        scene.add_child(stage, layer);
        scene.run_frame(&tick(0));
        assert!(scene.frame_changes().added.contains(&layer.index()));

        scene.run_frame(&tick(1));
        assert!(scene.frame_changes().is_empty());

        scene.set_position(layer, 30.0, 0.0);
        scene.run_frame(&tick(2));
        assert_eq!(scene.frame_changes().transforms, vec![layer.index()]);
        assert_eq!(
            scene.layer_placement(layer),
            Some(kurbo::Affine::translate((30.0, 0.0)))
        );
    }

    #[test]
    fn registering_a_cover_reorders_traversal() {
        let mut scene = test_scene();
        let first = scene.create_cover();
        let second = scene.create_cover();
        scene.add_cover(second);
        scene.add_cover(first);
        let _ = scene.evaluate();
        assert_eq!(&scene.traversal_order()[1..], &[second.index(), first.index()]);

        scene.remove_cover(second);
        assert!(scene.evaluate().topology_changed);
        assert_eq!(&scene.traversal_order()[1..], &[first.index(), second.index()]);
    }

    #[test]
    fn destroying_a_cover_unregisters_it() {
        let mut scene = test_scene();
        let cover = scene.create_cover();
        scene.add_cover(cover);
        assert!(scene.destroy(cover));
        assert!(scene.covers().is_empty());
    }

    #[test]
    fn pixel_ratio_change_resizes_retina_layers() {
        use crate::graphics::testing::{Call, CountingGraphics};
        use crate::scene::LayerConfig;

        let host = HeadlessHost::new(Size::new(100.0, 100.0), 1.0);
        let mut scene = Scene::new(StageConfig::default(), host);
        let (g, log) = CountingGraphics::new();
        let layer = scene.create_layer(LayerConfig::sized(50.0, 50.0), g);
        scene.needs_paint[layer.index() as usize] = false;

        scene.handle(HostEvent::PixelRatioChange(2.0));
        assert_eq!(scene.pixel_ratio(), 2.0);
        assert_eq!(log.borrow().last(), Some(&Call::Resize(100, 100)));
        assert!(scene.is_dirty(layer));
    }
}
