// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layer paint traversal.
//!
//! A repaint clears the full backing store (unless the layer opts out), then
//! applies the layer's pixel-ratio scale and alpha inside one save/restore
//! pair. Children are painted in ascending index order, so index 0 ends up
//! bottom-most. For each visible child:
//!
//! ```text
//!   save ─► transform(local) ─► set_alpha(effective) ─► paint ─► children ─► restore
//! ```
//!
//! Alpha and hidden state come from the last
//! [`evaluate`](Scene::evaluate). Hidden children are skipped entirely, their
//! subtrees included. A
//! node's `paint` may push its own levels but cannot pop the traversal's;
//! anything it leaves pushed is unwound before its children paint.

use tracing::warn;

use super::store::Scene;
use crate::event::{EventKind, EventPayload};
use crate::graphics::PaintContext;
use crate::trace::{LayerPaintEvent, Tracer};

impl Scene {
    /// Repaints one layer if its policy and dirty state call for it.
    pub(crate) fn paint_layer(&mut self, idx: u32, frame_index: u64, tracer: &mut Tracer<'_>) {
        let Some(mut surface) = self.surfaces[idx as usize].take() else {
            return;
        };
        let layer = self.id_at(idx);
        let repaint = !surface.config.redraw_as_needed || self.needs_paint[idx as usize];

        if repaint {
            let clear = surface.physical_rect();
            let no_clear = surface.config.no_clear;
            let ratio = surface.pixel_ratio;
            let alpha = self.effective_alpha[idx as usize];

            let mut ctx = PaintContext::new(surface.graphics.as_mut());
            if !no_clear {
                ctx.clear_rect(clear);
            }
            ctx.save();
            ctx.scale(ratio, ratio);
            ctx.set_alpha(alpha);
            let children = self.children[idx as usize].clone();
            for child in children {
                self.paint_node(child, &mut ctx);
            }
            ctx.restore();

            surface.repaint_count += 1;
            for n in self.subtree(idx) {
                self.needs_paint[n as usize] = false;
            }
        }
        self.surfaces[idx as usize] = Some(surface);

        tracer.layer_paint(&LayerPaintEvent {
            frame_index,
            layer,
            repainted: repaint,
        });
        if repaint {
            self.notify(idx, EventKind::Redraw, EventPayload::None);
        }
    }

    fn paint_node(&mut self, idx: u32, ctx: &mut PaintContext<'_>) {
        let i = idx as usize;
        if self.effective_hidden[i] {
            return;
        }
        let id = self.id_at(idx);

        ctx.save();
        ctx.transform(self.local_transform[i].to_affine());
        ctx.set_alpha(self.effective_alpha[i]);

        if self.kind[i].capabilities().paintable
            && let Some(behavior) = self.behaviors[i].as_mut()
        {
            let depth = ctx.depth();
            let floor = ctx.set_floor(depth);
            ctx.set_node(Some(id));
            behavior.paint(ctx);
            ctx.set_node(None);
            ctx.set_floor(floor);
            let leaked = ctx.unwind_to(depth);
            if leaked > 0 {
                warn!(node = ?id, leaked, "paint left unbalanced save levels");
            }
        }

        let children = self.children[i].clone();
        for child in children {
            self.paint_node(child, ctx);
        }
        ctx.restore();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use kurbo::{Affine, Rect, Size};

    use crate::behavior::Behavior;
    use crate::event::EventKind;
    use crate::frame::FrameTick;
    use crate::graphics::testing::{Call, CallLog, CountingGraphics};
    use crate::graphics::{PaintContext, Rgba8};
    use crate::host::HeadlessHost;
    use crate::scene::{LayerConfig, NodeId, Scene, StageConfig, test_scene};
    use crate::time::{Duration, HostTime};

    struct Swatch(Rgba8);

    impl Behavior for Swatch {
        fn paint(&mut self, ctx: &mut PaintContext<'_>) {
            ctx.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), self.0);
        }
    }

    fn tick(frame_index: u64) -> FrameTick {
        FrameTick {
            frame_index,
            now: HostTime(0),
            interval: Duration::per_frame(60),
        }
    }

    fn staged_layer(scene: &mut Scene, config: LayerConfig) -> (NodeId, CallLog) {
        let (g, log) = CountingGraphics::new();
        let layer = scene.create_layer(config, g);
        let stage = scene.stage();
        scene.add_child(stage, layer);
        (layer, log)
    }

    fn sprite(scene: &mut Scene, parent: NodeId, color: Rgba8) -> NodeId {
        let id = scene.create_sprite();
        scene.set_behavior(id, Swatch(color));
        scene.add_child(parent, id);
        id
    }

    fn fills(log: &CallLog) -> Vec<Rgba8> {
        log.borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Fill(color) => Some(*color),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn unchanged_layer_skips_second_redraw() {
        let mut scene = test_scene();
        let (layer, log) = staged_layer(&mut scene, LayerConfig::sized(100.0, 100.0));
        sprite(&mut scene, layer, Rgba8::BLACK);

        scene.run_frame(&tick(0));
        assert_eq!(fills(&log).len(), 1);
        log.borrow_mut().clear();

        scene.run_frame(&tick(1));
        assert!(log.borrow().is_empty(), "no clear or paint: {:?}", log.borrow());
        let surface = scene.layer_surface(layer).expect("layer");
        assert_eq!(surface.repaint_count(), 1);
    }

    #[test]
    fn always_redraw_layer_repaints_every_frame() {
        let mut scene = test_scene();
        let config = LayerConfig::sized(10.0, 10.0).always_redraw();
        let (layer, log) = staged_layer(&mut scene, config);
        sprite(&mut scene, layer, Rgba8::BLACK);

        scene.run_frame(&tick(0));
        scene.run_frame(&tick(1));
        assert_eq!(fills(&log).len(), 2);
    }

    #[test]
    fn paint_order_follows_child_order() {
        let red = Rgba8::rgb(255, 0, 0);
        let green = Rgba8::rgb(0, 255, 0);
        let blue = Rgba8::rgb(0, 0, 255);
        let mut scene = test_scene();
        let (layer, log) = staged_layer(&mut scene, LayerConfig::default());
        let r = sprite(&mut scene, layer, red);
        sprite(&mut scene, layer, green);
        sprite(&mut scene, layer, blue);

        scene.run_frame(&tick(0));
        assert_eq!(fills(&log), vec![red, green, blue]);

        log.borrow_mut().clear();
        scene.set_top(layer, r, None);
        scene.run_frame(&tick(1));
        assert_eq!(fills(&log), vec![green, blue, red]);
    }

    #[test]
    fn invisible_children_are_skipped_entirely() {
        let mut scene = test_scene();
        let (layer, log) = staged_layer(&mut scene, LayerConfig::default().always_redraw());
        let hidden = sprite(&mut scene, layer, Rgba8::BLACK);
        sprite(&mut scene, hidden, Rgba8::WHITE);
        scene.set_visible(hidden, false);

        scene.run_frame(&tick(0));
        let log = log.borrow();
        assert!(fills_in(&log).is_empty());
        let saves = log.iter().filter(|c| **c == Call::Save).count();
        assert_eq!(saves, 1, "only the layer level");
    }

    fn fills_in(log: &[Call]) -> Vec<&Call> {
        log.iter().filter(|c| matches!(c, Call::Fill(_))).collect()
    }

    #[test]
    fn layer_clears_scales_and_composites_alpha() {
        let host = HeadlessHost::new(Size::new(100.0, 100.0), 2.0);
        let mut scene = Scene::new(StageConfig::default(), host);
        let (layer, log) = staged_layer(&mut scene, LayerConfig::sized(50.0, 25.0));
        scene.set_alpha(layer, 0.5);
        let child = sprite(&mut scene, layer, Rgba8::BLACK);
        scene.set_position(child, 3.0, 4.0);
        scene.set_alpha(child, 0.5);
        log.borrow_mut().clear();

        scene.run_frame(&tick(0));
        assert_eq!(
            *log.borrow(),
            vec![
                Call::Clear(Rect::new(0.0, 0.0, 100.0, 50.0)),
                Call::Save,
                Call::Transform(Affine::scale(2.0)),
                Call::Alpha(0.5),
                Call::Save,
                Call::Transform(Affine::translate((3.0, 4.0))),
                Call::Alpha(0.25),
                Call::Fill(Rgba8::BLACK),
                Call::Restore,
                Call::Restore,
            ]
        );
    }

    #[test]
    fn no_clear_layer_keeps_previous_pixels() {
        let mut scene = test_scene();
        let config = LayerConfig {
            no_clear: true,
            ..LayerConfig::default()
        };
        let (layer, log) = staged_layer(&mut scene, config);
        sprite(&mut scene, layer, Rgba8::BLACK);
        scene.run_frame(&tick(0));
        assert!(!log.borrow().iter().any(|c| matches!(c, Call::Clear(_))));
    }

    #[test]
    fn leaked_save_levels_are_unwound_with_warning() {
        struct Leaky;
        impl Behavior for Leaky {
            fn paint(&mut self, ctx: &mut PaintContext<'_>) {
                ctx.save();
                ctx.save();
                ctx.restore();
                ctx.restore();
                ctx.restore();
                ctx.save();
            }
        }

        let mut scene = test_scene();
        let (layer, log) = staged_layer(&mut scene, LayerConfig::default());
        let leaky = scene.create_sprite();
        scene.set_behavior(leaky, Leaky);
        scene.add_child(layer, leaky);
        sprite(&mut scene, layer, Rgba8::WHITE);

        let logs = crate::test_support::capture_logs(|| scene.run_frame(&tick(0)));
        let warns = crate::test_support::at_level(&logs, tracing::Level::WARN);
        assert_eq!(warns.len(), 2, "one refused restore, one leak: {warns:?}");
        assert_eq!(warns[1].field("leaked"), Some("1"));

        let log = log.borrow();
        let saves = log.iter().filter(|c| **c == Call::Save).count();
        let restores = log.iter().filter(|c| **c == Call::Restore).count();
        assert_eq!(saves, restores, "balanced after unwinding");
    }

    #[test]
    fn off_stage_layers_are_not_painted() {
        let mut scene = test_scene();
        let (g, log) = CountingGraphics::new();
        let layer = scene.create_layer(LayerConfig::default(), g);
        sprite(&mut scene, layer, Rgba8::BLACK);
        log.borrow_mut().clear();

        scene.run_frame(&tick(0));
        assert!(log.borrow().is_empty());
        assert!(scene.is_dirty(layer), "debt carries over until attached");
    }

    #[test]
    fn mutation_repaints_on_next_frame() {
        let mut scene = test_scene();
        let (layer, log) = staged_layer(&mut scene, LayerConfig::default());
        let s = sprite(&mut scene, layer, Rgba8::BLACK);
        let repaints = Rc::new(RefCell::new(0_u32));
        let sink = repaints.clone();
        scene.on(layer, EventKind::Redraw, move |_| *sink.borrow_mut() += 1);

        scene.run_frame(&tick(0));
        scene.run_frame(&tick(1));
        scene.set_position(s, 1.0, 1.0);
        assert!(scene.is_dirty(layer));
        scene.run_frame(&tick(2));

        assert_eq!(*repaints.borrow(), 2);
        assert!(!scene.is_dirty(s));
        assert_eq!(fills(&log).len(), 2);
    }

    #[test]
    fn shown_cover_layer_paints() {
        let mut scene = test_scene();
        let cover = scene.create_cover();
        let (g, log) = CountingGraphics::new();
        let layer = scene.create_layer(LayerConfig::default(), g);
        scene.add_child(cover, layer);
        sprite(&mut scene, layer, Rgba8::WHITE);
        scene.add_cover(cover);

        scene.run_frame(&tick(0));
        assert!(fills(&log).is_empty(), "hidden cover");

        scene.show_cover(cover);
        scene.run_frame(&tick(1));
        assert_eq!(fills(&log), vec![Rgba8::WHITE]);
    }
}
