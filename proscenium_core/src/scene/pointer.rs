// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer routing.
//!
//! The stage records the pointer position, then walks the tree top-most
//! first: at every container, children are visited from the last index to
//! the first, and each subtree is routed before the container itself. Every
//! visible interactive node is offered the event with the point mapped into
//! its local space; the node's [`Behavior::pointer`] hook sees every offer,
//! while listeners only fire on a hit.
//!
//! Discrete events (click, press, release, context menu) descend the full
//! depth. Move events carry a budget: a node reached with budget `b` forwards
//! to its children with `b - 1`, and stops forwarding at zero. Each layer
//! starts a fresh budget, so nested containers beneath it need explicit
//! handling past the configured depth.
//!
//! While a cover is visible it is modal: it receives events in place of the
//! stage's children.
//!
//! [`Behavior::pointer`]: crate::behavior::Behavior::pointer

use kurbo::Point;

use super::id::{NodeKind, STAGE};
use super::stage::DispatchPolicy;
use super::store::Scene;
use crate::behavior::{PointerEvent, Propagation};
use crate::event::{EventKind, EventPayload, PointerButton};
use crate::host::PointerAction;

/// State of one routed event.
#[derive(Debug)]
struct Dispatch {
    kind: EventKind,
    stage: Point,
    button: Option<PointerButton>,
    policy: DispatchPolicy,
    /// Slots that reported a hit, with the local point they saw.
    hits: Vec<(u32, Point)>,
    stopped: bool,
}

impl PointerAction {
    const fn event_kind(self) -> EventKind {
        match self {
            Self::Click => EventKind::Click,
            Self::DoubleClick => EventKind::DoubleClick,
            Self::ContextMenu => EventKind::ContextMenu,
            Self::Down => EventKind::MouseDown,
            Self::Up => EventKind::MouseUp,
        }
    }
}

impl Scene {
    /// Routes a move, then emits hover transitions: `MouseOut` on nodes no
    /// longer hit, then `MouseOver` on newly hit ones.
    pub(crate) fn pointer_move(&mut self, point: Point) {
        self.stage.pointer = Some(point);
        let budget = Some(self.stage.config.move_budget);
        let hits = self.route(EventKind::MouseMove, point, None, budget);

        let previous = core::mem::take(&mut self.stage.hovered);
        for &idx in &previous {
            if self.alive[idx as usize] && !hits.iter().any(|&(h, _)| h == idx) {
                self.notify_pointer_at(idx, EventKind::MouseOut, point);
            }
        }
        for &(idx, local) in &hits {
            if !previous.contains(&idx) {
                self.notify(idx, EventKind::MouseOver, pointer_payload(local, point, None));
            }
        }
        self.stage.hovered = hits.into_iter().map(|(idx, _)| idx).collect();
    }

    /// Routes a discrete button event through the full depth of the tree.
    pub(crate) fn pointer_button(
        &mut self,
        action: PointerAction,
        point: Point,
        button: PointerButton,
    ) {
        self.stage.pointer = Some(point);
        self.route(action.event_kind(), point, Some(button), None);
    }

    /// The pointer left the surface: every hovered node gets `MouseOut`.
    pub(crate) fn pointer_leave(&mut self) {
        let last = self.stage.pointer.take();
        let hovered = core::mem::take(&mut self.stage.hovered);
        for idx in hovered {
            let point = last.unwrap_or(Point::ZERO);
            self.notify_pointer_at(idx, EventKind::MouseOut, point);
        }
    }

    /// Walks the tree and returns the hits, top-most first.
    fn route(
        &mut self,
        kind: EventKind,
        point: Point,
        button: Option<PointerButton>,
        budget: Option<u32>,
    ) -> Vec<(u32, Point)> {
        let mut d = Dispatch {
            kind,
            stage: point,
            button,
            policy: self.stage.config.dispatch,
            hits: Vec::new(),
            stopped: false,
        };
        let local = self.local_transform[STAGE as usize].to_local(point);
        let roots = match self.visible_cover_slot() {
            Some(cover) => vec![cover],
            None => self.children[STAGE as usize].iter().rev().copied().collect(),
        };
        for root in roots {
            if d.stopped {
                break;
            }
            self.route_node(root, local, budget, &mut d);
        }
        if !d.stopped {
            self.offer(STAGE, local, &mut d);
        }
        d.hits
    }

    fn route_node(
        &mut self,
        idx: u32,
        parent_point: Point,
        budget: Option<u32>,
        d: &mut Dispatch,
    ) {
        let i = idx as usize;
        if d.stopped || !self.visible[i] {
            return;
        }
        let local = self.local_transform[i].to_local(parent_point);
        let budget = if self.kind[i] == NodeKind::Layer {
            budget.map(|_| self.stage.config.move_budget)
        } else {
            budget
        };

        if budget != Some(0) {
            let child_budget = budget.map(|b| b - 1);
            let children: Vec<u32> = self.children[i].iter().rev().copied().collect();
            for child in children {
                if d.stopped {
                    break;
                }
                self.route_node(child, local, child_budget, d);
            }
        }
        if !d.stopped && self.interactive[i] {
            self.offer(idx, local, d);
        }
    }

    /// Offers the event to one node.
    fn offer(&mut self, idx: u32, local: Point, d: &mut Dispatch) {
        let i = idx as usize;
        let target = self.id_at(idx);
        // The stage is the host surface; everything that reaches it hits.
        let hit = idx == STAGE
            || self.behaviors[i].as_ref().is_some_and(|b| b.hit_test(local))
            || self.hit_region[i].as_ref().is_some_and(|r| r.contains(local));

        let event = PointerEvent {
            kind: d.kind,
            target,
            local,
            stage: d.stage,
            button: d.button,
            hit,
        };
        let propagation = self.behaviors[i]
            .as_mut()
            .map_or(Propagation::Continue, |b| b.pointer(&event));

        if hit {
            d.hits.push((idx, local));
            self.notify(idx, d.kind, pointer_payload(local, d.stage, d.button));
            if d.policy == DispatchPolicy::StopOnFirstHit {
                d.stopped = true;
            }
        }
        if propagation == Propagation::Stop {
            d.stopped = true;
        }
    }

    fn notify_pointer_at(&mut self, idx: u32, kind: EventKind, stage: Point) {
        let local = self.global_to_local(self.id_at(idx), stage);
        self.notify(idx, kind, pointer_payload(local, stage, None));
    }
}

fn pointer_payload(local: Point, stage: Point, button: Option<PointerButton>) -> EventPayload {
    EventPayload::Pointer {
        local,
        stage,
        button,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use kurbo::{Point, Rect};

    use super::*;
    use crate::behavior::{Behavior, PointerEvent};
    use crate::event::Event;
    use crate::graphics::testing::CountingGraphics;
    use crate::host::HostEvent;
    use crate::scene::{LayerConfig, NodeId, test_scene};

    type Seen = Rc<RefCell<Vec<(NodeId, EventKind, Option<Point>)>>>;

    fn listen(scene: &mut Scene, id: NodeId, kinds: &[EventKind], seen: &Seen) {
        for &kind in kinds {
            let sink = seen.clone();
            scene.on(id, kind, move |e: &Event| {
                sink.borrow_mut().push((e.target, e.kind, e.local_point()));
            });
        }
    }

    fn boxed(scene: &mut Scene, parent: NodeId, rect: Rect) -> NodeId {
        let id = scene.create_sprite();
        scene.set_hit_region(id, Some(rect.into()));
        scene.add_child(parent, id);
        id
    }

    fn click(at: Point) -> HostEvent {
        HostEvent::PointerButton {
            action: PointerAction::Click,
            position: at,
            button: PointerButton::Primary,
        }
    }

    /// Records every offer a node's behavior sees.
    struct Probe(Rc<RefCell<Vec<(EventKind, bool)>>>);

    impl Behavior for Probe {
        fn pointer(&mut self, event: &PointerEvent) -> Propagation {
            self.0.borrow_mut().push((event.kind, event.hit));
            Propagation::Continue
        }
    }

    #[test]
    fn move_reaches_occupying_child_in_local_space() {
        let mut scene = test_scene();
        let stage = scene.stage();
        let (g, _log) = CountingGraphics::new();
        let layer = scene.create_layer(LayerConfig::default(), g);
        scene.add_child(stage, layer);
        scene.set_position(layer, 20.0, 10.0);

        let child = boxed(&mut scene, layer, Rect::new(0.0, 0.0, 100.0, 100.0));
        let sibling = boxed(&mut scene, layer, Rect::new(0.0, 0.0, 10.0, 10.0));
        scene.set_position(sibling, 200.0, 200.0);
        let offers = Rc::new(RefCell::new(Vec::new()));
        scene.set_behavior(sibling, Probe(offers.clone()));

        let seen = Seen::default();
        listen(&mut scene, child, &[EventKind::MouseMove], &seen);
        listen(&mut scene, sibling, &[EventKind::MouseMove], &seen);

        scene.handle(HostEvent::PointerMove(Point::new(50.0, 50.0)));

        assert_eq!(
            *seen.borrow(),
            vec![(child, EventKind::MouseMove, Some(Point::new(30.0, 40.0)))]
        );
        assert_eq!(
            *offers.borrow(),
            vec![(EventKind::MouseMove, false)],
            "sibling is offered the event but reports no hit"
        );
        assert_eq!(scene.pointer_position(), Some(Point::new(50.0, 50.0)));
    }

    #[test]
    fn fan_out_is_top_most_first() {
        let mut scene = test_scene();
        let stage = scene.stage();
        let full = Rect::new(0.0, 0.0, 50.0, 50.0);
        let bottom = boxed(&mut scene, stage, full);
        let top = boxed(&mut scene, stage, full);
        let seen = Seen::default();
        listen(&mut scene, bottom, &[EventKind::Click], &seen);
        listen(&mut scene, top, &[EventKind::Click], &seen);
        listen(&mut scene, stage, &[EventKind::Click], &seen);

        scene.handle(click(Point::new(5.0, 5.0)));
        let order: Vec<_> = seen.borrow().iter().map(|(id, ..)| *id).collect();
        assert_eq!(order, vec![top, bottom, stage], "broadcast reaches every hit");
    }

    #[test]
    fn stop_on_first_hit_policy() {
        let mut scene = test_scene();
        scene.set_dispatch_policy(DispatchPolicy::StopOnFirstHit);
        let stage = scene.stage();
        let full = Rect::new(0.0, 0.0, 50.0, 50.0);
        let bottom = boxed(&mut scene, stage, full);
        let top = boxed(&mut scene, stage, full);
        let seen = Seen::default();
        listen(&mut scene, bottom, &[EventKind::Click], &seen);
        listen(&mut scene, top, &[EventKind::Click], &seen);

        scene.handle(click(Point::new(5.0, 5.0)));
        let order: Vec<_> = seen.borrow().iter().map(|(id, ..)| *id).collect();
        assert_eq!(order, vec![top]);
    }

    #[test]
    fn behavior_can_stop_propagation() {
        struct Consume;
        impl Behavior for Consume {
            fn hit_test(&self, local: Point) -> bool {
                local.x < 10.0
            }
            fn pointer(&mut self, event: &PointerEvent) -> Propagation {
                if event.hit {
                    Propagation::Stop
                } else {
                    Propagation::Continue
                }
            }
        }

        let mut scene = test_scene();
        let stage = scene.stage();
        let below = boxed(&mut scene, stage, Rect::new(0.0, 0.0, 50.0, 50.0));
        let above = scene.create_sprite();
        scene.set_behavior(above, Consume);
        scene.add_child(stage, above);
        let seen = Seen::default();
        listen(&mut scene, below, &[EventKind::MouseDown], &seen);
        listen(&mut scene, above, &[EventKind::MouseDown], &seen);

        scene.handle(HostEvent::PointerButton {
            action: PointerAction::Down,
            position: Point::new(5.0, 5.0),
            button: PointerButton::Primary,
        });
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].0, above);

        scene.handle(HostEvent::PointerButton {
            action: PointerAction::Down,
            position: Point::new(20.0, 5.0),
            button: PointerButton::Primary,
        });
        assert_eq!(seen.borrow().last().map(|s| s.0), Some(below));
    }

    #[test]
    fn move_budget_limits_depth_but_clicks_do_not() {
        let mut scene = test_scene();
        let stage = scene.stage();
        let (g, _log) = CountingGraphics::new();
        let layer = scene.create_layer(LayerConfig::default(), g);
        scene.add_child(stage, layer);
        let area = Rect::new(0.0, 0.0, 100.0, 100.0);
        let level1 = boxed(&mut scene, layer, area);
        let level2 = boxed(&mut scene, level1, area);
        let level3 = boxed(&mut scene, level2, area);
        let seen = Seen::default();
        for id in [level1, level2, level3] {
            listen(&mut scene, id, &[EventKind::MouseMove, EventKind::Click], &seen);
        }

        scene.handle(HostEvent::PointerMove(Point::new(1.0, 1.0)));
        let moved: Vec<_> = seen.borrow().iter().map(|(id, ..)| *id).collect();
        assert_eq!(moved, vec![level2, level1], "level 3 is past the budget");

        seen.borrow_mut().clear();
        scene.handle(click(Point::new(1.0, 1.0)));
        let clicked: Vec<_> = seen.borrow().iter().map(|(id, ..)| *id).collect();
        assert_eq!(clicked, vec![level3, level2, level1]);
    }

    #[test]
    fn hidden_and_non_interactive_nodes_are_skipped() {
        let mut scene = test_scene();
        let stage = scene.stage();
        let area = Rect::new(0.0, 0.0, 100.0, 100.0);
        let hidden = boxed(&mut scene, stage, area);
        scene.set_visible(hidden, false);
        let group = scene.create_container();
        scene.add_child(stage, group);
        let inside = boxed(&mut scene, group, area);
        let seen = Seen::default();
        listen(&mut scene, hidden, &[EventKind::Click], &seen);
        listen(&mut scene, inside, &[EventKind::Click], &seen);

        scene.handle(click(Point::new(1.0, 1.0)));
        let hits: Vec<_> = seen.borrow().iter().map(|(id, ..)| *id).collect();
        assert_eq!(hits, vec![inside], "plain containers forward to children");
    }

    #[test]
    fn hover_emits_over_and_out() {
        let mut scene = test_scene();
        let stage = scene.stage();
        let target = boxed(&mut scene, stage, Rect::new(0.0, 0.0, 10.0, 10.0));
        let seen = Seen::default();
        listen(
            &mut scene,
            target,
            &[EventKind::MouseOver, EventKind::MouseOut],
            &seen,
        );

        scene.handle(HostEvent::PointerMove(Point::new(5.0, 5.0)));
        scene.handle(HostEvent::PointerMove(Point::new(6.0, 6.0)));
        scene.handle(HostEvent::PointerMove(Point::new(50.0, 50.0)));
        scene.handle(HostEvent::PointerMove(Point::new(1.0, 1.0)));
        scene.handle(HostEvent::PointerLeave);

        let kinds: Vec<_> = seen.borrow().iter().map(|(_, k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::MouseOver,
                EventKind::MouseOut,
                EventKind::MouseOver,
                EventKind::MouseOut,
            ]
        );
        assert_eq!(scene.pointer_position(), None);
    }

    #[test]
    fn visible_cover_is_modal() {
        let mut scene = test_scene();
        let stage = scene.stage();
        let area = Rect::new(0.0, 0.0, 100.0, 100.0);
        let content = boxed(&mut scene, stage, area);
        let cover = scene.create_cover();
        scene.set_hit_region(cover, Some(area.into()));
        scene.add_cover(cover);
        let seen = Seen::default();
        listen(&mut scene, content, &[EventKind::Click], &seen);
        listen(&mut scene, cover, &[EventKind::Click], &seen);

        scene.handle(click(Point::new(1.0, 1.0)));
        scene.show_cover(cover);
        scene.handle(click(Point::new(1.0, 1.0)));

        let hits: Vec<_> = seen.borrow().iter().map(|(id, ..)| *id).collect();
        assert_eq!(hits, vec![content, cover]);
    }

    #[test]
    fn button_is_carried_on_discrete_events() {
        let mut scene = test_scene();
        let stage = scene.stage();
        let target = boxed(&mut scene, stage, Rect::new(0.0, 0.0, 10.0, 10.0));
        let buttons = Rc::new(RefCell::new(Vec::new()));
        let sink = buttons.clone();
        scene.on(target, EventKind::ContextMenu, move |e: &Event| {
            if let EventPayload::Pointer { button, .. } = e.payload {
                sink.borrow_mut().push(button);
            }
        });
        scene.handle(HostEvent::PointerButton {
            action: PointerAction::ContextMenu,
            position: Point::new(1.0, 1.0),
            button: PointerButton::Secondary,
        });
        assert_eq!(*buttons.borrow(), vec![Some(PointerButton::Secondary)]);
    }
}
