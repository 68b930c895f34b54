// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene-tree dumps.
//!
//! [`outline`] renders the stage subtree, then every registered cover, one
//! node per line:
//!
//! ```text
//! Stage#0
//!   Layer#1 "hud" 100x50 @2x
//!     Sprite#2 "ship" alpha=0.50 dirty
//! covers
//!   Cover#3 "menu" z=10 hidden
//! ```
//!
//! [`to_json`] produces the same tree as a `serde_json` [`Value`], adding
//! local transforms and computed properties. Computed values reflect the
//! last [`Scene::evaluate`].

use std::fmt::Write as _;

use proscenium_core::scene::{NodeId, Scene};
use serde_json::{Map, Value, json};

/// Renders the display tree as indented text.
#[must_use]
pub fn outline(scene: &Scene) -> String {
    let mut out = String::new();
    outline_node(scene, scene.stage(), 0, &mut out);
    let covers = scene.covers();
    if !covers.is_empty() {
        out.push_str("covers\n");
        for cover in covers {
            outline_node(scene, cover, 1, &mut out);
        }
    }
    out
}

fn outline_node(scene: &Scene, id: NodeId, depth: usize, out: &mut String) {
    let kind = scene.kind(id);
    let _ = write!(out, "{:indent$}{kind:?}#{}", "", id.index(), indent = depth * 2);
    let name = scene.name(id);
    if !name.is_empty() {
        let _ = write!(out, " {name:?}");
    }
    let class = scene.class_name(id);
    if class != kind.class_name() {
        let _ = write!(out, " class={class}");
    }
    if let Some(surface) = scene.layer_surface(id) {
        let size = surface.logical_size();
        let _ = write!(out, " {}x{}", size.width, size.height);
        if surface.pixel_ratio() != 1.0 {
            let _ = write!(out, " @{}x", surface.pixel_ratio());
        }
    }
    if let Some(z) = scene.cover_z_index(id) {
        let _ = write!(out, " z={z}");
    }
    if scene.alpha(id) != 1.0 {
        let _ = write!(out, " alpha={:.2}", scene.alpha(id));
    }
    if !scene.visible(id) {
        out.push_str(" hidden");
    }
    if kind.capabilities().interactive && !scene.interactive(id) {
        out.push_str(" inert");
    }
    if scene.is_dirty(id) {
        out.push_str(" dirty");
    }
    out.push('\n');
    for child in scene.children(id) {
        outline_node(scene, child, depth + 1, out);
    }
}

/// Serializes the display tree, with covers, as JSON.
#[must_use]
pub fn to_json(scene: &Scene) -> Value {
    let covers: Vec<Value> = scene
        .covers()
        .into_iter()
        .map(|cover| node_json(scene, cover))
        .collect();
    json!({
        "fps": scene.fps(),
        "node_count": scene.node_count(),
        "frames": scene.frames_produced(),
        "stage": node_json(scene, scene.stage()),
        "covers": covers,
    })
}

fn node_json(scene: &Scene, id: NodeId) -> Value {
    let t = scene.transform(id);
    let mut node = Map::new();
    node.insert("id".into(), json!(id.index()));
    node.insert("generation".into(), json!(id.generation()));
    node.insert("kind".into(), json!(format!("{:?}", scene.kind(id))));
    node.insert("name".into(), json!(scene.name(id)));
    node.insert("class".into(), json!(scene.class_name(id)));
    node.insert(
        "transform".into(),
        json!({
            "x": t.x,
            "y": t.y,
            "scale_x": t.scale_x,
            "scale_y": t.scale_y,
            "rotation": t.rotation,
        }),
    );
    node.insert("alpha".into(), json!(scene.alpha(id)));
    node.insert("visible".into(), json!(scene.visible(id)));
    node.insert("interactive".into(), json!(scene.interactive(id)));
    node.insert("effective_alpha".into(), json!(scene.effective_alpha(id)));
    node.insert("effective_hidden".into(), json!(scene.effective_hidden(id)));
    node.insert("dirty".into(), json!(scene.is_dirty(id)));
    if let Some(surface) = scene.layer_surface(id) {
        let config = surface.config();
        let (w, h) = surface.physical_size();
        node.insert(
            "surface".into(),
            json!({
                "width": config.width,
                "height": config.height,
                "pixel_width": w,
                "pixel_height": h,
                "pixel_ratio": surface.pixel_ratio(),
                "retina": config.retina,
                "no_clear": config.no_clear,
                "redraw_as_needed": config.redraw_as_needed,
                "repaints": surface.repaint_count(),
            }),
        );
    }
    if let Some(z) = scene.cover_z_index(id) {
        node.insert("z".into(), json!(z));
    }
    let children: Vec<Value> = scene.children(id).map(|c| node_json(scene, c)).collect();
    if !children.is_empty() {
        node.insert("children".into(), Value::Array(children));
    }
    Value::Object(node)
}
