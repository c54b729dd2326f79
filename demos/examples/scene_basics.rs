// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene basics.
//!
//! Build a small tree, move and tint nodes, read global state, and render it
//! through a context that just prints what it is asked to draw.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p arbor_demos --example scene_basics`

use arbor_geom::transform_rect_bbox;
use arbor_scene::{BlendMode, RenderContext, RenderFrame, Scene, Solid};
use kurbo::{Point, Rect};

struct PrintContext;

impl RenderContext for PrintContext {
    fn fill_rect(&mut self, frame: &RenderFrame, rect: Rect, color: u32) {
        let global = transform_rect_bbox(frame.transform, rect);
        println!(
            "fill {:?} at {global:?} color={color:#010x} blend={:?}",
            frame.node, frame.blend_mode
        );
    }
}

fn main() {
    env_logger::init();

    let mut scene = Scene::new();
    let stage = scene.stage();

    let panel = scene.create_group();
    scene.set_name(panel, Some("panel"));
    scene.add_child(stage, panel);
    scene.set_position(panel, Point::new(100.0, 50.0));
    scene.set_alpha(panel, 0.5);
    scene.set_blend_mode(panel, BlendMode::Add);

    let icon = scene.create_node(Solid::new((16.0, 16.0), 0xFF80_40FF));
    scene.set_name(icon, Some("icon"));
    scene.add_child(panel, icon);
    scene.set_scale(icon, 2.0);
    scene.set_rotation_degrees(icon, 30.0);

    if let Some(d) = scene.display(icon) {
        println!("{d}");
    }
    println!("global matrix: {:?}", scene.global_matrix(icon));
    println!("global bounds: {:?}", scene.global_bounds(icon));
    println!("global alpha:  {}", scene.global_alpha(icon));

    let found = scene.find_by_name(stage, "icon");
    assert_eq!(found, Some(icon), "lookup by name should find the icon");

    scene.render_tree(stage, &mut PrintContext);

    // Repeated reads are served from the cache.
    for _ in 0..3 {
        let _ = scene.global_matrix_inverse(icon);
    }
    println!("cache stats: {:?}", scene.cache_stats(icon));

    scene.remove_node(panel);
    assert!(!scene.is_alive(icon), "removing a node destroys its subtree");
}
