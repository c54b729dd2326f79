// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing.
//!
//! Compares bounding and shape hit tests on a rotated square and shows how
//! `pick` walks a subtree front to back.
//!
//! Run:
//! - `cargo run -p arbor_demos --example hit_testing`

use arbor_scene::{HitTestKind, Scene, Solid};
use kurbo::Point;

fn main() {
    env_logger::init();

    let mut scene = Scene::new();
    let stage = scene.stage();

    let card = scene.create_node(Solid::new((40.0, 40.0), 0xFFFF_FFFF));
    scene.add_child(stage, card);
    scene.set_position(card, Point::new(50.0, 50.0));
    scene.set_rotation_degrees(card, 45.0);

    let badge = scene.create_node(Solid::new((10.0, 10.0), 0xFF00_00FF));
    scene.add_child(card, badge);

    // Inside the card's axis-aligned bounds but outside the rotated square.
    let corner = Point::new(70.0, 55.0);
    println!("bounding: {:?}", scene.hit_test(card, corner, HitTestKind::Bounding));
    println!("shape:    {:?}", scene.hit_test(card, corner, HitTestKind::Shape));

    let on_badge = scene.local_to_global(badge, Point::new(5.0, 5.0));
    let picked = scene.pick(stage, on_badge, HitTestKind::Shape);
    println!("pick at {on_badge:?}: {picked:?}");
    assert_eq!(picked, Some(badge), "the badge sits in front of the card");

    scene.set_mouse_enabled(badge, false);
    let picked = scene.pick(stage, on_badge, HitTestKind::Shape);
    println!("pick with the badge disabled: {picked:?}");
    assert_eq!(picked, Some(card), "disabled nodes are skipped");

    scene.set_pointer(on_badge);
    println!("pointer in card space: {:?}", scene.local_mouse(card));
}
