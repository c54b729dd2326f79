// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Update loop.
//!
//! Attaches components to nodes and drives the scene with the frame pump while
//! a scripted task waits on simulated time.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p arbor_demos --example update_loop`

use core::cell::RefCell;

use arbor_pump::{FrameClock, PumpConfig, StdSleep, UpdateLoop};
use arbor_scene::{Component, Scene, Solid, UpdateCx};
use kurbo::Point;

/// Moves its node right at a fixed speed and detaches after a distance.
struct Slide {
    speed_px_per_s: f64,
    until_x: f64,
}

impl Component for Slide {
    fn update(&mut self, cx: &mut UpdateCx<'_>, dt_ms: i32) {
        let node = cx.node();
        let scene = cx.scene();
        let x = scene.x(node) + self.speed_px_per_s * f64::from(dt_ms) / 1000.0;
        scene.set_x(node, x.min(self.until_x));
        if x >= self.until_x {
            log::info!("slide finished on {node:?}");
            cx.remove_self();
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut scene = Scene::new();
    let stage = scene.stage();

    let box_node = scene.create_node(Solid::new((10.0, 10.0), 0xFFFF_FFFF));
    scene.add_child(stage, box_node);
    scene
        .add_component(
            box_node,
            Slide {
                speed_px_per_s: 200.0,
                until_x: 100.0,
            },
        )
        .expect("stage child is alive");

    let fast = scene.create_node(Solid::new((10.0, 10.0), 0xFFFF_FFFF));
    scene.add_child(stage, fast);
    scene.set_speed(fast, 2.0);
    scene.set_position(fast, Point::new(0.0, 20.0));
    scene
        .add_component(
            fast,
            Slide {
                speed_px_per_s: 200.0,
                until_x: 100.0,
            },
        )
        .expect("stage child is alive");

    let scene = RefCell::new(scene);
    let mut clock = FrameClock::new();
    let wait = clock.delay(300);

    let mut pump = UpdateLoop::new(PumpConfig::fixed_60hz(), StdSleep);
    let out = pump.run_until(&scene, &mut clock, async {
        wait.await;
        let scene = scene.borrow();
        (scene.position(box_node), scene.position(fast))
    });

    println!("after {} ticks ({} ms): {out:?}", pump.ticks(), clock.now_ms());
}
