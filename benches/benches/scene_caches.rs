// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use arbor_geom::{TransformParts, interpolate};
use arbor_scene::{Component, HitTestKind, NodeId, Scene, Solid, UpdateCx};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Affine, Point};

/// A single chain `stage -> n0 -> n1 -> ...`, each node nudged and scaled a little.
fn build_chain(depth: usize) -> (Scene, Vec<NodeId>) {
    let mut scene = Scene::new();
    let mut parent = scene.stage();
    let mut ids = Vec::with_capacity(depth);
    for i in 0..depth {
        let n = scene.create_node(Solid::new((4.0, 4.0), 0xFFFF_FFFF));
        scene.add_child(parent, n);
        scene.set_position(n, Point::new(1.0, 0.5));
        scene.set_rotation(n, 0.01 * i as f64);
        ids.push(n);
        parent = n;
    }
    (scene, ids)
}

/// `rows * cols` solids laid out on a grid under the stage.
fn build_grid(rows: usize, cols: usize) -> Scene {
    let mut scene = Scene::new();
    let stage = scene.stage();
    for y in 0..rows {
        for x in 0..cols {
            let n = scene.create_node(Solid::new((8.0, 8.0), 0xFFFF_FFFF));
            scene.add_child(stage, n);
            scene.set_position(n, Point::new(x as f64 * 10.0, y as f64 * 10.0));
        }
    }
    scene
}

fn bench_global(c: &mut Criterion) {
    let mut group = c.benchmark_group("global");
    for &depth in &[8usize, 64, 256] {
        let (scene, ids) = build_chain(depth);
        let Some(&leaf) = ids.last() else {
            continue;
        };
        // Warm the caches once so the loop below measures cached reads.
        black_box(scene.global_matrix_inverse(leaf));
        group.bench_function(format!("cached_leaf_read_d{depth}"), |b| {
            b.iter(|| black_box(scene.global_matrix(leaf)));
        });
        group.bench_function(format!("cached_inverse_read_d{depth}"), |b| {
            b.iter(|| black_box(scene.global_matrix_inverse(leaf)));
        });

        group.throughput(Throughput::Elements(depth as u64));
        group.bench_function(format!("root_move_then_leaf_read_d{depth}"), |b| {
            b.iter_batched(
                || build_chain(depth),
                |(mut scene, ids)| {
                    scene.set_x(ids[0], 3.0);
                    black_box(scene.global_matrix_inverse(ids[depth - 1]));
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_invalidation(c: &mut Criterion) {
    let mut group = c.benchmark_group("invalidation");
    for &depth in &[64usize, 256] {
        let (mut scene, ids) = build_chain(depth);
        let leaf = ids[depth - 1];
        let mut x = 0.0;
        group.bench_function(format!("tint_only_d{depth}"), |b| {
            b.iter(|| {
                x += 1.0;
                scene.set_alpha(ids[0], (x % 10.0) / 10.0);
                black_box(scene.global_matrix_inverse(leaf));
            });
        });
        group.bench_function(format!("repeated_writes_d{depth}"), |b| {
            b.iter(|| {
                for _ in 0..8 {
                    x += 1.0;
                    scene.set_y(ids[0], x);
                }
                black_box(scene.global_matrix(leaf));
            });
        });
    }
    group.finish();
}

fn bench_decomposition(c: &mut Criterion) {
    let mut group = c.benchmark_group("decomposition");
    let from = Affine::IDENTITY;
    let to = Affine::rotate(1.2).then_scale(3.0);
    group.bench_function("interpolate_and_decompose", |b| {
        let mut ratio = 0.0;
        b.iter(|| {
            ratio = (ratio + 0.01) % 1.0;
            black_box(TransformParts::from_affine(interpolate(ratio, from, to)));
        });
    });
    group.finish();
}

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_test");
    for &n in &[16usize, 64] {
        let scene = build_grid(n, n);
        let stage = scene.stage();
        group.throughput(Throughput::Elements((n * n) as u64));
        for kind in [HitTestKind::Bounding, HitTestKind::Shape] {
            group.bench_function(format!("pick_{kind:?}_n{n}"), |b| {
                let mut i = 0_usize;
                b.iter(|| {
                    i = (i + 7) % (n * n);
                    let pt = Point::new((i % n) as f64 * 10.0 + 3.0, (i / n) as f64 * 10.0 + 3.0);
                    black_box(scene.pick(stage, pt, kind));
                });
            });
        }
    }
    group.finish();
}

struct Spin;

impl Component for Spin {
    fn update(&mut self, cx: &mut UpdateCx<'_>, dt_ms: i32) {
        let node = cx.node();
        let scene = cx.scene();
        let r = scene.rotation(node);
        scene.set_rotation(node, r + f64::from(dt_ms) * 0.001);
    }
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");
    for &n in &[16usize, 64] {
        let mut scene = build_grid(n, n);
        let stage = scene.stage();
        let nodes: Vec<NodeId> = scene.children(stage).to_vec();
        for &node in &nodes {
            let _ = scene.add_component(node, Spin);
        }
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("update_tree_n{n}"), |b| {
            b.iter(|| scene.update_tree(stage, 16));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_global,
    bench_invalidation,
    bench_decomposition,
    bench_hit_test,
    bench_update,
);
criterion_main!(benches);
