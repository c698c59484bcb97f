use criterion::{black_box, criterion_group, criterion_main, Criterion};

use aabbtree::geometry::{Aabb, RayCastInput, Vec2};
use aabbtree::{BroadPhase, DynamicTree};
use rand::prelude::*;

fn random_box(rng: &mut ThreadRng, world: f32, half: f32) -> Aabb {
    let x = rng.gen_range(-world..world);
    let y = rng.gen_range(-world..world);
    Aabb::from_min_max(x - half, y - half, x + half, y + half)
}

fn create_destroy_benchmark(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let mut tree = DynamicTree::<u32>::new();
    for value in 0..1000 {
        tree.create_proxy(random_box(&mut rng, 100.0, 0.5), value)
            .unwrap();
    }

    c.bench_function("tree_create_destroy", |b| {
        b.iter(|| {
            let id = tree
                .create_proxy(black_box(random_box(&mut rng, 100.0, 0.5)), 0)
                .unwrap();
            tree.destroy_proxy(id);
        })
    });
}

fn move_absorbed_benchmark(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let mut tree = DynamicTree::<u32>::new();
    let mut ids = Vec::new();
    for value in 0..1000 {
        ids.push(
            tree.create_proxy(random_box(&mut rng, 100.0, 0.5), value)
                .unwrap(),
        );
    }

    c.bench_function("tree_move_absorbed", |b| {
        b.iter(|| {
            let id = ids[rng.gen_range(0..ids.len())];
            // A wiggle inside the fat margin: the tree stays untouched.
            let fat = tree.fat_aabb(id);
            let aabb = Aabb::from_min_max(
                fat.lower.x + 0.11,
                fat.lower.y + 0.11,
                fat.upper.x - 0.11,
                fat.upper.y - 0.11,
            );
            tree.move_proxy(black_box(id), aabb, Vec2::ZERO).unwrap();
        })
    });
}

fn move_teleport_benchmark(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let mut tree = DynamicTree::<u32>::new();
    let mut ids = Vec::new();
    for value in 0..1000 {
        ids.push(
            tree.create_proxy(random_box(&mut rng, 100.0, 0.5), value)
                .unwrap(),
        );
    }

    c.bench_function("tree_move_teleport", |b| {
        b.iter(|| {
            let id = ids[rng.gen_range(0..ids.len())];
            let aabb = random_box(&mut rng, 100.0, 0.5);
            tree.move_proxy(black_box(id), aabb, Vec2::ZERO).unwrap();
        })
    });
}

fn query_benchmark(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let mut tree = DynamicTree::<u32>::new();
    for value in 0..1000 {
        tree.create_proxy(random_box(&mut rng, 100.0, 0.5), value)
            .unwrap();
    }

    c.bench_function("tree_query", |b| {
        b.iter(|| {
            let region = random_box(&mut rng, 90.0, 10.0);
            let mut hits = 0u32;
            tree.query_with(
                |_| {
                    hits += 1;
                    true
                },
                black_box(region),
            );
            hits
        })
    });
}

fn ray_cast_benchmark(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let mut tree = DynamicTree::<u32>::new();
    for value in 0..1000 {
        tree.create_proxy(random_box(&mut rng, 100.0, 0.5), value)
            .unwrap();
    }

    c.bench_function("tree_ray_cast", |b| {
        b.iter(|| {
            let input = RayCastInput {
                p1: Vec2::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)),
                p2: Vec2::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)),
                max_fraction: 1.0,
            };
            if (input.p2 - input.p1).length_squared() == 0.0 {
                return;
            }
            tree.ray_cast_with(
                |sub_input: &RayCastInput, proxy_id| {
                    match tree.fat_aabb(proxy_id).ray_cast(sub_input) {
                        Some(output) => output.fraction,
                        None => -1.0,
                    }
                },
                black_box(&input),
            );
        })
    });
}

fn update_pairs_benchmark(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let mut broad_phase = BroadPhase::<u32>::new();
    let mut ids = Vec::new();
    for value in 0..1000 {
        ids.push(
            broad_phase
                .create_proxy(random_box(&mut rng, 100.0, 0.5), value)
                .unwrap(),
        );
    }
    broad_phase.update_pairs_with(|_: &u32, _: &u32| {});

    c.bench_function("broad_phase_update_pairs", |b| {
        b.iter(|| {
            for _ in 0..50 {
                let id = ids[rng.gen_range(0..ids.len())];
                let aabb = random_box(&mut rng, 100.0, 0.5);
                broad_phase.move_proxy(id, aabb, Vec2::ZERO).unwrap();
            }
            let mut pairs = 0u32;
            broad_phase.update_pairs_with(|_: &u32, _: &u32| pairs += 1);
            black_box(pairs)
        })
    });
}

criterion_group!(
    benches,
    create_destroy_benchmark,
    move_absorbed_benchmark,
    move_teleport_benchmark,
    query_benchmark,
    ray_cast_benchmark,
    update_pairs_benchmark
);
criterion_main!(benches);
