//! Benchmarks for collision detection strategies.
//!
//! Run with: cargo bench -p keydrop-sensors

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use keydrop_core::geometry::Rect;
use keydrop_sensors::collision::{
    CollisionArgs, CollisionDetection, DroppableEntry, DroppableId, closest_center,
    closest_corners, pointer_within, rect_intersection, with_fallback,
};
use std::hint::black_box;

/// A grid of `n` 40x20 droppables with 10px gutters.
fn grid(n: u64) -> Vec<DroppableEntry> {
    (0..n)
        .map(|i| {
            let col = (i % 20) as f64;
            let row = (i / 20) as f64;
            DroppableEntry::new(
                DroppableId(i),
                Some(Rect::new(col * 50.0, row * 30.0, 40.0, 20.0)),
            )
        })
        .collect()
}

// ============================================================================
// Single strategies
// ============================================================================

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision/strategy");
    let active = Rect::new(215.0, 95.0, 40.0, 20.0);

    for n in [10u64, 100, 1000] {
        let droppables = grid(n);
        let args = CollisionArgs::new(active, &droppables).with_pointer(active.origin());

        group.bench_with_input(BenchmarkId::new("rect_intersection", n), &args, |b, args| {
            b.iter(|| black_box(rect_intersection(black_box(args))))
        });
        group.bench_with_input(BenchmarkId::new("closest_center", n), &args, |b, args| {
            b.iter(|| black_box(closest_center(black_box(args))))
        });
        group.bench_with_input(BenchmarkId::new("closest_corners", n), &args, |b, args| {
            b.iter(|| black_box(closest_corners(black_box(args))))
        });
        group.bench_with_input(BenchmarkId::new("pointer_within", n), &args, |b, args| {
            b.iter(|| black_box(pointer_within(black_box(args))))
        });
    }

    group.finish();
}

// ============================================================================
// Composition
// ============================================================================

fn bench_fallback(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision/fallback");
    // Off the grid, so the primary always misses.
    let active = Rect::new(-500.0, -500.0, 40.0, 20.0);
    let strategy = with_fallback(rect_intersection, closest_center);

    for n in [100u64, 1000] {
        let droppables = grid(n);
        let args = CollisionArgs::new(active, &droppables);
        group.bench_with_input(BenchmarkId::new("miss_then_center", n), &args, |b, args| {
            b.iter(|| black_box(strategy.detect(black_box(args))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_strategies, bench_fallback);

criterion_main!(benches);
