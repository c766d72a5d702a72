use std::cmp::Ordering;
use std::ops::ControlFlow;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use treap::Treap;

fn by_key(a: &(u32, u32), b: &(u32, u32)) -> Ordering {
    a.0.cmp(&b.0)
}

fn by_priority(a: &(u32, u32), b: &(u32, u32)) -> Ordering {
    a.1.cmp(&b.1)
}

/// Deterministic pseudo-random priorities.
fn priority(i: u32) -> u32 {
    i.wrapping_mul(2_654_435_761).rotate_left(13)
}

fn filled(n: u32) -> Treap<(u32, u32)> {
    let empty: Treap<(u32, u32)> = Treap::new(by_key, by_priority);
    (0..n).fold(empty, |t, i| t.upsert((i, priority(i))))
}

fn bench_upsert(c: &mut Criterion) {
    let mut group = c.benchmark_group("upsert");
    let base = filled(1024);

    group.bench_function("new_key", |b| b.iter(|| black_box(base.upsert((4096, 7)))));
    group.bench_function("existing_key", |b| b.iter(|| black_box(base.upsert((512, 7)))));
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let base = filled(1024);

    group.bench_function("get", |b| b.iter(|| black_box(base.get(black_box(&(700, 0))))));
    group.bench_function("delete", |b| b.iter(|| black_box(base.delete(&(700, 0)))));
    group.bench_function("visit_ascend", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            let _ = base.visit_ascend(&(0, 0), |item| {
                sum += u64::from(item.0);
                ControlFlow::Continue(())
            });
            black_box(sum)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_upsert, bench_lookup);
criterion_main!(benches);
