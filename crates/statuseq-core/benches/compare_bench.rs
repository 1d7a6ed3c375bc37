//! # Comparison Benchmarks
//!
//! Performance benchmarks for statuseq-core comparisons.
//!
//! Run with: `cargo bench -p statuseq-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};
use statuseq_core::{Comparator, render_diff, status_equal};
use std::hint::black_box;

/// Build a status document with N conditions, timestamps offset by `tick`.
fn status_with_conditions(size: usize, tick: usize, reversed: bool) -> Value {
    let mut conditions: Vec<Value> = (0..size)
        .map(|i| {
            json!({
                "type": format!("Condition{}", i),
                "status": if i % 2 == 0 { "True" } else { "False" },
                "observedGeneration": 3,
                "lastTransitionTime": format!("2024-01-01T00:{:02}:00Z", tick % 60),
                "reason": "Reconciled",
                "message": format!("tick {}", tick)
            })
        })
        .collect();

    if reversed {
        conditions.reverse();
    }

    json!({
        "metadata": {"name": "bench"},
        "status": {
            "observedGeneration": 3,
            "replicas": size,
            "readyReplicas": size,
            "conditions": conditions
        }
    })
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_equal_statuses(c: &mut Criterion) {
    let mut group = c.benchmark_group("equal_statuses");

    for size in [4, 32, 256].iter() {
        let old = status_with_conditions(*size, 1, false);
        let new = status_with_conditions(*size, 2, true);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(status_equal(&old, &new)));
        });
    }

    group.finish();
}

fn bench_unequal_with_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("unequal_with_diff");
    let comparator = Comparator::new();

    for size in [4, 32, 256].iter() {
        let old = status_with_conditions(*size, 1, false);
        let mut new = status_with_conditions(*size, 1, false);
        new["status"]["replicas"] = json!(size + 1);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(comparator.compare(&old, &new)));
        });
    }

    group.finish();
}

fn bench_render_diff(c: &mut Criterion) {
    let old = status_with_conditions(64, 1, false);
    let new = status_with_conditions(64, 2, true);

    c.bench_function("render_diff_64", |b| {
        b.iter(|| black_box(render_diff(&old["status"], &new["status"])));
    });
}

criterion_group!(
    benches,
    bench_equal_statuses,
    bench_unequal_with_diff,
    bench_render_diff
);
criterion_main!(benches);
