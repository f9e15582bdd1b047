use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scopekit::{FailurePolicy, ResourceManager, ScopedResource, SharedResourceManager};
use std::cell::Cell;

fn benchmark_resource_manager(c: &mut Criterion) {
    let mut group = c.benchmark_group("ResourceManager");

    // Benchmark registering and running a batch of callbacks
    for size in [1usize, 16, 256] {
        group.bench_with_input(BenchmarkId::new("register_execute", size), &size, |b, &size| {
            let counter = Cell::new(0usize);
            b.iter(|| {
                let mut manager = ResourceManager::new();
                for _ in 0..size {
                    manager.register_cleanup(|| counter.set(counter.get() + 1));
                }
                black_box(manager.execute_cleanup())
            });
        });
    }

    // Benchmark a pass where every other callback fails
    group.bench_function("execute_with_failures_64", |b| {
        b.iter(|| {
            let mut manager = ResourceManager::new();
            for i in 0..64 {
                manager.register_fallible_cleanup(move || {
                    if i % 2 == 0 {
                        Err("failed")
                    } else {
                        Ok(())
                    }
                });
            }
            black_box(manager.execute_cleanup().is_err())
        });
    });

    group.bench_function("fail_fast_64", |b| {
        b.iter(|| {
            let mut manager = ResourceManager::with_policy(FailurePolicy::FailFast);
            for _ in 0..63 {
                manager.register_cleanup(|| {});
            }
            manager.register_fallible_cleanup(|| Err::<(), _>("failed"));
            black_box(manager.execute_cleanup().is_err())
        });
    });

    group.finish();
}

fn benchmark_scoped_resource(c: &mut Criterion) {
    let mut group = c.benchmark_group("ScopedResource");

    group.bench_function("with_cleanup", |b| {
        let counter = Cell::new(0usize);
        b.iter(|| {
            let holder = ScopedResource::with_cleanup(black_box(42), || {
                counter.set(counter.get() + 1)
            });
            black_box(*holder)
        });
    });

    group.bench_function("dismiss", |b| {
        b.iter(|| {
            let holder = ScopedResource::with_cleanup(black_box(42), || {});
            black_box(holder.dismiss())
        });
    });

    group.finish();
}

fn benchmark_shared_manager(c: &mut Criterion) {
    let mut group = c.benchmark_group("SharedResourceManager");

    group.bench_function("register_execute_256", |b| {
        b.iter(|| {
            let manager = SharedResourceManager::new();
            for _ in 0..256 {
                manager.register_cleanup(|| {});
            }
            black_box(manager.execute_cleanup())
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_resource_manager,
    benchmark_scoped_resource,
    benchmark_shared_manager
);
criterion_main!(benches);
