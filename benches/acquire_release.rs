use criterion::{Criterion, black_box, criterion_group, criterion_main};
use esox_resourcepool::{PoolConfiguration, ResourcePool};
use std::time::Duration;

fn acquire_release(c: &mut Criterion) {
    let config = PoolConfiguration::new().opened();
    let pool = ResourcePool::with_resources((0..16u32).collect(), config);

    c.bench_function("acquire_release", |b| {
        b.iter(|| {
            let resource = pool.acquire().unwrap();
            pool.release(black_box(&resource));
        })
    });

    c.bench_function("acquire_timeout_release", |b| {
        b.iter(|| {
            let resource = pool.acquire_timeout(Duration::from_millis(10)).unwrap();
            pool.release(black_box(&resource));
        })
    });

    c.bench_function("guard_round_trip", |b| {
        b.iter(|| {
            let guard = pool.acquire_guard().unwrap();
            black_box(*guard);
        })
    });
}

criterion_group!(benches, acquire_release);
criterion_main!(benches);
