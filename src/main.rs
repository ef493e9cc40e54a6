// EsoxSolutions.ResourcePool
// Demo driver: a crowd of workers competing for a handful of resources.
//
// Run with: RUST_LOG=debug cargo run

use esox_resourcepool::{PoolConfiguration, ResourcePool};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

const WORKERS: usize = 15;
const WAIT_MAX: Duration = Duration::from_millis(1500);

fn worker(id: usize, pool: Arc<ResourcePool<&'static str>>) {
    info!(worker = id, "trying to acquire a resource");
    let started = Instant::now();

    match pool.acquire_timeout(WAIT_MAX) {
        Ok(resource) => {
            let hold = Duration::from_millis(100 * (id as u64 % 5 + 1));
            info!(worker = id, resource, ?hold, "acquired resource");
            thread::sleep(hold);
            pool.release(&resource);
            info!(worker = id, resource, "released resource");
        }
        Err(e) => {
            info!(worker = id, waited = ?started.elapsed(), error = %e, "could not get a resource");
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let pool = Arc::new(ResourcePool::new(PoolConfiguration::new().with_name("demo")));
    pool.open();

    let handles: Vec<_> = (1..=WORKERS)
        .map(|id| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || worker(id, pool))
        })
        .collect();

    thread::sleep(Duration::from_secs(1));
    for resource in ["one", "two", "three", "four", "five"] {
        pool.add(resource);
    }

    thread::sleep(Duration::from_millis(300));
    pool.close();

    for handle in handles {
        if handle.join().is_err() {
            info!("a worker panicked");
        }
    }

    let metrics = pool.get_metrics();
    info!(
        acquired = metrics.total_acquired,
        timeouts = metrics.acquire_timeouts,
        rejections = metrics.acquire_rejections,
        "demo finished"
    );
}
