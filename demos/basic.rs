//! Basic usage examples for ResourcePool

use esox_resourcepool::{PoolConfiguration, ResourcePool};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() {
    println!("=== EsoxSolutions.ResourcePool - Basic Examples ===\n");

    // Example 1: Acquire and release
    simple_pool();

    // Example 2: Timeouts
    timeouts();

    // Example 3: Draining close
    draining_close();

    // Example 4: Metrics and health
    metrics_and_health();
}

fn simple_pool() {
    println!("1. Simple Pool:");
    let config = PoolConfiguration::new().opened();
    let pool = ResourcePool::with_resources(vec!["one", "two", "three"], config);

    {
        let resource = pool.acquire_guard().unwrap();
        println!("   Got resource: {}", *resource);
        println!("   In use: {}", pool.in_use_count());
        // Resource automatically released when dropped
    }

    println!("   Available after release: {}\n", pool.available_count());
}

fn timeouts() {
    println!("2. Timeouts:");
    let pool = ResourcePool::with_resources(vec![42], PoolConfiguration::new().opened());

    let held = pool.acquire().unwrap();
    match pool.acquire_timeout(Duration::from_millis(100)) {
        Ok(_) => println!("   Unexpectedly got a second resource"),
        Err(e) => println!("   Second acquire: {}", e),
    }

    pool.release(&held);
    println!("   After release: {:?}\n", pool.try_acquire());
}

fn draining_close() {
    println!("3. Draining Close:");
    let pool = Arc::new(ResourcePool::with_resources(vec!["a"], PoolConfiguration::new().opened()));
    let held = pool.acquire().unwrap();

    let releaser = {
        let pool = Arc::clone(&pool);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(200));
            println!("   Releasing {}", held);
            pool.release(&held);
        })
    };

    println!("   Closing (waits for the release)...");
    pool.close();
    println!("   Open after close: {}", pool.is_open());
    releaser.join().unwrap();
    println!();
}

fn metrics_and_health() {
    println!("4. Metrics and Health:");
    let pool = ResourcePool::with_resources(vec![1, 2, 3, 4, 5], PoolConfiguration::new().opened());

    let first = pool.acquire().unwrap();
    let second = pool.acquire().unwrap();

    let health = pool.get_health_status();
    println!("   Health: {}", if health.is_healthy { "Healthy" } else { "Unhealthy" });
    println!("   Utilization: {:.1}%", health.utilization * 100.0);
    println!("   In use: {}, Available: {}", health.in_use_resources, health.available_resources);

    pool.release(&first);
    pool.release(&second);

    let metrics = pool.export_metrics();
    println!("\n   Metrics:");
    for (key, value) in metrics {
        println!("     {}: {}", key, value);
    }
}
