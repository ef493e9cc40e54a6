//! Async usage examples

use esox_resourcepool::{CancellationToken, PoolConfiguration, ResourcePool};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::main]
async fn main() {
    println!("=== EsoxSolutions.ResourcePool - Async Examples ===\n");

    // Example 1: Async acquire
    async_acquire().await;

    // Example 2: Async with timeout
    async_with_timeout().await;

    // Example 3: Cancellation
    cancellation().await;

    // Example 4: Concurrent access
    concurrent_access().await;
}

async fn async_acquire() {
    println!("1. Async Acquire:");
    let pool = ResourcePool::with_resources(vec![1, 2, 3], PoolConfiguration::new().opened());

    let resource = pool.acquire_async().await.unwrap();
    println!("   Got resource asynchronously: {}", resource);
    pool.release(&resource);

    println!();
}

async fn async_with_timeout() {
    println!("2. Async with Timeout:");

    let config = PoolConfiguration::new()
        .opened()
        .with_timeout(Duration::from_millis(100));

    let pool = ResourcePool::with_resources(vec![42], config);

    // Take the only resource
    let _held = pool.acquire().unwrap();

    // Try to get another (should time out)
    match pool.acquire_async().await {
        Ok(_) => println!("   Got resource"),
        Err(e) => println!("   Error: {}", e),
    }

    println!();
}

async fn cancellation() {
    println!("3. Cancellation:");
    let pool: ResourcePool<u32> = ResourcePool::new(PoolConfiguration::new().opened());
    let token = CancellationToken::new();

    let trigger = token.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    match pool.acquire_async_cancellable(&token).await {
        Ok(_) => println!("   Got resource"),
        Err(e) => println!("   Error: {}", e),
    }

    println!();
}

async fn concurrent_access() {
    println!("4. Concurrent Access:");

    let pool = Arc::new(ResourcePool::with_resources(
        vec![1, 2, 3, 4, 5],
        PoolConfiguration::new().opened().with_timeout(Duration::from_millis(200)),
    ));

    let mut handles = vec![];

    for i in 0..10 {
        let pool_clone = Arc::clone(&pool);
        let handle = tokio::spawn(async move {
            match pool_clone.acquire_async().await {
                Ok(resource) => {
                    println!("   Task {} got resource: {}", i, resource);
                    sleep(Duration::from_millis(50)).await;
                    pool_clone.release(&resource);
                }
                Err(e) => println!("   Task {} couldn't get resource: {}", i, e),
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.await.unwrap();
    }

    println!("   Final available: {}", pool.available_count());
}
