//! # EsoxSolutions.ResourcePool
//!
//! Thread-safe pool of interchangeable resource handles with blocking
//! acquisition, draining shutdown and dynamic membership.
//!
//! ## Features
//!
//! - Blocking, time-bounded and cancellable acquisition
//! - Release back to the pool at any time, even after closing
//! - Add and remove resources while the pool is in use
//! - Draining `close` and immediate `close_now`
//! - Automatic release via RAII guards
//! - Async acquisition with timeout and cancellation
//! - Event observers, health monitoring and metrics
//! - Prometheus metrics export
//!
//! ## Quick Start
//!
//! ```rust
//! use esox_resourcepool::{PoolConfiguration, ResourcePool};
//!
//! let pool = ResourcePool::with_resources(vec!["one", "two"], PoolConfiguration::default());
//! pool.open();
//! {
//!     let resource = pool.acquire_guard().unwrap();
//!     println!("Got: {}", *resource);
//!     // Resource automatically released when `resource` goes out of scope
//! }
//! pool.close();
//! ```

mod pool;
mod config;
mod metrics;
mod health;
mod observer;
mod errors;

pub use pool::{ResourcePool, PooledResource, PoolState};
pub use config::PoolConfiguration;
pub use metrics::PoolMetrics;
#[cfg(feature = "prometheus")]
pub use metrics::MetricsExporter;
pub use health::HealthStatus;
pub use observer::{PoolEvent, PoolObserver, ChannelObserver};
pub use errors::{PoolError, PoolResult};

pub use tokio_util::sync::CancellationToken;
