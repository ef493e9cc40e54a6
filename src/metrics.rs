//! Metrics collection and export for resource pools

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Metrics data for a pool
///
/// # Examples
///
/// ```
/// use esox_resourcepool::{PoolConfiguration, ResourcePool};
///
/// let pool = ResourcePool::with_resources(vec![1, 2, 3], PoolConfiguration::new().opened());
///
/// let held = pool.acquire().unwrap();
/// let metrics = pool.get_metrics();
/// assert_eq!(metrics.total_acquired, 1);
/// assert_eq!(metrics.in_use_resources, 1);
/// assert_eq!(metrics.available_resources, 2);
/// pool.release(&held);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoolMetrics {
    /// Total successful acquisitions
    pub total_acquired: usize,

    /// Total resources returned through release
    pub total_released: usize,

    /// Total resources added
    pub total_added: usize,

    /// Total resources removed
    pub total_removed: usize,

    /// Acquisitions that ran out of time
    pub acquire_timeouts: usize,

    /// Acquisitions refused because the pool was not open
    pub acquire_rejections: usize,

    /// Waits that ended through cancellation
    pub cancellations: usize,

    /// Resources currently checked out
    pub in_use_resources: usize,

    /// Resources currently free
    pub available_resources: usize,

    /// Share of tracked resources currently checked out (0.0 to 1.0)
    pub utilization: f64,

    /// Configured capacity, if any
    pub max_capacity: Option<usize>,
}

impl PoolMetrics {
    /// Export metrics as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("total_acquired".to_string(), self.total_acquired.to_string());
        metrics.insert("total_released".to_string(), self.total_released.to_string());
        metrics.insert("total_added".to_string(), self.total_added.to_string());
        metrics.insert("total_removed".to_string(), self.total_removed.to_string());
        metrics.insert("acquire_timeouts".to_string(), self.acquire_timeouts.to_string());
        metrics.insert("acquire_rejections".to_string(), self.acquire_rejections.to_string());
        metrics.insert("cancellations".to_string(), self.cancellations.to_string());
        metrics.insert("in_use_resources".to_string(), self.in_use_resources.to_string());
        metrics.insert("available_resources".to_string(), self.available_resources.to_string());
        metrics.insert("utilization".to_string(), format!("{:.2}", self.utilization));
        if let Some(capacity) = self.max_capacity {
            metrics.insert("max_capacity".to_string(), capacity.to_string());
        }
        metrics
    }

    /// Resources the pool currently tracks
    pub fn tracked_resources(&self) -> usize {
        self.in_use_resources + self.available_resources
    }
}

/// Metrics exporter for Prometheus format
#[cfg(feature = "prometheus")]
pub struct MetricsExporter;

#[cfg(feature = "prometheus")]
impl MetricsExporter {
    /// Export metrics in Prometheus exposition format
    ///
    /// # Examples
    ///
    /// ```
    /// use esox_resourcepool::{PoolConfiguration, ResourcePool};
    /// use std::collections::HashMap;
    ///
    /// let pool = ResourcePool::with_resources(vec![1, 2, 3], PoolConfiguration::default());
    ///
    /// let mut tags = HashMap::new();
    /// tags.insert("service".to_string(), "api".to_string());
    ///
    /// let output = pool.export_metrics_prometheus("my_pool", Some(&tags)).unwrap();
    /// assert!(output.contains("resourcepool_resources_in_use"));
    /// assert!(output.contains("service=\"api\""));
    /// ```
    pub fn export_prometheus(
        metrics: &PoolMetrics,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> crate::PoolResult<String> {
        use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Opts, Registry, TextEncoder};

        let mut labels = HashMap::new();
        labels.insert("pool".to_string(), pool_name.to_string());
        if let Some(tags) = tags {
            for (key, value) in tags {
                labels.insert(key.clone(), value.clone());
            }
        }

        let registry = Registry::new();
        let opts = |name: &str, help: &str| Opts::new(name, help).const_labels(labels.clone());
        let to_err = |e: prometheus::Error| crate::PoolError::MetricsExport(e.to_string());

        let gauges = [
            ("resourcepool_resources_in_use", "Current in-use resources", metrics.in_use_resources),
            (
                "resourcepool_resources_available",
                "Current available resources",
                metrics.available_resources,
            ),
        ];
        for (name, help, value) in gauges {
            let gauge = IntGauge::with_opts(opts(name, help)).map_err(to_err)?;
            gauge.set(value as i64);
            registry.register(Box::new(gauge)).map_err(to_err)?;
        }

        let utilization =
            Gauge::with_opts(opts("resourcepool_utilization", "Pool utilization ratio"))
                .map_err(to_err)?;
        utilization.set(metrics.utilization);
        registry.register(Box::new(utilization)).map_err(to_err)?;

        let counters = [
            ("resourcepool_acquired_total", "Total resources acquired", metrics.total_acquired),
            ("resourcepool_released_total", "Total resources released", metrics.total_released),
            ("resourcepool_added_total", "Total resources added", metrics.total_added),
            ("resourcepool_removed_total", "Total resources removed", metrics.total_removed),
            (
                "resourcepool_acquire_timeouts_total",
                "Acquisitions that timed out",
                metrics.acquire_timeouts,
            ),
            (
                "resourcepool_acquire_rejections_total",
                "Acquisitions refused by a closed pool",
                metrics.acquire_rejections,
            ),
            (
                "resourcepool_cancellations_total",
                "Waits ended by cancellation",
                metrics.cancellations,
            ),
        ];
        for (name, help, value) in counters {
            let counter = IntCounter::with_opts(opts(name, help)).map_err(to_err)?;
            counter.inc_by(value as u64);
            registry.register(Box::new(counter)).map_err(to_err)?;
        }

        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&registry.gather(), &mut buffer)
            .map_err(to_err)?;
        String::from_utf8(buffer).map_err(|e| crate::PoolError::MetricsExport(e.to_string()))
    }
}

/// Internal metrics tracker
#[derive(Default)]
pub(crate) struct MetricsTracker {
    pub total_acquired: AtomicUsize,
    pub total_released: AtomicUsize,
    pub total_added: AtomicUsize,
    pub total_removed: AtomicUsize,
    pub acquire_timeouts: AtomicUsize,
    pub acquire_rejections: AtomicUsize,
    pub cancellations: AtomicUsize,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_metrics(
        &self,
        in_use: usize,
        available: usize,
        capacity: Option<usize>,
    ) -> PoolMetrics {
        let tracked = in_use + available;
        let utilization = if tracked > 0 {
            in_use as f64 / tracked as f64
        } else {
            0.0
        };

        PoolMetrics {
            total_acquired: self.total_acquired.load(Ordering::Relaxed),
            total_released: self.total_released.load(Ordering::Relaxed),
            total_added: self.total_added.load(Ordering::Relaxed),
            total_removed: self.total_removed.load(Ordering::Relaxed),
            acquire_timeouts: self.acquire_timeouts.load(Ordering::Relaxed),
            acquire_rejections: self.acquire_rejections.load(Ordering::Relaxed),
            cancellations: self.cancellations.load(Ordering::Relaxed),
            in_use_resources: in_use,
            available_resources: available,
            utilization,
            max_capacity: capacity,
        }
    }
}
