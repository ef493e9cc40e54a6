//! Health monitoring for resource pools

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Health status of a resource pool
///
/// # Examples
///
/// ```
/// use esox_resourcepool::{PoolConfiguration, ResourcePool};
///
/// let pool = ResourcePool::with_resources(vec![1, 2, 3], PoolConfiguration::new().opened());
///
/// let health = pool.get_health_status();
/// assert!(health.is_healthy());
/// assert_eq!(health.available_resources, 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HealthStatus {
    /// Whether the pool is healthy
    pub is_healthy: bool,

    /// Whether the pool accepts acquisitions
    pub is_open: bool,

    /// Number of warnings detected
    pub warning_count: usize,

    /// Current pool utilization (0.0 to 1.0)
    pub utilization: f64,

    /// Available resources count
    pub available_resources: usize,

    /// In-use resources count
    pub in_use_resources: usize,

    /// Warning messages
    pub warnings: Vec<String>,
}

impl HealthStatus {
    /// Create a new health status
    pub fn new(is_open: bool, available: usize, in_use: usize) -> Self {
        let tracked = available + in_use;
        let utilization = if tracked > 0 {
            in_use as f64 / tracked as f64
        } else {
            0.0
        };

        let mut warnings = Vec::new();
        let mut is_healthy = true;

        if !is_open {
            warnings.push("Pool is closed".to_string());
            is_healthy = false;
        }

        if utilization > 0.9 {
            warnings.push(format!("High utilization: {:.1}%", utilization * 100.0));
            is_healthy = false;
        }

        if available == 0 {
            warnings.push("No resources available".to_string());
        }

        Self {
            is_healthy,
            is_open,
            warning_count: warnings.len(),
            utilization,
            available_resources: available,
            in_use_resources: in_use,
            warnings,
        }
    }

    /// Check if the pool is healthy
    pub fn is_healthy(&self) -> bool {
        self.is_healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_pool_is_unhealthy() {
        let health = HealthStatus::new(false, 2, 0);
        assert!(!health.is_healthy());
        assert_eq!(health.warnings, vec!["Pool is closed".to_string()]);
    }

    #[test]
    fn test_saturated_pool() {
        let health = HealthStatus::new(true, 0, 4);
        assert!(!health.is_healthy());
        assert_eq!(health.warning_count, 2);
        assert_eq!(health.utilization, 1.0);
    }

    #[test]
    fn test_empty_open_pool_warns_but_is_healthy() {
        let health = HealthStatus::new(true, 0, 0);
        assert!(health.is_healthy());
        assert_eq!(health.warning_count, 1);
    }
}
