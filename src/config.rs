//! Pool configuration options

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for resource pool behavior
///
/// # Examples
///
/// ```
/// use esox_resourcepool::PoolConfiguration;
/// use std::time::Duration;
///
/// let config = PoolConfiguration::new()
///     .with_name("db-connections")
///     .with_max_pool_size(10)
///     .with_timeout(Duration::from_secs(5))
///     .opened();
///
/// assert_eq!(config.max_pool_size, Some(10));
/// assert!(config.open_on_create);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoolConfiguration {
    /// Name used in log records and metric labels
    pub name: String,

    /// Maximum number of resources the pool may track (available + in use)
    pub max_pool_size: Option<usize>,

    /// Timeout for async acquisition
    pub operation_timeout: Option<Duration>,

    /// How often cancellable and async waits re-check their condition
    pub poll_interval: Duration,

    /// Whether the pool starts in the open state
    pub open_on_create: bool,
}

impl Default for PoolConfiguration {
    fn default() -> Self {
        Self {
            name: "resource-pool".to_string(),
            max_pool_size: None,
            operation_timeout: Some(Duration::from_secs(30)),
            poll_interval: Duration::from_millis(10),
            open_on_create: false,
        }
    }
}

impl PoolConfiguration {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pool name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the maximum number of tracked resources
    ///
    /// # Examples
    ///
    /// ```
    /// use esox_resourcepool::{PoolConfiguration, ResourcePool};
    ///
    /// let pool = ResourcePool::new(PoolConfiguration::new().with_max_pool_size(1));
    /// assert!(pool.add("a"));
    /// assert!(!pool.add("b"));
    /// ```
    pub fn with_max_pool_size(mut self, size: usize) -> Self {
        self.max_pool_size = Some(size);
        self
    }

    /// Set operation timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// Set the polling interval used by cancellable and async waits
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Open the pool as soon as it is created
    pub fn opened(mut self) -> Self {
        self.open_on_create = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PoolConfiguration::default();
        assert_eq!(config.name, "resource-pool");
        assert_eq!(config.max_pool_size, None);
        assert_eq!(config.operation_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.poll_interval, Duration::from_millis(10));
        assert!(!config.open_on_create);
    }

    #[test]
    fn test_builder_chain() {
        let config = PoolConfiguration::new()
            .with_name("workers")
            .with_max_pool_size(3)
            .with_timeout(Duration::from_millis(250))
            .with_poll_interval(Duration::from_millis(1))
            .opened();

        assert_eq!(config.name, "workers");
        assert_eq!(config.max_pool_size, Some(3));
        assert_eq!(config.operation_timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.poll_interval, Duration::from_millis(1));
        assert!(config.open_on_create);
    }
}
