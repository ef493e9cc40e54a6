//! Core resource pool implementation

use crate::config::PoolConfiguration;
use crate::errors::{PoolError, PoolResult};
use crate::health::HealthStatus;
#[cfg(feature = "prometheus")]
use crate::metrics::MetricsExporter;
use crate::metrics::{MetricsTracker, PoolMetrics};
use crate::observer::{PoolEvent, PoolObserver};

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::{HashMap, VecDeque};
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Lifecycle state of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    /// Acquisitions are permitted
    Open,

    /// Acquisitions fail with [`PoolError::NotOpen`]
    Closed,
}

/// A resource checked out through [`ResourcePool::acquire_guard`]
///
/// The resource is released back to the pool when the guard is dropped.
pub struct PooledResource<'a, R: Clone + PartialEq> {
    resource: Option<R>,
    pool: &'a ResourcePool<R>,
}

impl<R: Clone + PartialEq> PooledResource<'_, R> {
    /// Take the handle out of the guard without releasing it
    ///
    /// The resource stays in use; the caller becomes responsible for
    /// calling [`ResourcePool::release`].
    pub fn detach(mut self) -> R {
        self.resource.take().expect("Resource already taken")
    }
}

impl<R: Clone + PartialEq> Deref for PooledResource<'_, R> {
    type Target = R;

    fn deref(&self) -> &Self::Target {
        self.resource.as_ref().expect("Resource already taken")
    }
}

impl<R: Clone + PartialEq> Drop for PooledResource<'_, R> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            self.pool.release(&resource);
        }
    }
}

/// Tracked resources, partitioned by whether they are checked out.
struct Membership<R> {
    available: VecDeque<R>,
    in_use: Vec<R>,
    /// Callers blocked in `close` waiting for `in_use` to drain.
    closers: usize,
    /// Callers blocked in `remove` waiting for a specific resource.
    removers: usize,
}

impl<R: Clone + PartialEq> Membership<R> {
    fn new() -> Self {
        Self {
            available: VecDeque::new(),
            in_use: Vec::new(),
            closers: 0,
            removers: 0,
        }
    }

    fn tracked(&self) -> usize {
        self.available.len() + self.in_use.len()
    }

    fn is_tracked(&self, resource: &R) -> bool {
        self.available.contains(resource) || self.in_use.contains(resource)
    }

    fn check_out(&mut self) -> Option<R> {
        let resource = self.available.pop_front()?;
        self.in_use.push(resource.clone());
        Some(resource)
    }

    fn check_in(&mut self, resource: &R) -> bool {
        match self.in_use.iter().position(|r| r == resource) {
            Some(pos) => {
                let returned = self.in_use.swap_remove(pos);
                self.available.push_back(returned);
                true
            }
            None => false,
        }
    }

    fn take_available(&mut self, resource: &R) -> Option<R> {
        let pos = self.available.iter().position(|r| r == resource)?;
        self.available.remove(pos)
    }
}

/// Thread-safe pool of interchangeable resource handles
///
/// Resources are caller-owned values compared by equality. The pool only
/// tracks which of them are free and which are checked out.
///
/// # Examples
///
/// ```
/// use esox_resourcepool::{PoolConfiguration, ResourcePool};
/// use std::time::Duration;
///
/// let pool = ResourcePool::new(PoolConfiguration::default());
/// pool.open();
/// pool.add("conn-1");
///
/// let conn = pool.acquire_timeout(Duration::from_millis(100)).unwrap();
/// assert_eq!(conn, "conn-1");
/// assert!(pool.acquire_timeout(Duration::from_millis(10)).is_err());
///
/// pool.release(&conn);
/// pool.close();
/// assert!(!pool.is_open());
/// ```
pub struct ResourcePool<R> {
    state: Mutex<Membership<R>>,
    resource_available: Condvar,
    none_in_use: Condvar,
    open: AtomicBool,
    config: PoolConfiguration,
    metrics: MetricsTracker,
    observer: Option<Arc<dyn PoolObserver<R>>>,
}

impl<R: Clone + PartialEq> ResourcePool<R> {
    /// Create an empty pool
    pub fn new(config: PoolConfiguration) -> Self {
        let open = config.open_on_create;
        Self {
            state: Mutex::new(Membership::new()),
            resource_available: Condvar::new(),
            none_in_use: Condvar::new(),
            open: AtomicBool::new(open),
            config,
            metrics: MetricsTracker::new(),
            observer: None,
        }
    }

    /// Create a pool pre-populated with resources
    ///
    /// Resources beyond `max_pool_size` are not tracked.
    pub fn with_resources(resources: Vec<R>, config: PoolConfiguration) -> Self {
        let pool = Self::new(config);
        for resource in resources {
            pool.add(resource);
        }
        pool
    }

    /// Install an observer that is notified of pool events
    pub fn with_observer(mut self, observer: Arc<dyn PoolObserver<R>>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Open the pool for acquisitions
    pub fn open(&self) {
        let guard = self.state.lock();
        let was_open = self.open.swap(true, Ordering::SeqCst);
        drop(guard);

        if !was_open {
            info!(pool = %self.config.name, "opened resource pool");
            self.emit(|| PoolEvent::Opened);
        }
    }

    /// Whether acquisitions are currently permitted
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Current lifecycle state
    pub fn state(&self) -> PoolState {
        if self.is_open() {
            PoolState::Open
        } else {
            PoolState::Closed
        }
    }

    /// Close the pool once every checked-out resource has been released
    ///
    /// While waiting the pool still reports itself open, but refuses new
    /// acquisitions.
    pub fn close(&self) {
        match self.close_inner(None) {
            Ok(()) => {}
            Err(e) => debug_assert!(false, "close without a token cannot fail: {e}"),
        }
    }

    /// Like [`close`](Self::close), but gives up when `cancel` fires
    ///
    /// A cancelled close leaves the pool open.
    pub fn close_cancellable(&self, cancel: &CancellationToken) -> PoolResult<()> {
        self.close_inner(Some(cancel))
    }

    /// Close the pool immediately, leaving checked-out resources in use
    pub fn close_now(&self) {
        let guard = self.state.lock();
        let was_open = self.open.swap(false, Ordering::SeqCst);
        let in_use = guard.in_use.len();
        self.resource_available.notify_all();
        drop(guard);

        if was_open {
            info!(pool = %self.config.name, in_use, "closed resource pool without draining");
            self.emit(|| PoolEvent::Closed);
        }
    }

    /// Acquire a resource, waiting as long as it takes
    pub fn acquire(&self) -> PoolResult<R> {
        self.acquire_inner(None, None)
    }

    /// Acquire a resource within `timeout`
    ///
    /// Time spent waiting for the pool lock counts against the budget.
    pub fn acquire_timeout(&self, timeout: Duration) -> PoolResult<R> {
        self.acquire_inner(Some(timeout), None)
    }

    /// Acquire a resource, optionally bounded by `timeout`, until `cancel` fires
    pub fn acquire_cancellable(
        &self,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
    ) -> PoolResult<R> {
        self.acquire_inner(timeout, Some(cancel))
    }

    /// Take a resource only if one is free right now
    pub fn try_acquire(&self) -> Option<R> {
        self.try_acquire_inner().ok().flatten()
    }

    /// Acquire a resource that is released when the guard is dropped
    pub fn acquire_guard(&self) -> PoolResult<PooledResource<'_, R>> {
        let resource = self.acquire()?;
        Ok(PooledResource {
            resource: Some(resource),
            pool: self,
        })
    }

    /// Acquire a guarded resource within `timeout`
    pub fn acquire_guard_timeout(&self, timeout: Duration) -> PoolResult<PooledResource<'_, R>> {
        let resource = self.acquire_timeout(timeout)?;
        Ok(PooledResource {
            resource: Some(resource),
            pool: self,
        })
    }

    /// Acquire a resource asynchronously, bounded by the configured operation timeout
    pub async fn acquire_async(&self) -> PoolResult<R> {
        let timeout = self.config.operation_timeout.unwrap_or(Duration::from_secs(30));

        tokio::time::timeout(timeout, async {
            loop {
                match self.try_acquire_inner() {
                    Ok(Some(resource)) => return Ok(resource),
                    Ok(None) => tokio::time::sleep(self.config.poll_interval).await,
                    Err(e) => return Err(e),
                }
            }
        })
        .await
        .map_err(|_| {
            MetricsTracker::record(&self.metrics.acquire_timeouts);
            PoolError::Timeout(timeout)
        })?
    }

    /// Acquire a resource asynchronously until `cancel` fires
    pub async fn acquire_async_cancellable(&self, cancel: &CancellationToken) -> PoolResult<R> {
        tokio::select! {
            result = self.acquire_async() => result,
            () = cancel.cancelled() => {
                MetricsTracker::record(&self.metrics.cancellations);
                Err(PoolError::Cancelled)
            }
        }
    }

    /// Return a checked-out resource to the pool
    ///
    /// Works regardless of whether the pool is open. Releasing a resource
    /// that is not checked out does nothing.
    pub fn release(&self, resource: &R) {
        let mut guard = self.state.lock();
        if !guard.check_in(resource) {
            drop(guard);
            trace!(pool = %self.config.name, "ignored release of a resource that is not in use");
            return;
        }

        self.resource_available.notify_all();
        let drained = guard.in_use.is_empty();
        if drained {
            self.none_in_use.notify_all();
        }
        drop(guard);

        MetricsTracker::record(&self.metrics.total_released);
        debug!(pool = %self.config.name, drained, "released resource");
        self.emit(|| PoolEvent::Released(resource.clone()));
    }

    /// Add a resource to the available set
    ///
    /// Returns false when the pool is already tracking `max_pool_size` resources.
    pub fn add(&self, resource: R) -> bool {
        let mut guard = self.state.lock();
        if let Some(max) = self.config.max_pool_size
            && guard.tracked() >= max
        {
            drop(guard);
            warn!(pool = %self.config.name, max, "pool is at capacity, resource not added");
            self.emit(|| PoolEvent::AddRejected(resource));
            return false;
        }

        guard.available.push_back(resource.clone());
        // A blocked remove may be waiting on a different resource, so it
        // cannot be trusted to pass a single wake-up along.
        if guard.removers > 0 {
            self.resource_available.notify_all();
        } else {
            self.resource_available.notify_one();
        }
        let available = guard.available.len();
        drop(guard);

        MetricsTracker::record(&self.metrics.total_added);
        debug!(pool = %self.config.name, available, "added resource");
        self.emit(|| PoolEvent::Added(resource));
        true
    }

    /// Remove a resource if it is currently available
    ///
    /// Returns false if the resource is in use or unknown.
    pub fn remove_now(&self, resource: &R) -> bool {
        let mut guard = self.state.lock();
        let removed = guard.take_available(resource);
        drop(guard);

        match removed {
            Some(removed) => {
                self.record_removed(removed);
                true
            }
            None => false,
        }
    }

    /// Remove a resource, waiting for it to be released if it is in use
    ///
    /// Returns false without blocking if the pool does not track the resource.
    pub fn remove(&self, resource: &R) -> bool {
        self.remove_inner(resource, None).is_ok()
    }

    /// Like [`remove`](Self::remove), but gives up when `cancel` fires
    ///
    /// Fails with [`PoolError::NotTracked`] if the resource is unknown or
    /// disappears from the pool while waiting.
    pub fn remove_cancellable(&self, resource: &R, cancel: &CancellationToken) -> PoolResult<()> {
        self.remove_inner(resource, Some(cancel))
    }

    /// Get available count
    pub fn available_count(&self) -> usize {
        self.state.lock().available.len()
    }

    /// Get in-use count
    pub fn in_use_count(&self) -> usize {
        self.state.lock().in_use.len()
    }

    /// Number of resources the pool tracks
    pub fn tracked_count(&self) -> usize {
        self.state.lock().tracked()
    }

    /// Whether the pool tracks `resource`
    pub fn contains(&self, resource: &R) -> bool {
        self.state.lock().is_tracked(resource)
    }

    /// Whether `resource` is currently checked out
    pub fn is_in_use(&self, resource: &R) -> bool {
        self.state.lock().in_use.contains(resource)
    }

    /// Get health status
    pub fn get_health_status(&self) -> HealthStatus {
        let guard = self.state.lock();
        let (available, in_use) = (guard.available.len(), guard.in_use.len());
        drop(guard);
        HealthStatus::new(self.is_open(), available, in_use)
    }

    /// Get pool metrics
    pub fn get_metrics(&self) -> PoolMetrics {
        let guard = self.state.lock();
        let (available, in_use) = (guard.available.len(), guard.in_use.len());
        drop(guard);
        self.metrics.get_metrics(in_use, available, self.config.max_pool_size)
    }

    /// Export metrics
    pub fn export_metrics(&self) -> HashMap<String, String> {
        self.get_metrics().export()
    }

    /// Export metrics in Prometheus format
    #[cfg(feature = "prometheus")]
    pub fn export_metrics_prometheus(
        &self,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> PoolResult<String> {
        MetricsExporter::export_prometheus(&self.get_metrics(), pool_name, tags)
    }

    /// Pool configuration
    pub fn config(&self) -> &PoolConfiguration {
        &self.config
    }

    fn accepts_acquire(&self, guard: &Membership<R>) -> bool {
        self.is_open() && guard.closers == 0
    }

    fn try_acquire_inner(&self) -> PoolResult<Option<R>> {
        if !self.is_open() {
            return Err(self.reject());
        }

        let mut guard = self.state.lock();
        if !self.accepts_acquire(&guard) {
            drop(guard);
            return Err(self.reject());
        }
        let resource = guard.check_out();
        drop(guard);

        if let Some(resource) = &resource {
            self.record_acquired(resource);
        }
        Ok(resource)
    }

    fn acquire_inner(
        &self,
        timeout: Option<Duration>,
        cancel: Option<&CancellationToken>,
    ) -> PoolResult<R> {
        if !self.is_open() {
            return Err(self.reject());
        }

        // One deadline covers both the lock wait and the resource wait.
        let deadline = timeout
            .and_then(|budget| Instant::now().checked_add(budget).map(|at| (at, budget)));

        let mut guard = match deadline {
            Some((at, budget)) => match self.state.try_lock_until(at) {
                Some(guard) => guard,
                None => return Err(self.timed_out(budget)),
            },
            None => self.state.lock(),
        };

        loop {
            if !self.accepts_acquire(&guard) {
                drop(guard);
                return Err(self.reject());
            }

            if let Some(resource) = guard.check_out() {
                drop(guard);
                self.record_acquired(&resource);
                return Ok(resource);
            }

            if let Some((at, budget)) = deadline
                && Instant::now() >= at
            {
                drop(guard);
                return Err(self.timed_out(budget));
            }

            trace!(pool = %self.config.name, "waiting for a resource");
            if let Err(e) = self.wait_on(
                &self.resource_available,
                &mut guard,
                deadline.map(|(at, _)| at),
                cancel,
            ) {
                // We may have consumed the single wake-up from an add.
                if !guard.available.is_empty() {
                    self.resource_available.notify_one();
                }
                drop(guard);
                return Err(self.cancelled(e));
            }
        }
    }

    fn close_inner(&self, cancel: Option<&CancellationToken>) -> PoolResult<()> {
        if !self.is_open() {
            return Ok(());
        }

        let mut guard = self.state.lock();
        if !guard.in_use.is_empty() {
            guard.closers += 1;
            // Blocked acquirers should see the pool is draining and give up.
            self.resource_available.notify_all();

            let in_use = guard.in_use.len();
            MutexGuard::unlocked(&mut guard, || {
                info!(pool = %self.config.name, in_use, "waiting to close resource pool");
                self.emit(|| PoolEvent::WaitingToClose { in_use });
            });

            while !guard.in_use.is_empty() {
                if let Err(e) = self.wait_on(&self.none_in_use, &mut guard, None, cancel) {
                    guard.closers -= 1;
                    drop(guard);
                    return Err(self.cancelled(e));
                }
            }
            guard.closers -= 1;
        }

        let was_open = self.open.swap(false, Ordering::SeqCst);
        self.resource_available.notify_all();
        drop(guard);

        if was_open {
            info!(pool = %self.config.name, "closed resource pool");
            self.emit(|| PoolEvent::Closed);
        }
        Ok(())
    }

    fn remove_inner(&self, resource: &R, cancel: Option<&CancellationToken>) -> PoolResult<()> {
        let mut guard = self.state.lock();
        let mut announced = false;

        loop {
            if let Some(removed) = guard.take_available(resource) {
                drop(guard);
                self.record_removed(removed);
                return Ok(());
            }

            // Someone else may have removed it while we waited.
            if !guard.is_tracked(resource) {
                return Err(PoolError::NotTracked);
            }

            if !announced {
                announced = true;
                MutexGuard::unlocked(&mut guard, || {
                    debug!(pool = %self.config.name, "waiting to remove resource");
                    self.emit(|| PoolEvent::WaitingToRemove(resource.clone()));
                });
                continue;
            }

            guard.removers += 1;
            let waited = self.wait_on(&self.resource_available, &mut guard, None, cancel);
            guard.removers -= 1;
            if let Err(e) = waited {
                drop(guard);
                return Err(self.cancelled(e));
            }
        }
    }

    /// Block on `signal` once. The caller re-checks its predicate afterwards.
    ///
    /// With a cancellation token the wait is sliced by `poll_interval` so the
    /// token is observed even when nothing signals.
    fn wait_on(
        &self,
        signal: &Condvar,
        guard: &mut MutexGuard<'_, Membership<R>>,
        deadline: Option<Instant>,
        cancel: Option<&CancellationToken>,
    ) -> PoolResult<()> {
        match cancel {
            None => match deadline {
                Some(at) => {
                    let _ = signal.wait_until(guard, at);
                }
                None => signal.wait(guard),
            },
            Some(token) => {
                if token.is_cancelled() {
                    return Err(PoolError::Cancelled);
                }
                let slice = Instant::now().checked_add(self.config.poll_interval);
                let until = match (deadline, slice) {
                    (Some(at), Some(slice)) => Some(at.min(slice)),
                    (at, slice) => at.or(slice),
                };
                match until {
                    Some(until) => {
                        let _ = signal.wait_until(guard, until);
                    }
                    None => signal.wait(guard),
                }
                if token.is_cancelled() {
                    return Err(PoolError::Cancelled);
                }
            }
        }
        Ok(())
    }

    fn record_acquired(&self, resource: &R) {
        MetricsTracker::record(&self.metrics.total_acquired);
        debug!(pool = %self.config.name, "acquired resource");
        self.emit(|| PoolEvent::Acquired(resource.clone()));
    }

    fn record_removed(&self, resource: R) {
        MetricsTracker::record(&self.metrics.total_removed);
        debug!(pool = %self.config.name, "removed resource");
        self.emit(|| PoolEvent::Removed(resource));
    }

    fn reject(&self) -> PoolError {
        MetricsTracker::record(&self.metrics.acquire_rejections);
        debug!(pool = %self.config.name, "acquire refused, pool is not open");
        PoolError::NotOpen
    }

    fn timed_out(&self, budget: Duration) -> PoolError {
        MetricsTracker::record(&self.metrics.acquire_timeouts);
        debug!(pool = %self.config.name, ?budget, "acquire timed out");
        PoolError::Timeout(budget)
    }

    fn cancelled(&self, error: PoolError) -> PoolError {
        MetricsTracker::record(&self.metrics.cancellations);
        debug!(pool = %self.config.name, "wait cancelled");
        error
    }

    fn emit(&self, event: impl FnOnce() -> PoolEvent<R>) {
        if let Some(observer) = &self.observer {
            observer.on_event(&event());
        }
    }
}

impl<R: Clone + PartialEq> Default for ResourcePool<R> {
    fn default() -> Self {
        Self::new(PoolConfiguration::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::ChannelObserver;

    fn open_pool(resources: Vec<&'static str>) -> ResourcePool<&'static str> {
        ResourcePool::with_resources(resources, PoolConfiguration::new().opened())
    }

    #[test]
    fn test_resource_pool_basic() {
        let pool = open_pool(vec!["a", "b", "c"]);

        let resource = pool.acquire().unwrap();
        assert_eq!(resource, "a");
        assert!(pool.is_in_use(&"a"));
        assert_eq!(pool.available_count(), 2);

        pool.release(&resource);
        assert_eq!(pool.available_count(), 3);
        assert_eq!(pool.in_use_count(), 0);
    }

    #[test]
    fn test_new_pool_starts_closed() {
        let pool = ResourcePool::with_resources(vec![1], PoolConfiguration::default());
        assert_eq!(pool.state(), PoolState::Closed);
        assert_eq!(pool.acquire(), Err(PoolError::NotOpen));
        assert_eq!(pool.acquire_timeout(Duration::from_secs(5)), Err(PoolError::NotOpen));
        assert_eq!(pool.available_count(), 1);

        pool.open();
        pool.open();
        assert_eq!(pool.state(), PoolState::Open);
        assert_eq!(pool.acquire(), Ok(1));
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let pool = open_pool(vec!["a"]);
        {
            let guard = pool.acquire_guard().unwrap();
            assert_eq!(*guard, "a");
            assert_eq!(pool.try_acquire(), None);
        }
        assert_eq!(pool.try_acquire(), Some("a"));
    }

    #[test]
    fn test_detached_guard_stays_in_use() {
        let pool = open_pool(vec!["a"]);
        let resource = pool.acquire_guard_timeout(Duration::from_millis(10)).unwrap().detach();
        assert!(pool.is_in_use(&resource));
        pool.release(&resource);
        assert!(!pool.is_in_use(&resource));
    }

    #[test]
    fn test_duplicate_resources_occupy_separate_slots() {
        let pool = open_pool(vec!["a", "a"]);
        assert_eq!(pool.tracked_count(), 2);

        let first = pool.acquire().unwrap();
        let second = pool.acquire().unwrap();
        assert_eq!(first, second);
        assert_eq!(pool.in_use_count(), 2);

        pool.release(&first);
        assert_eq!(pool.in_use_count(), 1);
        assert!(pool.remove_now(&"a"));
        assert_eq!(pool.tracked_count(), 1);
    }

    #[test]
    fn test_release_unknown_is_noop() {
        let pool = open_pool(vec!["a"]);
        pool.release(&"zzz");
        pool.release(&"a");
        assert_eq!(pool.available_count(), 1);
        assert_eq!(pool.get_metrics().total_released, 0);
    }

    #[test]
    fn test_remove_now_only_touches_available() {
        let pool = open_pool(vec!["a", "b"]);
        let held = pool.acquire().unwrap();

        assert!(!pool.remove_now(&held));
        assert!(!pool.remove_now(&"missing"));
        assert!(pool.remove_now(&"b"));
        assert_eq!(pool.tracked_count(), 1);
    }

    #[test]
    fn test_remove_untracked_returns_false() {
        let pool = open_pool(vec!["a"]);
        assert!(!pool.remove(&"missing"));
        assert_eq!(
            pool.remove_cancellable(&"missing", &CancellationToken::new()),
            Err(PoolError::NotTracked)
        );
        assert!(pool.remove(&"a"));
        assert!(!pool.contains(&"a"));
    }

    #[test]
    fn test_capacity_limits_add() {
        let pool = ResourcePool::new(PoolConfiguration::new().with_max_pool_size(2));
        assert!(pool.add(1));
        assert!(pool.add(2));
        assert!(!pool.add(3));
        assert_eq!(pool.tracked_count(), 2);
    }

    #[test]
    fn test_close_without_resources_in_use() {
        let pool = open_pool(vec!["a"]);
        pool.close();
        assert!(!pool.is_open());
        assert_eq!(pool.try_acquire(), None);
        pool.close();
    }

    #[test]
    fn test_cancelled_token_fails_wait() {
        let pool: ResourcePool<u32> = ResourcePool::new(PoolConfiguration::new().opened());
        let token = CancellationToken::new();
        token.cancel();

        assert_eq!(pool.acquire_cancellable(None, &token), Err(PoolError::Cancelled));
        assert_eq!(pool.get_metrics().cancellations, 1);
    }

    #[test]
    fn test_huge_poll_interval_still_times_out() {
        let config = PoolConfiguration::new()
            .opened()
            .with_poll_interval(Duration::MAX);
        let pool: ResourcePool<u32> = ResourcePool::new(config);
        let token = CancellationToken::new();

        let timeout = Duration::from_millis(20);
        assert_eq!(
            pool.acquire_cancellable(Some(timeout), &token),
            Err(PoolError::Timeout(timeout))
        );
    }

    #[test]
    fn test_huge_poll_interval_close_and_remove() {
        let config = PoolConfiguration::new()
            .opened()
            .with_poll_interval(Duration::MAX);
        let pool = ResourcePool::with_resources(vec!["a"], config);
        let token = CancellationToken::new();

        let held = pool.acquire().unwrap();
        let remover = std::thread::scope(|scope| {
            let remover = scope.spawn(|| pool.remove_cancellable(&"a", &token));
            std::thread::sleep(Duration::from_millis(50));
            pool.release(&held);
            remover.join().unwrap()
        });
        assert_eq!(remover, Ok(()));

        assert!(pool.add("b"));
        assert_eq!(pool.close_cancellable(&token), Ok(()));
        assert!(!pool.is_open());
    }

    #[test]
    fn test_observer_sees_events_in_order() {
        let (observer, events) = ChannelObserver::<&'static str>::new();
        let pool = ResourcePool::<&'static str>::new(PoolConfiguration::default())
            .with_observer(Arc::new(observer));

        pool.open();
        pool.add("a");
        let resource = pool.acquire().unwrap();
        pool.release(&resource);
        assert!(pool.remove_now(&"a"));
        pool.close_now();

        let seen: Vec<_> = events.try_iter().collect();
        assert_eq!(
            seen,
            vec![
                PoolEvent::Opened,
                PoolEvent::Added("a"),
                PoolEvent::Acquired("a"),
                PoolEvent::Released("a"),
                PoolEvent::Removed("a"),
                PoolEvent::Closed,
            ]
        );
    }

    #[test]
    fn test_health_and_metrics() {
        let pool = open_pool(vec!["a", "b"]);
        let _held = pool.acquire().unwrap();

        let health = pool.get_health_status();
        assert!(health.is_open);
        assert_eq!(health.in_use_resources, 1);

        let exported = pool.export_metrics();
        assert_eq!(exported["total_added"], "2");
        assert_eq!(exported["total_acquired"], "1");
    }

    #[tokio::test]
    async fn test_async_acquire() {
        let pool = open_pool(vec!["a"]);
        let resource = pool.acquire_async().await.unwrap();
        assert_eq!(resource, "a");
    }

    #[tokio::test]
    async fn test_async_acquire_times_out() {
        let pool: ResourcePool<u8> = ResourcePool::new(
            PoolConfiguration::new()
                .opened()
                .with_timeout(Duration::from_millis(30)),
        );
        assert_eq!(
            pool.acquire_async().await,
            Err(PoolError::Timeout(Duration::from_millis(30)))
        );
    }

    #[tokio::test]
    async fn test_async_acquire_cancelled() {
        let pool: ResourcePool<u8> = ResourcePool::new(PoolConfiguration::new().opened());
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        assert_eq!(
            pool.acquire_async_cancellable(&token).await,
            Err(PoolError::Cancelled)
        );
    }
}
