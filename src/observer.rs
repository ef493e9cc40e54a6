//! Event hooks for pool activity

use crossbeam::channel::{Receiver, Sender, unbounded};

/// Something that happened inside a pool
///
/// Events are delivered after the pool lock has been released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolEvent<R> {
    /// The pool was opened
    Opened,

    /// A resource became available for the first time
    Added(R),

    /// A resource was refused because the pool is at capacity
    AddRejected(R),

    /// A resource left the pool for good
    Removed(R),

    /// A removal is blocked until the resource is released
    WaitingToRemove(R),

    /// A resource was checked out
    Acquired(R),

    /// A checked-out resource was returned
    Released(R),

    /// A close is blocked until the remaining resources are released
    WaitingToClose { in_use: usize },

    /// The pool was closed
    Closed,
}

/// Receives pool events
///
/// # Examples
///
/// ```
/// use esox_resourcepool::{PoolEvent, PoolObserver, PoolConfiguration, ResourcePool};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// #[derive(Default)]
/// struct CountAdds(AtomicUsize);
///
/// impl PoolObserver<&'static str> for CountAdds {
///     fn on_event(&self, event: &PoolEvent<&'static str>) {
///         if matches!(event, PoolEvent::Added(_)) {
///             self.0.fetch_add(1, Ordering::Relaxed);
///         }
///     }
/// }
///
/// let counter = Arc::new(CountAdds::default());
/// let pool = ResourcePool::<&'static str>::new(PoolConfiguration::default())
///     .with_observer(counter.clone());
/// pool.add("a");
/// pool.add("b");
/// assert_eq!(counter.0.load(Ordering::Relaxed), 2);
/// ```
pub trait PoolObserver<R>: Send + Sync {
    fn on_event(&self, event: &PoolEvent<R>);
}

/// Observer that forwards every event into a channel
pub struct ChannelObserver<R> {
    sender: Sender<PoolEvent<R>>,
}

impl<R> ChannelObserver<R> {
    /// Create an observer together with the receiving end of its channel
    pub fn new() -> (Self, Receiver<PoolEvent<R>>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }
}

impl<R: Clone + Send> PoolObserver<R> for ChannelObserver<R> {
    fn on_event(&self, event: &PoolEvent<R>) {
        // A dropped receiver just means nobody is listening any more.
        let _ = self.sender.send(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_observer_forwards() {
        let (observer, events) = ChannelObserver::new();
        observer.on_event(&PoolEvent::Added(7));
        observer.on_event(&PoolEvent::WaitingToClose { in_use: 2 });

        assert_eq!(events.try_recv().unwrap(), PoolEvent::Added(7));
        assert_eq!(events.try_recv().unwrap(), PoolEvent::WaitingToClose { in_use: 2 });
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_channel_observer_without_receiver() {
        let (observer, events) = ChannelObserver::<u8>::new();
        drop(events);
        observer.on_event(&PoolEvent::Closed);
    }
}
