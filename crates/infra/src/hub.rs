use eapteka_domain::{DeliveryEvent, Topic};
use std::{
    collections::HashMap,
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, PoisonError, RwLock,
    },
    time::Duration,
};
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::{
    sync::CancellationToken,
    task::{task_tracker::TaskTrackerToken, TaskTracker},
};
use tracing::{error, info, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HubError {
    #[error("The hub is shutting down and does not accept new subscribers")]
    ShuttingDown,
    #[error("Workers and subscribers did not finish within {0:?}")]
    ShutdownTimeout(Duration),
}

struct Subscriber {
    topic: Topic,
    sender: mpsc::Sender<DeliveryEvent>,
}

struct HubInner {
    subscribers: RwLock<HashMap<u64, Subscriber>>,
    next_id: AtomicU64,
    buffer: usize,
    shutdown_timeout: Option<Duration>,
    shutdown: CancellationToken,
    tracker: TaskTracker,
}

impl HubInner {
    fn remove(&self, id: u64) -> bool {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }
}

/// Fans `DeliveryEvent`s out to every live subscriber of the event's `Topic`.
///
/// Every subscriber owns a bounded queue. Publishing never waits on a
/// subscriber: a subscriber whose queue is full or closed is removed from
/// the hub, so every subscriber that stays joined has received every event
/// of its topic. A removed subscriber sees `recv() == None` once its queue
/// is drained.
///
/// The hub also owns the lifecycle of the background workers. `shutdown`
/// cancels them, disconnects every subscriber and waits until all workers
/// and subscriptions are gone.
#[derive(Clone)]
pub struct SubscriberHub {
    inner: Arc<HubInner>,
}

impl SubscriberHub {
    pub fn new(buffer: usize, shutdown_timeout: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(HubInner {
                subscribers: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                buffer: buffer.max(1),
                shutdown_timeout,
                shutdown: CancellationToken::new(),
                tracker: TaskTracker::new(),
            }),
        }
    }

    /// Registers a new subscriber of the given `Topic`
    pub fn join(&self, topic: Topic) -> Result<Subscription, HubError> {
        let mut subscribers = self
            .inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        // Checked under the lock so no subscriber is added after `shutdown` cleared the map
        if self.inner.shutdown.is_cancelled() {
            return Err(HubError::ShuttingDown);
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel(self.inner.buffer);
        subscribers.insert(id, Subscriber { topic, sender });

        Ok(Subscription {
            id,
            topic,
            receiver,
            hub: Arc::clone(&self.inner),
            _tracked: self.inner.tracker.token(),
        })
    }

    /// Offers the event to every current subscriber of its topic and returns
    /// how many of them accepted it
    pub fn publish(&self, event: DeliveryEvent) -> usize {
        if self.inner.shutdown.is_cancelled() {
            return 0;
        }
        let topic = event.topic();
        let mut delivered = 0;
        let mut evicted = Vec::new();
        {
            let subscribers = self
                .inner
                .subscribers
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            for (id, subscriber) in subscribers.iter().filter(|(_, s)| s.topic == topic) {
                match subscriber.sender.try_send(event.clone()) {
                    Ok(()) => delivered += 1,
                    Err(TrySendError::Full(_)) => {
                        warn!("Subscriber {} of {:?} is not keeping up", id, topic);
                        evicted.push(*id);
                    }
                    Err(TrySendError::Closed(_)) => evicted.push(*id),
                }
            }
        }
        for id in evicted {
            if self.inner.remove(id) {
                info!("Removed subscriber {} of {:?}", id, topic);
            }
        }

        delivered
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|s| s.topic == topic)
            .count()
    }

    /// Runs a background worker that `shutdown` waits for
    pub fn spawn_worker<F>(&self, worker: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.inner.tracker.spawn(worker);
    }

    /// Cancelled when the hub starts shutting down
    pub fn shutdown_token(&self) -> CancellationToken {
        self.inner.shutdown.clone()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    /// Stops the workers, disconnects every subscriber and waits until all
    /// of them are done. Calling it again waits for the same barrier.
    pub async fn shutdown(&self) -> Result<(), HubError> {
        info!("Subscriber hub shutting down");
        {
            let mut subscribers = self
                .inner
                .subscribers
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            self.inner.shutdown.cancel();
            subscribers.clear();
        }
        self.inner.tracker.close();

        match self.inner.shutdown_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.inner.tracker.wait())
                .await
                .map_err(|_| {
                    error!(
                        "Shutdown timed out after {:?} with {} tasks still running",
                        timeout,
                        self.inner.tracker.len()
                    );
                    HubError::ShutdownTimeout(timeout)
                }),
            None => {
                self.inner.tracker.wait().await;
                info!("Subscriber hub shutdown complete");
                Ok(())
            }
        }
    }
}

/// A live registration in the `SubscriberHub`. Dropping it leaves the hub.
pub struct Subscription {
    id: u64,
    topic: Topic,
    receiver: mpsc::Receiver<DeliveryEvent>,
    hub: Arc<HubInner>,
    _tracked: TaskTrackerToken,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// The next event of this subscription. `None` once the hub has shut down
    /// and every queued event was received.
    pub async fn recv(&mut self) -> Option<DeliveryEvent> {
        self.receiver.recv().await
    }

    /// Cancelled when the hub starts shutting down
    pub fn shutdown_token(&self) -> CancellationToken {
        self.hub.shutdown.clone()
    }

    pub fn leave(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.remove(self.id);
    }
}
