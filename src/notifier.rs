//! Fan-out "something changed" signal for live viewers.
//!
//! Writers call [`Notifier::notify`] after committing a change. Every current
//! [`Subscription`] is offered one signal; the signal carries no data, so a
//! woken viewer must re-read the state it displays. Delivery is best effort:
//! nothing is queued for a subscriber beyond a single pending wake-up.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Notify};
use uuid::Uuid;

/// Sends started by `notify` that haven't completed yet, per subscription.
#[derive(Default)]
struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

impl InFlight {
    fn start(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    fn finish(&self) {
        if self.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }

    async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            // Register before checking the count so a finish() in between isn't missed.
            notified.as_mut().enable();
            if self.count.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}

struct Slot {
    tx: mpsc::Sender<()>,
    in_flight: Arc<InFlight>,
}

#[derive(Default)]
struct Registry {
    subscriptions: HashMap<Uuid, Slot>,
}

/// Handle to a subscription registry. Clones share the same registry.
#[derive(Clone, Default)]
pub struct Notifier {
    registry: Arc<Mutex<Registry>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new listener. Dropping the returned subscription unregisters it.
    pub fn subscribe(&self) -> Subscription {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(1);
        let in_flight = Arc::new(InFlight::default());

        match self.registry.lock() {
            Ok(mut registry) => {
                registry.subscriptions.insert(
                    id,
                    Slot {
                        tx,
                        in_flight: Arc::clone(&in_flight),
                    },
                );
            }
            Err(_) => log::error!("Notifier registry lock poisoned; subscription {id} will never fire"),
        }
        log::debug!("Subscription {id} registered");

        Subscription {
            id,
            rx,
            in_flight,
            registry: Arc::clone(&self.registry),
            released: false,
        }
    }

    /// Offer one signal to every current subscriber. Never blocks on a subscriber:
    /// each offer runs on its own task, and a subscriber that already has a
    /// wake-up pending keeps just that one.
    pub fn notify(&self) {
        let registry = match self.registry.lock() {
            Ok(guard) => guard,
            Err(_) => {
                log::error!("Notifier registry lock poisoned; dropping notification");
                return;
            }
        };
        let runtime = tokio::runtime::Handle::try_current().ok();

        for slot in registry.subscriptions.values() {
            let Some(runtime) = runtime.as_ref() else {
                // No runtime to run the send on: offer without waiting.
                let _ = slot.tx.try_send(());
                continue;
            };
            let tx = slot.tx.clone();
            let in_flight = Arc::clone(&slot.in_flight);
            in_flight.start();
            runtime.spawn(async move {
                // Full: a wake-up is already pending, this one folds into it.
                // Closed: the subscriber went away.
                if let Err(TrySendError::Closed(())) = tx.try_send(()) {
                    log::trace!("Dropped signal for a closed subscription");
                }
                in_flight.finish();
            });
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.registry
            .lock()
            .map(|r| r.subscriptions.len())
            .unwrap_or(0)
    }
}

/// One listener's registration. Owned by the viewer connection for its lifetime.
pub struct Subscription {
    id: Uuid,
    rx: mpsc::Receiver<()>,
    in_flight: Arc<InFlight>,
    registry: Arc<Mutex<Registry>>,
    released: bool,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Wait for the next signal. Returns None once the subscription is released.
    pub async fn recv(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    /// Unregister, then wait for every send already started for this
    /// subscription to finish.
    pub async fn unsubscribe(mut self) {
        self.release();
        self.in_flight.wait_idle().await;
        log::debug!("Subscription {} closed", self.id);
    }

    /// Remove from the registry and close the channel. Offers still in flight
    /// find the channel closed, so nothing waits on this subscriber again.
    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        match self.registry.lock() {
            Ok(mut registry) => {
                registry.subscriptions.remove(&self.id);
            }
            Err(_) => log::error!("Notifier registry lock poisoned; leaking subscription {}", self.id),
        }
        self.rx.close();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
