//! Ball state notifications
//!
//! Consumers implement [`BallStateObserver`] and register with the
//! simulator. Callbacks run synchronously on the simulator thread, in
//! registration order, and must return quickly: a slow observer delays the
//! next physics tick.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};

/// A ball activity transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallEvent {
    /// The ball was given a new velocity and is moving
    Active,
    /// The ball came to rest
    Inactive,
}

/// Receives ball activity transitions
pub trait BallStateObserver: Send + Sync {
    /// The ball started moving
    fn on_active(&self);

    /// The ball stopped moving
    fn on_inactive(&self);
}

/// Shared observer handle
pub type ObserverHandle = Arc<dyn BallStateObserver>;

/// Ordered set of observers
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Mutex<Vec<ObserverHandle>>,
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("len", &self.len())
            .finish()
    }
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer. Registering the same handle twice is ignored.
    pub fn subscribe(&self, observer: ObserverHandle) {
        let mut observers = self.lock();
        if !observers.iter().any(|o| Arc::ptr_eq(o, &observer)) {
            observers.push(observer);
        }
    }

    /// Remove an observer; no-op if it was never registered
    pub fn unsubscribe(&self, observer: &ObserverHandle) {
        self.lock().retain(|o| !Arc::ptr_eq(o, observer));
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn notify_active(&self) {
        self.notify(BallEvent::Active);
    }

    pub fn notify_inactive(&self) {
        self.notify(BallEvent::Inactive);
    }

    /// Deliver an event to every observer in registration order
    ///
    /// Works on a snapshot of the list, so callbacks may subscribe,
    /// unsubscribe or stop the simulator without deadlocking.
    pub fn notify(&self, event: BallEvent) {
        let observers: Vec<ObserverHandle> = self.lock().clone();
        log::debug!("Notifying {} observer(s): {event:?}", observers.len());
        for observer in &observers {
            match event {
                BallEvent::Active => observer.on_active(),
                BallEvent::Inactive => observer.on_inactive(),
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ObserverHandle>> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Forwards transitions into a channel
///
/// A dropped receiver is not an error; events are simply discarded.
#[derive(Debug)]
pub struct ChannelObserver {
    tx: Sender<BallEvent>,
}

impl ChannelObserver {
    pub fn new(tx: Sender<BallEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: BallEvent) {
        let _ = self.tx.send(event);
    }
}

impl BallStateObserver for ChannelObserver {
    fn on_active(&self) {
        self.send(BallEvent::Active);
    }

    fn on_inactive(&self) {
        self.send(BallEvent::Inactive);
    }
}
