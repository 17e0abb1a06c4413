//! In-process change hub and subscription handles.
//!
//! # Responsibility
//! - Register watchers scoped to a collection or item address.
//! - Fan out invalidation events to every watcher whose scope matches.
//!
//! # Invariants
//! - Collection-scoped watchers also observe item events; item-scoped
//!   watchers only observe their own record.
//! - Watcher ids are assigned monotonically and never reused.

use crate::contract::BookUri;
use std::collections::BTreeMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

/// Invalidation signal for one committed write.
///
/// Carries the affected address only; subscribers re-query for fresh data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub uri: BookUri,
}

#[derive(Default)]
struct HubState {
    next_watcher_id: u64,
    watchers: BTreeMap<u64, Watcher>,
}

struct Watcher {
    scope: BookUri,
    sender: Sender<ChangeEvent>,
}

/// Registry of change watchers shared across provider operations.
#[derive(Clone, Default)]
pub struct ChangeHub {
    state: Arc<Mutex<HubState>>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers interest in invalidation events for `scope`.
    ///
    /// The returned handle unsubscribes on drop.
    pub fn subscribe(&self, scope: BookUri) -> Subscription {
        let (sender, receiver) = channel();
        let mut state = lock_state(&self.state);
        let id = state.next_watcher_id;
        state.next_watcher_id += 1;
        state.watchers.insert(id, Watcher { scope, sender });

        Subscription {
            id,
            state: Arc::clone(&self.state),
            receiver,
        }
    }

    /// Delivers an invalidation event to every matching watcher.
    ///
    /// Watchers whose receiving side is gone are pruned here.
    pub fn notify(&self, uri: BookUri) {
        let mut state = lock_state(&self.state);
        let mut dead = Vec::new();

        for (id, watcher) in &state.watchers {
            if !scope_matches(watcher.scope, uri) {
                continue;
            }
            if watcher.sender.send(ChangeEvent { uri }).is_err() {
                dead.push(*id);
            }
        }

        for id in dead {
            state.watchers.remove(&id);
        }
    }

    /// Returns the number of registered watchers.
    pub fn watcher_count(&self) -> usize {
        lock_state(&self.state).watchers.len()
    }
}

fn scope_matches(scope: BookUri, uri: BookUri) -> bool {
    scope == uri || (scope == BookUri::Collection && uri.is_item())
}

fn lock_state(state: &Mutex<HubState>) -> MutexGuard<'_, HubState> {
    // Hub state stays consistent even if a notifying thread panicked,
    // so a poisoned lock is safe to re-enter.
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Handle to a sequence of invalidation events for one scope.
pub struct Subscription {
    id: u64,
    state: Arc<Mutex<HubState>>,
    receiver: Receiver<ChangeEvent>,
}

impl Subscription {
    /// Returns the next pending event without blocking.
    pub fn try_recv(&self) -> Option<ChangeEvent> {
        self.receiver.try_recv().ok()
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<ChangeEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        lock_state(&self.state).watchers.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeHub, ChangeEvent};
    use crate::contract::BookUri;

    #[test]
    fn item_events_reach_item_and_collection_watchers() {
        let hub = ChangeHub::new();
        let collection = hub.subscribe(BookUri::Collection);
        let same_item = hub.subscribe(BookUri::Item(1));
        let other_item = hub.subscribe(BookUri::Item(2));

        hub.notify(BookUri::Item(1));

        assert_eq!(
            collection.try_recv(),
            Some(ChangeEvent { uri: BookUri::Item(1) })
        );
        assert_eq!(
            same_item.try_recv(),
            Some(ChangeEvent { uri: BookUri::Item(1) })
        );
        assert_eq!(other_item.try_recv(), None);
    }

    #[test]
    fn collection_events_do_not_reach_item_watchers() {
        let hub = ChangeHub::new();
        let collection = hub.subscribe(BookUri::Collection);
        let item = hub.subscribe(BookUri::Item(1));

        hub.notify(BookUri::Collection);

        assert!(collection.try_recv().is_some());
        assert_eq!(item.try_recv(), None);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let hub = ChangeHub::new();
        let subscription = hub.subscribe(BookUri::Collection);
        assert_eq!(hub.watcher_count(), 1);

        drop(subscription);
        assert_eq!(hub.watcher_count(), 0);

        // Notifying with no watchers is a no-op.
        hub.notify(BookUri::Collection);
    }

    #[test]
    fn drain_returns_all_pending_events() {
        let hub = ChangeHub::new();
        let subscription = hub.subscribe(BookUri::Collection);

        hub.notify(BookUri::Item(1));
        hub.notify(BookUri::Item(2));
        hub.notify(BookUri::Collection);

        let events = subscription.drain();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].uri, BookUri::Item(1));
        assert_eq!(events[2].uri, BookUri::Collection);
    }
}
