//! Synchronous one-to-many event dispatch.
//!
//! The bus is an explicit, constructor-injected instance threaded through
//! the controller; there is no process-wide default. Dispatch is
//! synchronous and in subscription order, and the bus performs no I/O.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use super::event::ChallengeEvent;

type Subscriber = Box<dyn FnMut(&ChallengeEvent)>;

/// One-way pub-sub channel for challenge notifications.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    /// Create a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a subscriber. Subscribers are invoked in attachment order.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&ChallengeEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Publish an event to every subscriber.
    pub fn publish(&mut self, event: ChallengeEvent) {
        trace!(event = event.name(), "publish");
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
    }

    /// Number of attached subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Shared recording subscriber, mainly for tests and debugging.
///
/// Execution is single-threaded, so `Rc<RefCell<_>>` is enough to share
/// the log between the bus and the inspecting test.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<ChallengeEvent>>>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach this log to a bus.
    pub fn attach(&self, bus: &mut EventBus) {
        let events = Rc::clone(&self.events);
        bus.subscribe(move |event| events.borrow_mut().push(event.clone()));
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ChallengeEvent> {
        self.events.borrow().clone()
    }

    /// Names of recorded events, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(ChallengeEvent::name).collect()
    }

    /// Count of recorded events with the given name.
    #[must_use]
    pub fn count_of(&self, name: &str) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.name() == name)
            .count()
    }

    /// Clear the log.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}
