//! Publish/subscribe broker connecting entities, views and the presenter.
//!
//! # Dispatch model
//!
//! The broker is single-threaded. Subscribers live in two registries: a map
//! from exact event name to an ordered subscriber list, and an ordered list of
//! pattern subscribers (a predicate over the event name). For every event the
//! exact subscribers run first, in subscription order, then every matching
//! pattern subscriber, in subscription order.
//!
//! Events go through a FIFO work queue drained by one dispatch loop. An
//! [`EventBroker::emit`] made while no dispatch is running drains the queue
//! before returning; an emit made from inside a handler only enqueues, and the
//! running loop delivers it after the current event. Every event therefore
//! reaches its subscribers before the outermost `emit` returns, and the call
//! stack never grows with the length of an event chain.
//!
//! Entities publish through [`EventBroker::post`], which only enqueues. This
//! lets a presenter mutate an entity behind a `RefCell` borrow and have the
//! resulting notifications delivered after the borrow is released, when the
//! loop resumes or [`EventBroker::flush`] is called.
//!
//! # Failure isolation
//!
//! A handler returning an error does not stop the dispatch: the failure is
//! logged at error level and counted in the [`DispatchSummary`], and the
//! remaining subscribers still receive the event.

mod names;
mod payload;

pub use names::Event;
pub use payload::Payload;

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use tracing::{debug, error, trace};

use crate::error::AppError;

/// A broker subscriber, called with the event name and payload.
pub type Handler = Rc<dyn Fn(&str, &Payload) -> Result<(), AppError>>;

/// Predicate deciding whether a pattern subscriber receives an event.
pub type EventMatcher = Rc<dyn Fn(&str) -> bool>;

/// Handle returned by the subscribe methods, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Outcome of draining the work queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Events taken off the queue.
    pub events: usize,
    /// Handler invocations made.
    pub deliveries: usize,
    /// Handler invocations that returned an error.
    pub failures: usize,
    /// The call only enqueued because a dispatch was already running.
    pub deferred: bool,
}

struct Subscriber {
    id: SubscriptionId,
    handler: Handler,
}

struct PatternSubscriber {
    id: SubscriptionId,
    matcher: EventMatcher,
    handler: Handler,
}

struct Envelope {
    name: String,
    payload: Payload,
}

#[derive(Default)]
struct BrokerInner {
    exact: RefCell<HashMap<String, Vec<Subscriber>>>,
    patterns: RefCell<Vec<PatternSubscriber>>,
    queue: RefCell<VecDeque<Envelope>>,
    dispatching: Cell<bool>,
    next_id: Cell<u64>,
}

/// The publish/subscribe hub.
///
/// Cheaply cloneable; clones share the same registries and queue.
#[derive(Clone, Default)]
pub struct EventBroker {
    inner: Rc<BrokerInner>,
}

impl std::fmt::Debug for EventBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBroker")
            .field("exact", &self.inner.exact.borrow().len())
            .field("patterns", &self.inner.patterns.borrow().len())
            .field("queued", &self.inner.queue.borrow().len())
            .field("dispatching", &self.inner.dispatching.get())
            .finish()
    }
}

/// Clears the dispatching flag even if a handler panics.
struct DispatchGuard<'a>(&'a Cell<bool>);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl EventBroker {
    /// Create an empty broker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> SubscriptionId {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        SubscriptionId(id)
    }

    /// Subscribe to one event name.
    pub fn subscribe<F>(&self, name: impl AsRef<str>, handler: F) -> SubscriptionId
    where
        F: Fn(&Payload) -> Result<(), AppError> + 'static,
    {
        let id = self.next_id();
        self.inner
            .exact
            .borrow_mut()
            .entry(name.as_ref().to_string())
            .or_default()
            .push(Subscriber {
                id,
                handler: Rc::new(move |_, payload| handler(payload)),
            });
        id
    }

    /// Subscribe to every event whose name satisfies `matcher`.
    pub fn subscribe_matching<M, F>(&self, matcher: M, handler: F) -> SubscriptionId
    where
        M: Fn(&str) -> bool + 'static,
        F: Fn(&Payload) -> Result<(), AppError> + 'static,
    {
        self.push_pattern(matcher, move |_, payload| handler(payload))
    }

    fn push_pattern<M, F>(&self, matcher: M, handler: F) -> SubscriptionId
    where
        M: Fn(&str) -> bool + 'static,
        F: Fn(&str, &Payload) -> Result<(), AppError> + 'static,
    {
        let id = self.next_id();
        self.inner.patterns.borrow_mut().push(PatternSubscriber {
            id,
            matcher: Rc::new(matcher),
            handler: Rc::new(handler),
        });
        id
    }

    /// Subscribe to every event (wildcard).
    ///
    /// The handler receives the event name along with the payload.
    pub fn subscribe_all<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &Payload) -> Result<(), AppError> + 'static,
    {
        self.push_pattern(|_| true, handler)
    }

    /// Remove a subscription from an event name.
    ///
    /// Pattern and wildcard subscriptions are removed by id regardless of
    /// `name`. Returns `false` if nothing was removed.
    pub fn unsubscribe(&self, name: impl AsRef<str>, id: SubscriptionId) -> bool {
        let name = name.as_ref();
        let mut exact = self.inner.exact.borrow_mut();
        if let Some(subscribers) = exact.get_mut(name) {
            let before = subscribers.len();
            subscribers.retain(|s| s.id != id);
            if subscribers.len() != before {
                if subscribers.is_empty() {
                    exact.remove(name);
                }
                return true;
            }
        }
        drop(exact);

        let mut patterns = self.inner.patterns.borrow_mut();
        let before = patterns.len();
        patterns.retain(|s| s.id != id);
        patterns.len() != before
    }

    /// Remove every subscription.
    pub fn unsubscribe_all(&self) {
        self.inner.exact.borrow_mut().clear();
        self.inner.patterns.borrow_mut().clear();
    }

    /// Number of subscriptions currently registered for `name`, patterns included.
    #[must_use]
    pub fn subscriber_count(&self, name: &str) -> usize {
        let exact = self
            .inner
            .exact
            .borrow()
            .get(name)
            .map_or(0, Vec::len);
        let patterns = self
            .inner
            .patterns
            .borrow()
            .iter()
            .filter(|s| (s.matcher)(name))
            .count();
        exact + patterns
    }

    /// Queue an event without dispatching it.
    pub fn post(&self, name: impl AsRef<str>, payload: impl Into<Payload>) {
        let name = name.as_ref().to_string();
        trace!(event = %name, "event queued");
        self.inner.queue.borrow_mut().push_back(Envelope {
            name,
            payload: payload.into(),
        });
    }

    /// Publish an event.
    ///
    /// Dispatches the whole queue unless a dispatch is already running, in
    /// which case the event is delivered by that dispatch.
    pub fn emit(&self, name: impl AsRef<str>, payload: impl Into<Payload>) -> DispatchSummary {
        self.post(name, payload);
        self.flush()
    }

    /// Deliver every queued event.
    pub fn flush(&self) -> DispatchSummary {
        if self.inner.dispatching.get() {
            return DispatchSummary {
                deferred: true,
                ..DispatchSummary::default()
            };
        }
        self.inner.dispatching.set(true);
        let _guard = DispatchGuard(&self.inner.dispatching);

        let mut summary = DispatchSummary::default();
        loop {
            let next = self.inner.queue.borrow_mut().pop_front();
            let Some(envelope) = next else { break };
            summary.events += 1;
            self.deliver(&envelope, &mut summary);
        }
        summary
    }

    /// Number of events waiting in the queue.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.queue.borrow().len()
    }

    fn deliver(&self, envelope: &Envelope, summary: &mut DispatchSummary) {
        // Snapshot the handlers so they may (un)subscribe while running.
        let mut handlers: Vec<Handler> = self
            .inner
            .exact
            .borrow()
            .get(&envelope.name)
            .map(|subs| subs.iter().map(|s| Rc::clone(&s.handler)).collect())
            .unwrap_or_default();
        let patterns: Vec<(EventMatcher, Handler)> = self
            .inner
            .patterns
            .borrow()
            .iter()
            .map(|s| (Rc::clone(&s.matcher), Rc::clone(&s.handler)))
            .collect();
        for (matcher, handler) in patterns {
            if matcher(&envelope.name) {
                handlers.push(handler);
            }
        }

        debug!(event = %envelope.name, subscribers = handlers.len(), "dispatching event");

        for handler in handlers {
            summary.deliveries += 1;
            if let Err(err) = handler(&envelope.name, &envelope.payload) {
                summary.failures += 1;
                error!(event = %envelope.name, error = %err, "event handler failed");
            }
        }
    }

    /// Build a callback that emits `name` when invoked.
    ///
    /// The call-time payload is shallow-merged with `context`, whose keys win.
    /// Suitable for attaching directly to an interaction listener.
    pub fn trigger(&self, name: impl Into<String>, context: Payload) -> impl Fn(Payload) + 'static {
        let broker = self.clone();
        let name = name.into();
        move |event: Payload| {
            broker.emit(&name, event.merge(context.clone()));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn new_log() -> Rc<RefCell<Vec<String>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn test_handlers_run_in_subscription_order_with_payload() {
        let broker = EventBroker::new();
        let log = new_log();

        for label in ["H1", "H2"] {
            let log = Rc::clone(&log);
            broker.subscribe("X", move |payload| {
                log.borrow_mut()
                    .push(format!("{label}:{}", payload.get_str("p").unwrap()));
                Ok(())
            });
        }

        let summary = broker.emit("X", json!({ "p": "P" }));
        assert_eq!(*log.borrow(), ["H1:P", "H2:P"]);
        assert_eq!(summary.events, 1);
        assert_eq!(summary.deliveries, 2);
        assert_eq!(summary.failures, 0);
    }

    #[test]
    fn test_exact_subscribers_run_before_patterns() {
        let broker = EventBroker::new();
        let log = new_log();

        let l = Rc::clone(&log);
        broker.subscribe_matching(
            |name| name.starts_with("order"),
            move |_| {
                l.borrow_mut().push("pattern".into());
                Ok(())
            },
        );
        let l = Rc::clone(&log);
        broker.subscribe("order:submit", move |_| {
            l.borrow_mut().push("exact".into());
            Ok(())
        });

        broker.emit("order:submit", Payload::empty());
        broker.emit("contacts:submit", Payload::empty());
        assert_eq!(*log.borrow(), ["exact", "pattern"]);
    }

    #[test]
    fn test_wildcard_receives_name() {
        let broker = EventBroker::new();
        let log = new_log();
        let l = Rc::clone(&log);
        broker.subscribe_all(move |name, _| {
            l.borrow_mut().push(name.to_string());
            Ok(())
        });

        broker.emit(Event::ModalOpened, Payload::empty());
        broker.emit(Event::ModalClosed, Payload::empty());
        assert_eq!(*log.borrow(), ["modal:open", "modal:close"]);
    }

    #[test]
    fn test_failing_handler_does_not_stop_siblings() {
        let broker = EventBroker::new();
        let log = new_log();

        broker.subscribe("X", |_| Err(AppError::NoActiveOrder));
        let l = Rc::clone(&log);
        broker.subscribe("X", move |_| {
            l.borrow_mut().push("second".into());
            Ok(())
        });

        let summary = broker.emit("X", Payload::empty());
        assert_eq!(*log.borrow(), ["second"]);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.deliveries, 2);
    }

    #[test]
    fn test_nested_emit_is_queued_and_delivered_before_return() {
        let broker = EventBroker::new();
        let log = new_log();

        let inner = broker.clone();
        let l = Rc::clone(&log);
        broker.subscribe("A", move |_| {
            l.borrow_mut().push("A start".into());
            let nested = inner.emit("B", Payload::empty());
            assert!(nested.deferred);
            l.borrow_mut().push("A end".into());
            Ok(())
        });
        let l = Rc::clone(&log);
        broker.subscribe("B", move |_| {
            l.borrow_mut().push("B".into());
            Ok(())
        });

        let summary = broker.emit("A", Payload::empty());
        assert_eq!(*log.borrow(), ["A start", "A end", "B"]);
        assert_eq!(summary.events, 2);
        assert_eq!(broker.pending(), 0);
    }

    #[test]
    fn test_post_waits_for_flush() {
        let broker = EventBroker::new();
        let log = new_log();
        let l = Rc::clone(&log);
        broker.subscribe("X", move |_| {
            l.borrow_mut().push("X".into());
            Ok(())
        });

        broker.post("X", Payload::empty());
        assert!(log.borrow().is_empty());
        assert_eq!(broker.pending(), 1);

        broker.flush();
        assert_eq!(*log.borrow(), ["X"]);
    }

    #[test]
    fn test_unsubscribe() {
        let broker = EventBroker::new();
        let id = broker.subscribe("X", |_| Ok(()));
        let pattern = broker.subscribe_matching(|_| true, |_| Ok(()));
        assert_eq!(broker.subscriber_count("X"), 2);

        assert!(broker.unsubscribe("X", id));
        assert!(!broker.unsubscribe("X", id));
        assert!(broker.unsubscribe("X", pattern));
        assert_eq!(broker.subscriber_count("X"), 0);
    }

    #[test]
    fn test_unsubscribe_all() {
        let broker = EventBroker::new();
        broker.subscribe("X", |_| Ok(()));
        broker.subscribe_all(|_, _| Ok(()));
        broker.unsubscribe_all();
        assert_eq!(broker.emit("X", Payload::empty()).deliveries, 0);
    }

    #[test]
    fn test_trigger_merges_context_over_event() {
        let broker = EventBroker::new();
        let seen = Rc::new(RefCell::new(None));
        let s = Rc::clone(&seen);
        broker.subscribe("card:open", move |payload| {
            *s.borrow_mut() = Some(payload.clone());
            Ok(())
        });

        let callback = broker.trigger("card:open", Payload::from(json!({ "id": "lot-1" })));
        callback(Payload::from(json!({ "id": "ignored", "button": 0 })));

        assert_eq!(
            seen.borrow().as_ref().unwrap().as_value(),
            &json!({ "id": "lot-1", "button": 0 })
        );
    }
}
