//! Base for state-holding entities.
//!
//! An entity embeds a [`Model`] to publish change notifications on the shared
//! broker. Notifications carry no diff: every call is a full "something
//! changed" signal and subscribers re-read whatever they need.

use serde::Serialize;
use tracing::error;

use crate::events::{EventBroker, Payload};

/// Change-notification capability shared by every entity.
///
/// Notifications are only queued. Code that mutates an entity outside a
/// presenter handler must call [`EventBroker::flush`] afterwards, or no
/// subscriber hears about the change.
#[derive(Debug, Clone)]
pub struct Model {
    events: EventBroker,
}

impl Model {
    /// Bind to a broker.
    #[must_use]
    pub const fn new(events: EventBroker) -> Self {
        Self { events }
    }

    /// The broker this entity publishes on.
    #[must_use]
    pub const fn events(&self) -> &EventBroker {
        &self.events
    }

    /// Queue a change notification carrying `payload`.
    ///
    /// The notification is delivered when the broker next drains its queue;
    /// see [`EventBroker::post`].
    pub fn emit_changes<T: Serialize + ?Sized>(&self, event: impl AsRef<str>, payload: &T) {
        let event = event.as_ref();
        match Payload::from_serialize(payload) {
            Ok(payload) => self.events.post(event, payload),
            Err(err) => error!(event, error = %err, "failed to serialize change payload"),
        }
    }
}

/// An entity whose own snapshot is the default change payload.
pub trait Entity {
    /// Serializable view of the entity's current state.
    type Snapshot: Serialize;

    /// The embedded model.
    fn model(&self) -> &Model;

    /// Current state.
    fn snapshot(&self) -> Self::Snapshot;

    /// Queue a change notification whose payload is the entity itself.
    ///
    /// Nothing is delivered until the broker is flushed.
    fn emit_snapshot(&self, event: impl AsRef<str>) {
        self.model().emit_changes(event, &self.snapshot());
    }
}
