//! Base for view components.
//!
//! A view owns one root node (its container) and a broker handle. Rendering
//! is done by assigning properties: each property maps to exactly one display
//! update, applied immediately. [`View::render`] applies a typed partial
//! snapshot field by field and hands back the container for mounting.

use std::fmt::Display;

use crate::dom::Node;
use crate::events::EventBroker;

/// Shared state and display helpers for every view.
#[derive(Debug, Clone)]
pub struct Component {
    container: Node,
    events: EventBroker,
}

#[allow(clippy::unused_self)]
impl Component {
    /// Bind to a container node and a broker.
    #[must_use]
    pub const fn new(container: Node, events: EventBroker) -> Self {
        Self { container, events }
    }

    /// The root node.
    #[must_use]
    pub const fn container(&self) -> &Node {
        &self.container
    }

    /// The broker user intents are emitted on.
    #[must_use]
    pub const fn events(&self) -> &EventBroker {
        &self.events
    }

    /// Write `value` as the text of `node`. A missing node is ignored.
    pub fn set_text(&self, node: Option<&Node>, value: impl Display) {
        if let Some(node) = node {
            node.set_text(&value.to_string());
        }
    }

    /// Set image source and alternate text. A missing node is ignored.
    pub fn set_image(&self, node: Option<&Node>, src: &str, alt: Option<&str>) {
        if let Some(node) = node {
            node.set_attr("src", src);
            if let Some(alt) = alt {
                node.set_attr("alt", alt);
            }
        }
    }

    /// Add or remove a class.
    pub fn toggle_class(&self, node: &Node, class: &str, on: bool) {
        node.toggle_class(class, on);
    }

    /// Enable or disable an element. A missing node is ignored.
    pub fn set_disabled(&self, node: Option<&Node>, disabled: bool) {
        if let Some(node) = node {
            node.set_disabled(disabled);
        }
    }

    /// Hide an element.
    pub fn set_hidden(&self, node: &Node) {
        node.set_hidden(true);
    }

    /// Show an element.
    pub fn set_visible(&self, node: &Node) {
        node.set_hidden(false);
    }
}

/// A view with a typed partial snapshot.
pub trait View {
    /// Partial snapshot; every `Some` field is applied, `None` fields are left alone.
    type Patch: Default;

    /// The embedded component.
    fn component(&self) -> &Component;

    /// Apply a partial snapshot.
    fn apply(&mut self, patch: Self::Patch);

    /// Apply a partial snapshot and return the root node for mounting.
    fn render(&mut self, patch: Self::Patch) -> Node {
        self.apply(patch);
        self.component().container().clone()
    }

    /// The root node.
    fn container(&self) -> Node {
        self.component().container().clone()
    }
}
