//! Modal dialog hosting every overlay panel.
//!
//! Opening and closing only queue [`Event::ModalOpened`] / [`Event::ModalClosed`];
//! the caller (or the running dispatch) delivers them. The close button and
//! overlay clicks close the modal and flush immediately.

use crate::component::{Component, View};
use crate::dom::{BindingError, Interaction, Node};
use crate::events::{Event, EventBroker, Payload};

const ACTIVE_CLASS: &str = "modal_active";

/// Partial modal state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalPatch {
    pub content: Option<Node>,
}

/// The modal container.
///
/// Cheaply cloneable; clones control the same nodes.
#[derive(Debug, Clone)]
pub struct Modal {
    component: Component,
    content: Node,
}

impl Modal {
    /// Bind to `#modal-container`.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::MissingElement`] if the close button or the
    /// content slot is missing.
    pub fn new(container: Node, events: EventBroker) -> Result<Self, BindingError> {
        let close = container.ensure(".modal__close")?;
        let content = container.ensure(".modal__content")?;
        let modal = Self {
            component: Component::new(container.clone(), events),
            content,
        };

        let this = modal.clone();
        close.on(Interaction::Click, move |_| this.dismiss());

        let this = modal.clone();
        container.on(Interaction::Click, move |event| {
            if event.target == event.current_target {
                this.dismiss();
            }
        });

        Ok(modal)
    }

    /// Whether the modal is shown.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.component.container().has_class(ACTIVE_CLASS)
    }

    /// The content slot.
    #[must_use]
    pub const fn content(&self) -> &Node {
        &self.content
    }

    /// Show the modal and queue [`Event::ModalOpened`].
    pub fn open(&self) {
        self.component
            .toggle_class(self.component.container(), ACTIVE_CLASS, true);
        self.component
            .events()
            .post(Event::ModalOpened, Payload::empty());
    }

    /// Hide the modal, drop its content and queue [`Event::ModalClosed`].
    pub fn close(&self) {
        self.component
            .toggle_class(self.component.container(), ACTIVE_CLASS, false);
        self.content.replace_children(&[]);
        self.component
            .events()
            .post(Event::ModalClosed, Payload::empty());
    }

    /// Close and deliver the notification right away.
    pub fn dismiss(&self) {
        self.close();
        self.component.events().flush();
    }
}

impl View for Modal {
    type Patch = ModalPatch;

    fn component(&self) -> &Component {
        &self.component
    }

    fn apply(&mut self, patch: ModalPatch) {
        if let Some(content) = patch.content {
            self.content.replace_children(&[content]);
        }
    }

    /// Mount the content and open the modal.
    fn render(&mut self, patch: ModalPatch) -> Node {
        self.apply(patch);
        self.open();
        self.component.container().clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::templates::Document;

    fn setup() -> (Document, EventBroker, Modal, Rc<RefCell<Vec<String>>>) {
        let doc = Document::storefront();
        let broker = EventBroker::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        broker.subscribe_matching(
            |name| name.starts_with("modal:"),
            move |_| {
                s.borrow_mut().push("modal".to_string());
                Ok(())
            },
        );
        let modal = Modal::new(doc.ensure("#modal-container").unwrap(), broker.clone()).unwrap();
        (doc, broker, modal, seen)
    }

    #[test]
    fn test_render_mounts_and_opens() {
        let (_doc, broker, mut modal, seen) = setup();
        modal.render(ModalPatch {
            content: Some(Node::element("p").with_text("HEX")),
        });
        assert!(modal.is_open());
        assert_eq!(modal.content().text(), "HEX");
        assert!(seen.borrow().is_empty());

        broker.flush();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_close_button_clears_content() {
        let (doc, _broker, mut modal, seen) = setup();
        modal.render(ModalPatch {
            content: Some(Node::element("p")),
        });
        doc.root().query(".modal__close").unwrap().click();

        assert!(!modal.is_open());
        assert!(modal.content().children().is_empty());
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_only_overlay_click_closes() {
        let (doc, _broker, mut modal, _seen) = setup();
        let inner = Node::element("button");
        modal.render(ModalPatch {
            content: Some(inner.clone()),
        });

        inner.click();
        assert!(modal.is_open());
        doc.ensure("#modal-container").unwrap().click();
        assert!(!modal.is_open());
    }
}
