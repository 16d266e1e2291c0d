//! Order confirmation.

use web_larek_core::Price;

use super::Action;
use crate::component::{Component, View};
use crate::dom::{BindingError, Interaction, Node};
use crate::events::EventBroker;

/// Partial confirmation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuccessPatch {
    /// Amount charged.
    pub total: Option<Price>,
}

/// "Order placed" panel.
#[derive(Debug)]
pub struct Success {
    component: Component,
    total: Node,
}

impl Success {
    /// Bind to a `success` fragment. `on_close` fires on the close button.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::MissingElement`] if a node is missing.
    pub fn new(container: Node, events: EventBroker, on_close: Action) -> Result<Self, BindingError> {
        let total = container.ensure(".order-success__description")?;
        let close = container.ensure(".order-success__close")?;
        close.on(Interaction::Click, move |_| on_close());

        Ok(Self {
            component: Component::new(container, events),
            total,
        })
    }
}

impl View for Success {
    type Patch = SuccessPatch;

    fn component(&self) -> &Component {
        &self.component
    }

    fn apply(&mut self, patch: SuccessPatch) {
        if let Some(total) = patch.total {
            self.component
                .set_text(Some(&self.total), format!("Списано {total}"));
        }
    }
}
