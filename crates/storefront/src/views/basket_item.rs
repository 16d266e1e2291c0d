//! Basket row.

use web_larek_core::Price;

use super::Action;
use crate::component::{Component, View};
use crate::dom::{BindingError, Interaction, Node};
use crate::events::EventBroker;

/// Partial basket row state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasketItemPatch {
    /// Zero-based position; displayed one-based.
    pub index: Option<usize>,
    pub title: Option<String>,
    pub price: Option<Option<Price>>,
}

/// One line of the basket list.
#[derive(Debug)]
pub struct BasketItem {
    component: Component,
    index: Node,
    title: Node,
    price: Node,
}

impl BasketItem {
    /// Bind to a `card-basket` fragment. `on_delete` fires when the delete
    /// button is clicked.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::MissingElement`] if a row node is missing.
    pub fn new(container: Node, events: EventBroker, on_delete: Action) -> Result<Self, BindingError> {
        let index = container.ensure(".basket__item-index")?;
        let title = container.ensure(".card__title")?;
        let price = container.ensure(".card__price")?;
        let delete = container.ensure(".card__button")?;
        delete.on(Interaction::Click, move |_| on_delete());

        Ok(Self {
            component: Component::new(container, events),
            index,
            title,
            price,
        })
    }
}

impl View for BasketItem {
    type Patch = BasketItemPatch;

    fn component(&self) -> &Component {
        &self.component
    }

    fn apply(&mut self, patch: BasketItemPatch) {
        if let Some(index) = patch.index {
            self.component.set_text(Some(&self.index), index + 1);
        }
        if let Some(title) = patch.title {
            self.component.set_text(Some(&self.title), &title);
        }
        if let Some(price) = patch.price {
            self.component
                .set_text(Some(&self.price), Price::display_optional(price));
        }
    }
}
