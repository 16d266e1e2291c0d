//! Basket panel.

use web_larek_core::Price;

use crate::component::{Component, View};
use crate::dom::{BindingError, Interaction, Node};
use crate::events::{Event, EventBroker, Payload};

const EMPTY_TEXT: &str = "Корзина пуста";

/// Partial basket state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasketPatch {
    /// Rendered rows; an empty list shows the empty marker.
    pub items: Option<Vec<Node>>,
    pub total: Option<Price>,
}

/// Basket list with total and checkout button.
#[derive(Debug)]
pub struct Basket {
    component: Component,
    list: Node,
    total: Node,
    button: Node,
}

impl Basket {
    /// Bind to a `basket` fragment. The checkout button emits
    /// [`Event::OpenDeliveryStep`].
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::MissingElement`] if a node is missing.
    pub fn new(container: Node, events: EventBroker) -> Result<Self, BindingError> {
        let list = container.ensure(".basket__list")?;
        let total = container.ensure(".basket__price")?;
        let button = container.ensure(".basket__button")?;

        let broker = events.clone();
        button.on(Interaction::Click, move |_| {
            broker.emit(Event::OpenDeliveryStep, Payload::empty());
        });

        let mut basket = Self {
            component: Component::new(container, events),
            list,
            total,
            button,
        };
        basket.apply(BasketPatch {
            items: Some(Vec::new()),
            total: Some(Price::ZERO),
        });
        Ok(basket)
    }
}

impl View for Basket {
    type Patch = BasketPatch;

    fn component(&self) -> &Component {
        &self.component
    }

    fn apply(&mut self, patch: BasketPatch) {
        if let Some(items) = patch.items {
            if items.is_empty() {
                let marker = Node::element("p")
                    .with_class("basket__empty")
                    .with_text(EMPTY_TEXT);
                self.list.replace_children(&[marker]);
            } else {
                self.list.replace_children(&items);
            }
            self.component
                .set_disabled(Some(&self.button), items.is_empty());
        }
        if let Some(total) = patch.total {
            self.component.set_text(Some(&self.total), total);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::templates::Document;

    #[test]
    fn test_empty_basket_shows_marker_and_disables_checkout() {
        let doc = Document::storefront();
        let basket = Basket::new(doc.clone_template("basket").unwrap(), EventBroker::new()).unwrap();
        let node = basket.container();
        assert_eq!(node.query(".basket__list").unwrap().text(), EMPTY_TEXT);
        assert!(node.query(".basket__button").unwrap().is_disabled());
    }

    #[test]
    fn test_items_enable_checkout() {
        let doc = Document::storefront();
        let broker = EventBroker::new();
        let opened = Rc::new(Cell::new(0));
        let o = Rc::clone(&opened);
        broker.subscribe(Event::OpenDeliveryStep, move |_| {
            o.set(o.get() + 1);
            Ok(())
        });

        let mut basket = Basket::new(doc.clone_template("basket").unwrap(), broker).unwrap();
        let node = basket.render(BasketPatch {
            items: Some(vec![Node::element("li"), Node::element("li")]),
            total: Some(Price::from_units(1500)),
        });
        assert_eq!(node.query(".basket__list").unwrap().children().len(), 2);
        assert_eq!(node.query(".basket__price").unwrap().text(), "1500 synapses");

        node.query(".basket__button").unwrap().click();
        assert_eq!(opened.get(), 1);
    }
}
