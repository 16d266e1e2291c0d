//! Item card, used for catalog tiles and the preview.

use web_larek_core::{Category, ItemId, Price};

use super::Action;
use crate::component::{Component, View};
use crate::dom::{BindingError, Interaction, Node};
use crate::events::EventBroker;

/// Partial card state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardPatch {
    /// Stored as `data-id` on the container.
    pub id: Option<ItemId>,
    pub category: Option<Category>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` renders a priceless item and disables the button.
    pub price: Option<Option<Price>>,
    /// Button caption.
    pub button: Option<String>,
}

/// A card bound to `<block>__*` nodes.
pub struct Card {
    component: Component,
    block: String,
    category: Node,
    title: Node,
    image: Node,
    description: Option<Node>,
    button: Option<Node>,
    price: Option<Node>,
}

impl std::fmt::Debug for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Card")
            .field("block", &self.block)
            .field("container", self.component.container())
            .finish_non_exhaustive()
    }
}

impl Card {
    /// Bind to `container`.
    ///
    /// Category, title and image are required; description, button and price
    /// are optional. `on_click` is attached to the button when there is one,
    /// otherwise to the whole card.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::MissingElement`] naming the first required
    /// node that is missing.
    pub fn new(
        block: &str,
        container: Node,
        events: EventBroker,
        on_click: Option<Action>,
    ) -> Result<Self, BindingError> {
        let category = container.ensure(&format!(".{block}__category"))?;
        let title = container.ensure(&format!(".{block}__title"))?;
        let image = container.ensure(&format!(".{block}__image"))?;
        let button = container.query(&format!(".{block}__button"));
        let description = container.query(&format!(".{block}__text"));
        let price = container.query(&format!(".{block}__price"));

        if let Some(on_click) = on_click {
            button
                .as_ref()
                .unwrap_or(&container)
                .on(Interaction::Click, move |_| on_click());
        }

        Ok(Self {
            component: Component::new(container, events),
            block: block.to_string(),
            category,
            title,
            image,
            description,
            button,
            price,
        })
    }

    /// The card's button, if its template has one.
    #[must_use]
    pub const fn button(&self) -> Option<&Node> {
        self.button.as_ref()
    }

    fn set_category(&self, category: Category) {
        self.component.set_text(Some(&self.category), category);
        let main = format!("{}__category", self.block);
        self.category.clear_classes();
        self.category.add_class(&main);
        self.category
            .add_class(&format!("{main}_{}", category.modifier()));
    }
}

impl View for Card {
    type Patch = CardPatch;

    fn component(&self) -> &Component {
        &self.component
    }

    fn apply(&mut self, patch: CardPatch) {
        if let Some(id) = patch.id {
            self.component.container().set_attr("data-id", id.as_str());
        }
        if let Some(category) = patch.category {
            self.set_category(category);
        }
        if let Some(title) = patch.title {
            self.component.set_text(Some(&self.title), &title);
        }
        if let Some(image) = patch.image {
            let alt = self.title.text();
            self.component
                .set_image(Some(&self.image), &image, Some(&alt));
        }
        if let Some(description) = patch.description {
            self.component
                .set_text(self.description.as_ref(), &description);
        }
        if let Some(price) = patch.price {
            self.component
                .set_text(self.price.as_ref(), Price::display_optional(price));
            self.component
                .set_disabled(self.button.as_ref(), price.is_none());
        }
        if let Some(caption) = patch.button {
            self.component.set_text(self.button.as_ref(), &caption);
        }
    }
}
