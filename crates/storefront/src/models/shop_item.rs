//! Catalog item entity.

use serde::{Deserialize, Serialize};
use web_larek_core::{Category, ItemId, LotItem, Price};

use crate::events::{Event, EventBroker};
use crate::model::{Entity, Model};

/// Payload of [`Event::BasketItemChanged`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketChange {
    pub id: ItemId,
    pub is_ordered: bool,
}

/// Serializable state of a [`ShopItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopItemSnapshot {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    pub image: String,
    pub category: Category,
    pub price: Option<Price>,
    pub is_ordered: bool,
}

/// A catalog item together with its basket membership flag.
#[derive(Debug, Clone)]
pub struct ShopItem {
    model: Model,
    id: ItemId,
    title: String,
    description: String,
    image: String,
    category: Category,
    price: Option<Price>,
    is_ordered: bool,
}

impl ShopItem {
    /// Wrap a service payload. New items are never in the basket.
    #[must_use]
    pub fn new(item: LotItem, events: EventBroker) -> Self {
        Self {
            model: Model::new(events),
            id: item.id,
            title: item.title,
            description: item.description,
            image: item.image,
            category: item.category,
            price: item.price,
            is_ordered: false,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &ItemId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub const fn price(&self) -> Option<Price> {
        self.price
    }

    /// Whether the item is in the basket.
    #[must_use]
    pub const fn is_ordered(&self) -> bool {
        self.is_ordered
    }

    /// Whether the item can be bought at all.
    #[must_use]
    pub const fn is_for_sale(&self) -> bool {
        self.price.is_some()
    }

    /// Put the item in the basket.
    ///
    /// Always notifies, even if the item was already there.
    pub fn place_in_basket(&mut self) {
        self.is_ordered = true;
        self.emit_membership();
    }

    /// Take the item out of the basket.
    ///
    /// Always notifies, even if the item was not there.
    pub fn remove_from_basket(&mut self) {
        self.is_ordered = false;
        self.emit_membership();
    }

    fn emit_membership(&self) {
        self.model.emit_changes(
            Event::BasketItemChanged,
            &BasketChange {
                id: self.id.clone(),
                is_ordered: self.is_ordered,
            },
        );
    }
}

impl Entity for ShopItem {
    type Snapshot = ShopItemSnapshot;

    fn model(&self) -> &Model {
        &self.model
    }

    fn snapshot(&self) -> ShopItemSnapshot {
        ShopItemSnapshot {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            category: self.category,
            price: self.price,
            is_ordered: self.is_ordered,
        }
    }
}
