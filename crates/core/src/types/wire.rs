//! Payload shapes exchanged with the Web Larek service.
//!
//! These types mirror the JSON bodies of `GET /product/`, `GET /product/{id}`
//! and `POST /order` exactly.

use serde::{Deserialize, Serialize};

use super::{Category, ItemId, OrderId, PaymentMethod, Price};

/// A catalog item as sent by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotItem {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Image path. Relative as sent by the service, absolute once the
    /// client has applied the CDN base.
    pub image: String,
    pub category: Category,
    pub price: Option<Price>,
}

impl LotItem {
    /// Prefix the image path with a content-delivery base URL.
    ///
    /// ```
    /// use web_larek_core::{Category, ItemId, LotItem};
    ///
    /// let item = LotItem {
    ///     id: ItemId::new("1"),
    ///     title: "HEX".to_string(),
    ///     description: String::new(),
    ///     image: "/Shell.svg".to_string(),
    ///     category: Category::Other,
    ///     price: None,
    /// };
    /// let item = item.with_image_base("https://larek.example/content/weblarek");
    /// assert_eq!(item.image, "https://larek.example/content/weblarek/Shell.svg");
    /// ```
    #[must_use]
    pub fn with_image_base(mut self, base: &str) -> Self {
        self.image = format!("{base}{}", self.image);
        self
    }
}

/// List envelope returned by `GET /product/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemList {
    #[serde(default)]
    pub total: usize,
    pub items: Vec<LotItem>,
}

/// Body of `POST /order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub payment: PaymentMethod,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub items: Vec<ItemId>,
    pub total: Price,
}

/// Response of `POST /order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    pub id: OrderId,
    pub total: Price,
}
