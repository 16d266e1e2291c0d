//! Domain entities.
//!
//! [`AppState`] owns the catalog of [`ShopItem`]s and the in-progress
//! [`Order`]. Each entity publishes its own change notifications on the
//! shared broker.

mod app_state;
mod order;
mod shop_item;

pub use app_state::{AppState, CatalogChange};
pub use order::{FormErrors, Order, OrderField, OrderSnapshot, UnknownFieldError};
pub use shop_item::{BasketChange, ShopItem, ShopItemSnapshot};
