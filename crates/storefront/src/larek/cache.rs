//! Cache types for Larek API responses.

use web_larek_core::{ItemId, ItemList, LotItem};

/// Cache key for items and the catalog.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Item(ItemId),
    Catalog,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Item(Box<LotItem>),
    Catalog(ItemList),
}
