//! Aggregate root of the storefront session.
//!
//! The catalog vector is the arena every item lives in. Preview and order
//! refer to items by [`ItemId`]; the basket is derived from the catalog's
//! `is_ordered` flags on every read.

use serde::{Deserialize, Serialize};
use tracing::info;
use web_larek_core::{ItemId, LotItem, OrderRequest, Price};

use crate::error::{AppError, Result};
use crate::events::{Event, EventBroker};
use crate::model::{Entity, Model};

use super::order::{Order, OrderField};
use super::shop_item::{ShopItem, ShopItemSnapshot};

/// Payload of [`Event::CatalogChanged`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogChange {
    pub catalog: Vec<ShopItemSnapshot>,
}

/// Session state: catalog, preview selection and the in-progress order.
#[derive(Debug)]
pub struct AppState {
    model: Model,
    catalog: Vec<ShopItem>,
    preview: Option<ItemId>,
    order: Option<Order>,
}

impl AppState {
    /// Empty state bound to `events`.
    #[must_use]
    pub fn new(events: EventBroker) -> Self {
        Self {
            model: Model::new(events),
            catalog: Vec::new(),
            preview: None,
            order: None,
        }
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    /// Replace the catalog.
    ///
    /// Previous items are dropped along with their basket flags; a preview
    /// pointing at an item that is gone is cleared. A checkout in progress is
    /// abandoned, since its items no longer match the basket.
    pub fn set_catalog(&mut self, items: Vec<LotItem>) {
        let events = self.model.events().clone();
        self.catalog = items
            .into_iter()
            .map(|item| ShopItem::new(item, events.clone()))
            .collect();
        if self
            .preview
            .as_ref()
            .is_some_and(|id| self.item(id).is_none())
        {
            self.preview = None;
        }
        if self.checkout_in_progress() {
            info!("catalog replaced during checkout, order dropped");
            self.order = None;
        }
        info!(items = self.catalog.len(), "catalog loaded");
        self.model.emit_changes(
            Event::CatalogChanged,
            &CatalogChange {
                catalog: self.catalog.iter().map(Entity::snapshot).collect(),
            },
        );
    }

    /// Items in catalog order.
    #[must_use]
    pub fn catalog(&self) -> &[ShopItem] {
        &self.catalog
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&ShopItem> {
        self.catalog.iter().find(|item| item.id() == id)
    }

    fn item_mut(&mut self, id: &ItemId) -> Result<&mut ShopItem> {
        self.catalog
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| AppError::UnknownItem(id.clone()))
    }

    // -------------------------------------------------------------------------
    // Preview
    // -------------------------------------------------------------------------

    /// Select the item shown in the preview and publish its snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnknownItem`] if `id` is not in the catalog.
    pub fn set_preview(&mut self, id: &ItemId) -> Result<()> {
        let snapshot = self
            .item(id)
            .map(Entity::snapshot)
            .ok_or_else(|| AppError::UnknownItem(id.clone()))?;
        self.preview = Some(id.clone());
        self.model.emit_changes(Event::PreviewChanged, &snapshot);
        Ok(())
    }

    /// Forget the preview selection.
    pub fn clear_preview(&mut self) {
        self.preview = None;
    }

    /// The previewed item.
    #[must_use]
    pub fn preview(&self) -> Option<&ShopItem> {
        self.preview.as_ref().and_then(|id| self.item(id))
    }

    // -------------------------------------------------------------------------
    // Basket
    // -------------------------------------------------------------------------

    /// Items in the basket, in catalog order. Recomputed on every call.
    pub fn basket(&self) -> impl Iterator<Item = &ShopItem> {
        self.catalog.iter().filter(|item| item.is_ordered())
    }

    /// Whether the item is in the basket. Unknown ids are not.
    #[must_use]
    pub fn is_in_basket(&self, id: &ItemId) -> bool {
        self.item(id).is_some_and(ShopItem::is_ordered)
    }

    /// Put an item in the basket.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnknownItem`] if `id` is not in the catalog.
    pub fn place_in_basket(&mut self, id: &ItemId) -> Result<()> {
        self.item_mut(id)?.place_in_basket();
        self.sync_order_items();
        Ok(())
    }

    /// Take an item out of the basket.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnknownItem`] if `id` is not in the catalog.
    pub fn remove_from_basket(&mut self, id: &ItemId) -> Result<()> {
        self.item_mut(id)?.remove_from_basket();
        self.sync_order_items();
        Ok(())
    }

    /// Remove every basket member, one notification per item.
    pub fn clear_basket(&mut self) {
        for item in self.catalog.iter_mut().filter(|item| item.is_ordered()) {
            item.remove_from_basket();
        }
        self.sync_order_items();
    }

    /// Sum of basket prices. Priceless items count as zero.
    #[must_use]
    pub fn total_amount(&self) -> Price {
        self.basket().filter_map(ShopItem::price).sum()
    }

    /// Ids of basket members, in catalog order.
    #[must_use]
    pub fn basket_ids(&self) -> Vec<ItemId> {
        self.basket().map(|item| item.id().clone()).collect()
    }

    /// Number of basket members, priceless ones included.
    #[must_use]
    pub fn basket_len(&self) -> usize {
        self.basket().count()
    }

    // -------------------------------------------------------------------------
    // Order
    // -------------------------------------------------------------------------

    /// Start a fresh order for the current basket, replacing any previous one.
    pub fn init_order(&mut self) -> &mut Order {
        let mut order = Order::new(self.model.events().clone());
        order.clear_order();
        order.set_items(self.basket_ids());
        self.order.insert(order)
    }

    /// Whether an order with items is waiting to be placed.
    #[must_use]
    pub fn checkout_in_progress(&self) -> bool {
        self.order
            .as_ref()
            .is_some_and(|order| !order.items().is_empty())
    }

    fn sync_order_items(&mut self) {
        let items = self.basket_ids();
        if let Some(order) = self.order.as_mut() {
            order.set_items(items);
        }
    }

    /// The order in progress.
    #[must_use]
    pub const fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    /// The order in progress, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoActiveOrder`] before [`init_order`](Self::init_order).
    pub fn order_mut(&mut self) -> Result<&mut Order> {
        self.order.as_mut().ok_or(AppError::NoActiveOrder)
    }

    /// Assemble the request body for placing the current order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoActiveOrder`] without an order,
    /// [`AppError::EmptyOrder`] when it has no items,
    /// [`AppError::UnknownItem`] for an item missing from the catalog and
    /// [`AppError::IncompleteOrder`] naming the first empty field.
    pub fn order_request(&self) -> Result<OrderRequest> {
        let order = self.order.as_ref().ok_or(AppError::NoActiveOrder)?;
        if order.items().is_empty() {
            return Err(AppError::EmptyOrder);
        }
        let total: Price = order
            .items()
            .iter()
            .map(|id| {
                self.item(id)
                    .map(ShopItem::price)
                    .ok_or_else(|| AppError::UnknownItem(id.clone()))
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .sum();
        let payment = order
            .payment()
            .ok_or(AppError::IncompleteOrder(OrderField::Payment))?;
        for (field, value) in [
            (OrderField::Address, order.address()),
            (OrderField::Email, order.email()),
            (OrderField::Phone, order.phone()),
        ] {
            if value.is_empty() {
                return Err(AppError::IncompleteOrder(field));
            }
        }
        Ok(OrderRequest {
            payment,
            address: order.address().to_string(),
            email: order.email().to_string(),
            phone: order.phone().to_string(),
            items: order.items().to_vec(),
            total,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use proptest::prelude::*;
    use web_larek_core::{Category, PaymentMethod};

    use super::*;

    fn lot(id: &str, price: Option<u64>) -> LotItem {
        LotItem {
            id: ItemId::new(id),
            title: format!("Item {id}"),
            description: String::new(),
            image: format!("/{id}.svg"),
            category: Category::Other,
            price: price.map(Price::from_units),
        }
    }

    fn state_with(prices: &[Option<u64>]) -> AppState {
        let mut state = AppState::new(EventBroker::new());
        state.set_catalog(
            prices
                .iter()
                .enumerate()
                .map(|(i, price)| lot(&format!("lot-{i}"), *price))
                .collect(),
        );
        state
    }

    fn id(i: usize) -> ItemId {
        ItemId::new(format!("lot-{i}"))
    }

    #[test]
    fn test_set_catalog_emits_snapshots() {
        let broker = EventBroker::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        broker.subscribe(Event::CatalogChanged, move |payload| {
            s.borrow_mut().push(payload.parse::<CatalogChange>()?);
            Ok(())
        });

        let mut state = AppState::new(broker.clone());
        state.set_catalog(vec![lot("a", Some(750)), lot("b", None)]);
        broker.flush();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        let titles: Vec<&str> = seen[0].catalog.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Item a", "Item b"]);
        assert_eq!(seen[0].catalog[0].price, Some(Price::from_units(750)));
        assert!(seen[0].catalog.iter().all(|i| !i.is_ordered));
    }

    #[test]
    fn test_total_amount_ignores_priceless() {
        let empty = state_with(&[]);
        assert_eq!(empty.total_amount(), Price::ZERO);

        let mut state = state_with(&[Some(100), Some(200), None]);
        for i in 0..3 {
            state.place_in_basket(&id(i)).unwrap();
        }
        assert_eq!(state.total_amount(), Price::from_units(300));
        assert_eq!(state.basket_len(), 3);
    }

    #[test]
    fn test_basket_follows_catalog_order() {
        let mut state = state_with(&[Some(1), Some(2), Some(3)]);
        state.place_in_basket(&id(2)).unwrap();
        state.place_in_basket(&id(0)).unwrap();
        assert_eq!(state.basket_ids(), [id(0), id(2)]);
        assert!(state.is_in_basket(&id(2)));
        assert!(!state.is_in_basket(&id(1)));
        assert!(!state.is_in_basket(&ItemId::new("missing")));
    }

    #[test]
    fn test_unknown_item_is_an_error() {
        let mut state = state_with(&[Some(1)]);
        let err = state.place_in_basket(&ItemId::new("missing")).unwrap_err();
        assert!(matches!(err, AppError::UnknownItem(_)));
        assert!(state.set_preview(&ItemId::new("missing")).is_err());
        assert!(state.preview().is_none());
    }

    #[test]
    fn test_clear_basket_emits_once_per_member() {
        let broker = EventBroker::new();
        let changes = Rc::new(RefCell::new(0));
        let c = Rc::clone(&changes);
        broker.subscribe(Event::BasketItemChanged, move |_| {
            *c.borrow_mut() += 1;
            Ok(())
        });

        let mut state = AppState::new(broker.clone());
        state.set_catalog(vec![lot("a", Some(1)), lot("b", Some(2)), lot("c", None)]);
        state.place_in_basket(&ItemId::new("a")).unwrap();
        state.place_in_basket(&ItemId::new("c")).unwrap();
        broker.flush();
        *changes.borrow_mut() = 0;

        state.clear_basket();
        broker.flush();
        assert_eq!(*changes.borrow(), 2);
        assert_eq!(state.basket_len(), 0);
    }

    #[test]
    fn test_new_catalog_drops_stale_preview() {
        let mut state = state_with(&[Some(1)]);
        state.set_preview(&id(0)).unwrap();
        assert_eq!(state.preview().unwrap().id(), &id(0));

        state.set_catalog(vec![lot("other", Some(5))]);
        assert!(state.preview().is_none());
    }

    #[test]
    fn test_init_order_replaces_previous() {
        let mut state = state_with(&[Some(1)]);
        assert!(matches!(state.order_mut(), Err(AppError::NoActiveOrder)));

        state.init_order().set_address("Moscow");
        let order = state.init_order();
        assert_eq!(order.address(), "");
        assert_eq!(order.payment(), Some(PaymentMethod::Card));
    }

    #[test]
    fn test_order_request_assembles_body() {
        let mut state = state_with(&[Some(750), Some(1450), None]);
        state.place_in_basket(&id(0)).unwrap();
        state.place_in_basket(&id(1)).unwrap();

        assert!(matches!(state.order_request(), Err(AppError::NoActiveOrder)));

        let order = state.init_order();
        order.set_payment(PaymentMethod::Cash);
        order.set_address("Moscow");
        order.set_email("a@b.c");
        assert!(matches!(
            state.order_request(),
            Err(AppError::IncompleteOrder(OrderField::Phone))
        ));

        state.order_mut().unwrap().set_phone("+7");
        let request = state.order_request().unwrap();
        assert_eq!(request.payment, PaymentMethod::Cash);
        assert_eq!(request.items, [id(0), id(1)]);
        assert_eq!(request.total, Price::from_units(2200));
    }

    #[test]
    fn test_order_items_follow_basket() {
        let mut state = state_with(&[Some(10), Some(20)]);
        state.place_in_basket(&id(0)).unwrap();
        assert_eq!(state.init_order().items(), [id(0)]);
        assert!(state.checkout_in_progress());

        state.place_in_basket(&id(1)).unwrap();
        assert_eq!(state.order().unwrap().items(), [id(0), id(1)]);

        state.clear_basket();
        assert!(state.order().unwrap().items().is_empty());
        assert!(!state.checkout_in_progress());
    }

    #[test]
    fn test_empty_order_is_refused() {
        let mut state = state_with(&[Some(10)]);
        let order = state.init_order();
        order.set_address("Moscow");
        order.set_email("a@b.c");
        order.set_phone("+7");
        assert!(matches!(state.order_request(), Err(AppError::EmptyOrder)));
    }

    #[test]
    fn test_new_catalog_abandons_checkout() {
        let mut state = state_with(&[Some(750)]);
        state.place_in_basket(&id(0)).unwrap();
        let order = state.init_order();
        order.set_address("Moscow");
        order.set_email("a@b.c");
        order.set_phone("+7");
        assert!(state.order_request().is_ok());

        state.set_catalog(vec![lot("lot-0", Some(750))]);
        assert_eq!(state.basket_len(), 0);
        assert!(state.order().is_none());
        assert!(matches!(state.order_request(), Err(AppError::NoActiveOrder)));
    }

    proptest! {
        #[test]
        fn prop_basket_tracks_last_call(
            ops in proptest::collection::vec((0usize..4, any::<bool>()), 0..48)
        ) {
            let mut state = state_with(&[Some(10), Some(20), None, Some(40)]);
            let mut expected = [false; 4];

            for &(index, place) in &ops {
                if place {
                    state.place_in_basket(&id(index)).unwrap();
                } else {
                    state.remove_from_basket(&id(index)).unwrap();
                }
                expected[index] = place;
                prop_assert_eq!(state.is_in_basket(&id(index)), place);
            }

            let expected_ids: Vec<ItemId> = (0..4).filter(|&i| expected[i]).map(id).collect();
            prop_assert_eq!(state.basket_ids(), expected_ids);
            prop_assert_eq!(state.basket_len(), expected.iter().filter(|&&b| b).count());
        }
    }
}
