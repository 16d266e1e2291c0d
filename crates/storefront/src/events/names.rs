//! Broker event names.
//!
//! These strings are the protocol between the presenter, the entities and
//! the views. They must not change.

use std::fmt;

/// Every event the storefront publishes on the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// The catalog was replaced.
    CatalogChanged,
    /// A catalog card was clicked.
    OpenItem,
    /// The previewed item changed.
    PreviewChanged,
    /// The header basket button was clicked.
    OpenBasket,
    /// An item entered or left the basket.
    BasketItemChanged,
    /// Order validation produced a new error map.
    FormErrorsChanged,
    /// The delivery step of the checkout was requested.
    OpenDeliveryStep,
    /// The delivery step form was submitted.
    SubmitDeliveryStep,
    /// The contacts step of the checkout was requested.
    OpenContactsStep,
    /// The contacts step form was submitted.
    SubmitContactsStep,
    /// The order was placed with the service.
    OrderPlaced,
    /// A payment button was clicked.
    PaymentSelected,
    /// The delivery address input changed.
    AddressInput,
    /// The email input changed.
    EmailInput,
    /// The phone input changed.
    PhoneInput,
    /// The modal window opened.
    ModalOpened,
    /// The modal window closed.
    ModalClosed,
}

impl Event {
    /// The wire name of the event.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CatalogChanged => "catalog:changed",
            Self::OpenItem => "card:open",
            Self::PreviewChanged => "preview:changed",
            Self::OpenBasket => "basket:open",
            Self::BasketItemChanged => "lot:changed",
            Self::FormErrorsChanged => "formErrors:changed",
            Self::OpenDeliveryStep => "order_payment:open",
            Self::SubmitDeliveryStep => "order:submit",
            Self::OpenContactsStep => "order_contacts:open",
            Self::SubmitContactsStep => "contacts:submit",
            Self::OrderPlaced => "order:post",
            Self::PaymentSelected => "payment:changed",
            Self::AddressInput => "order.address:change",
            Self::EmailInput => "contacts.email:change",
            Self::PhoneInput => "contacts.phone:change",
            Self::ModalOpened => "modal:open",
            Self::ModalClosed => "modal:close",
        }
    }
}

impl AsRef<str> for Event {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
