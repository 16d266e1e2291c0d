//! Checkout order entity and its validation state.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use web_larek_core::{ItemId, PaymentMethod};

use crate::events::{Event, EventBroker};
use crate::model::{Entity, Model};

/// A user-editable order field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderField {
    Payment,
    Address,
    Email,
    Phone,
}

impl OrderField {
    /// Every field, in validation order.
    pub const ALL: [Self; 4] = [Self::Payment, Self::Address, Self::Email, Self::Phone];

    /// Fields filled in on the delivery step.
    pub const DELIVERY: [Self; 2] = [Self::Payment, Self::Address];

    /// Fields filled in on the contacts step.
    pub const CONTACTS: [Self; 2] = [Self::Email, Self::Phone];

    /// Wire name of the field, as used in form input names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Address => "address",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }

    /// Message shown when the field is empty.
    #[must_use]
    pub const fn required_message(self) -> &'static str {
        match self {
            Self::Payment => "Необходимо выбрать способ оплаты",
            Self::Address => "Необходимо ввести адрес доставки",
            Self::Email => "Необходимо ввести почту",
            Self::Phone => "Необходимо ввести телефон",
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownFieldError(s.to_string()))
    }
}

/// A form reported a field the order does not have.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order field: {0}")]
pub struct UnknownFieldError(pub String);

/// Field name to human-readable message. A field without an entry is valid.
///
/// Payload of [`Event::FormErrorsChanged`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<OrderField, String>);

impl FormErrors {
    /// Message for `field`, if it is invalid.
    #[must_use]
    pub fn get(&self, field: OrderField) -> Option<&str> {
        self.0
            .get(&field)
            .map(String::as_str)
            .filter(|message| !message.is_empty())
    }

    /// Whether every field in `fields` is valid.
    #[must_use]
    pub fn is_valid(&self, fields: &[OrderField]) -> bool {
        fields.iter().all(|&field| self.get(field).is_none())
    }

    /// Whether no field is invalid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_valid(&OrderField::ALL)
    }

    /// Messages for `fields` joined for display.
    #[must_use]
    pub fn summary(&self, fields: &[OrderField]) -> String {
        fields
            .iter()
            .filter_map(|&field| self.get(field))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn record(&mut self, field: OrderField, valid: bool) {
        if valid {
            self.0.remove(&field);
        } else {
            self.0.insert(field, field.required_message().to_string());
        }
    }
}

/// Serializable state of an [`Order`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub payment: Option<PaymentMethod>,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub items: Vec<ItemId>,
}

/// The in-progress checkout.
///
/// Every field setter stores the value and re-validates all four fields,
/// publishing the whole error map once.
#[derive(Debug, Clone)]
pub struct Order {
    model: Model,
    payment: Option<PaymentMethod>,
    address: String,
    email: String,
    phone: String,
    items: Vec<ItemId>,
    errors: FormErrors,
}

impl Order {
    /// Create an order with default fields and no recorded errors.
    #[must_use]
    pub fn new(events: EventBroker) -> Self {
        Self {
            model: Model::new(events),
            payment: Some(PaymentMethod::default()),
            address: String::new(),
            email: String::new(),
            phone: String::new(),
            items: Vec::new(),
            errors: FormErrors::default(),
        }
    }

    #[must_use]
    pub const fn payment(&self) -> Option<PaymentMethod> {
        self.payment
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Items being bought, in basket order.
    #[must_use]
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// Errors recorded by the last validation.
    #[must_use]
    pub const fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn set_payment(&mut self, payment: impl Into<Option<PaymentMethod>>) {
        self.payment = payment.into();
        self.validate_order();
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
        self.validate_order();
    }

    /// Store the email lower-cased.
    pub fn set_email(&mut self, email: &str) {
        self.email = email.to_lowercase();
        self.validate_order();
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.phone = phone.into();
        self.validate_order();
    }

    /// Set a text field by name, as reported by a form input.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFieldError`] if `field` is not a text field.
    pub fn set_field(&mut self, field: OrderField, value: &str) -> Result<(), UnknownFieldError> {
        match field {
            OrderField::Address => self.set_address(value),
            OrderField::Email => self.set_email(value),
            OrderField::Phone => self.set_phone(value),
            OrderField::Payment => {
                let payment = value
                    .parse::<PaymentMethod>()
                    .map_err(|_| UnknownFieldError(format!("payment={value}")))?;
                self.set_payment(payment);
            }
        }
        Ok(())
    }

    /// Replace the item list. Does not validate.
    pub fn set_items(&mut self, items: Vec<ItemId>) {
        self.items = items;
    }

    /// Re-run every field validator and publish the error map.
    pub fn validate_order(&mut self) {
        self.errors
            .record(OrderField::Payment, self.payment.is_some());
        self.errors
            .record(OrderField::Address, !self.address.is_empty());
        self.errors.record(OrderField::Email, !self.email.is_empty());
        self.errors.record(OrderField::Phone, !self.phone.is_empty());
        self.model
            .emit_changes(Event::FormErrorsChanged, &self.errors);
    }

    /// Reset every field to its default. The error map is left as is.
    pub fn clear_order(&mut self) {
        self.payment = Some(PaymentMethod::default());
        self.address.clear();
        self.email.clear();
        self.phone.clear();
    }

    /// Finish the checkout: reset the fields and announce the placement.
    ///
    /// The basket and the error map are not touched.
    pub fn post_order(&mut self) {
        self.clear_order();
        self.emit_snapshot(Event::OrderPlaced);
    }
}

impl Entity for Order {
    type Snapshot = OrderSnapshot;

    fn model(&self) -> &Model {
        &self.model
    }

    fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            payment: self.payment,
            address: self.address.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            items: self.items.clone(),
        }
    }
}
