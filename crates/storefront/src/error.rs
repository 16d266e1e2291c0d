//! Unified error handling.
//!
//! Provides a unified `AppError` type for everything the storefront core can
//! fail at. Broker handlers return `Result<(), AppError>`; the broker logs a
//! failing handler and keeps dispatching to the others.

use thiserror::Error;
use web_larek_core::ItemId;

use crate::config::ConfigError;
use crate::dom::BindingError;
use crate::larek::LarekError;
use crate::models::{OrderField, UnknownFieldError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// A view could not bind to its display nodes.
    #[error("Binding error: {0}")]
    Binding(#[from] BindingError),

    /// Remote service call failed.
    #[error("Larek API error: {0}")]
    Api(#[from] LarekError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An event payload did not have the expected shape.
    #[error("Payload error: {0}")]
    Payload(#[from] serde_json::Error),

    /// An item id that is not part of the current catalog.
    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    /// A checkout step was driven before an order was initialized.
    #[error("No order in progress")]
    NoActiveOrder,

    /// A form reported a field or value the order does not accept.
    #[error("Form error: {0}")]
    Field(#[from] UnknownFieldError),

    /// The order cannot be submitted while a field is empty.
    #[error("Order is incomplete: {0} is missing")]
    IncompleteOrder(OrderField),

    /// The order has no items to buy.
    #[error("Order has no items")]
    EmptyOrder,

    /// An order submission is already waiting to be sent.
    #[error("Order is already being submitted")]
    SubmissionPending,
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::UnknownItem(ItemId::new("product-123"));
        assert_eq!(err.to_string(), "Unknown item: product-123");

        let err = AppError::Binding(BindingError::MissingElement {
            selector: ".card__title".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Binding error: required element `.card__title` not found"
        );
    }

    #[test]
    fn test_incomplete_order_names_field() {
        let err = AppError::IncompleteOrder(OrderField::Phone);
        assert_eq!(err.to_string(), "Order is incomplete: phone is missing");
        assert_eq!(AppError::EmptyOrder.to_string(), "Order has no items");
    }

    #[test]
    fn test_payload_error_converts() {
        let parse = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let err: AppError = parse.into();
        assert!(matches!(err, AppError::Payload(_)));
    }
}
