//! Core types for Web Larek.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod payment;
pub mod price;
pub mod wire;

pub use category::{Category, ParseCategoryError};
pub use id::*;
pub use payment::{ParsePaymentError, PaymentMethod};
pub use price::{Price, PriceError};
pub use wire::{ItemList, LotItem, OrderRequest, OrderResult};
