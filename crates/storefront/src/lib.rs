//! Web Larek storefront library.
//!
//! The storefront is an event-driven client: domain entities publish state
//! changes through a shared [`events::EventBroker`], views render into an
//! in-memory display tree and report user intent back through the same
//! broker, and the [`presenter::Presenter`] connects the two.
//!
//! # Modules
//!
//! - [`events`] - Named-event broker with pattern subscriptions
//! - [`model`] - Base for entities that publish their changes
//! - [`models`] - Catalog items, the order form and the session state
//! - [`dom`] / [`component`] / [`views`] - Display tree and view components
//! - [`templates`] - Page skeleton and template fragments
//! - [`presenter`] - Event routing between entities and views
//! - [`larek`] - HTTP client for the Larek service
//! - [`shopper`] - Scripted user for headless sessions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod component;
pub mod config;
pub mod dom;
pub mod error;
pub mod events;
pub mod larek;
pub mod model;
pub mod models;
pub mod presenter;
pub mod shopper;
pub mod templates;
pub mod views;

pub use config::StorefrontConfig;
pub use error::{AppError, Result};
pub use events::EventBroker;
pub use larek::LarekClient;
pub use presenter::{Command, Presenter};
pub use shopper::Shopper;
pub use templates::Document;
