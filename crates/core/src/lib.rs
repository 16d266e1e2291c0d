//! Web Larek Core - Shared types library.
//!
//! This crate provides common types used across all Web Larek components:
//! - `storefront` - Event broker, domain entities, views and the HTTP client
//! - `cli` - Headless storefront sessions driven from the command line
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no event
//! broker. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Opaque ids, prices, categories, payment methods and the
//!   payload shapes exchanged with the remote service

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
