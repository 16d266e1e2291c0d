//! Client for the Web Larek REST service.
//!
//! # Endpoints
//!
//! - `GET /product/` - catalog page `{ total, items }`
//! - `GET /product/{id}` - single item
//! - `POST /order` - place an order, answers `{ id, total }`
//!
//! Failed calls answer with `{ "error": "..." }`; the message is surfaced in
//! [`LarekError::Api`]. Relative image paths are prefixed with the CDN base
//! before items leave the client. Items are cached in memory via `moka`.

mod cache;
mod client;

pub use client::LarekClient;

use thiserror::Error;

/// Errors that can occur when talking to the Larek service.
#[derive(Debug, Error)]
pub enum LarekError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}
