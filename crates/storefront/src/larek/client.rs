//! Larek REST client.

use std::sync::Arc;

use moka::future::Cache;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};
use web_larek_core::{ItemId, ItemList, LotItem, OrderRequest, OrderResult};

use super::LarekError;
use super::cache::{CacheKey, CacheValue};
use crate::config::StorefrontConfig;

/// Client for the Web Larek REST service.
///
/// Items and the catalog are cached for the configured TTL.
#[derive(Clone)]
pub struct LarekClient {
    inner: Arc<LarekClientInner>,
}

struct LarekClientInner {
    client: reqwest::Client,
    api_url: String,
    cdn_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for LarekClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LarekClient")
            .field("api_url", &self.inner.api_url)
            .field("cdn_url", &self.inner.cdn_url)
            .finish_non_exhaustive()
    }
}

/// Error body sent by the service.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl LarekClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, LarekError> {
        let client = reqwest::Client::builder().build()?;
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(LarekClientInner {
                client,
                api_url: config.api_url.clone(),
                cdn_url: config.cdn_url.clone(),
                cache,
            }),
        })
    }

    /// Base URL of the REST API.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.inner.api_url
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Get the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the body does not parse.
    #[instrument(skip(self))]
    pub async fn get_item_list(&self) -> Result<ItemList, LarekError> {
        if let Some(CacheValue::Catalog(list)) = self.inner.cache.get(&CacheKey::Catalog).await {
            debug!("Cache hit for catalog");
            return Ok(list);
        }

        let raw: ItemList = self.get_json("/product/").await?;
        let list = ItemList {
            total: raw.total,
            items: raw
                .items
                .into_iter()
                .map(|item| self.absolutize(item))
                .collect(),
        };
        info!(items = list.items.len(), total = list.total, "catalog fetched");

        for item in &list.items {
            self.inner
                .cache
                .insert(
                    CacheKey::Item(item.id.clone()),
                    CacheValue::Item(Box::new(item.clone())),
                )
                .await;
        }
        self.inner
            .cache
            .insert(CacheKey::Catalog, CacheValue::Catalog(list.clone()))
            .await;

        Ok(list)
    }

    /// Get a single item.
    ///
    /// # Errors
    ///
    /// Returns [`LarekError::NotFound`] for unknown ids, or another error if
    /// the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_item(&self, id: &ItemId) -> Result<LotItem, LarekError> {
        let key = CacheKey::Item(id.clone());
        if let Some(CacheValue::Item(item)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for item");
            return Ok(*item);
        }

        let item: LotItem = match self.get_json(&format!("/product/{id}")).await {
            Err(LarekError::Api { status: 404, .. }) => {
                return Err(LarekError::NotFound(format!("Item not found: {id}")));
            }
            other => other?,
        };
        let item = self.absolutize(item);

        self.inner
            .cache
            .insert(key, CacheValue::Item(Box::new(item.clone())))
            .await;
        Ok(item)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns [`LarekError::Api`] carrying the service's message if the
    /// order is rejected.
    #[instrument(skip(self, order), fields(items = order.items.len(), total = %order.total))]
    pub async fn post_order(&self, order: &OrderRequest) -> Result<OrderResult, LarekError> {
        let url = format!("{}/order", self.inner.api_url);
        let response = self.inner.client.post(&url).json(order).send().await?;
        let result: OrderResult = read_json(response).await?;
        info!(order_id = %result.id, "order placed");
        Ok(result)
    }

    /// Drop every cached response.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, LarekError> {
        let url = format!("{}{path}", self.inner.api_url);
        let response = self.inner.client.get(&url).send().await?;
        read_json(response).await
    }

    fn absolutize(&self, item: LotItem) -> LotItem {
        if is_absolute(&item.image) {
            item
        } else {
            item.with_image_base(&self.inner.cdn_url)
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, LarekError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::warn!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "Larek API returned non-success status"
        );
        return Err(LarekError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse Larek API response"
        );
        LarekError::Parse(e.to_string())
    })
}

/// Message of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body).map_or_else(|_| body.trim().to_string(), |b| b.error)
}

fn is_absolute(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}
