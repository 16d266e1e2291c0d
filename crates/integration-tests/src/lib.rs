//! Integration tests for Web Larek.
//!
//! [`MockLarek`] serves the three service endpoints from an in-process axum
//! server bound to an ephemeral port, so the HTTP client and whole storefront
//! sessions can be exercised without network access.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p web-larek-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::{Mutex, watch};
use web_larek_core::{Category, ItemId, LotItem, OrderRequest, Price};

/// Catalog served by default: two priced items and one priceless item.
#[must_use]
pub fn sample_catalog() -> Vec<LotItem> {
    vec![
        LotItem {
            id: ItemId::new("854cef69-976d-4c2a-a18c-2aa45046c390"),
            title: "+1 час в сутках".to_string(),
            description: "Если планируете решать задачи в тренажёре, берите два.".to_string(),
            image: "/5_Dots.svg".to_string(),
            category: Category::SoftSkill,
            price: Some(Price::from_units(750)),
        },
        LotItem {
            id: ItemId::new("c101ab44-ed99-4a54-990d-47aa2bb4e7d9"),
            title: "HEX-леденец".to_string(),
            description: "Лизните этот леденец, чтобы мгновенно запоминать и узнавать любой цветовой код CSS.".to_string(),
            image: "/Shell.svg".to_string(),
            category: Category::Other,
            price: Some(Price::from_units(1450)),
        },
        LotItem {
            id: ItemId::new("b06cde61-912f-4663-9751-09956c0eed67"),
            title: "Мамка-таймер".to_string(),
            description: "Будет стоять над душой и не давать прокрастинировать.".to_string(),
            image: "/Asterisk_2.svg".to_string(),
            category: Category::SoftSkill,
            price: None,
        },
    ]
}

struct MockState {
    catalog: Vec<LotItem>,
    orders: Mutex<Vec<OrderRequest>>,
    catalog_hits: AtomicUsize,
    next_order: AtomicUsize,
}

/// In-process Larek service.
pub struct MockLarek {
    pub addr: SocketAddr,
    state: Arc<MockState>,
    shutdown: watch::Sender<bool>,
}

impl MockLarek {
    /// Start serving [`sample_catalog`].
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        Self::with_catalog(sample_catalog()).await
    }

    /// Start serving `catalog`.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    #[allow(clippy::expect_used)]
    pub async fn with_catalog(catalog: Vec<LotItem>) -> Self {
        let state = Arc::new(MockState {
            catalog,
            orders: Mutex::new(Vec::new()),
            catalog_hits: AtomicUsize::new(0),
            next_order: AtomicUsize::new(1),
        });

        let app = Router::new()
            .route("/api/weblarek/product/", get(list_items))
            .route("/api/weblarek/product/{id}", get(get_item))
            .route("/api/weblarek/order", post(place_order))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock service");
        let addr = listener.local_addr().expect("Bound listener has an address");

        let (shutdown, mut shutdown_rx) = watch::channel(false);
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });

        Self {
            addr,
            state,
            shutdown,
        }
    }

    /// Origin to use as `LAREK_API_ORIGIN`.
    #[must_use]
    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Orders accepted so far.
    pub async fn orders(&self) -> Vec<OrderRequest> {
        self.state.orders.lock().await.clone()
    }

    /// Number of catalog list requests served.
    #[must_use]
    pub fn catalog_hits(&self) -> usize {
        self.state.catalog_hits.load(Ordering::SeqCst)
    }
}

impl Drop for MockLarek {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn list_items(State(state): State<Arc<MockState>>) -> Json<Value> {
    state.catalog_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "total": state.catalog.len(),
        "items": state.catalog,
    }))
}

async fn get_item(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    state
        .catalog
        .iter()
        .find(|item| item.id.as_str() == id)
        .map_or_else(
            || error(StatusCode::NOT_FOUND, "NotFound"),
            |item| Json(item).into_response(),
        )
}

async fn place_order(
    State(state): State<Arc<MockState>>,
    Json(order): Json<OrderRequest>,
) -> Response {
    if order.items.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Не указаны товары");
    }
    let mut prices = Vec::with_capacity(order.items.len());
    for id in &order.items {
        let Some(item) = state.catalog.iter().find(|item| item.id == *id) else {
            return error(StatusCode::BAD_REQUEST, "Товар не найден");
        };
        let Some(price) = item.price else {
            return error(StatusCode::BAD_REQUEST, "Товар не продается");
        };
        prices.push(price);
    }
    let total: Price = prices.into_iter().sum();
    if total != order.total {
        return error(StatusCode::BAD_REQUEST, "Неверная сумма заказа");
    }

    let n = state.next_order.fetch_add(1, Ordering::SeqCst);
    tracing::debug!(order = n, "mock order accepted");
    state.orders.lock().await.push(order);
    Json(json!({ "id": format!("order-{n}"), "total": total })).into_response()
}
