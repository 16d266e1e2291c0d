//! HTTP client tests against the mock Larek service.

#![allow(clippy::unwrap_used)]

use web_larek_core::{ItemId, OrderRequest, PaymentMethod, Price};
use web_larek_integration_tests::MockLarek;
use web_larek_storefront::StorefrontConfig;
use web_larek_storefront::larek::{LarekClient, LarekError};

fn client(mock: &MockLarek) -> LarekClient {
    let config = StorefrontConfig::for_origin(&mock.origin()).unwrap();
    LarekClient::new(&config).unwrap()
}

fn order(items: &[&str], total: u64) -> OrderRequest {
    OrderRequest {
        payment: PaymentMethod::Card,
        address: "Moscow".to_string(),
        email: "user@example.com".to_string(),
        phone: "+79000000000".to_string(),
        items: items.iter().map(|id| ItemId::new(*id)).collect(),
        total: Price::from_units(total),
    }
}

#[tokio::test]
async fn test_catalog_images_are_absolute() {
    let mock = MockLarek::start().await;
    let list = client(&mock).get_item_list().await.unwrap();

    assert_eq!(list.total, 3);
    assert_eq!(
        list.items[0].image,
        format!("{}/content/weblarek/5_Dots.svg", mock.origin())
    );
    assert!(list.items[2].price.is_none());
}

#[tokio::test]
async fn test_catalog_is_cached() {
    let mock = MockLarek::start().await;
    let client = client(&mock);

    client.get_item_list().await.unwrap();
    client.get_item_list().await.unwrap();
    assert_eq!(mock.catalog_hits(), 1);

    client.invalidate_cache();
    client.get_item_list().await.unwrap();
    assert_eq!(mock.catalog_hits(), 2);
}

#[tokio::test]
async fn test_get_item() {
    let mock = MockLarek::start().await;
    let item = client(&mock)
        .get_item(&ItemId::new("c101ab44-ed99-4a54-990d-47aa2bb4e7d9"))
        .await
        .unwrap();

    assert_eq!(item.title, "HEX-леденец");
    assert!(item.image.ends_with("/content/weblarek/Shell.svg"));
}

#[tokio::test]
async fn test_unknown_item_is_not_found() {
    let mock = MockLarek::start().await;
    let err = client(&mock)
        .get_item(&ItemId::new("missing"))
        .await
        .unwrap_err();

    assert!(matches!(err, LarekError::NotFound(_)), "{err:?}");
}

#[tokio::test]
async fn test_post_order() {
    let mock = MockLarek::start().await;
    let request = order(
        &[
            "854cef69-976d-4c2a-a18c-2aa45046c390",
            "c101ab44-ed99-4a54-990d-47aa2bb4e7d9",
        ],
        2200,
    );
    let result = client(&mock).post_order(&request).await.unwrap();

    assert_eq!(result.total, Price::from_units(2200));
    assert_eq!(result.id.as_str(), "order-1");
    assert_eq!(mock.orders().await, [request]);
}

#[tokio::test]
async fn test_rejected_order_carries_service_message() {
    let mock = MockLarek::start().await;
    let err = client(&mock)
        .post_order(&order(&["854cef69-976d-4c2a-a18c-2aa45046c390"], 1))
        .await
        .unwrap_err();

    match err {
        LarekError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Неверная сумма заказа");
        }
        other => panic!("expected an API error, got {other:?}"),
    }
    assert!(mock.orders().await.is_empty());
}
