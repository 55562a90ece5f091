//! Gateway integration tests against a mock product API.

use std::time::Duration;

use assert_matches::assert_matches;
use inventory_client::{Gender, GatewayError, ProductGateway, ProductPayload};
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(server: &MockServer) -> ProductGateway {
    ProductGateway::new(server.uri(), Duration::from_secs(5)).unwrap()
}

fn product_json(sku: &str, name: &str) -> serde_json::Value {
    json!({
        "sku": sku,
        "name": name,
        "brand": null,
        "category": null,
        "gender": "male",
        "size": 9.0,
        "quantity": 10,
        "normal_price": 99.99,
        "entry_date": null
    })
}

fn sample_payload() -> ProductPayload {
    ProductPayload {
        name: "Zoom X".to_string(),
        quantity: 10,
        normal_price: dec!(99.99),
        size: 9.0,
        brand: None,
        category: None,
        gender: Some(Gender::Male),
    }
}

#[tokio::test]
async fn list_returns_all_products() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product_json("A1", "Zoom X"),
            product_json("B2", "Pegasus"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let products = gateway(&server).list().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].sku, "A1");
    assert_eq!(products[1].name, "Pegasus");
    assert_eq!(products[0].normal_price, dec!(99.99));
}

#[tokio::test]
async fn get_maps_any_failure_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/A1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detail": "Product not found"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/products/A1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let gateway = gateway(&server);
    assert_matches!(
        gateway.get("A1").await,
        Err(GatewayError::NotFound(sku)) if sku == "A1"
    );
    // A 500 on single-product fetch also renders the not-found path.
    assert_matches!(gateway.get("A1").await, Err(GatewayError::NotFound(_)));
}

#[tokio::test]
async fn get_returns_the_product() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json("A1", "Zoom X")))
        .mount(&server)
        .await;

    let product = gateway(&server).get("A1").await.unwrap();
    assert_eq!(product.sku, "A1");
    assert_eq!(product.gender, Some(Gender::Male));
}

#[tokio::test]
async fn create_posts_canonical_payload_with_explicit_nulls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/products"))
        .and(body_json(json!({
            "name": "Zoom X",
            "quantity": 10,
            "normal_price": 99.99,
            "size": 9.0,
            "brand": null,
            "category": null,
            "gender": "male"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(product_json("100090", "Zoom X")))
        .expect(1)
        .mount(&server)
        .await;

    let created = gateway(&server).create(&sample_payload()).await.unwrap();
    assert_eq!(created.sku, "100090");
}

#[tokio::test]
async fn create_extracts_server_detail_on_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": "SKU already exists"
        })))
        .mount(&server)
        .await;

    assert_matches!(
        gateway(&server).create(&sample_payload()).await,
        Err(GatewayError::RemoteRejected { status: 422, detail }) if detail == "SKU already exists"
    );
}

#[tokio::test]
async fn rejection_falls_back_to_status_text_without_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    assert_matches!(
        gateway(&server).create(&sample_payload()).await,
        Err(GatewayError::RemoteRejected { status: 500, detail }) if detail == "Internal Server Error"
    );
}

#[tokio::test]
async fn update_puts_a_full_replacement() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/products/A1"))
        .and(body_json(json!({
            "name": "Zoom X",
            "quantity": 10,
            "normal_price": 99.99,
            "size": 9.0,
            "brand": null,
            "category": null,
            "gender": "male"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json("A1", "Zoom X")))
        .expect(1)
        .mount(&server)
        .await;

    let updated = gateway(&server)
        .update("A1", &sample_payload())
        .await
        .unwrap();
    assert_eq!(updated.sku, "A1");
}

#[tokio::test]
async fn delete_accepts_200_and_204() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/products/A1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/products/B2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let gateway = gateway(&server);
    gateway.delete("A1").await.unwrap();
    gateway.delete("B2").await.unwrap();
}

#[tokio::test]
async fn delete_surfaces_rejection_detail() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/products/A1"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "detail": "Product is referenced by an open order"
        })))
        .mount(&server)
        .await;

    assert_matches!(
        gateway(&server).delete("A1").await,
        Err(GatewayError::RemoteRejected { status: 409, .. })
    );
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Nothing listens on this port; the connect fails below the HTTP layer.
    let gateway = ProductGateway::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
    assert_matches!(gateway.list().await, Err(GatewayError::Transport(_)));
}
