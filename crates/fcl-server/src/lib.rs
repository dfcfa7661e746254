//! HTTP server for the FarmChain Ledger.
//!
//! Exposes the registry operations over JSON: one collection per entity
//! kind under `/v1/`, plus the legacy `/api/query` product listing.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::{build_router, AppState, SharedStore};
pub use server::FclServer;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use fcl_store::{InMemoryKvStore, KvStore};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn app_with(store: Arc<InMemoryKvStore>) -> Router {
        build_router(AppState::new(store))
    }

    fn app() -> Router {
        app_with(Arc::new(InMemoryKvStore::new()))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (status, body) = send(&app(), get("/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn info_lists_kinds() {
        let (status, body) = send(&app(), get("/v1/info")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "fcl-server");
        assert_eq!(body["kinds"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn register_and_get_farmer() {
        let app = app();
        let (status, body) = send(
            &app,
            post(
                "/v1/farmers",
                json!({"id": "1", "name": "Alice", "email": "alice@example.com"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], "farmer-1");

        let (status, body) = send(&app, get("/v1/farmers/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"id": "farmer-1", "name": "Alice", "email": "alice@example.com"})
        );
    }

    #[tokio::test]
    async fn list_products_in_key_order() {
        let app = app();
        for id in ["b", "a"] {
            let (status, _) = send(
                &app,
                post(
                    "/v1/products",
                    json!({"id": id, "farmer_id": "1", "name": "Kale", "price": "1.00"}),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&app, get("/v1/products")).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["product-a", "product-b"]);
    }

    #[tokio::test]
    async fn record_and_list_transactions() {
        let app = app();
        let (status, _) = send(
            &app,
            post(
                "/v1/transactions",
                json!({
                    "id": "t1",
                    "farmer_id": "1",
                    "consumer_id": "2",
                    "amount": "9.99",
                    "timestamp": "2024-05-01T10:00:00Z"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, body) = send(&app, get("/v1/transactions")).await;
        assert_eq!(body[0]["amount"], "9.99");
        assert_eq!(body[0]["id"], "transaction-t1");
    }

    #[tokio::test]
    async fn missing_record_is_404() {
        let (status, body) = send(&app(), get("/v1/consumers/nobody")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("consumer-nobody"));
    }

    #[tokio::test]
    async fn invalid_identifier_is_400() {
        let (status, _) = send(
            &app(),
            post(
                "/v1/consumers",
                json!({"id": "a~b", "name": "X", "location": "Y"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_body_gets_json_error() {
        let app = app();

        let (status, body) = send(&app, post("/v1/farmers", json!({"id": "1"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("name"));

        let request = Request::builder()
            .method("POST")
            .uri("/v1/farmers")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let request = Request::builder()
            .method("POST")
            .uri("/v1/farmers")
            .body(Body::from(r#"{"id":"1","name":"A"}"#))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body["error"].is_string());

        let (_, body) = send(&app, get("/v1/farmers")).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn corrupt_record_is_500() {
        let store = Arc::new(InMemoryKvStore::new());
        store.put("farmer-1", b"garbage").unwrap();
        let (status, body) = send(&app_with(store), get("/v1/farmers")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("farmer-1"));
    }

    #[tokio::test]
    async fn legacy_query_lists_products() {
        let app = app();
        send(
            &app,
            post(
                "/v1/products",
                json!({"id": "10", "farmer_id": "1", "name": "Tomatoes", "price": "3.50"}),
            ),
        )
        .await;

        let (status, body) = send(&app, get("/api/query")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(
            body["data"],
            json!([{"id": "product-10", "farmer_id": "1", "name": "Tomatoes", "price": "3.50"}])
        );
    }

    #[tokio::test]
    async fn legacy_query_reports_failure() {
        let store = Arc::new(InMemoryKvStore::new());
        store.put("product-1", b"{").unwrap();
        let (status, body) = send(&app_with(store), get("/api/query")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(body["message"].is_string());
    }
}
