use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use fcl_registry::FarmChain;
use fcl_store::KvStore;
use fcl_types::{Consumer, Farmer, Product, Transaction};
use tower_http::trace::TraceLayer;

use crate::handler;

/// Store handle shared by every request.
pub type SharedStore = Arc<dyn KvStore>;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub chain: FarmChain<SharedStore>,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        Self {
            chain: FarmChain::new(store),
        }
    }
}

/// Build the axum router with all FCL endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route(
            "/v1/farmers",
            get(handler::list_handler::<Farmer>).post(handler::register_handler::<Farmer>),
        )
        .route("/v1/farmers/:id", get(handler::get_handler::<Farmer>))
        .route(
            "/v1/consumers",
            get(handler::list_handler::<Consumer>).post(handler::register_handler::<Consumer>),
        )
        .route("/v1/consumers/:id", get(handler::get_handler::<Consumer>))
        .route(
            "/v1/products",
            get(handler::list_handler::<Product>).post(handler::register_handler::<Product>),
        )
        .route("/v1/products/:id", get(handler::get_handler::<Product>))
        .route(
            "/v1/transactions",
            get(handler::list_handler::<Transaction>)
                .post(handler::register_handler::<Transaction>),
        )
        .route(
            "/v1/transactions/:id",
            get(handler::get_handler::<Transaction>),
        )
        .route("/api/query", get(handler::legacy_query_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
