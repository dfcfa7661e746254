use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use fcl_registry::Registry;
use fcl_types::{Entity, EntityKind};
use serde::Deserialize;
use serde_json::json;

use crate::error::{ServerError, ServerResult};
use crate::router::{AppState, SharedStore};

/// Body of a register request: the bare identifier plus the kind's
/// attributes, all at the top level.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest<A> {
    pub id: String,
    #[serde(flatten)]
    pub attributes: A,
}

/// `Json` extractor whose rejections render as the usual error body.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

fn registry<T: Entity>(state: &AppState) -> Registry<T, SharedStore> {
    Registry::new(state.chain.store().clone())
}

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler() -> Json<serde_json::Value> {
    let kinds: Vec<_> = EntityKind::ALL
        .iter()
        .map(|k| json!({ "kind": k, "prefix": k.prefix(), "path": format!("/v1/{}", k.plural()) }))
        .collect();
    Json(json!({
        "name": "fcl-server",
        "version": env!("CARGO_PKG_VERSION"),
        "kinds": kinds,
    }))
}

pub async fn register_handler<T: Entity>(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest<T::Attributes>>,
) -> ServerResult<(StatusCode, Json<T>)> {
    let record = registry::<T>(&state).register(&request.id, request.attributes)?;
    tracing::info!(kind = %T::KIND, key = record.key(), "record registered");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_handler<T: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<T>> {
    Ok(Json(registry::<T>(&state).get(&id)?))
}

pub async fn list_handler<T: Entity>(State(state): State<AppState>) -> ServerResult<Json<Vec<T>>> {
    Ok(Json(registry::<T>(&state).list_all()?))
}

/// Compatibility endpoint: every product wrapped in a success envelope.
pub async fn legacy_query_handler(State(state): State<AppState>) -> Response {
    match state.chain.list_products() {
        Ok(products) => Json(json!({ "success": true, "data": products })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "product query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": e.to_string() })),
            )
                .into_response()
        }
    }
}
