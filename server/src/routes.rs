use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::Method;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use groupdrop_common::api::{DropSummary, JoinReceipt, JoinRequest};
use groupdrop_common::catalog::Catalog;
use groupdrop_common::drop::{Drop, DropId};

use crate::error::ApiError;
use crate::store::DropTable;

pub fn router(table: Arc<DropTable>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/drops", get(list_drops_handler))
        .route("/drops/{slug}", get(drop_by_slug_handler))
        .route("/drops/{slug}/catalog", get(catalog_handler))
        .route("/drop-status/{id}", get(drop_status_handler))
        .route("/join/{id}", post(join_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(table)
}

async fn list_drops_handler(State(table): State<Arc<DropTable>>) -> Json<Vec<Drop>> {
    Json(table.list().await)
}

async fn drop_by_slug_handler(
    State(table): State<Arc<DropTable>>,
    Path(slug): Path<String>,
) -> Result<Json<Drop>, ApiError> {
    Ok(Json(table.fetch_by_slug(&slug).await?))
}

async fn catalog_handler(
    State(table): State<Arc<DropTable>>,
    Path(slug): Path<String>,
) -> Result<Json<Catalog>, ApiError> {
    Ok(Json(table.catalog_for(&slug)?))
}

/// The fetch-by-id subset of columns clients poll between joins.
async fn drop_status_handler(
    State(table): State<Arc<DropTable>>,
    Path(id): Path<String>,
) -> Result<Json<DropSummary>, ApiError> {
    Ok(Json(table.fetch_summary(&DropId(id)).await?))
}

async fn join_handler(
    State(table): State<Arc<DropTable>>,
    Path(id): Path<String>,
    Json(req): Json<JoinRequest>,
) -> Result<Json<JoinReceipt>, ApiError> {
    Ok(Json(table.join(&DropId(id), req).await?))
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    drops: usize,
}

async fn health_handler(State(table): State<Arc<DropTable>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        drops: table.list().await.len(),
    })
}
