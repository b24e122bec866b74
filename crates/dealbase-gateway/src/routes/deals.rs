//! Deal endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use dealbase_proto::{Deal, DealPatch, DeleteAck, NewDeal, RecordId};

use crate::error::AppError;
use crate::AppState;

/// Deal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/deals", get(list).post(create))
        .route("/deals/:id", get(fetch).patch(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewDeal>,
) -> Result<Json<Deal>, AppError> {
    Ok(Json(state.client.create_deal(input).await?))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<Deal>>, AppError> {
    Ok(Json(state.client.deals().await?))
}

async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<Deal>, AppError> {
    Ok(Json(state.client.deal(id).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(mut patch): Json<DealPatch>,
) -> Result<Json<Deal>, AppError> {
    patch.id = id;
    Ok(Json(state.client.update_deal(patch).await?))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<DeleteAck>, AppError> {
    Ok(Json(state.client.delete_deal(id).await?))
}
