//! Company endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use dealbase_proto::{Company, CompanyPatch, DeleteAck, NewCompany, RecordId};

use crate::error::AppError;
use crate::AppState;

/// Company routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(list).post(create))
        .route("/companies/:id", get(fetch).patch(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewCompany>,
) -> Result<Json<Company>, AppError> {
    Ok(Json(state.client.create_company(input).await?))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<Company>>, AppError> {
    Ok(Json(state.client.companies().await?))
}

async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<Company>, AppError> {
    Ok(Json(state.client.company(id).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(mut patch): Json<CompanyPatch>,
) -> Result<Json<Company>, AppError> {
    // The path id wins over any id in the body.
    patch.id = id;
    Ok(Json(state.client.update_company(patch).await?))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<DeleteAck>, AppError> {
    Ok(Json(state.client.delete_company(id).await?))
}
