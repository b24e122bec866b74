//! Customer endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use dealbase_proto::{Customer, CustomerPatch, DeleteAck, NewCustomer, RecordId};

use crate::error::AppError;
use crate::AppState;

/// Customer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list).post(create))
        .route("/customers/:id", get(fetch).patch(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewCustomer>,
) -> Result<Json<Customer>, AppError> {
    Ok(Json(state.client.create_customer(input).await?))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, AppError> {
    Ok(Json(state.client.customers().await?))
}

async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<Customer>, AppError> {
    Ok(Json(state.client.customer(id).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(mut patch): Json<CustomerPatch>,
) -> Result<Json<Customer>, AppError> {
    patch.id = id;
    Ok(Json(state.client.update_customer(patch).await?))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<DeleteAck>, AppError> {
    Ok(Json(state.client.delete_customer(id).await?))
}
