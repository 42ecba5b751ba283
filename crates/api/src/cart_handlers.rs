use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResponse},
    middleware::AuthUser,
    AppState,
};
use cart::{AddCart, UpdateQty};

pub async fn add_cart(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<AddCart>,
) -> Result<impl IntoResponse, ApiError> {
    let cart = state.cart_service.add(identity.user_id, &payload).await?;

    Ok(ApiResponse::new(StatusCode::CREATED, "success", Some(cart)))
}

pub async fn get_all(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let carts = state.cart_service.get_all(identity.user_id).await?;

    Ok(ApiResponse::new(StatusCode::OK, "carts user", Some(carts)))
}

pub async fn update_qty(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(cart_id): Path<Uuid>,
    Json(payload): Json<UpdateQty>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .cart_service
        .update_qty(identity.user_id, cart_id, payload.qty)
        .await?;

    Ok(ApiResponse::<()>::new(StatusCode::OK, "success", None))
}

pub async fn delete_cart(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(cart_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.cart_service.delete(identity.user_id, cart_id).await?;

    Ok(ApiResponse::<()>::new(StatusCode::OK, "success", None))
}
