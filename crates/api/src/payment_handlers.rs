use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::{
    error::{ApiError, ApiResponse},
    middleware::AuthUser,
    AppState,
};
use payment::CreatePayment;

pub async fn create_payment(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<CreatePayment>,
) -> Result<impl IntoResponse, ApiError> {
    info!(
        user_id = %identity.user_id,
        order_id = %payload.order_id,
        vendor = state.payments.vendor(),
        "payment requested"
    );

    let response = state.payments.pay(&payload).await?;

    Ok(ApiResponse::new(StatusCode::CREATED, "payment created", Some(response)))
}
