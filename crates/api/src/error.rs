use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use auth::AuthError;
use cart::CartError;
use payment::PaymentError;

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub error: String,
}

/// Success body returned by every endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: Option<T>) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                code: status.as_u16(),
                message: message.into(),
                data,
            }),
        )
    }
}

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Unauthorized(String),
    Auth(AuthError),
    Cart(CartError),
    Payment(PaymentError),
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Auth(e)
    }
}

impl From<CartError> for ApiError {
    fn from(e: CartError) -> Self {
        ApiError::Cart(e)
    }
}

impl From<PaymentError> for ApiError {
    fn from(e: PaymentError) -> Self {
        ApiError::Payment(e)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Auth(e) => match e {
                AuthError::Validation(_) => StatusCode::BAD_REQUEST,
                AuthError::DuplicateEmail => StatusCode::CONFLICT,
                AuthError::InvalidCredentials
                | AuthError::PasswordMismatch
                | AuthError::InvalidSignature
                | AuthError::TokenExpired
                | AuthError::InvalidToken
                | AuthError::SessionBlocked
                | AuthError::SessionMismatch
                | AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
                AuthError::NotFound(_) => StatusCode::NOT_FOUND,
                AuthError::DuplicateSession
                | AuthError::HashingError(_)
                | AuthError::TokenGenerationError(_)
                | AuthError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Cart(e) => match e {
                CartError::Validation(_) => StatusCode::BAD_REQUEST,
                CartError::NotFound(_) => StatusCode::NOT_FOUND,
                CartError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Payment(e) => match e {
                PaymentError::Validation(_) => StatusCode::BAD_REQUEST,
                PaymentError::Gateway(_) | PaymentError::Http(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }

    /// Full error text for logs
    fn detail(&self) -> String {
        match self {
            ApiError::Validation(msg) | ApiError::Unauthorized(msg) => msg.clone(),
            ApiError::Auth(e) => e.to_string(),
            ApiError::Cart(e) => e.to_string(),
            ApiError::Payment(e) => e.to_string(),
        }
    }

    /// Text safe to return to the caller
    fn message(&self) -> String {
        match self {
            ApiError::Validation(msg) | ApiError::Unauthorized(msg) => msg.clone(),
            ApiError::Auth(e) => e.to_string(),
            ApiError::Cart(e) => e.to_string(),
            ApiError::Payment(PaymentError::Http(_)) => "payment gateway error".to_string(),
            ApiError::Payment(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status == StatusCode::BAD_GATEWAY {
            error!(error = %self.detail(), "payment gateway failed");
            self.message()
        } else if status.is_server_error() {
            error!(error = %self.detail(), "request failed");
            "Internal server error".to_string()
        } else {
            self.message()
        };

        let body = ErrorResponse {
            code: status.as_u16(),
            error: message,
        };
        (status, Json(body)).into_response()
    }
}
