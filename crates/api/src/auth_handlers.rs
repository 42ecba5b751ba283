use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResponse},
    middleware::{AuthUser, ClientInfo},
    AppState,
};
use auth::{AuthTokens, RegisterInput};

/// Shortest accepted password
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub fullname: String,
    pub phone: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.fullname.trim().is_empty() {
            return Err(ApiError::Validation("fullname is required".to_string()));
        }
        if self.phone.trim().is_empty() {
            return Err(ApiError::Validation("phone is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(ApiError::Validation("password is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewTokenRequest {
    #[serde(alias = "refresh_token")]
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: AuthTokens,
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ApiError::Validation("email is required".to_string()));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ApiError::Validation("email is invalid".to_string())),
    }
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    ClientInfo(client): ClientInfo,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let input = RegisterInput {
        email: payload.email.trim().to_string(),
        password: payload.password,
        fullname: payload.fullname,
        phone: payload.phone,
    };
    let token = state.auth_service.register(input, &client).await?;

    Ok(ApiResponse::new(
        StatusCode::CREATED,
        "register success",
        Some(AuthResponse { token }),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ClientInfo(client): ClientInfo,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let token = state
        .auth_service
        .login(payload.email.trim(), &payload.password, &client)
        .await?;

    Ok(ApiResponse::new(
        StatusCode::OK,
        "login success",
        Some(AuthResponse { token }),
    ))
}

pub async fn renew_token(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RenewTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.refresh_token.trim().is_empty() {
        return Err(ApiError::Validation("refreshToken is required".to_string()));
    }

    let token = state
        .auth_service
        .renew_access_token(payload.refresh_token.trim())
        .await?;

    Ok(ApiResponse::new(
        StatusCode::OK,
        "renew token success",
        Some(AuthResponse { token }),
    ))
}

pub async fn profile(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.auth_service.profile(&identity).await?;

    Ok(ApiResponse::new(StatusCode::OK, "user profile", Some(profile)))
}

pub async fn block_session(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.auth_service.block_session(&identity, session_id).await?;

    Ok(ApiResponse::<()>::new(StatusCode::OK, "session blocked", None))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
            fullname: "A B".to_string(),
            phone: "000".to_string(),
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register_request().validate().is_ok());

        let cases = [
            RegisterRequest { email: "".to_string(), ..register_request() },
            RegisterRequest { email: "no-at-sign".to_string(), ..register_request() },
            RegisterRequest { email: "@b.com".to_string(), ..register_request() },
            RegisterRequest { password: "12345".to_string(), ..register_request() },
            RegisterRequest { fullname: " ".to_string(), ..register_request() },
            RegisterRequest { phone: "".to_string(), ..register_request() },
        ];
        for case in cases {
            assert!(matches!(case.validate(), Err(ApiError::Validation(_))), "{case:?}");
        }
    }

    #[test]
    fn test_login_validation() {
        let ok = LoginRequest {
            email: "a@b.com".to_string(),
            password: "x".to_string(),
        };
        assert!(ok.validate().is_ok());

        let empty = LoginRequest {
            email: "a@b.com".to_string(),
            password: String::new(),
        };
        assert!(matches!(empty.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_renew_request_accepts_both_spellings() {
        for body in [r#"{"refreshToken":"abc"}"#, r#"{"refresh_token":"abc"}"#] {
            let request: RenewTokenRequest = serde_json::from_str(body).unwrap();
            assert_eq!(request.refresh_token, "abc");
        }
    }
}
