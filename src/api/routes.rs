//! API route handlers

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::server::SharedState;
use crate::auth::models::FieldErrors;
use crate::auth::{self, LoginRequest, RegisterRequest, UserInfo};
use crate::config::AuthConfig;
use crate::error::Error;

// Request/Response types

/// Successful registration or login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserInfo,
}

/// Failure envelope with optional per-field errors
#[derive(Debug, Serialize)]
pub struct FailureResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl FailureResponse {
    fn new(message: impl Into<String>, errors: Option<FieldErrors>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
}

fn field_errors(field: &str, message: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), vec![message.to_string()]);
    errors
}

/// Set-Cookie value whose lifetime matches the token TTL
fn token_cookie(auth: &AuthConfig, token_value: &str) -> String {
    format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
        auth.cookie_name,
        token_value,
        auth.token_ttl_minutes * 60
    )
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        success: true,
        status: "healthy".to_string(),
    })
}

// Auth routes

pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    if let Err(errors) = req.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(FailureResponse::new(
                "The given data was invalid",
                Some(errors),
            )),
        )
            .into_response();
    }

    let password_hash = match auth::hash_password(&req.password, state.config.auth.bcrypt_cost) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed during registration: {}", e);
            return registration_failed();
        }
    };

    let user = match state.users.create(&req.name, &req.email, &password_hash).await {
        Ok(user) => user,
        Err(Error::EmailTaken(_)) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(FailureResponse::new(
                    "The given data was invalid",
                    Some(field_errors("email", "The email has already been taken.")),
                )),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("Failed to create user: {}", e);
            return registration_failed();
        }
    };

    let token = state.tokens.issue(&user).await;
    tracing::info!("Registered user {}", user.email);

    (
        StatusCode::CREATED,
        [(
            header::SET_COOKIE,
            token_cookie(&state.config.auth, &token.value),
        )],
        Json(AuthResponse {
            success: true,
            message: "User registered successfully".to_string(),
            token: token.value,
            user: user.into(),
        }),
    )
        .into_response()
}

fn registration_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(FailureResponse::new(
            "Registration failed",
            Some(field_errors(
                "general",
                "Unable to create account. Please try again.",
            )),
        )),
    )
        .into_response()
}

pub async fn login(State(state): State<SharedState>, Json(req): Json<LoginRequest>) -> Response {
    // Unknown email and wrong password produce identical responses
    let Some(user) = state.users.verify_password(&req.email, &req.password).await else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(FailureResponse::new(
                "Invalid credentials",
                Some(field_errors(
                    "credentials",
                    "Email or password is incorrect",
                )),
            )),
        )
            .into_response();
    };

    let token = state.tokens.issue(&user).await;
    tracing::info!("User {} logged in", user.email);

    (
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            token_cookie(&state.config.auth, &token.value),
        )],
        Json(AuthResponse {
            success: true,
            message: "Login successful".to_string(),
            token: token.value,
            user: user.into(),
        }),
    )
        .into_response()
}

pub async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let cookie_name = &state.config.auth.cookie_name;

    match auth::authenticate(&state.users, &state.tokens, &headers, cookie_name).await {
        Ok((user, token)) => {
            state.tokens.revoke(&token.value).await;
            tracing::info!("User {} logged out", user.email);
            (
                StatusCode::OK,
                Json(LogoutResponse {
                    message: "Logged out successfully".to_string(),
                }),
            )
                .into_response()
        }
        Err(_) => (
            StatusCode::NOT_FOUND,
            Json(NotFoundResponse {
                error: "User not found!".to_string(),
            }),
        )
            .into_response(),
    }
}

pub async fn me(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let cookie_name = &state.config.auth.cookie_name;

    match auth::authenticate(&state.users, &state.tokens, &headers, cookie_name).await {
        Ok((user, _token)) => (
            StatusCode::OK,
            Json(MeResponse {
                success: true,
                user: user.into(),
            }),
        )
            .into_response(),
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(FailureResponse::new("User not authenticated", None)),
        )
            .into_response(),
    }
}
