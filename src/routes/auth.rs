// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication routes: login, registration, account deletion.

use axum::{
    extract::{Path, State},
    routing::{delete, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{LoginRequest, RegisterRequest, UserProfile};
use crate::routes::MessageResponse;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/{email}/delete", delete(delete_account))
}

/// Response carrying a status message and the affected profile.
#[derive(Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserProfile,
}

/// Verify credentials and return the user's profile.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user = state.accounts.login(&payload.email, &payload.password).await?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user,
    }))
}

/// Create an identity and its profile document.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user = state.accounts.register(payload).await?;

    Ok(Json(AuthResponse {
        message: "User registered successfully".to_string(),
        user,
    }))
}

/// Delete the profile document and the identity record.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.accounts.delete_account(&email).await?;

    Ok(Json(MessageResponse {
        message: "Account deleted successfully".to_string(),
    }))
}
