// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile and social-graph routes.

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Comment, UserProfile};
use crate::routes::MessageResponse;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/users/{email}/favorites",
            get(get_favourites),
        )
        .route(
            "/users/{email}/favorites/{trail_id}",
            post(add_favourite).delete(remove_favourite),
        )
        .route("/users/{email}/completed", get(get_completed))
        .route("/users/{email}/completed/{trail_id}", post(add_completed))
        .route(
            "/users/{email}/completed/{trail_id}/comments",
            post(add_comment),
        )
        .route("/users/{email}/comments", get(get_comments))
        .route("/users/{email}/comments/{index}", delete(remove_comment_at))
        .route(
            "/users/{email}/comments/id/{comment_id}",
            delete(remove_comment_by_id),
        )
        .route("/users/search/{name}", get(search_users))
        .route("/users/{email}/privacy/toggle", patch(toggle_privacy))
        .route(
            "/users/{email}/following",
            put(set_following).get(get_following),
        )
        .route("/users/feedback/{text}", post(post_feedback))
        .route(
            "/users/{email}/profile-picture",
            post(upload_profile_picture).get(get_profile_picture),
        )
}

fn message(text: &str) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.to_string(),
    })
}

// ─── Favourites ─────────────────────────────────────────────

/// Favourite trail IDs; empty when the field was never written.
async fn get_favourites(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Vec<i64>>> {
    Ok(Json(state.profiles.favourites(&email).await?))
}

async fn add_favourite(
    State(state): State<Arc<AppState>>,
    Path((email, trail_id)): Path<(String, i64)>,
) -> Result<Json<MessageResponse>> {
    state.profiles.add_favourite(&email, trail_id).await?;
    Ok(message("New favourite trail ID added successfully"))
}

async fn remove_favourite(
    State(state): State<Arc<AppState>>,
    Path((email, trail_id)): Path<(String, i64)>,
) -> Result<Json<MessageResponse>> {
    state.profiles.remove_favourite(&email, trail_id).await?;
    Ok(message("Favourite trail ID deleted successfully"))
}

// ─── Completed Trails ───────────────────────────────────────

async fn get_completed(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Vec<i64>>> {
    Ok(Json(state.profiles.completed(&email).await?))
}

async fn add_completed(
    State(state): State<Arc<AppState>>,
    Path((email, trail_id)): Path<(String, i64)>,
) -> Result<Json<MessageResponse>> {
    state.profiles.add_completed(&email, trail_id).await?;
    Ok(message("Trail marked as completed successfully"))
}

// ─── Comments ───────────────────────────────────────────────

/// Add a comment to a completed trail. The body is the comment text as a
/// JSON string; the stored comment (with its generated ID) is returned.
async fn add_comment(
    State(state): State<Arc<AppState>>,
    Path((email, trail_id)): Path<(String, i64)>,
    Json(text): Json<String>,
) -> Result<Json<Comment>> {
    if text.trim().is_empty() {
        return Err(AppError::BadRequest("Comment text is empty".to_string()));
    }

    let comment = state.profiles.add_comment(&email, trail_id, text).await?;
    Ok(Json(comment))
}

async fn get_comments(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Comment>>> {
    Ok(Json(state.profiles.comments(&email).await?))
}

/// Positional comment deletion (compatibility shim; prefer deletion by ID).
async fn remove_comment_at(
    State(state): State<Arc<AppState>>,
    Path((email, index)): Path<(String, usize)>,
) -> Result<Json<MessageResponse>> {
    state.profiles.remove_comment_at(&email, index).await?;
    Ok(message("Comment deleted successfully"))
}

async fn remove_comment_by_id(
    State(state): State<Arc<AppState>>,
    Path((email, comment_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>> {
    state
        .profiles
        .remove_comment_by_id(&email, comment_id)
        .await?;
    Ok(message("Comment deleted successfully"))
}

// ─── Search ─────────────────────────────────────────────────

/// Substring search over names. 404 when nothing matches, as the
/// frontend expects.
async fn search_users(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<UserProfile>>> {
    let matches = state.profiles.search_by_name(&name).await?;

    if matches.is_empty() {
        return Err(AppError::NotFound(
            "No users found matching the search query".to_string(),
        ));
    }
    Ok(Json(matches))
}

// ─── Privacy ────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyResponse {
    pub is_private: bool,
}

async fn toggle_privacy(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<PrivacyResponse>> {
    let is_private = state.profiles.toggle_privacy(&email).await?;
    Ok(Json(PrivacyResponse { is_private }))
}

// ─── Following ──────────────────────────────────────────────

async fn set_following(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    Json(following): Json<Vec<String>>,
) -> Result<Json<MessageResponse>> {
    state.profiles.set_following(&email, following).await?;
    Ok(message("Following updated successfully"))
}

/// Resolved profiles of everyone this user follows.
async fn get_following(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Vec<UserProfile>>> {
    Ok(Json(state.profiles.following_profiles(&email).await?))
}

// ─── Feedback ───────────────────────────────────────────────

async fn post_feedback(
    State(state): State<Arc<AppState>>,
    Path(text): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.profiles.submit_feedback(&text).await?;
    Ok(message("Feedback submitted successfully"))
}

// ─── Profile Picture ────────────────────────────────────────

/// Upload a profile picture (multipart `file` field) and store its public
/// URL on the profile.
async fn upload_profile_picture(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>> {
    // 404 before touching storage
    state.profiles.get(&email).await?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            upload = Some((content_type, data.to_vec()));
            break;
        }
    }

    let (content_type, data) =
        upload.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("No file uploaded".to_string()));
    }

    let object_name = format!("{}-profile-picture", email);
    let url = state.storage.put(&object_name, &content_type, data).await?;
    state.profiles.set_dp_url(&email, url).await?;

    Ok(message("Profile picture uploaded successfully"))
}

/// Download the profile picture bytes referenced by `dpUrl`.
async fn get_profile_picture(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Response> {
    let profile = state.profiles.get(&email).await?;
    let dp_url = profile.dp_url.ok_or_else(|| {
        AppError::NotFound("Profile picture URL not found for the user".to_string())
    })?;

    // The object name is the final segment of the stored public URL.
    let object_name = dp_url.rsplit('/').next().unwrap_or_default().to_string();
    let bytes = state.storage.get(&object_name).await?;

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response())
}
