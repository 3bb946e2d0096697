// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile and social-graph API tests over the in-memory store.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_favourites_lifecycle_with_duplicates() {
    let (app, store) = common::create_test_app();
    store.seed("uid-1", common::profile("Anna", "Karenina", "a@x.com"));

    // Absent field reads as empty, not 404
    let (status, body) = send(&app, "GET", "/users/a@x.com/favorites", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, "POST", "/users/a@x.com/favorites/7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("New favourite trail ID added successfully"));

    let (_, body) = send(&app, "GET", "/users/a@x.com/favorites", None).await;
    assert_eq!(body, json!([7]));

    // Duplicates are permitted by design
    send(&app, "POST", "/users/a@x.com/favorites/7", None).await;
    let (_, body) = send(&app, "GET", "/users/a@x.com/favorites", None).await;
    assert_eq!(body, json!([7, 7]));

    // Deletion removes only the first occurrence
    let (status, _) = send(&app, "DELETE", "/users/a@x.com/favorites/7", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, "GET", "/users/a@x.com/favorites", None).await;
    assert_eq!(body, json!([7]));
}

#[tokio::test]
async fn test_remove_missing_favourite_is_not_found() {
    let (app, store) = common::create_test_app();
    store.seed("uid-1", common::profile("Anna", "Karenina", "a@x.com"));

    let (status, body) = send(&app, "DELETE", "/users/a@x.com/favorites/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let (app, _store) = common::create_test_app();

    let (status, _) = send(&app, "GET", "/users/nobody@x.com/favorites", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/users/nobody@x.com/favorites/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_completed_trails_append_in_order() {
    let (app, store) = common::create_test_app();
    store.seed("uid-1", common::profile("Anna", "Karenina", "a@x.com"));

    for id in [3, 1, 3] {
        let uri = format!("/users/a@x.com/completed/{}", id);
        let (status, _) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = send(&app, "GET", "/users/a@x.com/completed", None).await;
    assert_eq!(body, json!([3, 1, 3]));
}

#[tokio::test]
async fn test_privacy_toggle_round_trips() {
    let (app, store) = common::create_test_app();
    store.seed("uid-1", common::profile("Anna", "Karenina", "a@x.com"));

    let (status, body) = send(&app, "PATCH", "/users/a@x.com/privacy/toggle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isPrivate"], json!(true));

    let (_, body) = send(&app, "PATCH", "/users/a@x.com/privacy/toggle", None).await;
    assert_eq!(body["isPrivate"], json!(false));
}

#[tokio::test]
async fn test_comment_lifecycle_by_index() {
    let (app, store) = common::create_test_app();
    store.seed("uid-1", common::profile("Anna", "Karenina", "a@x.com"));

    let (status, comment) = send(
        &app,
        "POST",
        "/users/a@x.com/completed/3/comments",
        Some(json!("great views")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(comment["trailID"], json!(3));
    assert_eq!(comment["comment"], json!("great views"));
    assert!(!comment["id"].as_str().unwrap().is_empty());

    let (_, comments) = send(&app, "GET", "/users/a@x.com/comments", None).await;
    assert_eq!(comments.as_array().unwrap().len(), 1);

    // Out-of-range index is a client error, not a missing resource
    let (status, body) = send(&app, "DELETE", "/users/a@x.com/comments/5", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, _) = send(&app, "DELETE", "/users/a@x.com/comments/0", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, comments) = send(&app, "GET", "/users/a@x.com/comments", None).await;
    assert_eq!(comments, json!([]));
}

#[tokio::test]
async fn test_comment_deletion_by_stable_id() {
    let (app, store) = common::create_test_app();
    store.seed("uid-1", common::profile("Anna", "Karenina", "a@x.com"));

    let (_, first) = send(
        &app,
        "POST",
        "/users/a@x.com/completed/3/comments",
        Some(json!("one")),
    )
    .await;
    send(
        &app,
        "POST",
        "/users/a@x.com/completed/3/comments",
        Some(json!("two")),
    )
    .await;

    let id = first["id"].as_str().unwrap();
    let uri = format!("/users/a@x.com/comments/id/{}", id);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, comments) = send(&app, "GET", "/users/a@x.com/comments", None).await;
    let remaining = comments.as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["comment"], json!("two"));

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_comment_rejected() {
    let (app, store) = common::create_test_app();
    store.seed("uid-1", common::profile("Anna", "Karenina", "a@x.com"));

    let (status, _) = send(
        &app,
        "POST",
        "/users/a@x.com/completed/3/comments",
        Some(json!("   ")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_by_name_substring() {
    let (app, store) = common::create_test_app();
    store.seed("uid-1", common::profile("Anna", "Karenina", "a@x.com"));
    store.seed("uid-2", common::profile("Bob", "Builder", "b@x.com"));

    let (status, body) = send(&app, "GET", "/users/search/an", None).await;
    assert_eq!(status, StatusCode::OK);
    let matches = body.as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["firstName"], json!("Anna"));

    // Case-insensitive, matches last names too
    let (status, body) = send(&app, "GET", "/users/search/BUILD", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap()[0]["firstName"], json!("Bob"));

    let (status, _) = send(&app, "GET", "/users/search/xyz", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_following_replace_and_resolve() {
    let (app, store) = common::create_test_app();
    store.seed("uid-1", common::profile("Anna", "Karenina", "a@x.com"));
    store.seed("uid-2", common::profile("Bob", "Builder", "b@x.com"));

    let (status, _) = send(
        &app,
        "PUT",
        "/users/a@x.com/following",
        Some(json!(["b@x.com", "ghost@x.com"])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // GET resolves profiles; emails without a profile are skipped
    let (status, body) = send(&app, "GET", "/users/a@x.com/following", None).await;
    assert_eq!(status, StatusCode::OK);
    let followed = body.as_array().unwrap();
    assert_eq!(followed.len(), 1);
    assert_eq!(followed[0]["email"], json!("b@x.com"));

    // PUT is a wholesale replace
    let (_, _) = send(&app, "PUT", "/users/a@x.com/following", Some(json!([]))).await;
    let (_, body) = send(&app, "GET", "/users/a@x.com/following", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_feedback_is_stored() {
    let (app, store) = common::create_test_app();

    let (status, _) = send(&app, "POST", "/users/feedback/love%20the%20app", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.feedback_entries(), vec!["love the app".to_string()]);
}

#[tokio::test]
async fn test_profile_picture_missing_is_not_found() {
    let (app, store) = common::create_test_app();
    store.seed("uid-1", common::profile("Anna", "Karenina", "a@x.com"));

    let (status, _) = send(&app, "GET", "/users/a@x.com/profile-picture", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
