// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trailmeet API Server
//!
//! Backend-for-frontend for the trail-walking social app: Firebase
//! Authentication for identities, Firestore for profile documents and
//! Cloud Storage for profile pictures.

use std::sync::Arc;
use trailmeet::{
    config::Config,
    db::FirestoreDb,
    services::{AccountService, IdentityClient, ProfileService, StorageClient},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Trailmeet API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");
    let store = Arc::new(db);

    // Identity Toolkit client
    let identity = IdentityClient::new(config.firebase_api_key.clone());

    // Cloud Storage client for profile pictures
    let storage = StorageClient::new(&config.storage_bucket)
        .await
        .expect("Failed to initialize Cloud Storage client");
    tracing::info!(bucket = %config.storage_bucket, "Storage client initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        profiles: ProfileService::new(store.clone()),
        accounts: AccountService::new(Arc::new(identity), store),
        storage,
    });

    // Build router
    let app = trailmeet::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trailmeet=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
