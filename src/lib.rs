// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Trailmeet: backend API for the trail-walking social app.
//!
//! This crate authenticates users against Firebase Authentication and
//! keeps profiles and social-graph state (favourites, completed trails,
//! comments, following, privacy, profile pictures) in Firestore and
//! Cloud Storage.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::{AccountService, ProfileService, StorageClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub profiles: ProfileService,
    pub accounts: AccountService,
    pub storage: StorageClient,
}
