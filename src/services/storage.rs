// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cloud Storage client for profile pictures.
//!
//! Uses the JSON API directly (media upload/download) with tokens from
//! the ambient GCP credentials. Objects are keyed `{email}-profile-picture`
//! and referenced from the profile's `dpUrl` field by public URL.

use crate::error::AppError;
use std::sync::Arc;

const PUBLIC_URL_BASE: &str = "https://storage.googleapis.com";

/// Cloud Storage client scoped to a single bucket.
#[derive(Clone)]
pub struct StorageClient {
    http: Option<reqwest::Client>,
    base_url: String,
    bucket: String,
    token_generator: Option<Arc<gcloud_sdk::GoogleAuthTokenGenerator>>,
}

impl StorageClient {
    /// Create a new client for `bucket`.
    ///
    /// When STORAGE_EMULATOR_HOST is set, requests go there unauthenticated.
    pub async fn new(bucket: &str) -> Result<Self, AppError> {
        if let Ok(host) = std::env::var("STORAGE_EMULATOR_HOST") {
            tracing::info!(host = %host, "Using Cloud Storage emulator");
            return Ok(Self {
                http: Some(reqwest::Client::new()),
                base_url: format!("http://{}", host),
                bucket: bucket.to_string(),
                token_generator: None,
            });
        }

        let token_generator = gcloud_sdk::GoogleAuthTokenGenerator::new(
            gcloud_sdk::TokenSourceType::Default,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
        )
        .await
        .map_err(|e| AppError::Storage(format!("Failed to initialize credentials: {}", e)))?;

        Ok(Self {
            http: Some(reqwest::Client::new()),
            base_url: PUBLIC_URL_BASE.to_string(),
            bucket: bucket.to_string(),
            token_generator: Some(Arc::new(token_generator)),
        })
    }

    /// Create a mock client for testing (offline mode).
    pub fn new_mock() -> Self {
        Self {
            http: None,
            base_url: PUBLIC_URL_BASE.to_string(),
            bucket: "test-bucket".to_string(),
            token_generator: None,
        }
    }

    fn get_http(&self) -> Result<&reqwest::Client, AppError> {
        self.http
            .as_ref()
            .ok_or_else(|| AppError::Storage("Storage not connected (offline mode)".to_string()))
    }

    async fn auth_header(&self) -> Result<Option<String>, AppError> {
        match &self.token_generator {
            Some(generator) => {
                let token = generator
                    .create_token()
                    .await
                    .map_err(|e| AppError::Storage(format!("Token error: {}", e)))?;
                Ok(Some(token.header_value()))
            }
            None => Ok(None),
        }
    }

    /// Upload an object; returns its public URL.
    pub async fn put(
        &self,
        object_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, AppError> {
        let url = format!(
            "{}/upload/storage/v1/b/{}/o?uploadType=media&name={}",
            self.base_url,
            self.bucket,
            urlencoding::encode(object_name)
        );

        let mut request = self
            .get_http()?
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        if let Some(auth) = self.auth_header().await? {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!("Upload failed: {} {}", status, body)));
        }

        tracing::info!(bucket = %self.bucket, object = object_name, "Object uploaded");

        Ok(format!("{}/{}/{}", PUBLIC_URL_BASE, self.bucket, object_name))
    }

    /// Download an object's bytes.
    pub async fn get(&self, object_name: &str) -> Result<Vec<u8>, AppError> {
        let url = format!(
            "{}/storage/v1/b/{}/o/{}?alt=media",
            self.base_url,
            self.bucket,
            urlencoding::encode(object_name)
        );

        let mut request = self.get_http()?.get(&url);
        if let Some(auth) = self.auth_header().await? {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "Object {} not found",
                object_name
            )));
        }
        if !response.status().is_success() {
            return Err(AppError::Storage(format!(
                "Download failed: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
