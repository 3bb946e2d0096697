// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Identity Toolkit client.
//!
//! Handles:
//! - email/password sign-in
//! - identity creation at registration
//! - identity lookup by email and deletion by local ID
//!
//! When FIREBASE_AUTH_EMULATOR_HOST is set, requests go to the Auth
//! emulator instead of the hosted endpoint.

use crate::error::AppError;
use async_trait::async_trait;
use serde::Deserialize;

const HOSTED_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Sign-in error codes that mean "bad credentials" rather than an outage.
const CREDENTIAL_ERRORS: &[&str] = &[
    "EMAIL_NOT_FOUND",
    "INVALID_PASSWORD",
    "INVALID_LOGIN_CREDENTIALS",
    "USER_DISABLED",
];

/// The identity-provider operations the account coordinator depends on.
///
/// [`IdentityClient`] is the production implementation; tests substitute
/// scripted implementations to exercise failure paths the real provider
/// cannot produce on demand.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify an email/password pair. Bad credentials map to Unauthorized.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AppError>;

    /// Create a new identity record; the provider generates the local ID.
    async fn create_identity(&self, email: &str, password: &str) -> Result<Identity, AppError>;

    /// Look up an identity by email. Returns None when no account exists.
    async fn get_identity_by_email(&self, email: &str) -> Result<Option<Identity>, AppError>;

    /// Delete an identity record by its local ID.
    async fn delete_identity(&self, local_id: &str) -> Result<(), AppError>;
}

/// Identity Toolkit REST client.
#[derive(Clone)]
pub struct IdentityClient {
    http: Option<reqwest::Client>,
    base_url: String,
    api_key: String,
}

/// An identity record as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub local_id: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<Identity>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl IdentityClient {
    /// Create a new client with the project's web API key.
    pub fn new(api_key: String) -> Self {
        let base_url = match std::env::var("FIREBASE_AUTH_EMULATOR_HOST") {
            Ok(host) => {
                tracing::info!(host = %host, "Using Firebase Auth emulator");
                format!("http://{}/identitytoolkit.googleapis.com/v1", host)
            }
            Err(_) => HOSTED_BASE_URL.to_string(),
        };

        Self {
            http: Some(reqwest::Client::new()),
            base_url,
            api_key,
        }
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All identity operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            http: None,
            base_url: HOSTED_BASE_URL.to_string(),
            api_key: "offline".to_string(),
        }
    }

    fn get_http(&self) -> Result<&reqwest::Client, AppError> {
        self.http.as_ref().ok_or_else(|| {
            AppError::Identity("Identity provider not connected (offline mode)".to_string())
        })
    }

    /// POST to an Identity Toolkit endpoint, mapping error codes via `on_error`.
    async fn post_json<T, F>(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
        on_error: F,
    ) -> Result<T, AppError>
    where
        T: for<'de> Deserialize<'de>,
        F: FnOnce(&str) -> AppError,
    {
        let url = format!("{}/{}?key={}", self.base_url, endpoint, self.api_key);

        let response = self
            .get_http()?
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Identity(e.to_string()))?;

        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|e| AppError::Identity(format!("Malformed response: {}", e)));
        }

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let code = serde_json::from_str::<ApiErrorBody>(&text)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| format!("HTTP {}", status));

        Err(on_error(&code))
    }
}

#[async_trait]
impl IdentityProvider for IdentityClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        self.post_json("accounts:signInWithPassword", &body, |code| {
            if CREDENTIAL_ERRORS.iter().any(|e| code.starts_with(e)) {
                AppError::Unauthorized
            } else {
                AppError::Identity(code.to_string())
            }
        })
        .await
    }

    async fn create_identity(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        self.post_json("accounts:signUp", &body, |code| {
            if code.starts_with("EMAIL_EXISTS") {
                AppError::BadRequest("Email is already registered".to_string())
            } else if code.starts_with("WEAK_PASSWORD") {
                AppError::BadRequest("Password is too weak".to_string())
            } else {
                AppError::Identity(code.to_string())
            }
        })
        .await
    }

    async fn get_identity_by_email(&self, email: &str) -> Result<Option<Identity>, AppError> {
        let body = serde_json::json!({ "email": [email] });

        let response: LookupResponse = self
            .post_json("accounts:lookup", &body, |code| {
                AppError::Identity(code.to_string())
            })
            .await?;

        Ok(response.users.into_iter().next())
    }

    async fn delete_identity(&self, local_id: &str) -> Result<(), AppError> {
        let body = serde_json::json!({ "localId": local_id });

        let _: serde_json::Value = self
            .post_json("accounts:delete", &body, |code| {
                AppError::Identity(code.to_string())
            })
            .await?;
        Ok(())
    }
}
