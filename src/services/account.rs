// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration/deletion coordinator.
//!
//! Registration and account deletion each span two external systems
//! (Identity Toolkit and Firestore). Both run as explicit sagas: the
//! second step failing triggers a compensating action (or is loudly
//! reported) so a partial failure cannot silently strand an identity
//! without a profile or vice versa.

use crate::db::ProfileStore;
use crate::error::AppError;
use crate::models::{RegisterRequest, UserProfile};
use crate::services::identity::IdentityProvider;
use std::sync::Arc;

/// Coordinates identity records and profile documents.
#[derive(Clone)]
pub struct AccountService {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn ProfileStore>,
}

impl AccountService {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn ProfileStore>) -> Self {
        Self { identity, store }
    }

    /// Create an identity, then its profile document keyed by the local ID.
    ///
    /// If the profile write fails the just-created identity is deleted so
    /// no orphaned identity remains.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserProfile, AppError> {
        let identity = self
            .identity
            .create_identity(&request.email, &request.password)
            .await?;

        let profile = UserProfile {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            dp_url: None,
            is_private: false,
            favourites: request.favourites,
            completed: vec![],
            following: vec![],
            comments: vec![],
        };

        if let Err(err) = self.store.create(&identity.local_id, &profile).await {
            if let Err(cleanup_err) = self.identity.delete_identity(&identity.local_id).await {
                tracing::error!(
                    email = %profile.email,
                    local_id = %identity.local_id,
                    error = %cleanup_err,
                    "Failed to roll back identity after profile write failure; orphaned identity remains"
                );
            }
            return Err(err);
        }

        tracing::info!(email = %profile.email, "User registered");
        Ok(profile)
    }

    /// Verify credentials, then load the profile by identity ID.
    ///
    /// A missing profile after a successful sign-in is NotFound, distinct
    /// from bad credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AppError> {
        let identity = self.identity.sign_in(email, password).await?;

        self.store
            .get(&identity.local_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Delete the profile document and then the identity record.
    ///
    /// The identity is resolved before anything is deleted, so a lookup
    /// failure cannot strand a half-deleted account.
    pub async fn delete_account(&self, email: &str) -> Result<(), AppError> {
        let identity = self
            .identity
            .get_identity_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if let Some(doc) = self.store.find_by_email(email).await? {
            self.store.delete(&doc.id).await?;
        }

        if let Err(err) = self.identity.delete_identity(&identity.local_id).await {
            tracing::error!(
                email,
                local_id = %identity.local_id,
                error = %err,
                "Profile deleted but identity deletion failed; identity is orphaned"
            );
            return Err(err);
        }

        tracing::info!(email, "Account deleted");
        Ok(())
    }
}
