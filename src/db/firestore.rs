// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Implements [`ProfileStore`] against Cloud Firestore:
//! - profile lookup by document ID and by the indexed email field
//! - transactional read-modify-write for profile mutations
//! - feedback document creation

use crate::db::{collections, MutateOutcome, ProfileDoc, ProfileStore};
use crate::error::AppError;
use crate::models::{mutation, ProfileMutation, UserProfile};
use async_trait::async_trait;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

/// Feedback document (free text plus submission time).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FeedbackEntry {
    text: String,
    created_at: String,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // A dummy JWT is enough for the emulator; ExternalJwtFunctionSource
        // avoids having to implement a TokenSource type.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Extract the document ID from a full Firestore resource name.
    fn doc_id_from_name(name: &str) -> String {
        name.rsplit('/').next().unwrap_or_default().to_string()
    }
}

#[async_trait]
impl ProfileStore for FirestoreDb {
    /// Find a profile by email (first match in enumeration order).
    async fn find_by_email(&self, email: &str) -> Result<Option<ProfileDoc>, AppError> {
        let email = email.to_string();
        let docs: Vec<firestore::FirestoreDocument> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("email").eq(&email)]))
            .limit(1)
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        docs.first()
            .map(|doc| {
                let profile = firestore::FirestoreDb::deserialize_doc_to::<UserProfile>(doc)
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(ProfileDoc {
                    id: Self::doc_id_from_name(&doc.name),
                    profile,
                })
            })
            .transpose()
    }

    async fn get(&self, doc_id: &str) -> Result<Option<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn list(&self) -> Result<Vec<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn create(&self, doc_id: &str, profile: &UserProfile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(doc_id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, doc_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(doc_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Read-modify-write a profile inside a Firestore transaction.
    ///
    /// `run_transaction` binds the email query to the transaction, so a
    /// concurrent writer to the same document aborts the commit and the
    /// body is retried with fresh data instead of losing an update. The
    /// transaction is rolled back on any error inside the body.
    async fn mutate(
        &self,
        email: &str,
        mutation: ProfileMutation,
    ) -> Result<MutateOutcome, AppError> {
        let outcome = self
            .get_client()?
            .run_transaction(|db, transaction| {
                let email = email.to_string();
                let mutation = mutation.clone();
                async move {
                    let docs: Vec<firestore::FirestoreDocument> = db
                        .fluent()
                        .select()
                        .from(collections::USERS)
                        .filter(move |q| q.for_all([q.field("email").eq(&email)]))
                        .limit(1)
                        .query()
                        .await?;

                    let Some(doc) = docs.first() else {
                        return Ok(MutateOutcome::NoSuchUser);
                    };

                    let doc_id = Self::doc_id_from_name(&doc.name);
                    let mut profile =
                        firestore::FirestoreDb::deserialize_doc_to::<UserProfile>(doc)?;

                    if let Err(e) = mutation::apply(&mut profile, mutation) {
                        // Nothing to write; the current state rejects the mutation.
                        return Ok(MutateOutcome::Rejected(e));
                    }

                    db.fluent()
                        .update()
                        .in_col(collections::USERS)
                        .document_id(&doc_id)
                        .object(&profile)
                        .add_to_transaction(transaction)?;

                    Ok(MutateOutcome::Applied(profile))
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("Profile mutation failed: {}", e)))?;

        if let MutateOutcome::Applied(_) = &outcome {
            tracing::debug!(email, "Profile mutation committed");
        }

        Ok(outcome)
    }

    async fn add_feedback(&self, text: &str) -> Result<(), AppError> {
        let entry = FeedbackEntry {
            text: text.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        let _: FeedbackEntry = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::FEEDBACK)
            .generate_document_id()
            .object(&entry)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
