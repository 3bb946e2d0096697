// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use trailmeet::config::Config;
use trailmeet::db::{MutateOutcome, ProfileDoc, ProfileStore};
use trailmeet::error::AppError;
use trailmeet::models::{mutation, ProfileMutation, UserProfile};
use trailmeet::routes::create_router;
use trailmeet::services::{
    AccountService, Identity, IdentityClient, IdentityProvider, ProfileService, StorageClient,
};
use trailmeet::AppState;

/// In-memory profile store with deterministic enumeration order.
#[derive(Default)]
pub struct MemoryProfileStore {
    docs: Mutex<BTreeMap<String, UserProfile>>,
    feedback: Mutex<Vec<String>>,
    fail_next_create: AtomicBool,
}

impl MemoryProfileStore {
    #[allow(dead_code)]
    pub fn seed(&self, doc_id: &str, profile: UserProfile) {
        self.docs
            .lock()
            .unwrap()
            .insert(doc_id.to_string(), profile);
    }

    #[allow(dead_code)]
    pub fn feedback_entries(&self) -> Vec<String> {
        self.feedback.lock().unwrap().clone()
    }

    /// Make the next `create` call fail with a database error.
    #[allow(dead_code)]
    pub fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::SeqCst);
    }

    /// Synchronous lookup for assertions.
    #[allow(dead_code)]
    pub fn find_profile(&self, email: &str) -> Option<UserProfile> {
        self.docs
            .lock()
            .unwrap()
            .values()
            .find(|p| p.email == email)
            .cloned()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<ProfileDoc>, AppError> {
        let docs = self.docs.lock().unwrap();
        Ok(docs
            .iter()
            .find(|(_, p)| p.email == email)
            .map(|(id, p)| ProfileDoc {
                id: id.clone(),
                profile: p.clone(),
            }))
    }

    async fn get(&self, doc_id: &str) -> Result<Option<UserProfile>, AppError> {
        Ok(self.docs.lock().unwrap().get(doc_id).cloned())
    }

    async fn list(&self) -> Result<Vec<UserProfile>, AppError> {
        Ok(self.docs.lock().unwrap().values().cloned().collect())
    }

    async fn create(&self, doc_id: &str, profile: &UserProfile) -> Result<(), AppError> {
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(AppError::Database("write unavailable".to_string()));
        }
        self.docs
            .lock()
            .unwrap()
            .insert(doc_id.to_string(), profile.clone());
        Ok(())
    }

    async fn delete(&self, doc_id: &str) -> Result<(), AppError> {
        self.docs.lock().unwrap().remove(doc_id);
        Ok(())
    }

    async fn mutate(
        &self,
        email: &str,
        change: ProfileMutation,
    ) -> Result<MutateOutcome, AppError> {
        let mut docs = self.docs.lock().unwrap();
        let entry = docs.iter_mut().find(|(_, p)| p.email == email);

        let Some((_, profile)) = entry else {
            return Ok(MutateOutcome::NoSuchUser);
        };

        let mut updated = profile.clone();
        match mutation::apply(&mut updated, change) {
            Ok(()) => {
                *profile = updated.clone();
                Ok(MutateOutcome::Applied(updated))
            }
            Err(e) => Ok(MutateOutcome::Rejected(e)),
        }
    }

    async fn add_feedback(&self, text: &str) -> Result<(), AppError> {
        self.feedback.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Scriptable identity provider for exercising the account coordinator.
///
/// Hands out a fixed local ID, answers lookups from `lookup`, and records
/// every deletion. `fail_delete` makes deletions error after recording.
#[allow(dead_code)]
#[derive(Default)]
pub struct StubIdentityProvider {
    pub lookup: Mutex<Option<Identity>>,
    pub deleted: Mutex<Vec<String>>,
    pub fail_delete: AtomicBool,
}

#[allow(dead_code)]
pub const STUB_LOCAL_ID: &str = "stub-local-id";

impl StubIdentityProvider {
    #[allow(dead_code)]
    pub fn with_lookup(email: &str) -> Self {
        let stub = Self::default();
        *stub.lookup.lock().unwrap() = Some(Identity {
            local_id: STUB_LOCAL_ID.to_string(),
            email: email.to_string(),
        });
        stub
    }

    #[allow(dead_code)]
    pub fn deleted_ids(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    async fn sign_in(&self, email: &str, _password: &str) -> Result<Identity, AppError> {
        Ok(Identity {
            local_id: STUB_LOCAL_ID.to_string(),
            email: email.to_string(),
        })
    }

    async fn create_identity(&self, email: &str, _password: &str) -> Result<Identity, AppError> {
        Ok(Identity {
            local_id: STUB_LOCAL_ID.to_string(),
            email: email.to_string(),
        })
    }

    async fn get_identity_by_email(&self, _email: &str) -> Result<Option<Identity>, AppError> {
        Ok(self.lookup.lock().unwrap().clone())
    }

    async fn delete_identity(&self, local_id: &str) -> Result<(), AppError> {
        self.deleted.lock().unwrap().push(local_id.to_string());
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(AppError::Identity("delete unavailable".to_string()));
        }
        Ok(())
    }
}

/// A minimal profile for seeding.
#[allow(dead_code)]
pub fn profile(first: &str, last: &str, email: &str) -> UserProfile {
    UserProfile {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        dp_url: None,
        is_private: false,
        favourites: vec![],
        completed: vec![],
        following: vec![],
        comments: vec![],
    }
}

/// Create a test app over an in-memory store, with identity and storage
/// clients in offline mock mode.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<MemoryProfileStore>) {
    create_test_app_with_identity(Arc::new(IdentityClient::new_mock()))
}

/// Create a test app with a caller-supplied identity provider.
#[allow(dead_code)]
pub fn create_test_app_with_identity(
    identity: Arc<dyn IdentityProvider>,
) -> (axum::Router, Arc<MemoryProfileStore>) {
    let config = Config::test_default();
    let store = Arc::new(MemoryProfileStore::default());
    let storage = StorageClient::new_mock();

    let state = Arc::new(AppState {
        config,
        profiles: ProfileService::new(store.clone()),
        accounts: AccountService::new(identity, store.clone()),
        storage,
    });

    (create_router(state), store)
}
