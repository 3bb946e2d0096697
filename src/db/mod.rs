//! Database layer (Firestore) and the store seam used by services.

pub mod firestore;

pub use firestore::FirestoreDb;

use crate::error::AppError;
use crate::models::{MutationError, ProfileMutation, UserProfile};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const FEEDBACK: &str = "feedback";
}

/// A profile document together with its document ID.
#[derive(Debug, Clone)]
pub struct ProfileDoc {
    pub id: String,
    pub profile: UserProfile,
}

/// Outcome of a transactional profile mutation.
#[derive(Debug, Clone)]
pub enum MutateOutcome {
    /// The mutation was applied and written; carries the new state.
    Applied(UserProfile),
    /// No document matched the email selector.
    NoSuchUser,
    /// The mutation did not apply to the current state; nothing was written.
    Rejected(MutationError),
}

/// Narrow document-store interface consumed by the services layer.
///
/// Implemented by [`FirestoreDb`] in production and by an in-memory store
/// in tests. Email lookups resolve to the first match in the store's
/// enumeration order; email uniqueness is assumed, not enforced.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Find a profile by its indexed email field.
    async fn find_by_email(&self, email: &str) -> Result<Option<ProfileDoc>, AppError>;

    /// Get a profile by document ID (the identity's local ID).
    async fn get(&self, doc_id: &str) -> Result<Option<UserProfile>, AppError>;

    /// Enumerate every profile document. Full collection scan.
    async fn list(&self) -> Result<Vec<UserProfile>, AppError>;

    /// Create the profile document for a freshly created identity.
    async fn create(&self, doc_id: &str, profile: &UserProfile) -> Result<(), AppError>;

    /// Delete a profile document.
    async fn delete(&self, doc_id: &str) -> Result<(), AppError>;

    /// Read-modify-write a profile located by email.
    ///
    /// Implementations must make the read and the write atomic with
    /// respect to other `mutate` calls on the same document, so racing
    /// sequence mutations cannot silently drop each other's updates.
    async fn mutate(
        &self,
        email: &str,
        mutation: ProfileMutation,
    ) -> Result<MutateOutcome, AppError>;

    /// Append a feedback document (free text, timestamped).
    async fn add_feedback(&self, text: &str) -> Result<(), AppError>;
}
