//! User profile model for storage and API.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// User profile stored in Firestore (one document per identity, keyed by
/// the Identity Toolkit local ID, indexed by `email`).
///
/// Sequence fields default to empty and `isPrivate` to false when absent,
/// so documents written by older clients deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Public URL of the profile picture object, absent until first upload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dp_url: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    /// Favourite trail IDs, append-only, duplicates permitted
    #[serde(default)]
    pub favourites: Vec<i64>,
    /// Completed trail IDs, append-only, duplicates permitted
    #[serde(default)]
    pub completed: Vec<i64>,
    /// Emails of followed users, wholesale-replaced on update
    #[serde(default)]
    pub following: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl UserProfile {
    /// Case-insensitive substring match against first or last name.
    ///
    /// `query` must already be lower-cased by the caller.
    pub fn name_matches(&self, query: &str) -> bool {
        self.first_name.to_lowercase().contains(query)
            || self.last_name.to_lowercase().contains(query)
    }
}

/// Comment on a completed trail, embedded in the parent profile.
///
/// `id` is a generated stable identifier; legacy comments without one
/// deserialize with an empty id and can only be deleted by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "trailID")]
    pub trail_id: i64,
    pub email: String,
    pub comment: String,
}

/// Login request body.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    /// Identity Toolkit enforces a 6 character minimum
    #[validate(length(min = 6))]
    pub password: String,
    #[serde(default)]
    pub favourites: Vec<i64>,
}
