// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile state synchronizer.
//!
//! Each operation locates the user's document by email, applies one
//! [`ProfileMutation`] through the store's transactional read-modify-write,
//! and maps the outcome to the application error taxonomy. Reads default
//! absent fields (empty sequences, `isPrivate` false) at the model boundary.

use crate::db::{MutateOutcome, ProfileStore};
use crate::error::AppError;
use crate::models::{Comment, MutationError, ProfileMutation, UserProfile};
use ring::rand::SecureRandom;
use std::sync::Arc;

/// Profile read/write operations over an injected store.
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Load a profile by email.
    pub async fn get(&self, email: &str) -> Result<UserProfile, AppError> {
        self.store
            .find_by_email(email)
            .await?
            .map(|doc| doc.profile)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    // ─── Favourites ─────────────────────────────────────────────

    pub async fn favourites(&self, email: &str) -> Result<Vec<i64>, AppError> {
        Ok(self.get(email).await?.favourites)
    }

    /// Append a favourite trail ID. Duplicates are permitted.
    pub async fn add_favourite(&self, email: &str, trail_id: i64) -> Result<Vec<i64>, AppError> {
        let profile = self
            .mutate(email, ProfileMutation::AddFavourite(trail_id))
            .await?;
        Ok(profile.favourites)
    }

    /// Remove the first occurrence of a favourite trail ID.
    pub async fn remove_favourite(&self, email: &str, trail_id: i64) -> Result<Vec<i64>, AppError> {
        let profile = self
            .mutate(email, ProfileMutation::RemoveFavourite(trail_id))
            .await?;
        Ok(profile.favourites)
    }

    // ─── Completed Trails ───────────────────────────────────────

    pub async fn completed(&self, email: &str) -> Result<Vec<i64>, AppError> {
        Ok(self.get(email).await?.completed)
    }

    pub async fn add_completed(&self, email: &str, trail_id: i64) -> Result<Vec<i64>, AppError> {
        let profile = self
            .mutate(email, ProfileMutation::AddCompleted(trail_id))
            .await?;
        Ok(profile.completed)
    }

    // ─── Comments ───────────────────────────────────────────────

    pub async fn comments(&self, email: &str) -> Result<Vec<Comment>, AppError> {
        Ok(self.get(email).await?.comments)
    }

    /// Append a comment on a completed trail; returns the stored comment
    /// with its generated stable ID.
    pub async fn add_comment(
        &self,
        email: &str,
        trail_id: i64,
        text: String,
    ) -> Result<Comment, AppError> {
        let comment = Comment {
            id: new_comment_id()?,
            trail_id,
            email: email.to_string(),
            comment: text,
        };

        self.mutate(email, ProfileMutation::AddComment(comment.clone()))
            .await?;
        Ok(comment)
    }

    /// Remove the comment at a position. Compatibility shim: positional
    /// deletion can hit the wrong comment if the client's index is stale.
    pub async fn remove_comment_at(&self, email: &str, index: usize) -> Result<(), AppError> {
        self.mutate(email, ProfileMutation::RemoveCommentAt(index))
            .await?;
        Ok(())
    }

    /// Remove a comment by its stable ID.
    pub async fn remove_comment_by_id(&self, email: &str, id: String) -> Result<(), AppError> {
        self.mutate(email, ProfileMutation::RemoveCommentById(id))
            .await?;
        Ok(())
    }

    // ─── Following ──────────────────────────────────────────────

    /// Resolve the profiles of everyone this user follows.
    ///
    /// Emails that no longer resolve to a profile are skipped.
    pub async fn following_profiles(&self, email: &str) -> Result<Vec<UserProfile>, AppError> {
        let profile = self.get(email).await?;

        let mut followed = Vec::with_capacity(profile.following.len());
        for followed_email in &profile.following {
            if let Some(doc) = self.store.find_by_email(followed_email).await? {
                followed.push(doc.profile);
            }
        }
        Ok(followed)
    }

    /// Wholesale-replace the following list.
    pub async fn set_following(&self, email: &str, following: Vec<String>) -> Result<(), AppError> {
        self.mutate(email, ProfileMutation::SetFollowing(following))
            .await?;
        Ok(())
    }

    // ─── Privacy ────────────────────────────────────────────────

    /// Toggle the privacy flag; returns the new value.
    pub async fn toggle_privacy(&self, email: &str) -> Result<bool, AppError> {
        let profile = self.mutate(email, ProfileMutation::TogglePrivacy).await?;
        Ok(profile.is_private)
    }

    // ─── Profile Picture ────────────────────────────────────────

    pub async fn set_dp_url(&self, email: &str, url: String) -> Result<(), AppError> {
        self.mutate(email, ProfileMutation::SetDpUrl(url)).await?;
        Ok(())
    }

    // ─── Search ─────────────────────────────────────────────────

    /// Case-insensitive substring search over first and last names.
    ///
    /// Scans the whole collection; results keep the store's enumeration
    /// order. O(documents × name length), acceptable at this scale.
    pub async fn search_by_name(&self, query: &str) -> Result<Vec<UserProfile>, AppError> {
        let query = query.to_lowercase();
        let profiles = self.store.list().await?;

        Ok(profiles
            .into_iter()
            .filter(|p| p.name_matches(&query))
            .collect())
    }

    // ─── Feedback ───────────────────────────────────────────────

    pub async fn submit_feedback(&self, text: &str) -> Result<(), AppError> {
        self.store.add_feedback(text).await
    }

    /// Run one mutation and translate the outcome into the error taxonomy.
    async fn mutate(
        &self,
        email: &str,
        mutation: ProfileMutation,
    ) -> Result<UserProfile, AppError> {
        match self.store.mutate(email, mutation).await? {
            MutateOutcome::Applied(profile) => Ok(profile),
            MutateOutcome::NoSuchUser => Err(AppError::NotFound("User not found".to_string())),
            MutateOutcome::Rejected(MutationError::ValueNotInSequence) => Err(AppError::NotFound(
                "Trail ID not found in the user's list".to_string(),
            )),
            MutateOutcome::Rejected(MutationError::IndexOutOfRange) => Err(AppError::BadRequest(
                "Comment index out of range".to_string(),
            )),
            MutateOutcome::Rejected(MutationError::CommentNotFound) => {
                Err(AppError::NotFound("Comment not found".to_string()))
            }
        }
    }
}

/// Generate a stable comment identifier (16 hex chars).
fn new_comment_id() -> Result<String, AppError> {
    let mut bytes = [0u8; 8];
    ring::rand::SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG unavailable")))?;
    Ok(hex::encode(bytes))
}
