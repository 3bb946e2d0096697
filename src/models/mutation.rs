// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile mutations and their in-memory application.
//!
//! Every write to a profile document is expressed as a [`ProfileMutation`]
//! and applied through [`apply`], so the Firestore store and the in-memory
//! test store share exactly one implementation of the read-modify-write
//! semantics: append without de-duplication, remove-first-occurrence,
//! bounds-checked positional removal, wholesale replacement, and toggling.

use crate::models::{Comment, UserProfile};

/// A single mutation of one profile document field.
#[derive(Debug, Clone)]
pub enum ProfileMutation {
    AddFavourite(i64),
    /// Removes the first occurrence only; duplicates survive
    RemoveFavourite(i64),
    AddCompleted(i64),
    AddComment(Comment),
    /// Positional removal, kept for API compatibility. Unsafe under
    /// concurrent deletion, which is why mutations run transactionally.
    RemoveCommentAt(usize),
    RemoveCommentById(String),
    SetFollowing(Vec<String>),
    TogglePrivacy,
    SetDpUrl(String),
}

/// Why a mutation could not be applied to the current document state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    #[error("value not in sequence")]
    ValueNotInSequence,
    #[error("index out of range")]
    IndexOutOfRange,
    #[error("comment not found")]
    CommentNotFound,
}

/// Apply `mutation` to `profile` in memory.
///
/// On error the profile is left unchanged and nothing should be written
/// back to the store.
pub fn apply(profile: &mut UserProfile, mutation: ProfileMutation) -> Result<(), MutationError> {
    match mutation {
        ProfileMutation::AddFavourite(id) => {
            profile.favourites.push(id);
        }
        ProfileMutation::RemoveFavourite(id) => {
            let pos = profile
                .favourites
                .iter()
                .position(|&f| f == id)
                .ok_or(MutationError::ValueNotInSequence)?;
            profile.favourites.remove(pos);
        }
        ProfileMutation::AddCompleted(id) => {
            profile.completed.push(id);
        }
        ProfileMutation::AddComment(comment) => {
            profile.comments.push(comment);
        }
        ProfileMutation::RemoveCommentAt(index) => {
            if index >= profile.comments.len() {
                return Err(MutationError::IndexOutOfRange);
            }
            profile.comments.remove(index);
        }
        ProfileMutation::RemoveCommentById(id) => {
            let pos = profile
                .comments
                .iter()
                .position(|c| !c.id.is_empty() && c.id == id)
                .ok_or(MutationError::CommentNotFound)?;
            profile.comments.remove(pos);
        }
        ProfileMutation::SetFollowing(following) => {
            profile.following = following;
        }
        ProfileMutation::TogglePrivacy => {
            profile.is_private = !profile.is_private;
        }
        ProfileMutation::SetDpUrl(url) => {
            profile.dp_url = Some(url);
        }
    }
    Ok(())
}
