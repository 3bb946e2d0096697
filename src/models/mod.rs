// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod mutation;
pub mod user;

pub use mutation::{MutationError, ProfileMutation};
pub use user::{Comment, LoginRequest, RegisterRequest, UserProfile};
