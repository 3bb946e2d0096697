// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod account;
pub mod identity;
pub mod profile;
pub mod storage;

pub use account::AccountService;
pub use identity::{Identity, IdentityClient, IdentityProvider};
pub use profile::ProfileService;
pub use storage::StorageClient;
