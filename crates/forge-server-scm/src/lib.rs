// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Read-only access to the version-control backend.
//!
//! Branches, tags and blobs are queried live from a project's bare git
//! repository; nothing here is persisted. [`RefStore`] is the seam the
//! domain layer consumes, [`GitRefStore`] the gix-backed production
//! implementation, [`MemoryRefStore`] the in-process test double.

pub mod error;
pub mod git;
pub mod memory;
pub mod store;
pub mod types;

pub use error::{Result, ScmError};
pub use git::GitRefStore;
pub use memory::MemoryRefStore;
pub use store::RefStore;
pub use types::{CommitInfo, RepoRef};
