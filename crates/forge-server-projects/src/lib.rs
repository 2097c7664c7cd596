// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Domain services for projects, memberships and snippets.
//!
//! Every operation takes the acting user explicitly; there is no ambient
//! identity. Services enforce per-project access control and return typed
//! [`ProjectsError`] values — translating those to status codes is the
//! gateway's job alone.

pub mod access;
pub mod error;
pub mod membership;
pub mod project;
pub mod snippet;
pub mod types;

pub use error::{ProjectsError, Result};
pub use membership::MembershipService;
pub use project::ProjectService;
pub use snippet::SnippetService;
pub use types::{
	slugify_code, validate_project_code, AccessLevel, Membership, NewProject, Project,
	ProjectOwner, Snippet, SnippetPatch,
};
