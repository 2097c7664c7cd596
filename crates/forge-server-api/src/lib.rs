// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod members;
pub mod projects;
pub mod repository;
pub mod snippets;
pub mod users;

pub use members::{
	AddMembersRequest, AddMembersResponse, MembershipResponse, RemoveMembersRequest,
	RemoveMembersResponse, UpdateMembersRequest, UpdateMembersResponse,
};
pub use projects::{CreateProjectRequest, ProjectResponse};
pub use repository::{CommitResponse, RepoRefResponse};
pub use snippets::{CreateSnippetRequest, SnippetResponse, UpdateSnippetRequest};
pub use users::{MessageResponse, UserResponse};
