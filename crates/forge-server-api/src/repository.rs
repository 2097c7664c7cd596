// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use forge_server_scm::{CommitInfo, RepoRef};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommitResponse {
	pub id: String,
	pub message: String,
	pub author_name: String,
	pub author_email: String,
	pub authored_date: String,
	pub parent_ids: Vec<String>,
}

impl From<CommitInfo> for CommitResponse {
	fn from(commit: CommitInfo) -> Self {
		Self {
			id: commit.id,
			message: commit.message,
			author_name: commit.author_name,
			author_email: commit.author_email,
			authored_date: commit.authored_date,
			parent_ids: commit.parent_ids,
		}
	}
}

/// A branch or tag with its resolved commit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RepoRefResponse {
	pub name: String,
	pub commit: CommitResponse,
}

impl From<RepoRef> for RepoRefResponse {
	fn from(repo_ref: RepoRef) -> Self {
		Self {
			name: repo_ref.name,
			commit: repo_ref.commit.into(),
		}
	}
}
