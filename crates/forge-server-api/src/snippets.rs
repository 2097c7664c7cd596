// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use forge_server_projects::{Snippet, SnippetPatch};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Snippet creation attributes; all fields are validated by the domain
/// layer rather than at deserialization time.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateSnippetRequest {
	pub title: Option<String>,
	pub file_name: Option<String>,
	pub code: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSnippetRequest {
	pub title: Option<String>,
	pub file_name: Option<String>,
	pub code: Option<String>,
}

impl From<UpdateSnippetRequest> for SnippetPatch {
	fn from(request: UpdateSnippetRequest) -> Self {
		Self {
			title: request.title,
			file_name: request.file_name,
			content: request.code,
		}
	}
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SnippetResponse {
	pub id: i64,
	pub project_id: i64,
	pub author_id: i64,
	pub title: String,
	pub file_name: String,
	pub code: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<Snippet> for SnippetResponse {
	fn from(snippet: Snippet) -> Self {
		Self {
			id: snippet.id,
			project_id: snippet.project_id,
			author_id: snippet.author_id,
			title: snippet.title,
			file_name: snippet.file_name,
			code: snippet.content,
			created_at: snippet.created_at,
			updated_at: snippet.updated_at,
		}
	}
}
