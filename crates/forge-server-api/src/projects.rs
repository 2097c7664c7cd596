// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use forge_server_projects::{NewProject, Project};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::users::UserResponse;

/// Project creation attributes. `name` is required by the domain layer, not
/// by deserialization, so an empty body still reaches the service and fails
/// with the mapped validation error.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
	pub name: Option<String>,
	pub code: Option<String>,
	pub description: Option<String>,
	pub default_branch: Option<String>,
	pub issues_enabled: Option<bool>,
	pub wall_enabled: Option<bool>,
	pub merge_requests_enabled: Option<bool>,
	pub wiki_enabled: Option<bool>,
}

impl From<CreateProjectRequest> for NewProject {
	fn from(request: CreateProjectRequest) -> Self {
		Self {
			name: request.name,
			code: request.code,
			description: request.description,
			default_branch: request.default_branch,
			issues_enabled: request.issues_enabled,
			wall_enabled: request.wall_enabled,
			merge_requests_enabled: request.merge_requests_enabled,
			wiki_enabled: request.wiki_enabled,
		}
	}
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectResponse {
	pub id: i64,
	pub code: String,
	pub name: String,
	pub description: Option<String>,
	pub owner: UserResponse,
	pub default_branch: String,
	pub issues_enabled: bool,
	pub wall_enabled: bool,
	pub merge_requests_enabled: bool,
	pub wiki_enabled: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
	pub last_activity_at: DateTime<Utc>,
}

impl From<Project> for ProjectResponse {
	fn from(project: Project) -> Self {
		Self {
			id: project.id,
			code: project.code,
			name: project.name,
			description: project.description,
			owner: project.owner.into(),
			default_branch: project.default_branch,
			issues_enabled: project.issues_enabled,
			wall_enabled: project.wall_enabled,
			merge_requests_enabled: project.merge_requests_enabled,
			wiki_enabled: project.wiki_enabled,
			created_at: project.created_at,
			updated_at: project.updated_at,
			last_activity_at: project.last_activity_at,
		}
	}
}
