// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use forge_server_projects::ProjectOwner;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
	pub id: i64,
	pub email: String,
	pub name: String,
}

impl From<ProjectOwner> for UserResponse {
	fn from(owner: ProjectOwner) -> Self {
		Self {
			id: owner.id,
			email: owner.email,
			name: owner.name,
		}
	}
}

/// The uniform body carried by every error status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
	pub message: String,
}
