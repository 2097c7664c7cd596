// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use forge_server_projects::Membership;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body for POST and PUT on the members collection. `project_access` is the
/// numeric access level (10/20/30/40/50).
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddMembersRequest {
	pub user_ids: Vec<i64>,
	pub project_access: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMembersRequest {
	pub user_ids: Vec<i64>,
	pub project_access: i64,
}

/// Body for DELETE on the members collection. The field carries membership
/// ids; the historical name is kept for wire compatibility.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RemoveMembersRequest {
	pub user_ids: Vec<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddMembersResponse {
	pub added: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateMembersResponse {
	pub updated: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RemoveMembersResponse {
	pub removed: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MembershipResponse {
	pub id: i64,
	pub project_id: i64,
	pub user_id: i64,
	pub access_level: i64,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<Membership> for MembershipResponse {
	fn from(membership: Membership) -> Self {
		Self {
			id: membership.id,
			project_id: membership.project_id,
			user_id: membership.user_id,
			access_level: membership.access_level.as_i64(),
			created_at: membership.created_at,
			updated_at: membership.updated_at,
		}
	}
}
