// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared access-level resolution.
//!
//! The owner implicitly holds [`AccessLevel::Owner`]; everyone else is read
//! from the membership table. `None` means the user cannot see the project
//! at all.

use forge_server_db::{MembershipRepository, ProjectRecord, UserRecord};

use crate::error::{ProjectsError, Result};
use crate::types::AccessLevel;

pub async fn resolve_level(
	memberships: &MembershipRepository,
	project: &ProjectRecord,
	user: &UserRecord,
) -> Result<Option<AccessLevel>> {
	if project.owner_id == user.id {
		return Ok(Some(AccessLevel::Owner));
	}

	let membership = memberships.get_membership(project.id, user.id).await?;
	match membership {
		Some(m) => {
			let level = AccessLevel::from_i64(m.access_level).ok_or_else(|| {
				ProjectsError::Database(forge_server_db::DbError::Internal(format!(
					"invalid access level: {}",
					m.access_level
				)))
			})?;
			Ok(Some(level))
		}
		None => Ok(None),
	}
}

/// Read access or a `NotFound` that is indistinguishable from the project
/// not existing.
pub async fn require_read(
	memberships: &MembershipRepository,
	project: &ProjectRecord,
	user: &UserRecord,
) -> Result<AccessLevel> {
	resolve_level(memberships, project, user)
		.await?
		.ok_or(ProjectsError::NotFound)
}

/// At least `required`, assuming the user can already read the project.
pub async fn require_level(
	memberships: &MembershipRepository,
	project: &ProjectRecord,
	user: &UserRecord,
	required: AccessLevel,
) -> Result<AccessLevel> {
	let level = require_read(memberships, project, user).await?;
	if !level.at_least(required) {
		return Err(ProjectsError::Forbidden);
	}
	Ok(level)
}
