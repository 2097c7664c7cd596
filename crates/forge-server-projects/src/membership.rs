// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Membership management: who holds which access level on a project.
//!
//! All mutations require the acting user to hold at least
//! [`AccessLevel::Master`] on the target project.

use forge_server_db::{MembershipRepository, ProjectRepository, UserRecord, UserRepository};
use std::collections::BTreeSet;

use crate::access::require_level;
use crate::error::{ProjectsError, Result};
use crate::project::find_record;
use crate::types::{AccessLevel, Membership};

#[derive(Clone)]
pub struct MembershipService {
	projects: ProjectRepository,
	memberships: MembershipRepository,
	users: UserRepository,
}

impl MembershipService {
	pub fn new(
		projects: ProjectRepository,
		memberships: MembershipRepository,
		users: UserRepository,
	) -> Self {
		Self {
			projects,
			memberships,
			users,
		}
	}

	async fn existing_user_ids(&self, user_ids: &BTreeSet<i64>) -> Result<Vec<i64>> {
		let ids: Vec<i64> = user_ids.iter().copied().collect();
		let found = self.users.get_users_by_ids(&ids).await?;
		if found.len() != ids.len() {
			return Err(ProjectsError::Validation("Unknown user id".to_string()));
		}
		Ok(ids)
	}

	/// Create one membership per user id at `level`.
	///
	/// Ids that already hold a membership are skipped; their level is left
	/// as it was. Returns the number of memberships created.
	#[tracing::instrument(skip(self, actor, user_ids), fields(user_id = %actor.id, target = %id_or_code, level = %level.as_str()))]
	pub async fn add_members(
		&self,
		actor: &UserRecord,
		id_or_code: &str,
		user_ids: &[i64],
		level: AccessLevel,
	) -> Result<usize> {
		let project = find_record(&self.projects, id_or_code).await?;
		require_level(&self.memberships, &project, actor, AccessLevel::Master).await?;

		let unique: BTreeSet<i64> = user_ids.iter().copied().collect();
		let ids = self.existing_user_ids(&unique).await?;

		let mut added = 0;
		for user_id in ids {
			if self
				.memberships
				.add_member(project.id, user_id, level.as_i64())
				.await?
			{
				added += 1;
			}
		}

		if added > 0 {
			self.projects.touch_activity(project.id).await?;
		}

		tracing::info!(project_id = %project.id, added, "members added");
		Ok(added)
	}

	/// Re-set the access level of existing memberships. Non-members are
	/// skipped. Returns the number of memberships updated.
	#[tracing::instrument(skip(self, actor, user_ids), fields(user_id = %actor.id, target = %id_or_code, level = %level.as_str()))]
	pub async fn update_members(
		&self,
		actor: &UserRecord,
		id_or_code: &str,
		user_ids: &[i64],
		level: AccessLevel,
	) -> Result<usize> {
		let project = find_record(&self.projects, id_or_code).await?;
		require_level(&self.memberships, &project, actor, AccessLevel::Master).await?;

		let unique: BTreeSet<i64> = user_ids.iter().copied().collect();

		let mut updated = 0;
		for user_id in unique {
			if self
				.memberships
				.update_member_level(project.id, user_id, level.as_i64())
				.await?
			{
				updated += 1;
			}
		}

		if updated > 0 {
			self.projects.touch_activity(project.id).await?;
		}

		Ok(updated)
	}

	/// Delete the identified memberships. Unknown ids are a no-op. Returns
	/// the number of memberships removed.
	#[tracing::instrument(skip(self, actor, membership_ids), fields(user_id = %actor.id, target = %id_or_code))]
	pub async fn remove_members(
		&self,
		actor: &UserRecord,
		id_or_code: &str,
		membership_ids: &[i64],
	) -> Result<u64> {
		let project = find_record(&self.projects, id_or_code).await?;
		require_level(&self.memberships, &project, actor, AccessLevel::Master).await?;

		let removed = self
			.memberships
			.remove_members(project.id, membership_ids)
			.await?;

		if removed > 0 {
			self.projects.touch_activity(project.id).await?;
		}

		tracing::info!(project_id = %project.id, removed, "members removed");
		Ok(removed)
	}

	/// Memberships of a project, for callers that can read it.
	#[tracing::instrument(skip(self, actor), fields(user_id = %actor.id, target = %id_or_code))]
	pub async fn list_members(
		&self,
		actor: &UserRecord,
		id_or_code: &str,
	) -> Result<Vec<Membership>> {
		let project = find_record(&self.projects, id_or_code).await?;
		crate::access::require_read(&self.memberships, &project, actor).await?;

		let records = self.memberships.list_memberships(project.id).await?;
		records.into_iter().map(Membership::from_record).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use forge_server_db::testing::{create_migrated_test_pool, seed_project, seed_user};
	use sqlx::SqlitePool;

	async fn fixture() -> (SqlitePool, MembershipService, UserRecord, String) {
		let pool = create_migrated_test_pool().await;
		let service = MembershipService::new(
			ProjectRepository::new(pool.clone()),
			MembershipRepository::new(pool.clone()),
			UserRepository::new(pool.clone()),
		);
		let owner = seed_user(&pool, "owner@example.com", "Owner").await;
		let project = seed_project(&pool, owner.id, "widgets").await;
		(pool, service, owner, project.id.to_string())
	}

	#[tokio::test]
	async fn add_two_developers() {
		let (pool, service, owner, project) = fixture().await;
		let a = seed_user(&pool, "a@example.com", "A").await;
		let b = seed_user(&pool, "b@example.com", "B").await;
		let memberships = MembershipRepository::new(pool.clone());

		let added = service
			.add_members(&owner, &project, &[a.id, b.id], AccessLevel::Developer)
			.await
			.unwrap();
		assert_eq!(added, 2);

		let devs = memberships
			.count_members_at_level(project.parse().unwrap(), AccessLevel::Developer.as_i64())
			.await
			.unwrap();
		assert_eq!(devs, 2);
	}

	#[tokio::test]
	async fn add_skips_existing_members() {
		let (pool, service, owner, project) = fixture().await;
		let a = seed_user(&pool, "a@example.com", "A").await;

		assert_eq!(
			service
				.add_members(&owner, &project, &[a.id], AccessLevel::Reporter)
				.await
				.unwrap(),
			1
		);
		// Same user again, even at another level: nothing created.
		assert_eq!(
			service
				.add_members(&owner, &project, &[a.id], AccessLevel::Master)
				.await
				.unwrap(),
			0
		);
	}

	#[tokio::test]
	async fn add_unknown_user_is_validation_error() {
		let (_pool, service, owner, project) = fixture().await;
		assert!(matches!(
			service
				.add_members(&owner, &project, &[9999], AccessLevel::Developer)
				.await,
			Err(ProjectsError::Validation(_))
		));
	}

	#[tokio::test]
	async fn update_resets_level_and_skips_nonmembers() {
		let (pool, service, owner, project) = fixture().await;
		let a = seed_user(&pool, "a@example.com", "A").await;
		let b = seed_user(&pool, "b@example.com", "B").await;
		let memberships = MembershipRepository::new(pool.clone());
		let project_id: i64 = project.parse().unwrap();

		service
			.add_members(&owner, &project, &[a.id], AccessLevel::Guest)
			.await
			.unwrap();

		let updated = service
			.update_members(&owner, &project, &[a.id, b.id], AccessLevel::Master)
			.await
			.unwrap();
		assert_eq!(updated, 1);

		let membership = memberships
			.get_membership(project_id, a.id)
			.await
			.unwrap()
			.unwrap();
		assert_eq!(membership.access_level, AccessLevel::Master.as_i64());
		// No duplicate row was created.
		assert_eq!(memberships.count_members(project_id).await.unwrap(), 1);
	}

	#[tokio::test]
	async fn remove_decrements_by_exactly_the_removed_rows() {
		let (pool, service, owner, project) = fixture().await;
		let a = seed_user(&pool, "a@example.com", "A").await;
		let b = seed_user(&pool, "b@example.com", "B").await;
		let memberships = MembershipRepository::new(pool.clone());
		let project_id: i64 = project.parse().unwrap();

		service
			.add_members(&owner, &project, &[a.id, b.id], AccessLevel::Developer)
			.await
			.unwrap();
		let target = memberships
			.get_membership(project_id, a.id)
			.await
			.unwrap()
			.unwrap();

		let removed = service
			.remove_members(&owner, &project, &[target.id])
			.await
			.unwrap();
		assert_eq!(removed, 1);
		assert_eq!(memberships.count_members(project_id).await.unwrap(), 1);

		// Unknown membership ids are a no-op.
		let removed = service
			.remove_members(&owner, &project, &[99999])
			.await
			.unwrap();
		assert_eq!(removed, 0);
	}

	#[tokio::test]
	async fn mutations_require_master() {
		let (pool, service, owner, project) = fixture().await;
		let dev = seed_user(&pool, "dev@example.com", "Dev").await;
		let other = seed_user(&pool, "other@example.com", "Other").await;

		service
			.add_members(&owner, &project, &[dev.id], AccessLevel::Developer)
			.await
			.unwrap();

		assert!(matches!(
			service
				.add_members(&dev, &project, &[other.id], AccessLevel::Guest)
				.await,
			Err(ProjectsError::Forbidden)
		));

		// A master-level member may manage memberships.
		service
			.update_members(&owner, &project, &[dev.id], AccessLevel::Master)
			.await
			.unwrap();
		assert_eq!(
			service
				.add_members(&dev, &project, &[other.id], AccessLevel::Guest)
				.await
				.unwrap(),
			1
		);
	}

	#[tokio::test]
	async fn outsider_cannot_even_see_the_project() {
		let (pool, service, _owner, project) = fixture().await;
		let outsider = seed_user(&pool, "out@example.com", "Out").await;

		assert!(matches!(
			service
				.add_members(&outsider, &project, &[outsider.id], AccessLevel::Guest)
				.await,
			Err(ProjectsError::NotFound)
		));
	}
}
