// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Membership rows: the (project, user, access_level) join table.
//!
//! Access levels are stored as their numeric wire values; interpretation
//! belongs to `forge-server-projects`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipRecord {
	pub id: i64,
	pub project_id: i64,
	pub user_id: i64,
	pub access_level: i64,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Repository for membership rows.
#[derive(Clone)]
pub struct MembershipRepository {
	pool: SqlitePool,
}

impl MembershipRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a membership unless the (project, user) pair already has one.
	///
	/// Returns `true` if a row was created. An existing membership is left
	/// untouched, including its access level.
	#[tracing::instrument(skip(self), fields(project_id = %project_id, user_id = %user_id))]
	pub async fn add_member(
		&self,
		project_id: i64,
		user_id: i64,
		access_level: i64,
	) -> Result<bool, DbError> {
		let now = Utc::now().to_rfc3339();
		let result = sqlx::query(
			r#"
			INSERT OR IGNORE INTO memberships (project_id, user_id, access_level, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(project_id)
		.bind(user_id)
		.bind(access_level)
		.bind(&now)
		.bind(&now)
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected() == 1)
	}

	/// Re-set the access level of an existing membership.
	///
	/// Returns `true` if a row was updated; `false` if the user is not a
	/// member.
	#[tracing::instrument(skip(self), fields(project_id = %project_id, user_id = %user_id))]
	pub async fn update_member_level(
		&self,
		project_id: i64,
		user_id: i64,
		access_level: i64,
	) -> Result<bool, DbError> {
		let now = Utc::now().to_rfc3339();
		let result = sqlx::query(
			r#"
			UPDATE memberships SET access_level = ?, updated_at = ?
			WHERE project_id = ? AND user_id = ?
			"#,
		)
		.bind(access_level)
		.bind(&now)
		.bind(project_id)
		.bind(user_id)
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected() == 1)
	}

	/// Delete the identified memberships of this project.
	///
	/// Ids that do not exist, or that belong to another project, are
	/// ignored. Returns the number of rows deleted.
	#[tracing::instrument(skip(self, membership_ids), fields(project_id = %project_id, count = membership_ids.len()))]
	pub async fn remove_members(
		&self,
		project_id: i64,
		membership_ids: &[i64],
	) -> Result<u64, DbError> {
		let mut tx = self.pool.begin().await?;
		let mut removed = 0;
		for id in membership_ids {
			let result = sqlx::query("DELETE FROM memberships WHERE id = ? AND project_id = ?")
				.bind(id)
				.bind(project_id)
				.execute(&mut *tx)
				.await?;
			removed += result.rows_affected();
		}
		tx.commit().await?;

		Ok(removed)
	}

	#[tracing::instrument(skip(self), fields(project_id = %project_id, user_id = %user_id))]
	pub async fn get_membership(
		&self,
		project_id: i64,
		user_id: i64,
	) -> Result<Option<MembershipRecord>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, project_id, user_id, access_level, created_at, updated_at
			FROM memberships
			WHERE project_id = ? AND user_id = ?
			"#,
		)
		.bind(project_id)
		.bind(user_id)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_membership(&r)).transpose()
	}

	#[tracing::instrument(skip(self), fields(project_id = %project_id))]
	pub async fn list_memberships(&self, project_id: i64) -> Result<Vec<MembershipRecord>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, project_id, user_id, access_level, created_at, updated_at
			FROM memberships
			WHERE project_id = ?
			ORDER BY id
			"#,
		)
		.bind(project_id)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_membership).collect()
	}

	pub async fn count_members_at_level(
		&self,
		project_id: i64,
		access_level: i64,
	) -> Result<i64, DbError> {
		let row = sqlx::query(
			"SELECT COUNT(*) AS n FROM memberships WHERE project_id = ? AND access_level = ?",
		)
		.bind(project_id)
		.bind(access_level)
		.fetch_one(&self.pool)
		.await?;
		Ok(row.get("n"))
	}

	pub async fn count_members(&self, project_id: i64) -> Result<i64, DbError> {
		let row = sqlx::query("SELECT COUNT(*) AS n FROM memberships WHERE project_id = ?")
			.bind(project_id)
			.fetch_one(&self.pool)
			.await?;
		Ok(row.get("n"))
	}
}

fn row_to_membership(row: &sqlx::sqlite::SqliteRow) -> Result<MembershipRecord, DbError> {
	let created_at_str: String = row.get("created_at");
	let updated_at_str: String = row.get("updated_at");

	Ok(MembershipRecord {
		id: row.get("id"),
		project_id: row.get("project_id"),
		user_id: row.get("user_id"),
		access_level: row.get("access_level"),
		created_at: DateTime::parse_from_rfc3339(&created_at_str)
			.map(|d| d.with_timezone(&Utc))
			.map_err(|e| DbError::Internal(e.to_string()))?,
		updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
			.map(|d| d.with_timezone(&Utc))
			.map_err(|e| DbError::Internal(e.to_string()))?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{create_migrated_test_pool, seed_project, seed_user};

	#[tokio::test]
	async fn add_is_idempotent() {
		let pool = create_migrated_test_pool().await;
		let repo = MembershipRepository::new(pool.clone());
		let owner = seed_user(&pool, "owner@example.com", "Owner").await;
		let member = seed_user(&pool, "member@example.com", "Member").await;
		let project = seed_project(&pool, owner.id, "widgets").await;

		assert!(repo.add_member(project.id, member.id, 30).await.unwrap());
		// Second insert is skipped and the original level survives.
		assert!(!repo.add_member(project.id, member.id, 40).await.unwrap());

		let membership = repo
			.get_membership(project.id, member.id)
			.await
			.unwrap()
			.unwrap();
		assert_eq!(membership.access_level, 30);
	}

	#[tokio::test]
	async fn update_level_resets_rather_than_duplicates() {
		let pool = create_migrated_test_pool().await;
		let repo = MembershipRepository::new(pool.clone());
		let owner = seed_user(&pool, "owner@example.com", "Owner").await;
		let member = seed_user(&pool, "member@example.com", "Member").await;
		let project = seed_project(&pool, owner.id, "widgets").await;

		repo.add_member(project.id, member.id, 20).await.unwrap();
		assert!(repo
			.update_member_level(project.id, member.id, 40)
			.await
			.unwrap());

		assert_eq!(repo.count_members(project.id).await.unwrap(), 1);
		let membership = repo
			.get_membership(project.id, member.id)
			.await
			.unwrap()
			.unwrap();
		assert_eq!(membership.access_level, 40);
	}

	#[tokio::test]
	async fn update_nonmember_is_noop() {
		let pool = create_migrated_test_pool().await;
		let repo = MembershipRepository::new(pool.clone());
		let owner = seed_user(&pool, "owner@example.com", "Owner").await;
		let outsider = seed_user(&pool, "out@example.com", "Out").await;
		let project = seed_project(&pool, owner.id, "widgets").await;

		assert!(!repo
			.update_member_level(project.id, outsider.id, 40)
			.await
			.unwrap());
	}

	#[tokio::test]
	async fn remove_scoped_to_project() {
		let pool = create_migrated_test_pool().await;
		let repo = MembershipRepository::new(pool.clone());
		let owner = seed_user(&pool, "owner@example.com", "Owner").await;
		let member = seed_user(&pool, "member@example.com", "Member").await;
		let project = seed_project(&pool, owner.id, "widgets").await;
		let other = seed_project(&pool, owner.id, "gadgets").await;

		repo.add_member(project.id, member.id, 30).await.unwrap();
		let membership = repo
			.get_membership(project.id, member.id)
			.await
			.unwrap()
			.unwrap();

		// Wrong project: nothing is deleted.
		assert_eq!(
			repo.remove_members(other.id, &[membership.id]).await.unwrap(),
			0
		);
		// Unknown ids are skipped, known ones are removed.
		assert_eq!(
			repo
				.remove_members(project.id, &[membership.id, 9999])
				.await
				.unwrap(),
			1
		);
		assert_eq!(repo.count_members(project.id).await.unwrap(), 0);
	}
}
