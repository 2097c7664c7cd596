// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Project rows and queries.
//!
//! Every select joins the owner row so callers get owner identity without a
//! second round trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
	pub id: i64,
	pub code: String,
	pub name: String,
	pub description: Option<String>,
	pub owner_id: i64,
	pub owner_email: String,
	pub owner_name: String,
	pub default_branch: String,
	pub issues_enabled: bool,
	pub wall_enabled: bool,
	pub merge_requests_enabled: bool,
	pub wiki_enabled: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
	pub last_activity_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProjectRecord {
	pub code: String,
	pub name: String,
	pub description: Option<String>,
	pub owner_id: i64,
	pub default_branch: String,
	pub issues_enabled: bool,
	pub wall_enabled: bool,
	pub merge_requests_enabled: bool,
	pub wiki_enabled: bool,
}

const PROJECT_COLUMNS: &str = r#"
	p.id, p.code, p.name, p.description, p.owner_id,
	u.email AS owner_email, u.name AS owner_name,
	p.default_branch, p.issues_enabled, p.wall_enabled,
	p.merge_requests_enabled, p.wiki_enabled,
	p.created_at, p.updated_at, p.last_activity_at
"#;

/// Repository for project rows.
#[derive(Clone)]
pub struct ProjectRepository {
	pool: SqlitePool,
}

impl ProjectRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, project), fields(code = %project.code, owner_id = %project.owner_id))]
	pub async fn create_project(&self, project: &NewProjectRecord) -> Result<ProjectRecord, DbError> {
		let now = Utc::now().to_rfc3339();
		let result = sqlx::query(
			r#"
			INSERT INTO projects (
				code, name, description, owner_id, default_branch,
				issues_enabled, wall_enabled, merge_requests_enabled, wiki_enabled,
				created_at, updated_at, last_activity_at
			)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(&project.code)
		.bind(&project.name)
		.bind(&project.description)
		.bind(project.owner_id)
		.bind(&project.default_branch)
		.bind(project.issues_enabled)
		.bind(project.wall_enabled)
		.bind(project.merge_requests_enabled)
		.bind(project.wiki_enabled)
		.bind(&now)
		.bind(&now)
		.bind(&now)
		.execute(&self.pool)
		.await
		.map_err(|e| match e {
			sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
				DbError::Conflict(format!("Project code already taken: {}", project.code))
			}
			_ => DbError::Sqlx(e),
		})?;

		let id = result.last_insert_rowid();
		self
			.get_project_by_id(id)
			.await?
			.ok_or_else(|| DbError::Internal("project vanished after insert".to_string()))
	}

	#[tracing::instrument(skip(self), fields(project_id = %id))]
	pub async fn get_project_by_id(&self, id: i64) -> Result<Option<ProjectRecord>, DbError> {
		let query = format!(
			"SELECT {PROJECT_COLUMNS} FROM projects p JOIN users u ON u.id = p.owner_id WHERE p.id = ?"
		);
		let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;

		row.map(|r| row_to_project(&r)).transpose()
	}

	#[tracing::instrument(skip(self), fields(code = %code))]
	pub async fn get_project_by_code(&self, code: &str) -> Result<Option<ProjectRecord>, DbError> {
		let query = format!(
			"SELECT {PROJECT_COLUMNS} FROM projects p JOIN users u ON u.id = p.owner_id WHERE p.code = ?"
		);
		let row = sqlx::query(&query)
			.bind(code)
			.fetch_optional(&self.pool)
			.await?;

		row.map(|r| row_to_project(&r)).transpose()
	}

	/// Projects the user owns or holds a membership on, most recently active
	/// first.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn list_projects_for_user(&self, user_id: i64) -> Result<Vec<ProjectRecord>, DbError> {
		let query = format!(
			r#"
			SELECT {PROJECT_COLUMNS}
			FROM projects p
			JOIN users u ON u.id = p.owner_id
			WHERE p.owner_id = ?
				OR p.id IN (SELECT project_id FROM memberships WHERE user_id = ?)
			ORDER BY p.last_activity_at DESC
			"#
		);
		let rows = sqlx::query(&query)
			.bind(user_id)
			.bind(user_id)
			.fetch_all(&self.pool)
			.await?;

		rows.iter().map(row_to_project).collect()
	}

	/// Bump `last_activity_at` (and `updated_at`) to now.
	#[tracing::instrument(skip(self), fields(project_id = %id))]
	pub async fn touch_activity(&self, id: i64) -> Result<(), DbError> {
		let now = Utc::now().to_rfc3339();
		sqlx::query("UPDATE projects SET last_activity_at = ?, updated_at = ? WHERE id = ?")
			.bind(&now)
			.bind(&now)
			.bind(id)
			.execute(&self.pool)
			.await?;
		Ok(())
	}

	pub async fn count_projects(&self) -> Result<i64, DbError> {
		let row = sqlx::query("SELECT COUNT(*) AS n FROM projects")
			.fetch_one(&self.pool)
			.await?;
		Ok(row.get("n"))
	}
}

fn row_to_project(row: &sqlx::sqlite::SqliteRow) -> Result<ProjectRecord, DbError> {
	let created_at_str: String = row.get("created_at");
	let updated_at_str: String = row.get("updated_at");
	let last_activity_at_str: String = row.get("last_activity_at");

	Ok(ProjectRecord {
		id: row.get("id"),
		code: row.get("code"),
		name: row.get("name"),
		description: row.get("description"),
		owner_id: row.get("owner_id"),
		owner_email: row.get("owner_email"),
		owner_name: row.get("owner_name"),
		default_branch: row.get("default_branch"),
		issues_enabled: row.get("issues_enabled"),
		wall_enabled: row.get("wall_enabled"),
		merge_requests_enabled: row.get("merge_requests_enabled"),
		wiki_enabled: row.get("wiki_enabled"),
		created_at: DateTime::parse_from_rfc3339(&created_at_str)
			.map(|d| d.with_timezone(&Utc))
			.map_err(|e| DbError::Internal(e.to_string()))?,
		updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
			.map(|d| d.with_timezone(&Utc))
			.map_err(|e| DbError::Internal(e.to_string()))?,
		last_activity_at: DateTime::parse_from_rfc3339(&last_activity_at_str)
			.map(|d| d.with_timezone(&Utc))
			.map_err(|e| DbError::Internal(e.to_string()))?,
	})
}
