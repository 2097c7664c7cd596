// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
	pub id: i64,
	pub email: String,
	pub name: String,
	/// SHA-256 hex digest of the API token. The clear token is never stored.
	pub token_hash: Option<String>,
	pub created_at: DateTime<Utc>,
}

/// Repository for user rows.
#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, token_hash), fields(email = %email))]
	pub async fn create_user(
		&self,
		email: &str,
		name: &str,
		token_hash: Option<&str>,
	) -> Result<UserRecord, DbError> {
		let now = Utc::now();
		let result = sqlx::query(
			r#"
			INSERT INTO users (email, name, token_hash, created_at)
			VALUES (?, ?, ?, ?)
			"#,
		)
		.bind(email)
		.bind(name)
		.bind(token_hash)
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await
		.map_err(|e| match e {
			sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
				DbError::Conflict(format!("User already exists: {email}"))
			}
			_ => DbError::Sqlx(e),
		})?;

		let id = result.last_insert_rowid();
		self
			.get_user_by_id(id)
			.await?
			.ok_or_else(|| DbError::Internal("user vanished after insert".to_string()))
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_user_by_id(&self, id: i64) -> Result<Option<UserRecord>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, name, token_hash, created_at
			FROM users
			WHERE id = ?
			"#,
		)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user(&r)).transpose()
	}

	#[tracing::instrument(skip(self), fields(email = %email))]
	pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, name, token_hash, created_at
			FROM users
			WHERE email = ?
			"#,
		)
		.bind(email)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user(&r)).transpose()
	}

	/// Look up the user owning the given token hash. Used by the auth layer.
	#[tracing::instrument(skip(self, token_hash))]
	pub async fn get_user_by_token_hash(
		&self,
		token_hash: &str,
	) -> Result<Option<UserRecord>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, name, token_hash, created_at
			FROM users
			WHERE token_hash = ?
			"#,
		)
		.bind(token_hash)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user(&r)).transpose()
	}

	/// Fetch the subset of the given ids that exist, in no particular order.
	#[tracing::instrument(skip(self, ids), fields(count = ids.len()))]
	pub async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<UserRecord>, DbError> {
		let mut users = Vec::with_capacity(ids.len());
		for id in ids {
			if let Some(user) = self.get_user_by_id(*id).await? {
				users.push(user);
			}
		}
		Ok(users)
	}
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<UserRecord, DbError> {
	let created_at_str: String = row.get("created_at");

	Ok(UserRecord {
		id: row.get("id"),
		email: row.get("email"),
		name: row.get("name"),
		token_hash: row.get("token_hash"),
		created_at: DateTime::parse_from_rfc3339(&created_at_str)
			.map(|d| d.with_timezone(&Utc))
			.map_err(|e| DbError::Internal(e.to_string()))?,
	})
}
