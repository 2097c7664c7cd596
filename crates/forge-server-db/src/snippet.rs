// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetRecord {
	pub id: i64,
	pub project_id: i64,
	pub author_id: i64,
	pub title: String,
	pub file_name: String,
	pub content: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSnippetRecord {
	pub project_id: i64,
	pub author_id: i64,
	pub title: String,
	pub file_name: String,
	pub content: String,
}

/// Repository for snippet rows. All lookups are project-scoped so a snippet
/// id from one project never resolves under another.
#[derive(Clone)]
pub struct SnippetRepository {
	pool: SqlitePool,
}

impl SnippetRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, snippet), fields(project_id = %snippet.project_id, title = %snippet.title))]
	pub async fn create_snippet(&self, snippet: &NewSnippetRecord) -> Result<SnippetRecord, DbError> {
		let now = Utc::now().to_rfc3339();
		let result = sqlx::query(
			r#"
			INSERT INTO snippets (project_id, author_id, title, file_name, content, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(snippet.project_id)
		.bind(snippet.author_id)
		.bind(&snippet.title)
		.bind(&snippet.file_name)
		.bind(&snippet.content)
		.bind(&now)
		.bind(&now)
		.execute(&self.pool)
		.await?;

		let id = result.last_insert_rowid();
		self
			.get_snippet(snippet.project_id, id)
			.await?
			.ok_or_else(|| DbError::Internal("snippet vanished after insert".to_string()))
	}

	#[tracing::instrument(skip(self), fields(project_id = %project_id, snippet_id = %id))]
	pub async fn get_snippet(&self, project_id: i64, id: i64) -> Result<Option<SnippetRecord>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, project_id, author_id, title, file_name, content, created_at, updated_at
			FROM snippets
			WHERE project_id = ? AND id = ?
			"#,
		)
		.bind(project_id)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_snippet(&r)).transpose()
	}

	#[tracing::instrument(skip(self), fields(project_id = %project_id))]
	pub async fn list_snippets(&self, project_id: i64) -> Result<Vec<SnippetRecord>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, project_id, author_id, title, file_name, content, created_at, updated_at
			FROM snippets
			WHERE project_id = ?
			ORDER BY id
			"#,
		)
		.bind(project_id)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_snippet).collect()
	}

	/// Partial update; `None` fields are left as they are.
	///
	/// Returns `true` if the snippet existed.
	#[tracing::instrument(skip(self, title, file_name, content), fields(project_id = %project_id, snippet_id = %id))]
	pub async fn update_snippet(
		&self,
		project_id: i64,
		id: i64,
		title: Option<&str>,
		file_name: Option<&str>,
		content: Option<&str>,
	) -> Result<bool, DbError> {
		let now = Utc::now().to_rfc3339();
		let result = sqlx::query(
			r#"
			UPDATE snippets SET
				title = COALESCE(?, title),
				file_name = COALESCE(?, file_name),
				content = COALESCE(?, content),
				updated_at = ?
			WHERE project_id = ? AND id = ?
			"#,
		)
		.bind(title)
		.bind(file_name)
		.bind(content)
		.bind(&now)
		.bind(project_id)
		.bind(id)
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected() == 1)
	}

	/// Returns `true` if a row was deleted.
	#[tracing::instrument(skip(self), fields(project_id = %project_id, snippet_id = %id))]
	pub async fn delete_snippet(&self, project_id: i64, id: i64) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM snippets WHERE project_id = ? AND id = ?")
			.bind(project_id)
			.bind(id)
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() == 1)
	}

	pub async fn count_snippets(&self, project_id: i64) -> Result<i64, DbError> {
		let row = sqlx::query("SELECT COUNT(*) AS n FROM snippets WHERE project_id = ?")
			.bind(project_id)
			.fetch_one(&self.pool)
			.await?;
		Ok(row.get("n"))
	}
}

fn row_to_snippet(row: &sqlx::sqlite::SqliteRow) -> Result<SnippetRecord, DbError> {
	let created_at_str: String = row.get("created_at");
	let updated_at_str: String = row.get("updated_at");

	Ok(SnippetRecord {
		id: row.get("id"),
		project_id: row.get("project_id"),
		author_id: row.get("author_id"),
		title: row.get("title"),
		file_name: row.get("file_name"),
		content: row.get("content"),
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

	async fn fixture() -> (SqlitePool, SnippetRepository, i64, i64) {
		let pool = create_migrated_test_pool().await;
		let repo = SnippetRepository::new(pool.clone());
		let owner = seed_user(&pool, "owner@example.com", "Owner").await;
		let project = seed_project(&pool, owner.id, "widgets").await;
		(pool.clone(), repo, project.id, owner.id)
	}

	#[tokio::test]
	async fn partial_update_keeps_other_fields() {
		let (_pool, repo, project_id, author_id) = fixture().await;

		let snippet = repo
			.create_snippet(&NewSnippetRecord {
				project_id,
				author_id,
				title: "sample".to_string(),
				file_name: "sample.rb".to_string(),
				content: "puts 'hello world'".to_string(),
			})
			.await
			.unwrap();

		assert!(repo
			.update_snippet(project_id, snippet.id, None, None, Some("updated code"))
			.await
			.unwrap());

		let fetched = repo.get_snippet(project_id, snippet.id).await.unwrap().unwrap();
		assert_eq!(fetched.title, "sample");
		assert_eq!(fetched.file_name, "sample.rb");
		assert_eq!(fetched.content, "updated code");
	}

	#[tokio::test]
	async fn delete_then_get_is_gone() {
		let (_pool, repo, project_id, author_id) = fixture().await;

		let snippet = repo
			.create_snippet(&NewSnippetRecord {
				project_id,
				author_id,
				title: "sample".to_string(),
				file_name: "sample.rb".to_string(),
				content: "puts 1".to_string(),
			})
			.await
			.unwrap();

		assert_eq!(repo.count_snippets(project_id).await.unwrap(), 1);
		assert!(repo.delete_snippet(project_id, snippet.id).await.unwrap());
		assert_eq!(repo.count_snippets(project_id).await.unwrap(), 0);
		assert!(repo.get_snippet(project_id, snippet.id).await.unwrap().is_none());
		// Second delete finds nothing.
		assert!(!repo.delete_snippet(project_id, snippet.id).await.unwrap());
	}

	#[tokio::test]
	async fn lookups_are_project_scoped() {
		let (pool, repo, project_id, author_id) = fixture().await;
		let other = seed_project(&pool, author_id, "gadgets").await;

		let snippet = repo
			.create_snippet(&NewSnippetRecord {
				project_id,
				author_id,
				title: "sample".to_string(),
				file_name: "sample.rb".to_string(),
				content: "puts 1".to_string(),
			})
			.await
			.unwrap();

		assert!(repo.get_snippet(other.id, snippet.id).await.unwrap().is_none());
	}
}
