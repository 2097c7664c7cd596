// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Idempotent schema migrations.
//!
//! Every statement is `CREATE ... IF NOT EXISTS` so running the migrations
//! against an existing database is safe.

use sqlx::sqlite::SqlitePool;

use crate::error::DbError;

const MIGRATIONS: &[&str] = &[
	r#"
	CREATE TABLE IF NOT EXISTS users (
		id INTEGER PRIMARY KEY AUTOINCREMENT,
		email TEXT NOT NULL UNIQUE,
		name TEXT NOT NULL,
		token_hash TEXT UNIQUE,
		created_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS projects (
		id INTEGER PRIMARY KEY AUTOINCREMENT,
		code TEXT NOT NULL UNIQUE,
		name TEXT NOT NULL,
		description TEXT,
		owner_id INTEGER NOT NULL REFERENCES users(id),
		default_branch TEXT NOT NULL DEFAULT 'master',
		issues_enabled INTEGER NOT NULL DEFAULT 1,
		wall_enabled INTEGER NOT NULL DEFAULT 1,
		merge_requests_enabled INTEGER NOT NULL DEFAULT 1,
		wiki_enabled INTEGER NOT NULL DEFAULT 1,
		created_at TEXT NOT NULL,
		updated_at TEXT NOT NULL,
		last_activity_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS memberships (
		id INTEGER PRIMARY KEY AUTOINCREMENT,
		project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
		user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
		access_level INTEGER NOT NULL,
		created_at TEXT NOT NULL,
		updated_at TEXT NOT NULL,
		UNIQUE (project_id, user_id)
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS snippets (
		id INTEGER PRIMARY KEY AUTOINCREMENT,
		project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
		author_id INTEGER NOT NULL REFERENCES users(id),
		title TEXT NOT NULL,
		file_name TEXT NOT NULL,
		content TEXT NOT NULL,
		created_at TEXT NOT NULL,
		updated_at TEXT NOT NULL
	)
	"#,
	"CREATE INDEX IF NOT EXISTS idx_users_token_hash ON users(token_hash)",
	"CREATE INDEX IF NOT EXISTS idx_memberships_project ON memberships(project_id)",
	"CREATE INDEX IF NOT EXISTS idx_memberships_user ON memberships(user_id)",
	"CREATE INDEX IF NOT EXISTS idx_snippets_project ON snippets(project_id)",
	"CREATE INDEX IF NOT EXISTS idx_projects_activity ON projects(last_activity_at)",
];

/// Apply all migrations to the given pool.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	for statement in MIGRATIONS {
		sqlx::query(statement).execute(pool).await?;
	}

	tracing::debug!("database migrations applied");
	Ok(())
}
