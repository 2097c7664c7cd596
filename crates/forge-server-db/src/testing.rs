// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Test fixtures shared by this crate's unit tests and downstream crates.

use sqlx::sqlite::SqlitePool;

use crate::project::{NewProjectRecord, ProjectRecord, ProjectRepository};
use crate::schema::run_migrations;
use crate::user::{UserRecord, UserRepository};

pub async fn create_test_pool() -> SqlitePool {
	SqlitePool::connect(":memory:").await.unwrap()
}

/// In-memory pool with the full schema applied.
pub async fn create_migrated_test_pool() -> SqlitePool {
	let pool = create_test_pool().await;
	run_migrations(&pool).await.unwrap();
	pool
}

pub async fn seed_user(pool: &SqlitePool, email: &str, name: &str) -> UserRecord {
	UserRepository::new(pool.clone())
		.create_user(email, name, None)
		.await
		.unwrap()
}

/// Seed a user holding the given API token hash.
pub async fn seed_user_with_token(
	pool: &SqlitePool,
	email: &str,
	name: &str,
	token_hash: &str,
) -> UserRecord {
	UserRepository::new(pool.clone())
		.create_user(email, name, Some(token_hash))
		.await
		.unwrap()
}

/// Seed a project whose name and code are both `code`, with defaults for
/// everything else.
pub async fn seed_project(pool: &SqlitePool, owner_id: i64, code: &str) -> ProjectRecord {
	ProjectRepository::new(pool.clone())
		.create_project(&NewProjectRecord {
			code: code.to_string(),
			name: code.to_string(),
			description: None,
			owner_id,
			default_branch: "master".to_string(),
			issues_enabled: true,
			wall_enabled: true,
			merge_requests_enabled: true,
			wiki_enabled: true,
		})
		.await
		.unwrap()
}
