// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router assembly.

use axum::routing::get;
use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;

use forge_server_db::{
	MembershipRepository, ProjectRepository, SnippetRepository, UserRepository,
};
use forge_server_projects::{AccessLevel, MembershipService, ProjectService, SnippetService};
use forge_server_scm::{GitRefStore, RefStore};

use crate::config::ServerConfig;
use crate::routes;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub users: UserRepository,
	pub projects: ProjectService,
	pub members: MembershipService,
	pub snippets: SnippetService,
}

/// Create the application state over an explicit ref store. Tests pass a
/// `MemoryRefStore`; production uses [`create_app_state`].
pub fn create_app_state_with_refs(
	pool: SqlitePool,
	refs: Arc<dyn RefStore>,
	snippet_create_level: AccessLevel,
) -> AppState {
	let users = UserRepository::new(pool.clone());
	let project_repo = ProjectRepository::new(pool.clone());
	let membership_repo = MembershipRepository::new(pool.clone());
	let snippet_repo = SnippetRepository::new(pool.clone());

	AppState {
		pool,
		users: users.clone(),
		projects: ProjectService::new(project_repo.clone(), membership_repo.clone(), refs),
		members: MembershipService::new(project_repo.clone(), membership_repo.clone(), users),
		snippets: SnippetService::new(
			project_repo,
			membership_repo,
			snippet_repo,
			snippet_create_level,
		),
	}
}

/// Create the application state from configuration.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> AppState {
	let refs: Arc<dyn RefStore> = Arc::new(GitRefStore::new(config.repos.data_dir.clone()));
	create_app_state_with_refs(pool, refs, config.snippets.create_access_level)
}

/// Build the router. Every route except `/health` requires authentication
/// via the `RequireAuth` extractor.
pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health))
		.route(
			"/projects",
			get(routes::projects::list_projects).post(routes::projects::create_project),
		)
		.route("/projects/{id}", get(routes::projects::get_project))
		.route(
			"/projects/{id}/repository/branches",
			get(routes::repository::list_branches),
		)
		.route(
			"/projects/{id}/repository/branches/{name}",
			get(routes::repository::get_branch),
		)
		.route(
			"/projects/{id}/repository/tags",
			get(routes::repository::list_tags),
		)
		.route(
			"/projects/{id}/repository/commits/{rev}/blob",
			get(routes::repository::get_blob),
		)
		.route(
			"/projects/{id}/users",
			get(routes::members::list_members)
				.post(routes::members::add_members)
				.put(routes::members::update_members)
				.delete(routes::members::remove_members),
		)
		.route(
			"/projects/{id}/snippets",
			get(routes::snippets::list_snippets).post(routes::snippets::create_snippet),
		)
		.route(
			"/projects/{id}/snippets/{sid}",
			get(routes::snippets::get_snippet)
				.put(routes::snippets::update_snippet)
				.delete(routes::snippets::delete_snippet),
		)
		.route(
			"/projects/{id}/snippets/{sid}/raw",
			get(routes::snippets::raw_snippet),
		)
		.with_state(state)
}
