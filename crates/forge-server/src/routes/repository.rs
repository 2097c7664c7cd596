// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Repository sub-resource handlers: branches, tags and raw blobs.

use axum::{
	extract::{Path, Query, State},
	response::IntoResponse,
	Json,
};
use serde::Deserialize;

pub use forge_server_api::repository::*;

use crate::{api::AppState, auth_middleware::RequireAuth, error::ServerError};

#[derive(Debug, Deserialize)]
pub struct BlobParams {
	pub filepath: Option<String>,
}

#[utoipa::path(
    get,
    path = "/projects/{id}/repository/branches",
    params(
        ("id" = String, Path, description = "Project id or code")
    ),
    responses(
        (status = 200, description = "Branches in ascending name order", body = [RepoRefResponse]),
        (status = 401, description = "Not authenticated", body = forge_server_api::MessageResponse),
        (status = 404, description = "Not found", body = forge_server_api::MessageResponse)
    ),
    tag = "repository"
)]
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id, target = %id))]
pub async fn list_branches(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
	let branches = state.projects.list_branches(&current_user.user, &id).await?;

	let response: Vec<RepoRefResponse> =
		branches.into_iter().map(RepoRefResponse::from).collect();
	Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/projects/{id}/repository/branches/{name}",
    params(
        ("id" = String, Path, description = "Project id or code"),
        ("name" = String, Path, description = "Branch name")
    ),
    responses(
        (status = 200, description = "Branch with resolved commit", body = RepoRefResponse),
        (status = 401, description = "Not authenticated", body = forge_server_api::MessageResponse),
        (status = 404, description = "Not found", body = forge_server_api::MessageResponse)
    ),
    tag = "repository"
)]
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id, target = %id, branch = %name))]
pub async fn get_branch(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path((id, name)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServerError> {
	let branch = state
		.projects
		.get_branch(&current_user.user, &id, &name)
		.await?;
	Ok(Json(RepoRefResponse::from(branch)))
}

#[utoipa::path(
    get,
    path = "/projects/{id}/repository/tags",
    params(
        ("id" = String, Path, description = "Project id or code")
    ),
    responses(
        (status = 200, description = "Tags in descending name order", body = [RepoRefResponse]),
        (status = 401, description = "Not authenticated", body = forge_server_api::MessageResponse),
        (status = 404, description = "Not found", body = forge_server_api::MessageResponse)
    ),
    tag = "repository"
)]
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id, target = %id))]
pub async fn list_tags(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
	let tags = state.projects.list_tags(&current_user.user, &id).await?;

	let response: Vec<RepoRefResponse> = tags.into_iter().map(RepoRefResponse::from).collect();
	Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/projects/{id}/repository/commits/{rev}/blob",
    params(
        ("id" = String, Path, description = "Project id or code"),
        ("rev" = String, Path, description = "Revision (branch, tag or sha)"),
        ("filepath" = String, Query, description = "Path of the file at that revision")
    ),
    responses(
        (status = 200, description = "Raw file content"),
        (status = 401, description = "Not authenticated", body = forge_server_api::MessageResponse),
        (status = 404, description = "Unknown revision or path", body = forge_server_api::MessageResponse)
    ),
    tag = "repository"
)]
#[tracing::instrument(skip(state, current_user, params), fields(user_id = %current_user.user.id, target = %id, rev = %rev))]
pub async fn get_blob(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path((id, rev)): Path<(String, String)>,
	Query(params): Query<BlobParams>,
) -> Result<impl IntoResponse, ServerError> {
	// A blob request without a filepath can never resolve.
	let filepath = params.filepath.ok_or(ServerError::NotFound)?;

	let content = state
		.projects
		.get_blob(&current_user.user, &id, &rev, &filepath)
		.await?;

	let content_type = content_type_for_path(&filepath);
	Ok((
		[(axum::http::header::CONTENT_TYPE, content_type)],
		content,
	))
}

fn content_type_for_path(path: &str) -> &'static str {
	let ext = path.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
	match ext.as_str() {
		"txt" | "rs" | "rb" | "py" | "go" | "c" | "h" | "sh" | "toml" | "yaml" | "yml" => {
			"text/plain; charset=utf-8"
		}
		"md" | "markdown" => "text/markdown; charset=utf-8",
		"html" | "htm" => "text/html; charset=utf-8",
		"json" => "application/json; charset=utf-8",
		"png" => "image/png",
		"jpg" | "jpeg" => "image/jpeg",
		"svg" => "image/svg+xml",
		_ => "application/octet-stream",
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn content_types() {
		assert_eq!(content_type_for_path("src/main.rs"), "text/plain; charset=utf-8");
		assert_eq!(content_type_for_path("README.md"), "text/markdown; charset=utf-8");
		assert_eq!(content_type_for_path("logo.png"), "image/png");
		assert_eq!(content_type_for_path("mystery"), "application/octet-stream");
	}
}
