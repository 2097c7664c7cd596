// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Project collection and resource handlers.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};

pub use forge_server_api::projects::*;

use crate::{api::AppState, auth_middleware::RequireAuth, error::ServerError};

#[utoipa::path(
    get,
    path = "/projects",
    responses(
        (status = 200, description = "Projects the caller can read", body = [ProjectResponse]),
        (status = 401, description = "Not authenticated", body = forge_server_api::MessageResponse)
    ),
    tag = "projects"
)]
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id))]
pub async fn list_projects(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
) -> Result<impl IntoResponse, ServerError> {
	let projects = state.projects.list_projects(&current_user.user).await?;

	let response: Vec<ProjectResponse> = projects.into_iter().map(ProjectResponse::from).collect();
	Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 401, description = "Not authenticated", body = forge_server_api::MessageResponse),
        (status = 404, description = "Invalid attributes", body = forge_server_api::MessageResponse)
    ),
    tag = "projects"
)]
#[tracing::instrument(skip(state, current_user, payload), fields(user_id = %current_user.user.id))]
pub async fn create_project(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let project = state
		.projects
		.create_project(&current_user.user, payload.into())
		.await?;

	Ok((StatusCode::CREATED, Json(ProjectResponse::from(project))))
}

#[utoipa::path(
    get,
    path = "/projects/{id}",
    params(
        ("id" = String, Path, description = "Project id or code")
    ),
    responses(
        (status = 200, description = "Project details", body = ProjectResponse),
        (status = 401, description = "Not authenticated", body = forge_server_api::MessageResponse),
        (status = 404, description = "Not found", body = forge_server_api::MessageResponse)
    ),
    tag = "projects"
)]
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id, target = %id))]
pub async fn get_project(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
	let project = state.projects.get_project(&current_user.user, &id).await?;
	Ok(Json(ProjectResponse::from(project)))
}
