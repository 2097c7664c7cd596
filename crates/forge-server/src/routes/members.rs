// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Membership management handlers.
//!
//! The access level arrives as its numeric wire value; anything that is not
//! one of the known levels is a validation failure.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use forge_server_projects::{AccessLevel, ProjectsError};

pub use forge_server_api::members::*;

use crate::{api::AppState, auth_middleware::RequireAuth, error::ServerError};

fn parse_level(value: i64) -> Result<AccessLevel, ServerError> {
	AccessLevel::from_i64(value)
		.ok_or_else(|| ProjectsError::Validation(format!("Invalid access level: {value}")).into())
}

#[utoipa::path(
    get,
    path = "/projects/{id}/users",
    params(
        ("id" = String, Path, description = "Project id or code")
    ),
    responses(
        (status = 200, description = "Memberships of the project", body = [MembershipResponse]),
        (status = 401, description = "Not authenticated", body = forge_server_api::MessageResponse),
        (status = 404, description = "Not found", body = forge_server_api::MessageResponse)
    ),
    tag = "members"
)]
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id, target = %id))]
pub async fn list_members(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
	let members = state.members.list_members(&current_user.user, &id).await?;

	let response: Vec<MembershipResponse> =
		members.into_iter().map(MembershipResponse::from).collect();
	Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/projects/{id}/users",
    params(
        ("id" = String, Path, description = "Project id or code")
    ),
    request_body = AddMembersRequest,
    responses(
        (status = 201, description = "Members added", body = AddMembersResponse),
        (status = 401, description = "Not authenticated", body = forge_server_api::MessageResponse),
        (status = 404, description = "Not found or not permitted", body = forge_server_api::MessageResponse)
    ),
    tag = "members"
)]
#[tracing::instrument(skip(state, current_user, payload), fields(user_id = %current_user.user.id, target = %id))]
pub async fn add_members(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<AddMembersRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let level = parse_level(payload.project_access)?;

	let added = state
		.members
		.add_members(&current_user.user, &id, &payload.user_ids, level)
		.await?;

	Ok((StatusCode::CREATED, Json(AddMembersResponse { added })))
}

#[utoipa::path(
    put,
    path = "/projects/{id}/users",
    params(
        ("id" = String, Path, description = "Project id or code")
    ),
    request_body = UpdateMembersRequest,
    responses(
        (status = 200, description = "Members updated", body = UpdateMembersResponse),
        (status = 401, description = "Not authenticated", body = forge_server_api::MessageResponse),
        (status = 404, description = "Not found or not permitted", body = forge_server_api::MessageResponse)
    ),
    tag = "members"
)]
#[tracing::instrument(skip(state, current_user, payload), fields(user_id = %current_user.user.id, target = %id))]
pub async fn update_members(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<UpdateMembersRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let level = parse_level(payload.project_access)?;

	let updated = state
		.members
		.update_members(&current_user.user, &id, &payload.user_ids, level)
		.await?;

	Ok(Json(UpdateMembersResponse { updated }))
}

#[utoipa::path(
    delete,
    path = "/projects/{id}/users",
    params(
        ("id" = String, Path, description = "Project id or code")
    ),
    request_body = RemoveMembersRequest,
    responses(
        (status = 200, description = "Members removed", body = RemoveMembersResponse),
        (status = 401, description = "Not authenticated", body = forge_server_api::MessageResponse),
        (status = 404, description = "Not found or not permitted", body = forge_server_api::MessageResponse)
    ),
    tag = "members"
)]
#[tracing::instrument(skip(state, current_user, payload), fields(user_id = %current_user.user.id, target = %id))]
pub async fn remove_members(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<RemoveMembersRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let removed = state
		.members
		.remove_members(&current_user.user, &id, &payload.user_ids)
		.await?;

	Ok(Json(RemoveMembersResponse { removed }))
}
