// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Snippet handlers.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};

pub use forge_server_api::snippets::*;
use forge_server_api::MessageResponse;

use crate::{api::AppState, auth_middleware::RequireAuth, error::ServerError};

#[utoipa::path(
    get,
    path = "/projects/{id}/snippets",
    params(
        ("id" = String, Path, description = "Project id or code")
    ),
    responses(
        (status = 200, description = "Snippets of the project", body = [SnippetResponse]),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 404, description = "Not found", body = MessageResponse)
    ),
    tag = "snippets"
)]
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id, target = %id))]
pub async fn list_snippets(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
	let snippets = state.snippets.list_snippets(&current_user.user, &id).await?;

	let response: Vec<SnippetResponse> =
		snippets.into_iter().map(SnippetResponse::from).collect();
	Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/projects/{id}/snippets",
    params(
        ("id" = String, Path, description = "Project id or code")
    ),
    request_body = CreateSnippetRequest,
    responses(
        (status = 201, description = "Snippet created", body = SnippetResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 404, description = "Not found or invalid attributes", body = MessageResponse)
    ),
    tag = "snippets"
)]
#[tracing::instrument(skip(state, current_user, payload), fields(user_id = %current_user.user.id, target = %id))]
pub async fn create_snippet(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<CreateSnippetRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let snippet = state
		.snippets
		.create_snippet(
			&current_user.user,
			&id,
			payload.title.as_deref().unwrap_or_default(),
			payload.file_name.as_deref().unwrap_or_default(),
			payload.code.as_deref().unwrap_or_default(),
		)
		.await?;

	Ok((StatusCode::CREATED, Json(SnippetResponse::from(snippet))))
}

#[utoipa::path(
    get,
    path = "/projects/{id}/snippets/{sid}",
    params(
        ("id" = String, Path, description = "Project id or code"),
        ("sid" = i64, Path, description = "Snippet id")
    ),
    responses(
        (status = 200, description = "Snippet details", body = SnippetResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 404, description = "Not found", body = MessageResponse)
    ),
    tag = "snippets"
)]
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id, target = %id, snippet_id = %sid))]
pub async fn get_snippet(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path((id, sid)): Path<(String, i64)>,
) -> Result<impl IntoResponse, ServerError> {
	let snippet = state
		.snippets
		.get_snippet(&current_user.user, &id, sid)
		.await?;
	Ok(Json(SnippetResponse::from(snippet)))
}

#[utoipa::path(
    put,
    path = "/projects/{id}/snippets/{sid}",
    params(
        ("id" = String, Path, description = "Project id or code"),
        ("sid" = i64, Path, description = "Snippet id")
    ),
    request_body = UpdateSnippetRequest,
    responses(
        (status = 200, description = "Snippet updated", body = SnippetResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 404, description = "Not found or not permitted", body = MessageResponse)
    ),
    tag = "snippets"
)]
#[tracing::instrument(skip(state, current_user, payload), fields(user_id = %current_user.user.id, target = %id, snippet_id = %sid))]
pub async fn update_snippet(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path((id, sid)): Path<(String, i64)>,
	Json(payload): Json<UpdateSnippetRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let snippet = state
		.snippets
		.update_snippet(&current_user.user, &id, sid, payload.into())
		.await?;
	Ok(Json(SnippetResponse::from(snippet)))
}

#[utoipa::path(
    delete,
    path = "/projects/{id}/snippets/{sid}",
    params(
        ("id" = String, Path, description = "Project id or code"),
        ("sid" = i64, Path, description = "Snippet id")
    ),
    responses(
        (status = 200, description = "Snippet removed", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 404, description = "Not found or not permitted", body = MessageResponse)
    ),
    tag = "snippets"
)]
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id, target = %id, snippet_id = %sid))]
pub async fn delete_snippet(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path((id, sid)): Path<(String, i64)>,
) -> Result<impl IntoResponse, ServerError> {
	state
		.snippets
		.delete_snippet(&current_user.user, &id, sid)
		.await?;

	Ok(Json(MessageResponse {
		message: "Snippet removed".to_string(),
	}))
}

#[utoipa::path(
    get,
    path = "/projects/{id}/snippets/{sid}/raw",
    params(
        ("id" = String, Path, description = "Project id or code"),
        ("sid" = i64, Path, description = "Snippet id")
    ),
    responses(
        (status = 200, description = "Raw snippet content"),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 404, description = "Not found", body = MessageResponse)
    ),
    tag = "snippets"
)]
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id, target = %id, snippet_id = %sid))]
pub async fn raw_snippet(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path((id, sid)): Path<(String, i64)>,
) -> Result<impl IntoResponse, ServerError> {
	let content = state
		.snippets
		.raw_snippet(&current_user.user, &id, sid)
		.await?;

	Ok((
		[(
			axum::http::header::CONTENT_TYPE,
			"text/plain; charset=utf-8",
		)],
		content,
	))
}
