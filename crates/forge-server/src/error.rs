// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The single mapping point from domain errors to HTTP responses.
//!
//! `Forbidden`, `NotFound` and `Validation` all surface as the identical
//! 404 status and body, so a probing client cannot distinguish "exists but
//! forbidden" from "does not exist". The validation arm is a preserved
//! compatibility quirk of the reference wire contract.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use forge_server_api::MessageResponse;
use forge_server_projects::ProjectsError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("unauthenticated")]
	Unauthenticated,

	#[error("not found")]
	NotFound,

	#[error("internal: {0}")]
	Internal(String),
}

impl From<ProjectsError> for ServerError {
	fn from(e: ProjectsError) -> Self {
		match e {
			ProjectsError::Forbidden | ProjectsError::NotFound => ServerError::NotFound,
			ProjectsError::Validation(message) => {
				tracing::debug!(%message, "validation failure");
				ServerError::NotFound
			}
			ProjectsError::Database(e) => {
				tracing::error!(error = %e, "database failure");
				ServerError::Internal(e.to_string())
			}
			ProjectsError::Scm(e) => {
				tracing::error!(error = %e, "scm failure");
				ServerError::Internal(e.to_string())
			}
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, message) = match self {
			ServerError::Unauthenticated => (StatusCode::UNAUTHORIZED, "401 Unauthorized"),
			ServerError::NotFound => (StatusCode::NOT_FOUND, "404 Not found"),
			ServerError::Internal(_) => (
				StatusCode::INTERNAL_SERVER_ERROR,
				"500 Internal Server Error",
			),
		};

		(
			status,
			Json(MessageResponse {
				message: message.to_string(),
			}),
		)
			.into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn forbidden_and_missing_are_indistinguishable() {
		let forbidden = ServerError::from(ProjectsError::Forbidden);
		let missing = ServerError::from(ProjectsError::NotFound);
		let invalid = ServerError::from(ProjectsError::Validation("name".to_string()));

		assert!(matches!(forbidden, ServerError::NotFound));
		assert!(matches!(missing, ServerError::NotFound));
		assert!(matches!(invalid, ServerError::NotFound));
	}

	#[test]
	fn status_codes() {
		assert_eq!(
			ServerError::Unauthenticated.into_response().status(),
			StatusCode::UNAUTHORIZED
		);
		assert_eq!(
			ServerError::NotFound.into_response().status(),
			StatusCode::NOT_FOUND
		);
		assert_eq!(
			ServerError::Internal("boom".to_string()).into_response().status(),
			StatusCode::INTERNAL_SERVER_ERROR
		);
	}
}
