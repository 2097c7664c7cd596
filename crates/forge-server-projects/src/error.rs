// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use forge_server_db::DbError;
use forge_server_scm::ScmError;

#[derive(Debug, thiserror::Error)]
pub enum ProjectsError {
	/// The acting user may not perform this operation. Collapsed into the
	/// not-found response at the gateway so existence never leaks.
	#[error("forbidden")]
	Forbidden,

	#[error("not found")]
	NotFound,

	#[error("validation failed: {0}")]
	Validation(String),

	#[error(transparent)]
	Database(#[from] DbError),

	#[error(transparent)]
	Scm(#[from] ScmError),
}

pub type Result<T> = std::result::Result<T, ProjectsError>;
