// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Backend failures. Absence of a ref or blob is not an error; the store
/// signals it with `None`.
#[derive(Debug, thiserror::Error)]
pub enum ScmError {
	#[error("Repository error: {0}")]
	Repository(String),
}

pub type Result<T> = std::result::Result<T, ScmError>;
