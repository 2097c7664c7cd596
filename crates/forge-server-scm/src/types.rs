// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

/// A commit as resolved from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
	pub id: String,
	pub message: String,
	pub author_name: String,
	pub author_email: String,
	/// RFC 3339 author timestamp.
	pub authored_date: String,
	pub parent_ids: Vec<String>,
}

impl CommitInfo {
	/// A synthetic commit for seeding test stores.
	pub fn synthetic(id: &str) -> Self {
		Self {
			id: id.to_string(),
			message: "initial commit".to_string(),
			author_name: "Forge".to_string(),
			author_email: "forge@example.com".to_string(),
			authored_date: "2025-01-01T00:00:00+00:00".to_string(),
			parent_ids: Vec::new(),
		}
	}
}

/// A named ref (branch or tag) with its resolved commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
	pub name: String,
	pub commit: CommitInfo,
}
