// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::error::Result;
use crate::types::RepoRef;

/// Read access to a project's refs and blobs.
///
/// Implementations return refs in backend order; callers own sorting.
/// `find_branch` and `read_blob` signal absence with `None` — an invalid
/// revision and a missing path are indistinguishable by design.
#[async_trait]
pub trait RefStore: Send + Sync {
	async fn list_branches(&self, project_id: i64) -> Result<Vec<RepoRef>>;
	async fn find_branch(&self, project_id: i64, name: &str) -> Result<Option<RepoRef>>;
	async fn list_tags(&self, project_id: i64) -> Result<Vec<RepoRef>>;
	async fn read_blob(
		&self,
		project_id: i64,
		revision: &str,
		path: &str,
	) -> Result<Option<Vec<u8>>>;
}
