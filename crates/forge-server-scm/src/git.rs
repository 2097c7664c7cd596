// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! gix-backed [`RefStore`] over bare repositories on local disk.
//!
//! Repositories live at `<repos_dir>/<project_id>/git`.

use async_trait::async_trait;
use chrono::DateTime;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScmError};
use crate::store::RefStore;
use crate::types::{CommitInfo, RepoRef};

pub struct GitRefStore {
	repos_dir: PathBuf,
}

impl GitRefStore {
	pub fn new(repos_dir: impl Into<PathBuf>) -> Self {
		Self {
			repos_dir: repos_dir.into(),
		}
	}

	pub fn repo_path(&self, project_id: i64) -> PathBuf {
		self.repos_dir.join(project_id.to_string()).join("git")
	}

	fn open(&self, project_id: i64) -> Result<gix::Repository> {
		open_repo(&self.repo_path(project_id))
	}
}

fn open_repo(path: &Path) -> Result<gix::Repository> {
	gix::open(path).map_err(|e| {
		tracing::error!(path = %path.display(), error = %e, "Failed to open git repository");
		ScmError::Repository(format!("Failed to open repository: {e}"))
	})
}

fn format_git_time(time: gix::date::Time) -> String {
	let secs = time.seconds;
	let dt =
		DateTime::from_timestamp(secs, 0).unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap());
	dt.to_rfc3339()
}

fn commit_info(id: gix::Id<'_>) -> Result<CommitInfo> {
	let commit = id
		.object()
		.map_err(|e| ScmError::Repository(format!("Failed to get object: {e}")))?
		.peel_to_commit()
		.map_err(|e| ScmError::Repository(format!("Failed to peel to commit: {e}")))?;

	let author = commit
		.author()
		.map_err(|e| ScmError::Repository(format!("Failed to get author: {e}")))?;

	let parent_ids: Vec<String> = commit.parent_ids().map(|id| id.to_string()).collect();

	Ok(CommitInfo {
		id: commit.id.to_string(),
		message: commit.message_raw_sloppy().to_string(),
		author_name: author.name.to_string(),
		author_email: author.email.to_string(),
		authored_date: format_git_time(author.time),
		parent_ids,
	})
}

fn ref_to_repo_ref(reference: gix::Reference<'_>) -> Result<RepoRef> {
	let name = reference.name().shorten().to_string();

	let peeled = reference
		.into_fully_peeled_id()
		.map_err(|e| ScmError::Repository(format!("Failed to peel reference: {e}")))?;

	Ok(RepoRef {
		name,
		commit: commit_info(peeled)?,
	})
}

#[async_trait]
impl RefStore for GitRefStore {
	#[tracing::instrument(skip(self), fields(project_id = %project_id))]
	async fn list_branches(&self, project_id: i64) -> Result<Vec<RepoRef>> {
		let repo = self.open(project_id)?;

		let mut branches = Vec::new();
		for reference in repo
			.references()
			.map_err(|e| ScmError::Repository(format!("Failed to list references: {e}")))?
			.local_branches()
			.map_err(|e| ScmError::Repository(format!("Failed to list branches: {e}")))?
		{
			let reference = reference
				.map_err(|e| ScmError::Repository(format!("Failed to read reference: {e}")))?;
			branches.push(ref_to_repo_ref(reference)?);
		}

		Ok(branches)
	}

	#[tracing::instrument(skip(self), fields(project_id = %project_id, branch = %name))]
	async fn find_branch(&self, project_id: i64, name: &str) -> Result<Option<RepoRef>> {
		let repo = self.open(project_id)?;

		let reference = repo
			.try_find_reference(&format!("refs/heads/{name}"))
			.map_err(|e| ScmError::Repository(format!("Failed to find reference: {e}")))?;

		match reference {
			Some(reference) => Ok(Some(ref_to_repo_ref(reference)?)),
			None => Ok(None),
		}
	}

	#[tracing::instrument(skip(self), fields(project_id = %project_id))]
	async fn list_tags(&self, project_id: i64) -> Result<Vec<RepoRef>> {
		let repo = self.open(project_id)?;

		let mut tags = Vec::new();
		for reference in repo
			.references()
			.map_err(|e| ScmError::Repository(format!("Failed to list references: {e}")))?
			.tags()
			.map_err(|e| ScmError::Repository(format!("Failed to list tags: {e}")))?
		{
			let reference = reference
				.map_err(|e| ScmError::Repository(format!("Failed to read reference: {e}")))?;
			tags.push(ref_to_repo_ref(reference)?);
		}

		Ok(tags)
	}

	#[tracing::instrument(skip(self), fields(project_id = %project_id, revision = %revision, path = %path))]
	async fn read_blob(
		&self,
		project_id: i64,
		revision: &str,
		path: &str,
	) -> Result<Option<Vec<u8>>> {
		let repo = self.open(project_id)?;

		// An unresolvable revision and a missing path both read as absent.
		let commit = match repo.rev_parse_single(revision.as_bytes()) {
			Ok(rev) => rev
				.object()
				.map_err(|e| ScmError::Repository(format!("Failed to get object: {e}")))?
				.peel_to_commit()
				.map_err(|e| ScmError::Repository(format!("Failed to peel to commit: {e}")))?,
			Err(_) => return Ok(None),
		};

		let tree = commit
			.tree()
			.map_err(|e| ScmError::Repository(format!("Failed to get tree: {e}")))?;

		let entry = match tree
			.lookup_entry_by_path(path)
			.map_err(|e| ScmError::Repository(format!("Failed to lookup path: {e}")))?
		{
			Some(entry) => entry,
			None => return Ok(None),
		};

		let object = entry
			.object()
			.map_err(|e| ScmError::Repository(format!("Failed to get object: {e}")))?;

		if object.kind != gix::object::Kind::Blob {
			return Ok(None);
		}

		Ok(Some(object.data.to_vec()))
	}
}
