// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory [`RefStore`] for tests.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use crate::error::Result;
use crate::store::RefStore;
use crate::types::{CommitInfo, RepoRef};

#[derive(Default)]
struct MemoryRepo {
	branches: BTreeMap<String, CommitInfo>,
	tags: BTreeMap<String, CommitInfo>,
	/// Blob content keyed by (revision, path).
	blobs: HashMap<(String, String), Vec<u8>>,
}

/// Ref store backed by process memory. Every project id resolves to an
/// (initially empty) repository, so tests never hit the filesystem.
#[derive(Default)]
pub struct MemoryRefStore {
	repos: RwLock<HashMap<i64, MemoryRepo>>,
}

impl MemoryRefStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_branch(&self, project_id: i64, name: &str, commit: CommitInfo) {
		let mut repos = self.repos.write().unwrap();
		repos
			.entry(project_id)
			.or_default()
			.branches
			.insert(name.to_string(), commit);
	}

	pub fn add_tag(&self, project_id: i64, name: &str, commit: CommitInfo) {
		let mut repos = self.repos.write().unwrap();
		repos
			.entry(project_id)
			.or_default()
			.tags
			.insert(name.to_string(), commit);
	}

	pub fn put_blob(&self, project_id: i64, revision: &str, path: &str, content: &[u8]) {
		let mut repos = self.repos.write().unwrap();
		repos
			.entry(project_id)
			.or_default()
			.blobs
			.insert((revision.to_string(), path.to_string()), content.to_vec());
	}
}

#[async_trait]
impl RefStore for MemoryRefStore {
	async fn list_branches(&self, project_id: i64) -> Result<Vec<RepoRef>> {
		let repos = self.repos.read().unwrap();
		Ok(repos
			.get(&project_id)
			.map(|r| {
				r.branches
					.iter()
					.map(|(name, commit)| RepoRef {
						name: name.clone(),
						commit: commit.clone(),
					})
					.collect()
			})
			.unwrap_or_default())
	}

	async fn find_branch(&self, project_id: i64, name: &str) -> Result<Option<RepoRef>> {
		let repos = self.repos.read().unwrap();
		Ok(repos.get(&project_id).and_then(|r| {
			r.branches.get(name).map(|commit| RepoRef {
				name: name.to_string(),
				commit: commit.clone(),
			})
		}))
	}

	async fn list_tags(&self, project_id: i64) -> Result<Vec<RepoRef>> {
		let repos = self.repos.read().unwrap();
		Ok(repos
			.get(&project_id)
			.map(|r| {
				r.tags
					.iter()
					.map(|(name, commit)| RepoRef {
						name: name.clone(),
						commit: commit.clone(),
					})
					.collect()
			})
			.unwrap_or_default())
	}

	async fn read_blob(
		&self,
		project_id: i64,
		revision: &str,
		path: &str,
	) -> Result<Option<Vec<u8>>> {
		let repos = self.repos.read().unwrap();
		Ok(repos.get(&project_id).and_then(|r| {
			r.blobs
				.get(&(revision.to_string(), path.to_string()))
				.cloned()
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn seeded_refs_round_trip() {
		let store = MemoryRefStore::new();
		store.add_branch(1, "master", CommitInfo::synthetic("aaa"));
		store.add_tag(1, "v1.0.0", CommitInfo::synthetic("bbb"));
		store.put_blob(1, "master", "README.md", b"hello");

		assert_eq!(store.list_branches(1).await.unwrap().len(), 1);
		assert!(store.find_branch(1, "master").await.unwrap().is_some());
		assert!(store.find_branch(1, "nope").await.unwrap().is_none());
		assert_eq!(store.list_tags(1).await.unwrap()[0].name, "v1.0.0");
		assert_eq!(
			store.read_blob(1, "master", "README.md").await.unwrap().unwrap(),
			b"hello"
		);
		assert!(store.read_blob(1, "nope", "README.md").await.unwrap().is_none());
		assert!(store.list_branches(2).await.unwrap().is_empty());
	}
}
