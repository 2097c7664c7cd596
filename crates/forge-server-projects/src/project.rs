// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Project CRUD and repository-backed sub-resources.

use forge_server_db::{
	DbError, MembershipRepository, NewProjectRecord, ProjectRecord, ProjectRepository, UserRecord,
};
use forge_server_scm::{RefStore, RepoRef};
use std::sync::Arc;

use crate::access::require_read;
use crate::error::{ProjectsError, Result};
use crate::types::{slugify_code, validate_project_code, NewProject, Project};

/// Resolve a path segment to a project row: numeric id first, code second.
/// Absent projects surface as `NotFound`.
pub(crate) async fn find_record(
	projects: &ProjectRepository,
	id_or_code: &str,
) -> Result<ProjectRecord> {
	let record = match id_or_code.parse::<i64>() {
		Ok(id) => projects.get_project_by_id(id).await?,
		Err(_) => projects.get_project_by_code(id_or_code).await?,
	};
	record.ok_or(ProjectsError::NotFound)
}

#[derive(Clone)]
pub struct ProjectService {
	projects: ProjectRepository,
	memberships: MembershipRepository,
	refs: Arc<dyn RefStore>,
}

impl ProjectService {
	pub fn new(
		projects: ProjectRepository,
		memberships: MembershipRepository,
		refs: Arc<dyn RefStore>,
	) -> Self {
		Self {
			projects,
			memberships,
			refs,
		}
	}

	/// Projects the actor owns or is a member of, most recently active first.
	#[tracing::instrument(skip(self, actor), fields(user_id = %actor.id))]
	pub async fn list_projects(&self, actor: &UserRecord) -> Result<Vec<Project>> {
		let records = self.projects.list_projects_for_user(actor.id).await?;
		Ok(records.into_iter().map(Project::from).collect())
	}

	/// Create a project owned by the actor.
	///
	/// `name` is mandatory; the code is slugified from the name unless given
	/// explicitly. A taken code is a validation failure, not a conflict, so
	/// the gateway maps it like any other invalid input.
	#[tracing::instrument(skip(self, actor, attrs), fields(user_id = %actor.id))]
	pub async fn create_project(&self, actor: &UserRecord, attrs: NewProject) -> Result<Project> {
		let name = attrs.name.as_deref().map(str::trim).unwrap_or_default();
		if name.is_empty() {
			return Err(ProjectsError::Validation("Name is required".to_string()));
		}

		let code = match attrs.code {
			Some(code) => code,
			None => slugify_code(name),
		};
		validate_project_code(&code)?;

		let record = NewProjectRecord {
			code,
			name: name.to_string(),
			description: attrs.description,
			owner_id: actor.id,
			default_branch: attrs.default_branch.unwrap_or_else(|| "master".to_string()),
			issues_enabled: attrs.issues_enabled.unwrap_or(true),
			wall_enabled: attrs.wall_enabled.unwrap_or(true),
			merge_requests_enabled: attrs.merge_requests_enabled.unwrap_or(true),
			wiki_enabled: attrs.wiki_enabled.unwrap_or(true),
		};

		let created = self.projects.create_project(&record).await.map_err(|e| match e {
			DbError::Conflict(message) => ProjectsError::Validation(message),
			other => ProjectsError::Database(other),
		})?;

		tracing::info!(project_id = %created.id, code = %created.code, "project created");
		Ok(created.into())
	}

	/// Fetch a project by numeric id or code.
	///
	/// An existing project the actor cannot read and a missing project are
	/// the same `NotFound`.
	#[tracing::instrument(skip(self, actor), fields(user_id = %actor.id, target = %id_or_code))]
	pub async fn get_project(&self, actor: &UserRecord, id_or_code: &str) -> Result<Project> {
		let record = find_record(&self.projects, id_or_code).await?;
		require_read(&self.memberships, &record, actor).await?;
		Ok(record.into())
	}

	/// Branches sorted ascending by name.
	#[tracing::instrument(skip(self, actor), fields(user_id = %actor.id, target = %id_or_code))]
	pub async fn list_branches(&self, actor: &UserRecord, id_or_code: &str) -> Result<Vec<RepoRef>> {
		let record = find_record(&self.projects, id_or_code).await?;
		require_read(&self.memberships, &record, actor).await?;

		let mut branches = self.refs.list_branches(record.id).await?;
		branches.sort_by(|a, b| a.name.cmp(&b.name));
		Ok(branches)
	}

	#[tracing::instrument(skip(self, actor), fields(user_id = %actor.id, target = %id_or_code, branch = %name))]
	pub async fn get_branch(
		&self,
		actor: &UserRecord,
		id_or_code: &str,
		name: &str,
	) -> Result<RepoRef> {
		let record = find_record(&self.projects, id_or_code).await?;
		require_read(&self.memberships, &record, actor).await?;

		self
			.refs
			.find_branch(record.id, name)
			.await?
			.ok_or(ProjectsError::NotFound)
	}

	/// Tags sorted ascending by name, then reversed — descending order.
	#[tracing::instrument(skip(self, actor), fields(user_id = %actor.id, target = %id_or_code))]
	pub async fn list_tags(&self, actor: &UserRecord, id_or_code: &str) -> Result<Vec<RepoRef>> {
		let record = find_record(&self.projects, id_or_code).await?;
		require_read(&self.memberships, &record, actor).await?;

		let mut tags = self.refs.list_tags(record.id).await?;
		tags.sort_by(|a, b| a.name.cmp(&b.name));
		tags.reverse();
		Ok(tags)
	}

	/// Raw file content at a revision. Bad revision and bad path are both
	/// `NotFound`.
	#[tracing::instrument(skip(self, actor), fields(user_id = %actor.id, target = %id_or_code, revision = %revision, path = %path))]
	pub async fn get_blob(
		&self,
		actor: &UserRecord,
		id_or_code: &str,
		revision: &str,
		path: &str,
	) -> Result<Vec<u8>> {
		let record = find_record(&self.projects, id_or_code).await?;
		require_read(&self.memberships, &record, actor).await?;

		self
			.refs
			.read_blob(record.id, revision, path)
			.await?
			.ok_or(ProjectsError::NotFound)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::AccessLevel;
	use forge_server_db::testing::{create_migrated_test_pool, seed_project, seed_user};
	use forge_server_db::ProjectRepository;
	use forge_server_scm::{CommitInfo, MemoryRefStore};

	async fn service_fixture() -> (sqlx::SqlitePool, ProjectService, Arc<MemoryRefStore>) {
		let pool = create_migrated_test_pool().await;
		let refs = Arc::new(MemoryRefStore::new());
		let service = ProjectService::new(
			ProjectRepository::new(pool.clone()),
			MembershipRepository::new(pool.clone()),
			refs.clone(),
		);
		(pool, service, refs)
	}

	#[tokio::test]
	async fn create_increments_count_and_sets_owner() {
		let (pool, service, _refs) = service_fixture().await;
		let user = seed_user(&pool, "alice@example.com", "Alice").await;
		let projects = ProjectRepository::new(pool.clone());

		let before = projects.count_projects().await.unwrap();
		let project = service
			.create_project(
				&user,
				NewProject {
					name: Some("Forge Project".to_string()),
					..Default::default()
				},
			)
			.await
			.unwrap();

		assert_eq!(projects.count_projects().await.unwrap(), before + 1);
		assert_eq!(project.owner.email, "alice@example.com");
		assert_eq!(project.code, "forge-project");
		assert_eq!(project.default_branch, "master");
		assert!(project.issues_enabled);
	}

	#[tokio::test]
	async fn create_without_name_fails_without_side_effects() {
		let (pool, service, _refs) = service_fixture().await;
		let user = seed_user(&pool, "alice@example.com", "Alice").await;
		let projects = ProjectRepository::new(pool.clone());

		let result = service.create_project(&user, NewProject::default()).await;
		assert!(matches!(result, Err(ProjectsError::Validation(_))));
		assert_eq!(projects.count_projects().await.unwrap(), 0);
	}

	#[tokio::test]
	async fn get_resolves_id_then_code() {
		let (pool, service, _refs) = service_fixture().await;
		let user = seed_user(&pool, "alice@example.com", "Alice").await;
		let record = seed_project(&pool, user.id, "widgets").await;

		let by_id = service
			.get_project(&user, &record.id.to_string())
			.await
			.unwrap();
		assert_eq!(by_id.code, "widgets");

		let by_code = service.get_project(&user, "widgets").await.unwrap();
		assert_eq!(by_code.id, record.id);

		assert!(matches!(
			service.get_project(&user, "no-such-code").await,
			Err(ProjectsError::NotFound)
		));
	}

	#[tokio::test]
	async fn non_member_lookup_is_not_found() {
		let (pool, service, _refs) = service_fixture().await;
		let owner = seed_user(&pool, "owner@example.com", "Owner").await;
		let stranger = seed_user(&pool, "stranger@example.com", "Stranger").await;
		let record = seed_project(&pool, owner.id, "widgets").await;

		assert!(matches!(
			service.get_project(&stranger, &record.id.to_string()).await,
			Err(ProjectsError::NotFound)
		));
	}

	#[tokio::test]
	async fn member_can_read() {
		let (pool, service, _refs) = service_fixture().await;
		let owner = seed_user(&pool, "owner@example.com", "Owner").await;
		let member = seed_user(&pool, "member@example.com", "Member").await;
		let record = seed_project(&pool, owner.id, "widgets").await;

		MembershipRepository::new(pool.clone())
			.add_member(record.id, member.id, AccessLevel::Guest.as_i64())
			.await
			.unwrap();

		let project = service
			.get_project(&member, &record.id.to_string())
			.await
			.unwrap();
		assert_eq!(project.id, record.id);
	}

	#[tokio::test]
	async fn branches_ascending_tags_descending() {
		let (pool, service, refs) = service_fixture().await;
		let user = seed_user(&pool, "alice@example.com", "Alice").await;
		let record = seed_project(&pool, user.id, "widgets").await;

		refs.add_branch(record.id, "zoo", CommitInfo::synthetic("a1"));
		refs.add_branch(record.id, "api", CommitInfo::synthetic("a2"));
		refs.add_branch(record.id, "master", CommitInfo::synthetic("a3"));
		refs.add_tag(record.id, "v1.0.0", CommitInfo::synthetic("b1"));
		refs.add_tag(record.id, "v1.1.0", CommitInfo::synthetic("b2"));
		refs.add_tag(record.id, "v0.9.0", CommitInfo::synthetic("b3"));

		let branches = service
			.list_branches(&user, &record.id.to_string())
			.await
			.unwrap();
		let branch_names: Vec<_> = branches.iter().map(|b| b.name.as_str()).collect();
		assert_eq!(branch_names, vec!["api", "master", "zoo"]);

		let tags = service.list_tags(&user, &record.id.to_string()).await.unwrap();
		let tag_names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
		assert_eq!(tag_names, vec!["v1.1.0", "v1.0.0", "v0.9.0"]);
	}

	#[tokio::test]
	async fn branch_and_blob_lookups() {
		let (pool, service, refs) = service_fixture().await;
		let user = seed_user(&pool, "alice@example.com", "Alice").await;
		let record = seed_project(&pool, user.id, "widgets").await;

		refs.add_branch(record.id, "master", CommitInfo::synthetic("a1"));
		refs.put_blob(record.id, "master", "README.md", b"# widgets\n");

		let branch = service
			.get_branch(&user, &record.id.to_string(), "master")
			.await
			.unwrap();
		assert_eq!(branch.commit.id, "a1");

		assert!(matches!(
			service.get_branch(&user, &record.id.to_string(), "gone").await,
			Err(ProjectsError::NotFound)
		));

		let blob = service
			.get_blob(&user, &record.id.to_string(), "master", "README.md")
			.await
			.unwrap();
		assert!(!blob.is_empty());

		assert!(matches!(
			service
				.get_blob(&user, &record.id.to_string(), "invalid-branch", "README.md")
				.await,
			Err(ProjectsError::NotFound)
		));
		assert!(matches!(
			service
				.get_blob(&user, &record.id.to_string(), "master", "README.invalid")
				.await,
			Err(ProjectsError::NotFound)
		));
	}

	#[tokio::test]
	async fn list_only_shows_reachable_projects() {
		let (pool, service, _refs) = service_fixture().await;
		let alice = seed_user(&pool, "alice@example.com", "Alice").await;
		let bob = seed_user(&pool, "bob@example.com", "Bob").await;

		seed_project(&pool, alice.id, "alices").await;
		let bobs = seed_project(&pool, bob.id, "bobs").await;

		let listed = service.list_projects(&alice).await.unwrap();
		assert_eq!(listed.len(), 1);
		assert_eq!(listed[0].code, "alices");

		MembershipRepository::new(pool.clone())
			.add_member(bobs.id, alice.id, AccessLevel::Reporter.as_i64())
			.await
			.unwrap();
		let listed = service.list_projects(&alice).await.unwrap();
		assert_eq!(listed.len(), 2);
	}
}
