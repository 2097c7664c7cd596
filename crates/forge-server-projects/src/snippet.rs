// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Snippet lifecycle, scoped to a project.
//!
//! Creation is gated on a configurable minimum access level; updates and
//! deletes are allowed to the author or anyone at `Master` and above.

use forge_server_db::{
	MembershipRepository, NewSnippetRecord, ProjectRepository, SnippetRepository, UserRecord,
};

use crate::access::{require_level, require_read};
use crate::error::{ProjectsError, Result};
use crate::project::find_record;
use crate::types::{AccessLevel, Snippet, SnippetPatch};

#[derive(Clone)]
pub struct SnippetService {
	projects: ProjectRepository,
	memberships: MembershipRepository,
	snippets: SnippetRepository,
	create_level: AccessLevel,
}

impl SnippetService {
	pub fn new(
		projects: ProjectRepository,
		memberships: MembershipRepository,
		snippets: SnippetRepository,
		create_level: AccessLevel,
	) -> Self {
		Self {
			projects,
			memberships,
			snippets,
			create_level,
		}
	}

	fn require_field(value: &str, field: &str) -> Result<()> {
		if value.trim().is_empty() {
			return Err(ProjectsError::Validation(format!("{field} is required")));
		}
		Ok(())
	}

	#[tracing::instrument(skip(self, actor, content), fields(user_id = %actor.id, target = %id_or_code, title = %title))]
	pub async fn create_snippet(
		&self,
		actor: &UserRecord,
		id_or_code: &str,
		title: &str,
		file_name: &str,
		content: &str,
	) -> Result<Snippet> {
		let project = find_record(&self.projects, id_or_code).await?;
		require_level(&self.memberships, &project, actor, self.create_level).await?;

		Self::require_field(title, "Title")?;
		Self::require_field(file_name, "File name")?;
		Self::require_field(content, "Content")?;

		let created = self
			.snippets
			.create_snippet(&NewSnippetRecord {
				project_id: project.id,
				author_id: actor.id,
				title: title.to_string(),
				file_name: file_name.to_string(),
				content: content.to_string(),
			})
			.await?;

		self.projects.touch_activity(project.id).await?;

		tracing::info!(project_id = %project.id, snippet_id = %created.id, "snippet created");
		Ok(created.into())
	}

	#[tracing::instrument(skip(self, actor), fields(user_id = %actor.id, target = %id_or_code))]
	pub async fn list_snippets(&self, actor: &UserRecord, id_or_code: &str) -> Result<Vec<Snippet>> {
		let project = find_record(&self.projects, id_or_code).await?;
		require_read(&self.memberships, &project, actor).await?;

		let records = self.snippets.list_snippets(project.id).await?;
		Ok(records.into_iter().map(Snippet::from).collect())
	}

	#[tracing::instrument(skip(self, actor), fields(user_id = %actor.id, target = %id_or_code, snippet_id = %snippet_id))]
	pub async fn get_snippet(
		&self,
		actor: &UserRecord,
		id_or_code: &str,
		snippet_id: i64,
	) -> Result<Snippet> {
		let project = find_record(&self.projects, id_or_code).await?;
		require_read(&self.memberships, &project, actor).await?;

		let record = self
			.snippets
			.get_snippet(project.id, snippet_id)
			.await?
			.ok_or(ProjectsError::NotFound)?;
		Ok(record.into())
	}

	/// Content bytes with no transformation.
	pub async fn raw_snippet(
		&self,
		actor: &UserRecord,
		id_or_code: &str,
		snippet_id: i64,
	) -> Result<Vec<u8>> {
		let snippet = self.get_snippet(actor, id_or_code, snippet_id).await?;
		Ok(snippet.content.into_bytes())
	}

	#[tracing::instrument(skip(self, actor, patch), fields(user_id = %actor.id, target = %id_or_code, snippet_id = %snippet_id))]
	pub async fn update_snippet(
		&self,
		actor: &UserRecord,
		id_or_code: &str,
		snippet_id: i64,
		patch: SnippetPatch,
	) -> Result<Snippet> {
		let project = find_record(&self.projects, id_or_code).await?;
		let level = require_read(&self.memberships, &project, actor).await?;

		let existing = self
			.snippets
			.get_snippet(project.id, snippet_id)
			.await?
			.ok_or(ProjectsError::NotFound)?;

		if existing.author_id != actor.id && !level.at_least(AccessLevel::Master) {
			return Err(ProjectsError::Forbidden);
		}

		if let Some(title) = patch.title.as_deref() {
			Self::require_field(title, "Title")?;
		}
		if let Some(file_name) = patch.file_name.as_deref() {
			Self::require_field(file_name, "File name")?;
		}
		if let Some(content) = patch.content.as_deref() {
			Self::require_field(content, "Content")?;
		}

		if !patch.is_empty() {
			self
				.snippets
				.update_snippet(
					project.id,
					snippet_id,
					patch.title.as_deref(),
					patch.file_name.as_deref(),
					patch.content.as_deref(),
				)
				.await?;
			self.projects.touch_activity(project.id).await?;
		}

		let updated = self
			.snippets
			.get_snippet(project.id, snippet_id)
			.await?
			.ok_or(ProjectsError::NotFound)?;
		Ok(updated.into())
	}

	#[tracing::instrument(skip(self, actor), fields(user_id = %actor.id, target = %id_or_code, snippet_id = %snippet_id))]
	pub async fn delete_snippet(
		&self,
		actor: &UserRecord,
		id_or_code: &str,
		snippet_id: i64,
	) -> Result<()> {
		let project = find_record(&self.projects, id_or_code).await?;
		let level = require_read(&self.memberships, &project, actor).await?;

		let existing = self
			.snippets
			.get_snippet(project.id, snippet_id)
			.await?
			.ok_or(ProjectsError::NotFound)?;

		if existing.author_id != actor.id && !level.at_least(AccessLevel::Master) {
			return Err(ProjectsError::Forbidden);
		}

		if !self.snippets.delete_snippet(project.id, snippet_id).await? {
			return Err(ProjectsError::NotFound);
		}
		self.projects.touch_activity(project.id).await?;

		tracing::info!(project_id = %project.id, snippet_id, "snippet deleted");
		Ok(())
	}
}
