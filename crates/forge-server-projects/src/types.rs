// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use forge_server_db::{MembershipRecord, ProjectRecord, SnippetRecord};
use serde::{Deserialize, Serialize};

use crate::error::{ProjectsError, Result};

/// Ordered project role. Wire representation is the numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
	Guest,
	Reporter,
	Developer,
	Master,
	Owner,
}

impl AccessLevel {
	pub fn as_i64(&self) -> i64 {
		match self {
			AccessLevel::Guest => 10,
			AccessLevel::Reporter => 20,
			AccessLevel::Developer => 30,
			AccessLevel::Master => 40,
			AccessLevel::Owner => 50,
		}
	}

	pub fn from_i64(value: i64) -> Option<Self> {
		match value {
			10 => Some(AccessLevel::Guest),
			20 => Some(AccessLevel::Reporter),
			30 => Some(AccessLevel::Developer),
			40 => Some(AccessLevel::Master),
			50 => Some(AccessLevel::Owner),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			AccessLevel::Guest => "guest",
			AccessLevel::Reporter => "reporter",
			AccessLevel::Developer => "developer",
			AccessLevel::Master => "master",
			AccessLevel::Owner => "owner",
		}
	}

	pub fn at_least(&self, other: AccessLevel) -> bool {
		self.as_i64() >= other.as_i64()
	}
}

impl std::str::FromStr for AccessLevel {
	type Err = ();
	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"guest" => Ok(AccessLevel::Guest),
			"reporter" => Ok(AccessLevel::Reporter),
			"developer" => Ok(AccessLevel::Developer),
			"master" => Ok(AccessLevel::Master),
			"owner" => Ok(AccessLevel::Owner),
			_ => Err(()),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectOwner {
	pub id: i64,
	pub email: String,
	pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
	pub id: i64,
	pub code: String,
	pub name: String,
	pub description: Option<String>,
	pub owner: ProjectOwner,
	pub default_branch: String,
	pub issues_enabled: bool,
	pub wall_enabled: bool,
	pub merge_requests_enabled: bool,
	pub wiki_enabled: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
	pub last_activity_at: DateTime<Utc>,
}

impl From<ProjectRecord> for Project {
	fn from(record: ProjectRecord) -> Self {
		Self {
			id: record.id,
			code: record.code,
			name: record.name,
			description: record.description,
			owner: ProjectOwner {
				id: record.owner_id,
				email: record.owner_email,
				name: record.owner_name,
			},
			default_branch: record.default_branch,
			issues_enabled: record.issues_enabled,
			wall_enabled: record.wall_enabled,
			merge_requests_enabled: record.merge_requests_enabled,
			wiki_enabled: record.wiki_enabled,
			created_at: record.created_at,
			updated_at: record.updated_at,
			last_activity_at: record.last_activity_at,
		}
	}
}

/// Attributes for project creation. Only `name` is mandatory; the code is
/// slugified from the name when absent.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
	pub name: Option<String>,
	pub code: Option<String>,
	pub description: Option<String>,
	pub default_branch: Option<String>,
	pub issues_enabled: Option<bool>,
	pub wall_enabled: Option<bool>,
	pub merge_requests_enabled: Option<bool>,
	pub wiki_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
	pub id: i64,
	pub project_id: i64,
	pub user_id: i64,
	pub access_level: AccessLevel,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Membership {
	pub fn from_record(record: MembershipRecord) -> Result<Self> {
		let access_level = AccessLevel::from_i64(record.access_level).ok_or_else(|| {
			ProjectsError::Database(forge_server_db::DbError::Internal(format!(
				"invalid access level: {}",
				record.access_level
			)))
		})?;

		Ok(Self {
			id: record.id,
			project_id: record.project_id,
			user_id: record.user_id,
			access_level,
			created_at: record.created_at,
			updated_at: record.updated_at,
		})
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snippet {
	pub id: i64,
	pub project_id: i64,
	pub author_id: i64,
	pub title: String,
	pub file_name: String,
	pub content: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<SnippetRecord> for Snippet {
	fn from(record: SnippetRecord) -> Self {
		Self {
			id: record.id,
			project_id: record.project_id,
			author_id: record.author_id,
			title: record.title,
			file_name: record.file_name,
			content: record.content,
			created_at: record.created_at,
			updated_at: record.updated_at,
		}
	}
}

/// Partial snippet update; `None` fields stay untouched.
#[derive(Debug, Clone, Default)]
pub struct SnippetPatch {
	pub title: Option<String>,
	pub file_name: Option<String>,
	pub content: Option<String>,
}

impl SnippetPatch {
	pub fn is_empty(&self) -> bool {
		self.title.is_none() && self.file_name.is_none() && self.content.is_none()
	}
}

/// A project code must be usable as a URL path segment.
pub fn validate_project_code(code: &str) -> Result<()> {
	if code.is_empty() || code.len() > 64 {
		return Err(ProjectsError::Validation(
			"Code must be 1-64 characters".to_string(),
		));
	}

	if code.starts_with('-') || code.starts_with('.') {
		return Err(ProjectsError::Validation(
			"Code cannot start with '.' or '-'".to_string(),
		));
	}

	if !code
		.chars()
		.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_' || c == '.')
	{
		return Err(ProjectsError::Validation(
			"Code can only contain lowercase letters, numbers, dash, underscore, dot".to_string(),
		));
	}

	// A code that parses as a number would shadow id lookup.
	if code.parse::<i64>().is_ok() {
		return Err(ProjectsError::Validation(
			"Code cannot be purely numeric".to_string(),
		));
	}

	Ok(())
}

/// Derive a URL-safe code from a display name.
pub fn slugify_code(name: &str) -> String {
	let mut slug = String::with_capacity(name.len());
	let mut last_dash = true;
	for c in name.chars() {
		let c = c.to_ascii_lowercase();
		if c.is_ascii_lowercase() || c.is_ascii_digit() {
			slug.push(c);
			last_dash = false;
		} else if !last_dash {
			slug.push('-');
			last_dash = true;
		}
	}
	slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_access_level_ordering() {
		assert!(AccessLevel::Owner.at_least(AccessLevel::Master));
		assert!(AccessLevel::Master.at_least(AccessLevel::Master));
		assert!(!AccessLevel::Developer.at_least(AccessLevel::Master));
		assert!(AccessLevel::Guest < AccessLevel::Reporter);
		assert!(AccessLevel::Master < AccessLevel::Owner);
	}

	#[test]
	fn test_access_level_numeric_round_trip() {
		for level in [
			AccessLevel::Guest,
			AccessLevel::Reporter,
			AccessLevel::Developer,
			AccessLevel::Master,
			AccessLevel::Owner,
		] {
			assert_eq!(AccessLevel::from_i64(level.as_i64()), Some(level));
		}
		assert_eq!(AccessLevel::from_i64(15), None);
		assert_eq!(AccessLevel::from_i64(0), None);
	}

	#[test]
	fn test_valid_codes() {
		assert!(validate_project_code("widgets").is_ok());
		assert!(validate_project_code("my-project_2.0").is_ok());
		assert!(validate_project_code("a").is_ok());
	}

	#[test]
	fn test_invalid_codes() {
		assert!(validate_project_code("").is_err());
		assert!(validate_project_code("Widgets").is_err());
		assert!(validate_project_code("my project").is_err());
		assert!(validate_project_code("-dash").is_err());
		assert!(validate_project_code(".hidden").is_err());
		assert!(validate_project_code("a/b").is_err());
		assert!(validate_project_code(&"a".repeat(65)).is_err());
		assert!(validate_project_code("12345").is_err());
	}

	#[test]
	fn test_slugify() {
		assert_eq!(slugify_code("Forge Project"), "forge-project");
		assert_eq!(slugify_code("  Widgets!  "), "widgets");
		assert_eq!(slugify_code("a__b"), "a-b");
		assert_eq!(slugify_code("Über cool"), "ber-cool");
	}

	proptest! {
		#[test]
		fn slugified_names_validate(name in "[a-zA-Z][a-zA-Z0-9 _-]{0,40}") {
			let code = slugify_code(&name);
			// Slugs of letter-led names are never empty or numeric.
			prop_assert!(validate_project_code(&code).is_ok(), "code {code:?} from {name:?}");
		}

		#[test]
		fn codes_with_slashes_rejected(code in r"[a-z0-9]*[/\\][a-z0-9]*") {
			prop_assert!(validate_project_code(&code).is_err());
		}

		#[test]
		fn uppercase_rejected(code in "[a-z]*[A-Z][a-z]*") {
			prop_assert!(validate_project_code(&code).is_err());
		}
	}
}
