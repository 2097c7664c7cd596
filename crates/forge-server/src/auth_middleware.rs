// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication extractor.
//!
//! Credentials arrive either as `Authorization: Bearer <token>` or as a
//! `PRIVATE-TOKEN` header. Tokens are compared by SHA-256 digest; the clear
//! value is never stored or logged.

use axum::extract::FromRequestParts;
use http::header::AUTHORIZATION;
use http::request::Parts;
use http::HeaderMap;
use rand::RngCore;
use sha2::{Digest, Sha256};

use forge_server_db::UserRecord;

use crate::api::AppState;
use crate::error::ServerError;

/// Header carrying a bare API token.
pub const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Prefix for generated API tokens.
pub const TOKEN_PREFIX: &str = "fg_";

/// The authenticated acting user.
#[derive(Debug, Clone)]
pub struct CurrentUser {
	pub user: UserRecord,
}

/// Extractor that rejects the request with 401 when no valid credential is
/// present.
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
	type Rejection = ServerError;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let token = extract_token(&parts.headers).ok_or(ServerError::Unauthenticated)?;

		let user = state
			.users
			.get_user_by_token_hash(&hash_token(&token))
			.await
			.map_err(|e| {
				tracing::error!(error = %e, "Failed to look up credential");
				ServerError::Internal(e.to_string())
			})?
			.ok_or(ServerError::Unauthenticated)?;

		Ok(RequireAuth(CurrentUser { user }))
	}
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
	if let Some(value) = headers.get(AUTHORIZATION) {
		if let Ok(value) = value.to_str() {
			if let Some(token) = value.strip_prefix("Bearer ") {
				if !token.is_empty() {
					return Some(token.to_string());
				}
			}
		}
	}

	headers
		.get(PRIVATE_TOKEN_HEADER)
		.and_then(|v| v.to_str().ok())
		.filter(|v| !v.is_empty())
		.map(|v| v.to_string())
}

/// SHA-256 hex digest of a token, as stored in the users table.
pub fn hash_token(token: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(token.as_bytes());
	hex::encode(hasher.finalize())
}

/// Mint a new API token. The caller is responsible for storing only the
/// hash.
pub fn generate_token() -> String {
	let mut bytes = [0u8; 20];
	rand::thread_rng().fill_bytes(&mut bytes);
	format!("{TOKEN_PREFIX}{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
	use super::*;
	use http::header::HeaderValue;

	#[test]
	fn bearer_header_wins() {
		let mut headers = HeaderMap::new();
		headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer fg_abc"));
		headers.insert(PRIVATE_TOKEN_HEADER, HeaderValue::from_static("fg_def"));
		assert_eq!(extract_token(&headers).as_deref(), Some("fg_abc"));
	}

	#[test]
	fn private_token_header_is_accepted() {
		let mut headers = HeaderMap::new();
		headers.insert(PRIVATE_TOKEN_HEADER, HeaderValue::from_static("fg_def"));
		assert_eq!(extract_token(&headers).as_deref(), Some("fg_def"));
	}

	#[test]
	fn missing_or_malformed_credentials_are_rejected() {
		assert_eq!(extract_token(&HeaderMap::new()), None);

		let mut headers = HeaderMap::new();
		headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
		assert_eq!(extract_token(&headers), None);

		let mut headers = HeaderMap::new();
		headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
		assert_eq!(extract_token(&headers), None);
	}

	#[test]
	fn tokens_hash_deterministically() {
		let token = generate_token();
		assert!(token.starts_with(TOKEN_PREFIX));
		assert_eq!(hash_token(&token), hash_token(&token));
		assert_ne!(hash_token(&token), hash_token("fg_other"));
		// hex sha256
		assert_eq!(hash_token(&token).len(), 64);
	}
}
