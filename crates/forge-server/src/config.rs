// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered server configuration.
//!
//! Precedence (highest to lowest):
//! 1. Environment variables (`FORGE_SERVER_*`)
//! 2. Config file (`FORGE_SERVER_CONFIG` or `/etc/forge/server.toml`)
//! 3. Built-in defaults

use serde::Deserialize;
use std::path::PathBuf;

use forge_server_projects::AccessLevel;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("Failed to read config file {path}: {source}")]
	Io {
		path: PathBuf,
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("Invalid configuration: {0}")]
	Invalid(String),
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
	pub host: String,
	pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
	pub url: String,
}

#[derive(Debug, Clone)]
pub struct ReposConfig {
	/// Bare repositories live under `<data_dir>/<project_id>/git`.
	pub data_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
	pub level: String,
}

#[derive(Debug, Clone)]
pub struct SnippetsConfig {
	/// Minimum access level required to create a snippet.
	pub create_access_level: AccessLevel,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub repos: ReposConfig,
	pub logging: LoggingConfig,
	pub snippets: SnippetsConfig,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			http: HttpConfig {
				host: "127.0.0.1".to_string(),
				port: 8080,
			},
			database: DatabaseConfig {
				url: "sqlite:./forge.db".to_string(),
			},
			repos: ReposConfig {
				data_dir: PathBuf::from("/var/lib/forge/repos"),
			},
			logging: LoggingConfig {
				level: "info".to_string(),
			},
			snippets: SnippetsConfig {
				create_access_level: AccessLevel::Guest,
			},
		}
	}
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// One configuration source; `None` fields defer to lower-precedence layers.
#[derive(Debug, Default, Deserialize)]
pub struct ServerConfigLayer {
	pub host: Option<String>,
	pub port: Option<u16>,
	pub database_url: Option<String>,
	pub data_dir: Option<PathBuf>,
	pub log_level: Option<String>,
	pub snippet_create_level: Option<String>,
}

impl ServerConfigLayer {
	/// Overlay `other` on top of this layer.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		if other.host.is_some() {
			self.host = other.host;
		}
		if other.port.is_some() {
			self.port = other.port;
		}
		if other.database_url.is_some() {
			self.database_url = other.database_url;
		}
		if other.data_dir.is_some() {
			self.data_dir = other.data_dir;
		}
		if other.log_level.is_some() {
			self.log_level = other.log_level;
		}
		if other.snippet_create_level.is_some() {
			self.snippet_create_level = other.snippet_create_level;
		}
	}
}

fn toml_layer(path: &PathBuf) -> Result<ServerConfigLayer, ConfigError> {
	match std::fs::read_to_string(path) {
		Ok(content) => Ok(toml::from_str(&content)?),
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ServerConfigLayer::default()),
		Err(e) => Err(ConfigError::Io {
			path: path.clone(),
			source: e,
		}),
	}
}

fn env_layer() -> Result<ServerConfigLayer, ConfigError> {
	let get = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

	let port = match get("FORGE_SERVER_PORT") {
		Some(raw) => Some(raw.parse::<u16>().map_err(|_| {
			ConfigError::Invalid(format!("FORGE_SERVER_PORT is not a port number: {raw}"))
		})?),
		None => None,
	};

	Ok(ServerConfigLayer {
		host: get("FORGE_SERVER_HOST"),
		port,
		database_url: get("FORGE_SERVER_DATABASE_URL"),
		data_dir: get("FORGE_SERVER_DATA_DIR").map(PathBuf::from),
		log_level: get("FORGE_SERVER_LOG_LEVEL"),
		snippet_create_level: get("FORGE_SERVER_SNIPPET_CREATE_LEVEL"),
	})
}

/// Resolve a merged layer against the defaults.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let mut config = ServerConfig::default();

	if let Some(host) = layer.host {
		config.http.host = host;
	}
	if let Some(port) = layer.port {
		config.http.port = port;
	}
	if let Some(url) = layer.database_url {
		config.database.url = url;
	}
	if let Some(dir) = layer.data_dir {
		config.repos.data_dir = dir;
	}
	if let Some(level) = layer.log_level {
		config.logging.level = level;
	}
	if let Some(level) = layer.snippet_create_level {
		config.snippets.create_access_level = level.parse().map_err(|_| {
			ConfigError::Invalid(format!("Unknown snippet create level: {level}"))
		})?;
	}

	Ok(config)
}

/// Load configuration from all sources with standard precedence.
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	let config_path = std::env::var("FORGE_SERVER_CONFIG")
		.map(PathBuf::from)
		.unwrap_or_else(|_| PathBuf::from("/etc/forge/server.toml"));

	let mut merged = ServerConfigLayer::default();
	tracing::debug!(path = %config_path.display(), "loading configuration file layer");
	merged.merge(toml_layer(&config_path)?);
	merged.merge(env_layer()?);

	finalize(merged)
}
