// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Forge project hosting server binary.

use clap::{Parser, Subcommand};
use forge_server::{create_app_state, create_router, generate_token, hash_token};
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};

/// Forge server - project hosting HTTP API.
#[derive(Parser, Debug)]
#[command(name = "forge-server", about = "Forge project hosting server", version)]
struct Args {
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version information
	Version,
	/// Create a user and print their API token
	CreateUser {
		#[arg(long)]
		email: String,
		#[arg(long)]
		name: String,
	},
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("forge-server {}", env!("CARGO_PKG_VERSION"));
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = forge_server::load_config()?;

	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.init();

	let pool = forge_server_db::create_pool(&config.database.url).await?;
	forge_server_db::run_migrations(&pool).await?;

	if let Some(Command::CreateUser { email, name }) = args.command {
		let users = forge_server_db::UserRepository::new(pool.clone());
		let token = generate_token();
		let user = users.create_user(&email, &name, Some(&hash_token(&token))).await?;

		tracing::info!(user_id = %user.id, email = %user.email, "user created");
		// The clear token is shown exactly once.
		println!("{token}");
		return Ok(());
	}

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		data_dir = %config.repos.data_dir.display(),
		"starting forge-server"
	);

	let state = create_app_state(pool, &config);
	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
	tracing::info!(addr = %listener.local_addr()?, "listening");
	axum::serve(listener, app).await?;

	Ok(())
}
