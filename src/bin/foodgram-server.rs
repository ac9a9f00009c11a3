// ABOUTME: Foodgram server binary: loads configuration, opens the database and serves the API
// ABOUTME: Accepts an --http-port override on top of the environment configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Foodgram Server Binary
//!
//! Starts the recipe-sharing REST API with JWT authentication, SQLite storage
//! and local media files.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use foodgram_server::{
    auth::AuthManager, config::ServerConfig, database::Database, logging,
    resources::ServerResources, server::FoodgramServer,
};
use tracing::{error, info};

/// Command-line arguments
#[derive(Parser)]
#[command(name = "foodgram-server")]
#[command(about = "Foodgram - recipe sharing REST API")]
#[command(version)]
pub struct Args {
    /// Override HTTP port
    #[arg(long, env = "HTTP_PORT")]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    info!("Starting Foodgram server");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url, config.database.max_connections).await?;
    info!("Database initialized: {}", config.database.url);

    let auth_manager = AuthManager::new(&config.auth.jwt_secret, config.auth.jwt_expiry_hours);
    info!(
        "Authentication manager initialized (token lifetime {}h)",
        config.auth.jwt_expiry_hours
    );

    let config = Arc::new(config);
    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        Arc::clone(&config),
    ));

    display_available_endpoints(&config);

    let server = FoodgramServer::new(resources);
    if let Err(e) = server.run(config.http_port).await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    Ok(())
}

/// Log the public endpoints
#[allow(clippy::cognitive_complexity)]
fn display_available_endpoints(config: &ServerConfig) {
    let base = &config.media.public_base_url;

    info!("=== Available API Endpoints ===");
    info!("Recipes:");
    info!("   List / Create:     GET|POST   {base}/api/recipes");
    info!("   Detail:            GET|PATCH|DELETE {base}/api/recipes/{{id}}");
    info!("   Favorite:          POST|DELETE {base}/api/recipes/{{id}}/favorite");
    info!("   Shopping Cart:     POST|DELETE {base}/api/recipes/{{id}}/shopping_cart");
    info!("   Shopping List:     GET        {base}/api/recipes/download_shopping_cart");
    info!("   Short Link:        GET        {base}/api/recipes/{{id}}/get-link");
    info!("Users:");
    info!("   List / Register:   GET|POST   {base}/api/users");
    info!("   Current User:      GET|PATCH  {base}/api/users/me");
    info!("   Avatar:            PUT|DELETE {base}/api/users/me/avatar");
    info!("   Set Password:      POST       {base}/api/users/set_password");
    info!("   Subscriptions:     GET        {base}/api/users/subscriptions");
    info!("   Subscribe:         POST|DELETE {base}/api/users/{{id}}/subscribe");
    info!("Catalogue:");
    info!("   Tags:              GET        {base}/api/tags");
    info!("   Ingredients:       GET        {base}/api/ingredients?name=<prefix>");
    info!("Other:");
    info!("   Short Redirect:    GET        {base}/s/{{code}}");
    info!("   Media:             GET        {base}/media/<path>");
    info!("   Health Check:      GET        {base}/health");
    info!("=== End of Endpoint List ===");
}
