mod models;
mod handlers;
mod services;
mod middleware;
mod auth;
mod config;
mod errors;

use axum::{
    routing::get,
    Router,
    middleware::from_fn,
};
use tower_http::services::ServeDir;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tower_sessions::cookie::SameSite;
use std::sync::Arc;
use anyhow::Context;
use chrono::Utc;
use crate::{
    config::{BootstrapConfig, Config},
    models::{Role, User},
    services::StoreService,
};
use tracing_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize basic tracing subscriber
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;
    let config_state = config.clone();

    // Initialize the persistent store
    let redis_client = Arc::new(
        redis::Client::open(config.redis.url.clone()).context("Failed to connect to store")?,
    );
    let store_service = StoreService::new(redis_client);

    // Seed the reserved admin account on first startup
    seed_admin(&store_service, &config.bootstrap).await?;

    // Session store setup; per-login expiry is set by auth::establish
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_name(config.session.cookie_name.clone())
        .with_expiry(Expiry::OnSessionEnd);

    // Create router with all routes
    let app = Router::new()
        // Public routes
        .route("/", get(handlers::serve_index))
        .route("/login", get(handlers::serve_login_page).post(handlers::handle_login))

        // Authenticated routes
        .route("/logout", get(handlers::handle_logout))

        // Admin routes
        .route("/admin/dashboard", get(handlers::admin_dashboard))
        .route("/admin/clients", get(handlers::admin_clients))
        .route(
            "/admin/clients/new",
            get(handlers::serve_add_client).post(handlers::handle_add_client),
        )
        .route("/admin/projects", get(handlers::admin_projects))
        .route(
            "/admin/projects/new",
            get(handlers::serve_add_project).post(handlers::handle_add_project),
        )

        // Client routes
        .route("/client/dashboard", get(handlers::client_dashboard))
        .route(
            "/client/profile",
            get(handlers::serve_profile).post(handlers::handle_update_profile),
        )

        // Static files
        .nest_service("/static", ServeDir::new("static"))

        // Add middleware
        .layer(from_fn(middleware::require_auth))
        .layer(session_layer)

        // Add state
        .with_state((store_service, config_state));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Server running on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind server")?;

    axum::serve(listener, app.into_make_service())
        .await
        .context("Failed to start server")?;
    Ok(())
}

// First-startup bootstrap: create the reserved admin account if it does not
// exist yet. The default credential is an operational risk until rotated.
async fn seed_admin(store: &StoreService, bootstrap: &BootstrapConfig) -> anyhow::Result<()> {
    if store
        .find_user_by_email(&bootstrap.admin_email)
        .await
        .context("Failed to query store during bootstrap")?
        .is_some()
    {
        return Ok(());
    }

    let id = store.next_id("user").await?;
    let mut admin = User {
        id,
        username: bootstrap.admin_username.clone(),
        email: bootstrap.admin_email.clone(),
        password_hash: String::new(),
        role: Role::Admin,
        first_name: Some("System".to_string()),
        last_name: Some("Administrator".to_string()),
        phone: None,
        active: true,
        created_at: Utc::now(),
    };
    admin
        .set_password(&bootstrap.admin_password)
        .context("Failed to hash bootstrap password")?;

    if store.create_user(&admin).await? {
        tracing::warn!(
            "Seeded default admin account {}; rotate this credential before production use",
            bootstrap.admin_email
        );
    }
    Ok(())
}
