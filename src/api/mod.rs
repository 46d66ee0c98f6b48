mod handlers;

use crate::config::Config;
use crate::db::{Database, DbPool};
use anyhow::Result;
use axum::extract::FromRef;
use axum::routing::{delete, get, post, put};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub http: reqwest::Client,
}

impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> DbPool {
        state.pool.clone()
    }
}

impl FromRef<AppState> for reqwest::Client {
    fn from_ref(state: &AppState) -> reqwest::Client {
        state.http.clone()
    }
}

/// Create router with all routes
pub fn build_router(state: AppState) -> Router {
    let config = Config::get();

    // Set up CORS
    let cors = if config.server.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::permissive()
    };

    Router::new()
        // General routes
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/api/posts", get(handlers::posts::get_posts))
        // Profile routes
        .route("/api/profile/me", get(handlers::profiles::get_own_profile))
        .route(
            "/api/profile",
            post(handlers::profiles::upsert_profile)
                .get(handlers::profiles::get_profiles)
                .delete(handlers::profiles::delete_account),
        )
        .route(
            "/api/profile/user/:user_id",
            get(handlers::profiles::get_profile_by_user_id),
        )
        // Experience / education routes
        .route(
            "/api/profile/experience",
            put(handlers::experience::add_experience),
        )
        .route(
            "/api/profile/experience/:exp_id",
            delete(handlers::experience::remove_experience),
        )
        .route(
            "/api/profile/education",
            put(handlers::education::add_education),
        )
        .route(
            "/api/profile/education/:edu_id",
            delete(handlers::education::remove_education),
        )
        // GitHub lookup
        .route(
            "/api/profile/github/:username",
            get(handlers::github::get_repos),
        )
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the API server
pub async fn start_api_server(db: Arc<Database>) -> Result<()> {
    let config = Config::get();

    let state = AppState {
        pool: db.get_pool().clone(),
        http: reqwest::Client::new(),
    };
    let app = build_router(state);

    // Get bind address
    let addr = format!("{}:{}", config.server.host, config.server.port).parse::<SocketAddr>()?;

    // Start server
    info!("Starting API server on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received, stopping API server");
}
