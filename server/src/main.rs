mod api;
mod auth;
mod config;
mod db;
mod models;
mod schema;
mod state;
mod telemetry;
mod uploads;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use clap::{Parser, Subcommand};
use recetario_core::{ImageUploader, RecipeService};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{PgSessionStore, StaticCredentials};
use crate::config::{AuthMode, Config};
use crate::db::PgRecipeStore;
use crate::state::{AppState, AuthState};
use crate::uploads::LocalDiskUploader;

#[derive(Parser)]
#[command(name = "recetario-server")]
#[command(about = "Recipe collection API server", long_about = None)]
struct Cli {
    /// Print the OpenAPI document and exit
    #[arg(long)]
    openapi: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print an argon2 hash for use in RECETARIO_USERS
    HashPassword { password: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.openapi {
        println!("{}", api::openapi().to_pretty_json()?);
        return Ok(());
    }

    if let Some(Command::HashPassword { password }) = cli.command {
        let hash = auth::hash_password(&password)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        println!("{}", hash);
        return Ok(());
    }

    // A missing .env file is fine
    dotenvy::dotenv().ok();

    telemetry::init_telemetry()?;

    let config = Config::from_env()?;
    let pool = db::create_pool(&config.database_url)?;

    let uploader = LocalDiskUploader::new(&config.upload_dir, &config.upload_url_prefix);
    uploader.ensure_dir().await.with_context(|| {
        format!(
            "Failed to create upload directory {}",
            config.upload_dir.display()
        )
    })?;
    tracing::info!(
        backend = uploader.backend_name(),
        "serving uploads from {} at {}",
        uploader.dir().display(),
        config.upload_url_prefix
    );

    let recipes = RecipeService::new(
        Arc::new(PgRecipeStore::new(pool.clone())),
        Arc::new(uploader.clone()),
        config.default_image.clone(),
    );

    let state = AppState {
        recipes: Arc::new(recipes),
        auth: Arc::new(AuthState {
            mode: config.auth_mode,
            credentials: Arc::new(StaticCredentials::new(config.users.clone())),
            sessions: Arc::new(PgSessionStore::new(pool)),
            session_ttl_secs: config.session_ttl_secs,
            cookie_secure: config.cookie_secure,
        }),
    };

    if config.auth_mode == AuthMode::Disabled {
        tracing::warn!("Authentication is disabled; every request is anonymous");
    }

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    let mut app = api::router(state)
        .merge(swagger_ui)
        .nest_service(&config.upload_url_prefix, ServeDir::new(uploader.dir()));

    if let Some(origin) = &config.cors_origin {
        app = app.layer(cors_layer(origin)?);
    }

    let app: Router = telemetry::with_http_tracing(app);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    let local_addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", local_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Browsers send the session cookie cross-origin only to an explicit origin.
fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin: HeaderValue = origin
        .parse()
        .with_context(|| format!("Invalid CORS_ORIGIN \"{}\"", origin))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
