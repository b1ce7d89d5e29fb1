mod api;
mod config;
mod database;
mod middleware;
mod models;
mod seeds;
mod services;
mod utils;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{AppConfig, AppState, TokenMode};
use crate::database::DocumentStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    log::info!("🚀 Starting Agency Leads Dashboard API...");
    match &config.token_mode {
        TokenMode::RecordId => log::warn!("🔑 JWT_SECRET not set: tokens are raw record ids"),
        TokenMode::Signed(jwt) => log::info!("🔑 Signed tokens enabled ({}h expiry)", jwt.expiration_hours),
    }

    // The service still starts without a database; protected routes answer 500
    let store: Option<Arc<dyn DocumentStore>> = match config.database.url.as_deref() {
        Some(url) => {
            let database_name = config.database.resolved_name();
            log::info!("📊 Database: {}", database_name);
            match database::MongoDB::new(url, &database_name).await {
                Ok(db) => {
                    log::info!("✅ MongoDB connected successfully");
                    Some(Arc::new(db))
                }
                Err(e) => {
                    log::error!("❌ Failed to connect to MongoDB: {}", e);
                    None
                }
            }
        }
        None => {
            log::warn!("⚠️  DATABASE_URL not set: running without a database");
            None
        }
    };

    // 🌱 Seed default admin (best-effort)
    if let Some(store) = store.as_deref() {
        seeds::admin_seed::ensure_default_admin(store).await;
    }

    let state = web::Data::new(AppState::new(store, config.token_mode.clone(), config.database.clone()));
    let cors_origins = config.cors_allowed_origins.clone();

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);

    // Start HTTP server
    HttpServer::new(move || {
        let origins = if cors_origins.is_empty() {
            Cors::default().allow_any_origin()
        } else {
            cors_origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        };
        let cors = origins
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
