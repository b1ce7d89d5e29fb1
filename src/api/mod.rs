pub mod auth;
pub mod feedback;
pub mod health;
pub mod leads;
pub mod root;
pub mod swagger;

use actix_web::web;
use serde::{Deserialize, Serialize};

use crate::middleware::AuthMiddleware;
use crate::utils::AppError;

/// Body returned by create endpoints.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreatedResponse {
    pub id: String,
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        log::warn!("⚠️  Rejected body for {} {}: {}", req.method(), req.path(), err);
        AppError::InvalidRequest(err.to_string()).into()
    })
}

/// Registers every route. Expects `web::Data<AppState>` on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(root::read_root))
        .route("/test", web::get().to(root::test_database))
        .route("/health", web::get().to(health::health_check))
        // Customer auth
        .service(
            web::scope("/auth")
                .route("/login", web::post().to(auth::login))
                .service(
                    web::resource("/me")
                        .wrap(AuthMiddleware::customer())
                        .route(web::get().to(auth::me)),
                ),
        )
        // Admin auth
        .service(
            web::scope("/admin")
                .route("/login", web::post().to(auth::admin_login))
                .service(
                    web::resource("/me")
                        .wrap(AuthMiddleware::admin())
                        .route(web::get().to(auth::admin_me)),
                ),
        )
        // Leads: tenant-scoped, customer token required
        .service(
            web::scope("/leads")
                .wrap(AuthMiddleware::customer())
                .route("", web::post().to(leads::create_lead))
                .route("", web::get().to(leads::list_leads)),
        )
        // Feedback: only on leads the caller owns
        .service(
            web::scope("/feedback")
                .wrap(AuthMiddleware::customer())
                .route("", web::post().to(feedback::submit_feedback))
                .route("/{lead_id}", web::get().to(feedback::list_feedback)),
        );
}
