use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::config::AppState;

const MAX_COLLECTIONS: usize = 10;
const MAX_ERROR_CHARS: usize = 80;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct RootResponse {
    pub message: String,
}

/// Store connectivity report. Reveals whether settings exist, never their values.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct DatabaseDiagnostics {
    pub backend: String,
    pub database: String,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub connection_status: String,
    pub collections: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Service banner", body = RootResponse)
    )
)]
pub async fn read_root() -> impl Responder {
    HttpResponse::Ok().json(RootResponse {
        message: "Agency Leads Dashboard API".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/test",
    tag = "Health",
    responses(
        (status = 200, description = "Database connectivity report", body = DatabaseDiagnostics)
    )
)]
pub async fn test_database(state: web::Data<AppState>) -> impl Responder {
    log::info!("🩺 GET /test");

    let mut report = DatabaseDiagnostics {
        backend: "✅ Running".to_string(),
        database: "❌ Not Available".to_string(),
        database_url: None,
        database_name: None,
        connection_status: "Not Connected".to_string(),
        collections: vec![],
    };

    if let Ok(store) = state.store() {
        report.database = "✅ Available".to_string();
        report.database_url = Some(set_or_not(state.database.url.is_some()));
        report.database_name = Some(set_or_not(state.database.name.is_some()));
        report.connection_status = "Connected".to_string();

        match store.list_collection_names().await {
            Ok(collections) => {
                report.collections = collections.into_iter().take(MAX_COLLECTIONS).collect();
                report.database = "✅ Connected & Working".to_string();
            }
            Err(e) => {
                log::warn!("⚠️  Collection listing failed: {}", e);
                report.database = format!("⚠️  Connected but Error: {}", truncate(&e.to_string(), MAX_ERROR_CHARS));
            }
        }
    }

    HttpResponse::Ok().json(report)
}

fn set_or_not(present: bool) -> String {
    let label = if present { "✅ Set" } else { "❌ Not Set" };
    label.to_string()
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
