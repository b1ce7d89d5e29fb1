use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Agency Leads Dashboard API",
        version = "1.0.0",
        description = "Customers log in, manage their own leads and record feedback on them.\n\n**Authentication:** protected endpoints take `Authorization: Bearer <token>` as returned by the login endpoints."
    ),
    paths(
        // Health
        crate::api::root::read_root,
        crate::api::root::test_database,
        crate::api::health::health_check,

        // Auth
        crate::api::auth::login,
        crate::api::auth::me,
        crate::api::auth::admin_login,
        crate::api::auth::admin_me,

        // Leads
        crate::api::leads::create_lead,
        crate::api::leads::list_leads,

        // Feedback
        crate::api::feedback::submit_feedback,
        crate::api::feedback::list_feedback,
    ),
    components(
        schemas(
            crate::api::CreatedResponse,
            crate::api::root::RootResponse,
            crate::api::root::DatabaseDiagnostics,
            crate::api::health::HealthResponse,

            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::LoginResponse,
            crate::services::auth_service::AdminLoginRequest,
            crate::services::auth_service::AdminLoginResponse,
            crate::models::CustomerProfile,
            crate::models::AdminProfile,

            crate::models::CreateLeadRequest,
            crate::models::LeadResponse,
            crate::models::LeadStatus,
            crate::models::CreateFeedbackRequest,
            crate::models::FeedbackResponse,
            crate::models::Disposition,
        )
    ),
    tags(
        (name = "Health", description = "Service banner, database diagnostics and liveness."),
        (name = "Auth", description = "Customer login and session lookup."),
        (name = "Admin", description = "Admin login and session lookup."),
        (name = "Leads", description = "Leads owned by the authenticated customer."),
        (name = "Feedback", description = "Feedback on the authenticated customer's leads."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Token returned by /auth/login or /admin/login"))
                        .build()
                ),
            );
        }
    }
}
