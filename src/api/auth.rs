use actix_web::{web, HttpResponse};

use crate::config::AppState;
use crate::models::{Admin, AdminProfile, Customer, CustomerProfile};
use crate::services::auth_service::{self, AdminLoginRequest, AdminLoginResponse, LoginRequest, LoginResponse};

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Database not configured")
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    match auth_service::login(&state, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            actix_web::ResponseError::error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Authenticated customer", body = CustomerProfile),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn me(customer: web::ReqData<Customer>) -> HttpResponse {
    log::info!("👤 GET /auth/me - customer {}", customer.id_hex());
    HttpResponse::Ok().json(CustomerProfile::from(&*customer))
}

#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "Admin",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AdminLoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Database not configured")
    )
)]
pub async fn admin_login(
    state: web::Data<AppState>,
    request: web::Json<AdminLoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /admin/login - username: {}", request.username);

    match auth_service::admin_login(&state, &request).await {
        Ok(response) => {
            log::info!("✅ Admin login successful: {}", request.username);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Admin login failed: {} - {}", request.username, e);
            actix_web::ResponseError::error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/admin/me",
    tag = "Admin",
    responses(
        (status = 200, description = "Authenticated admin", body = AdminProfile),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn admin_me(admin: web::ReqData<Admin>) -> HttpResponse {
    log::info!("👤 GET /admin/me - admin {}", admin.username);
    HttpResponse::Ok().json(AdminProfile::from(&*admin))
}
