use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::config::AppState;
use crate::models::{CreateLeadRequest, Customer, LeadResponse};
use crate::services::lead_service;
use crate::utils::AppError;

use super::CreatedResponse;

/// POST /leads - Cria lead para o customer autenticado
#[utoipa::path(
    post,
    path = "/leads",
    tag = "Leads",
    request_body = CreateLeadRequest,
    responses(
        (status = 200, description = "Lead created", body = CreatedResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 422, description = "Invalid body")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_lead(
    customer: web::ReqData<Customer>,
    state: web::Data<AppState>,
    request: web::Json<CreateLeadRequest>,
) -> Result<HttpResponse, AppError> {
    let customer_id = customer.id_hex();
    log::info!("📝 POST /leads - customer {}", customer_id);

    request.validate()?;
    let store = state.store()?;

    let id = lead_service::create_lead(store, &customer, request.into_inner()).await?;
    log::info!("✅ Lead {} created for customer {}", id, customer_id);

    Ok(HttpResponse::Ok().json(CreatedResponse { id: id.to_hex() }))
}

/// GET /leads - Lista os leads do customer (máx. 100)
#[utoipa::path(
    get,
    path = "/leads",
    tag = "Leads",
    responses(
        (status = 200, description = "Leads owned by the caller", body = [LeadResponse]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_leads(
    customer: web::ReqData<Customer>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let customer_id = customer.id_hex();
    log::info!("📋 GET /leads - customer {}", customer_id);

    let leads = lead_service::list_leads(state.store()?, &customer).await?;
    log::info!("✅ Listed {} leads", leads.len());

    Ok(HttpResponse::Ok().json(leads))
}
