use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::config::AppState;
use crate::models::{CreateFeedbackRequest, Customer, FeedbackResponse};
use crate::services::feedback_service;
use crate::utils::AppError;

use super::CreatedResponse;

/// POST /feedback - Registra feedback sobre um lead do próprio customer
#[utoipa::path(
    post,
    path = "/feedback",
    tag = "Feedback",
    request_body = CreateFeedbackRequest,
    responses(
        (status = 200, description = "Feedback recorded", body = CreatedResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Lead not found"),
        (status = 422, description = "Invalid body")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn submit_feedback(
    customer: web::ReqData<Customer>,
    state: web::Data<AppState>,
    request: web::Json<CreateFeedbackRequest>,
) -> Result<HttpResponse, AppError> {
    let customer_id = customer.id_hex();
    log::info!("📝 POST /feedback - lead {} customer {}", request.lead_id, customer_id);

    request.validate()?;
    let store = state.store()?;

    match feedback_service::submit_feedback(store, &customer, request.into_inner()).await {
        Ok(id) => {
            log::info!("✅ Feedback {} recorded", id);
            Ok(HttpResponse::Ok().json(CreatedResponse { id: id.to_hex() }))
        }
        Err(e) => {
            log::warn!("❌ Feedback rejected for customer {}: {}", customer_id, e);
            Err(e)
        }
    }
}

/// GET /feedback/{lead_id} - Lista feedback de um lead (máx. 200)
#[utoipa::path(
    get,
    path = "/feedback/{lead_id}",
    tag = "Feedback",
    params(
        ("lead_id" = String, Path, description = "Lead identifier")
    ),
    responses(
        (status = 200, description = "Feedback for the lead", body = [FeedbackResponse]),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Lead not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_feedback(
    customer: web::ReqData<Customer>,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let lead_id = path.into_inner();
    log::info!("📋 GET /feedback/{} - customer {}", lead_id, customer.id_hex());

    let feedback = feedback_service::list_feedback(state.store()?, &customer, &lead_id).await?;

    Ok(HttpResponse::Ok().json(feedback))
}
