use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};

use crate::database::{self, DocumentStore, FEEDBACK};
use crate::models::{CreateFeedbackRequest, Customer, Feedback, FeedbackResponse};
use crate::services::lead_service;
use crate::utils::AppError;

pub const LIST_LIMIT: i64 = 200;

pub async fn submit_feedback(
    store: &dyn DocumentStore,
    customer: &Customer,
    request: CreateFeedbackRequest,
) -> Result<ObjectId, AppError> {
    let lead = lead_service::find_owned_lead(store, customer, &request.lead_id)
        .await?
        .ok_or(AppError::NotFound("Lead"))?;

    let feedback = Feedback {
        id: None,
        lead_id: lead.id.map(|id| id.to_hex()).unwrap_or(request.lead_id),
        customer_id: customer.id_hex(),
        rating: request.rating,
        disposition: request.disposition.unwrap_or_default(),
        comment: request.comment,
        submitted_at: Some(BsonDateTime::now()),
    };

    Ok(database::insert_record(store, FEEDBACK, &feedback).await?)
}

/// Feedback the caller left on one of their own leads, at most [`LIST_LIMIT`].
pub async fn list_feedback(
    store: &dyn DocumentStore,
    customer: &Customer,
    lead_id: &str,
) -> Result<Vec<FeedbackResponse>, AppError> {
    let lead = lead_service::find_owned_lead(store, customer, lead_id)
        .await?
        .ok_or(AppError::NotFound("Lead"))?;

    let lead_id = lead.id.map(|id| id.to_hex()).unwrap_or_else(|| lead_id.to_string());
    let feedback: Vec<Feedback> = database::find_records(
        store,
        FEEDBACK,
        doc! { "lead_id": lead_id, "customer_id": customer.id_hex() },
        LIST_LIMIT,
    )
    .await?;

    Ok(feedback.into_iter().map(FeedbackResponse::from).collect())
}
