use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Resultado do contato com o lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Qualified,
    Unqualified,
    #[default]
    FollowUp,
    WrongNumber,
    NoResponse,
}

/// Feedback dado pelo customer sobre um lead (collection "feedback")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub lead_id: String,
    /// Denormalized owner of the lead
    pub customer_id: String,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub disposition: Disposition,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<BsonDateTime>,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateFeedbackRequest {
    pub lead_id: String,
    /// Qualification rating 1-5
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: Option<i32>,
    pub disposition: Option<Disposition>,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FeedbackResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub lead_id: String,
    pub customer_id: String,
    pub rating: Option<i32>,
    pub disposition: Disposition,
    pub comment: Option<String>,
    /// RFC 3339
    pub submitted_at: Option<String>,
}

impl From<Feedback> for FeedbackResponse {
    fn from(feedback: Feedback) -> Self {
        FeedbackResponse {
            id: feedback.id.map(|id| id.to_hex()).unwrap_or_default(),
            lead_id: feedback.lead_id,
            customer_id: feedback.customer_id,
            rating: feedback.rating,
            disposition: feedback.disposition,
            comment: feedback.comment,
            submitted_at: feedback
                .submitted_at
                .and_then(|at| at.try_to_rfc3339_string().ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_must_be_between_one_and_five() {
        let mut request = CreateFeedbackRequest {
            lead_id: ObjectId::new().to_hex(),
            rating: Some(6),
            disposition: None,
            comment: None,
        };
        assert!(request.validate().is_err());

        request.rating = Some(0);
        assert!(request.validate().is_err());

        request.rating = Some(5);
        assert!(request.validate().is_ok());

        request.rating = None;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn unknown_disposition_is_rejected() {
        let body = r#"{"lead_id": "x", "disposition": "maybe"}"#;
        assert!(serde_json::from_str::<CreateFeedbackRequest>(body).is_err());

        let body = r#"{"lead_id": "x", "disposition": "wrong_number"}"#;
        let request: CreateFeedbackRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.disposition, Some(Disposition::WrongNumber));
    }

    #[test]
    fn response_renders_timestamp_as_rfc3339() {
        let feedback = Feedback {
            id: Some(ObjectId::new()),
            lead_id: "l".into(),
            customer_id: "c".into(),
            rating: Some(4),
            disposition: Disposition::default(),
            comment: None,
            submitted_at: Some(BsonDateTime::from_millis(0)),
        };
        let response = FeedbackResponse::from(feedback);
        assert_eq!(response.submitted_at.as_deref(), Some("1970-01-01T00:00:00Z"));
        assert_eq!(response.disposition, Disposition::FollowUp);
    }
}
