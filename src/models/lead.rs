use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Estágio do lead no funil. Definido na criação; nenhum endpoint o altera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Unqualified,
    FollowUp,
}

/// Lead gerado para um customer (collection "lead")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Owner customer id as hex string
    pub customer_id: String,

    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Acquisition source
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request para criar lead
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateLeadRequest {
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
}

/// Lead como devolvido ao cliente: `_id` em hex
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LeadResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub customer_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub status: LeadStatus,
    pub notes: Option<String>,
}

impl From<Lead> for LeadResponse {
    fn from(lead: Lead) -> Self {
        LeadResponse {
            id: lead.id.map(|id| id.to_hex()).unwrap_or_default(),
            customer_id: lead.customer_id,
            name: lead.name,
            email: lead.email,
            phone: lead.phone,
            source: lead.source,
            status: lead.status,
            notes: lead.notes,
        }
    }
}
