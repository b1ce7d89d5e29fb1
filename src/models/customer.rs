use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Documento na collection "customer". Criado fora deste serviço (seed/signup).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Customer {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default = "default_name")]
    pub name: String,
    pub email: String,
    /// bcrypt hash, or a legacy plaintext credential. Empty never verifies.
    #[serde(default)]
    pub password_hash: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Customer {
    /// Hex identifier used as the owner key on leads and feedback.
    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }
}

/// Public view returned by `GET /auth/me`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CustomerProfile {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub is_active: bool,
}

impl From<&Customer> for CustomerProfile {
    fn from(customer: &Customer) -> Self {
        CustomerProfile {
            customer_id: customer.id_hex(),
            name: customer.name.clone(),
            email: customer.email.clone(),
            is_active: customer.is_active,
        }
    }
}

fn default_name() -> String {
    "User".to_string()
}

fn default_true() -> bool {
    true
}
