use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub const ADMIN_ROLE: &str = "admin";
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Documento na collection "admin"
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Admin {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    #[serde(default)]
    pub password_hash: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Admin {
    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AdminProfile {
    pub admin_id: String,
    pub username: String,
    pub role: String,
    pub is_active: bool,
}

impl From<&Admin> for AdminProfile {
    fn from(admin: &Admin) -> Self {
        AdminProfile {
            admin_id: admin.id_hex(),
            username: admin.username.clone(),
            role: ADMIN_ROLE.to_string(),
            is_active: admin.is_active,
        }
    }
}

fn default_role() -> String {
    ADMIN_ROLE.to_string()
}

fn default_true() -> bool {
    true
}
