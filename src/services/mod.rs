pub mod auth_service;
pub mod feedback_service;
pub mod lead_service;
