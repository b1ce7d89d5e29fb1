use std::collections::HashSet;

use bcrypt::verify;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{AppState, JwtSettings, TokenMode};
use crate::database::{self, StoreError, ADMINS, CUSTOMERS};
use crate::models::{Admin, Customer, ADMIN_ROLE};
use crate::utils::AppError;

const CUSTOMER_ROLE: &str = "customer";

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,           // record id (hex)
    pub role: String,          // "customer" | "admin"
    pub iat: usize,            // issued at
    pub exp: usize,            // expiration
    pub jti: String,           // JWT ID
    pub iss: String,           // issuer
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub customer_id: String,
    pub name: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AdminLoginResponse {
    pub token: String,
    pub admin_id: String,
    pub username: String,
    pub role: String,
}

/// Checks `candidate` against a stored credential.
///
/// bcrypt hashes are verified as such; anything else is a legacy plaintext
/// credential and must match verbatim. An empty stored value matches nothing.
pub fn verify_password(candidate: &str, stored: &str) -> bool {
    if stored.is_empty() {
        false
    } else if is_bcrypt_hash(stored) {
        verify(candidate, stored).unwrap_or(false)
    } else {
        candidate == stored
    }
}

fn is_bcrypt_hash(value: &str) -> bool {
    ["$2a$", "$2b$", "$2x$", "$2y$"]
        .iter()
        .any(|prefix| value.starts_with(prefix))
}

// Generate JWT token
pub fn generate_jwt(settings: &JwtSettings, subject: &str, role: &str) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = Duration::try_hours(settings.expiration_hours)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or(AppError::TokenLifetime(settings.expiration_hours))?;
    let claims = Claims {
        sub: subject.to_string(),
        role: role.to_string(),
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
        iss: settings.issuer.clone(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_ref()),
    )?)
}

// Verify JWT token
pub fn verify_jwt(settings: &JwtSettings, token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);

    let mut issuers = HashSet::new();
    issuers.insert(settings.issuer.clone());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        log::debug!("JWT rejected: {}", e);
        AppError::InvalidToken
    })
}

fn issue_token(mode: &TokenMode, id: &ObjectId, role: &str) -> Result<String, AppError> {
    match mode {
        TokenMode::RecordId => Ok(id.to_hex()),
        TokenMode::Signed(settings) => generate_jwt(settings, &id.to_hex(), role),
    }
}

/// Turns a bearer token into the identifier of the record it names.
fn token_subject(mode: &TokenMode, token: &str, role: &str) -> Result<ObjectId, AppError> {
    let subject = match mode {
        TokenMode::RecordId => token.to_string(),
        TokenMode::Signed(settings) => {
            let claims = verify_jwt(settings, token)?;
            if claims.role != role {
                return Err(AppError::InvalidToken);
            }
            claims.sub
        }
    };

    ObjectId::parse_str(subject.trim()).map_err(|_| AppError::InvalidToken)
}

/// Strips an optional `Bearer ` prefix; a bare value is taken as the token itself.
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, AppError> {
    let header = authorization
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or(AppError::MissingToken)?;
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    if token.is_empty() {
        return Err(AppError::MissingToken);
    }
    Ok(token)
}

/// A stored account that cannot be decoded authenticates nobody; other store
/// failures stay server errors.
fn reject_malformed(error: StoreError, collection: &str, rejection: AppError) -> AppError {
    match error {
        StoreError::Decode(e) => {
            log::warn!("⚠️  Malformed {} record: {}", collection, e);
            rejection
        }
        other => other.into(),
    }
}

// Customer login
pub async fn login(state: &AppState, request: &LoginRequest) -> Result<LoginResponse, AppError> {
    let store = state.store()?;

    let customer: Customer = database::find_record(store, CUSTOMERS, doc! { "email": &request.email })
        .await
        .map_err(|e| reject_malformed(e, CUSTOMERS, AppError::InvalidCredentials))?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&request.password, &customer.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let id = customer.id.ok_or(AppError::InvalidCredentials)?;
    let token = issue_token(&state.token_mode, &id, CUSTOMER_ROLE)?;

    Ok(LoginResponse {
        token,
        customer_id: id.to_hex(),
        name: customer.name,
    })
}

pub async fn resolve_customer(state: &AppState, authorization: Option<&str>) -> Result<Customer, AppError> {
    let store = state.store()?;
    let token = bearer_token(authorization)?;
    let id = token_subject(&state.token_mode, token, CUSTOMER_ROLE)?;

    database::find_record(store, CUSTOMERS, doc! { "_id": id })
        .await
        .map_err(|e| reject_malformed(e, CUSTOMERS, AppError::InvalidToken))?
        .ok_or(AppError::InvalidToken)
}

// Admin login
pub async fn admin_login(state: &AppState, request: &AdminLoginRequest) -> Result<AdminLoginResponse, AppError> {
    let store = state.store()?;

    let admin: Admin = database::find_record(store, ADMINS, doc! { "username": &request.username })
        .await
        .map_err(|e| reject_malformed(e, ADMINS, AppError::InvalidCredentials))?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&request.password, &admin.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let id = admin.id.ok_or(AppError::InvalidCredentials)?;
    let token = issue_token(&state.token_mode, &id, ADMIN_ROLE)?;

    Ok(AdminLoginResponse {
        token,
        admin_id: id.to_hex(),
        username: admin.username,
        role: ADMIN_ROLE.to_string(),
    })
}

pub async fn resolve_admin(state: &AppState, authorization: Option<&str>) -> Result<Admin, AppError> {
    let store = state.store()?;
    let token = bearer_token(authorization)?;
    let id = token_subject(&state.token_mode, token, ADMIN_ROLE)?;

    database::find_record(store, ADMINS, doc! { "_id": id })
        .await
        .map_err(|e| reject_malformed(e, ADMINS, AppError::InvalidToken))?
        .ok_or(AppError::InvalidToken)
}
