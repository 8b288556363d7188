use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Role assigned to every self-registered account
pub const ROLE_CUSTOMER: &str = "customer";

/// Credential record - one per registered email
///
/// `password_hash` is an Argon2id PHC string, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role_code: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

impl User {
    /// Build a new customer record with a fresh id.
    pub fn new_customer(email: &str, full_name: &str, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            password_hash,
            role_code: ROLE_CUSTOMER.to_string(),
            created_at: Utc::now(),
            created_by: Some(full_name.to_string()),
        }
    }
}
