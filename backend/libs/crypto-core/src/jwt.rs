//! Access token issuance and verification
//!
//! Tokens are compact JWS strings signed with HS256 using a shared secret that
//! the service loads from its environment at startup.
//!
//! ## Security Design
//!
//! - **HS256 ONLY**: verification rejects every other algorithm, including the
//!   other HMAC variants, so a token cannot be re-signed under a weaker or
//!   unexpected scheme
//! - **No hardcoded keys**: the secret is injected by the caller
//! - **Zero leeway**: a token is expired from the second named by its `exp`
//! - **Expired vs invalid**: a token whose signature verifies but whose `exp`
//!   is in the past fails with [`JwtError::TokenExpired`]; everything else is
//!   [`JwtError::InvalidToken`]
//!
//! ## Usage
//!
//! ```rust
//! use crypto_core::jwt::{JwtManager, Principal};
//!
//! let manager = JwtManager::from_secret(b"a-long-random-secret-loaded-from-env")
//!     .expect("secret is configured");
//!
//! let issued = manager
//!     .issue(&Principal {
//!         subject: "5f0c3a52-1f0b-4c1e-9a43-2f0d8f1b7e10".into(),
//!         email: "a@x.com".into(),
//!         name: "Alice".into(),
//!         role: "customer".into(),
//!     })
//!     .expect("token issued");
//!
//! let claims = manager.verify(&issued.token).expect("token verifies");
//! assert_eq!(claims, issued.claims);
//! ```
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Fixed validity window for every access token
pub const TOKEN_VALIDITY_HOURS: i64 = 24;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT signing secret is not configured")]
    MissingSecret,

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,
}

// ============================================================================
// Data Structures
// ============================================================================

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (credential record id)
    pub sub: String,
    /// Email address the credential was registered with
    pub email: String,
    /// Display name
    pub name: String,
    /// Role code, e.g. "customer"
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Time left before the token expires naturally. Zero or negative once
    /// expired. Measured from the exact instant, so it is positive for as long
    /// as [`JwtManager::verify`] accepts the token.
    pub fn remaining_lifetime(&self, now: DateTime<Utc>) -> Duration {
        match self.expires_at() {
            Some(expires_at) => expires_at - now,
            None => Duration::zero(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Identity facts a token is issued for. Timestamps are added by the issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

/// A freshly signed token together with the claims it carries
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

// ============================================================================
// Manager
// ============================================================================

/// Signs and verifies access tokens with one shared HMAC secret.
///
/// Constructed once at startup and shared (`Arc`) by everything that issues or
/// checks tokens.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
}

impl fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtManager")
            .field("algorithm", &JWT_ALGORITHM)
            .field("validity_secs", &self.validity.num_seconds())
            .finish_non_exhaustive()
    }
}

impl JwtManager {
    /// Build a manager from the raw shared secret.
    ///
    /// ## Errors
    ///
    /// [`JwtError::MissingSecret`] if the secret is empty.
    pub fn from_secret(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::MissingSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validity: Duration::hours(TOKEN_VALIDITY_HOURS),
        })
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Issue a token for `principal`, valid from now for the fixed window.
    pub fn issue(&self, principal: &Principal) -> Result<IssuedToken, JwtError> {
        self.issue_at(principal, Utc::now())
    }

    /// Issue a token as if it were signed at `issued_at`.
    pub fn issue_at(
        &self,
        principal: &Principal,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        let expiry = issued_at + self.validity;

        let claims = Claims {
            sub: principal.subject.clone(),
            email: principal.email.clone(),
            name: principal.name.clone(),
            role: principal.role.clone(),
            iat: issued_at.timestamp(),
            exp: expiry.timestamp(),
        };

        let token = encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, claims })
    }

    /// Validate and decode a token (without the "Bearer " prefix).
    ///
    /// ## Errors
    ///
    /// - [`JwtError::TokenExpired`]: signature verifies but `exp` has passed
    /// - [`JwtError::InvalidToken`]: malformed, unexpected algorithm, bad
    ///   signature, or missing required claims
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::InvalidToken(e.to_string()),
            })?;

        // jsonwebtoken only rejects `exp < now`; the token dies at `exp` itself.
        if claims.exp <= Utc::now().timestamp() {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims)
    }
}

// ============================================================================
// Tests
// ============================================================================
