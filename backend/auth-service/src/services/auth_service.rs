use chrono::Utc;
use crypto_core::hash::token_fingerprint;
use crypto_core::jwt::{Claims, IssuedToken, JwtManager, Principal};
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::CredentialStore;
use crate::error::{AuthError, Result};
use crate::models::User;
use crate::security::{PasswordHasher, RevocationCache};

const BEARER_SCHEME: &str = "Bearer";

/// Register / Login / Logout orchestration.
///
/// Every collaborator is injected; the service holds no global state.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    jwt: Arc<JwtManager>,
    revocations: Arc<RevocationCache>,
}

impl SessionService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        jwt: Arc<JwtManager>,
        revocations: Arc<RevocationCache>,
    ) -> Self {
        Self {
            store,
            hasher,
            jwt,
            revocations,
        }
    }

    pub fn revocations(&self) -> &Arc<RevocationCache> {
        &self.revocations
    }

    /// Create a customer account.
    ///
    /// The store is not consulted unless `secret` matches `confirmation`.
    pub async fn register(
        &self,
        identifier: &str,
        secret: &str,
        confirmation: &str,
        display_name: &str,
    ) -> Result<()> {
        if secret != confirmation {
            return Err(AuthError::Validation(
                "password and confirmation do not match".to_string(),
            ));
        }

        if self.store.find_by_identifier(identifier).await?.is_some() {
            info!(event = "register_conflict", email = %identifier, "Email already registered");
            return Err(AuthError::Conflict(format!(
                "email {identifier} is already registered"
            )));
        }

        let password_hash = self.hash_blocking(secret).await?;
        let user = User::new_customer(identifier, display_name, password_hash);

        // Sole commit point; the store enforces uniqueness again here.
        self.store.insert(&user).await?;

        info!(event = "user_registered", user_id = %user.id, email = %user.email, "User registered");
        Ok(())
    }

    /// Check credentials and issue an access token.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<IssuedToken> {
        let user = self
            .store
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(|| AuthError::NotFound(format!("no account for {identifier}")))?;

        if !self.verify_blocking(&user.password_hash, secret).await? {
            warn!(event = "login_failed", user_id = %user.id, "Password mismatch");
            return Err(AuthError::Unauthorized("invalid credentials".to_string()));
        }

        let issued = self.jwt.issue(&Principal {
            subject: user.id.to_string(),
            email: user.email.clone(),
            name: user.full_name.clone(),
            role: user.role_code.clone(),
        })?;

        info!(
            event = "user_logged_in",
            user_id = %user.id,
            token = %token_fingerprint(&issued.token),
            "Access token issued"
        );
        Ok(issued)
    }

    /// Revoke the presented bearer token for the rest of its lifetime.
    ///
    /// Logging out an already revoked token succeeds.
    pub async fn logout(&self, authorization: Option<&str>) -> Result<()> {
        let token = parse_bearer(authorization)?;
        let claims = self.jwt.verify(token)?;

        let remaining = claims.remaining_lifetime(Utc::now());
        self.revocations.revoke(token, remaining);

        info!(event = "user_logged_out", user_id = %claims.sub, "Session revoked");
        Ok(())
    }

    /// Verification path for authenticated calls: parse, verify, then check
    /// the revocation set.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Claims> {
        let token = parse_bearer(authorization)?;
        let claims = self.jwt.verify(token)?;

        if self.revocations.is_revoked(token) {
            return Err(AuthError::TokenRevoked);
        }

        Ok(claims)
    }

    async fn hash_blocking(&self, secret: &str) -> Result<String> {
        let hasher = self.hasher.clone();
        let secret = secret.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(|e| AuthError::Internal(format!("hashing task failed: {e}")))?
    }

    async fn verify_blocking(&self, hashed: &str, candidate: &str) -> Result<bool> {
        let hasher = self.hasher.clone();
        let hashed = hashed.to_string();
        let candidate = candidate.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&hashed, &candidate))
            .await
            .map_err(|e| AuthError::Internal(format!("verification task failed: {e}")))?
    }
}

/// Extract the token from an `authorization` value of the exact form
/// `Bearer <token>`.
pub fn parse_bearer(authorization: Option<&str>) -> Result<&str> {
    let header = authorization
        .ok_or_else(|| AuthError::Unauthorized("missing authorization header".to_string()))?;

    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::Unauthorized(
            "invalid authorization header format".to_string(),
        )),
    }
}
