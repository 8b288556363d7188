use crypto_core::JwtError;
use thiserror::Error;
use tonic::{Code, Status};

pub type Result<T> = std::result::Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Stored password hash is malformed")]
    MalformedHash,

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Credential store unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Business outcomes reported inside a success-shaped response.
    pub fn is_business(&self) -> bool {
        matches!(
            self,
            AuthError::Validation(_) | AuthError::Conflict(_) | AuthError::NotFound(_)
        )
    }

    /// Outcomes that must reach the client as `Unauthenticated`.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            AuthError::Unauthorized(_)
                | AuthError::InvalidToken(_)
                | AuthError::TokenExpired
                | AuthError::TokenRevoked
        )
    }

    /// HTTP-style code carried in `BaseResponse.status_code`
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 400,
            AuthError::Conflict(_) => 409,
            AuthError::NotFound(_) => 404,
            e if e.is_unauthorized() => 401,
            AuthError::Unavailable(_) => 503,
            _ => 500,
        }
    }

    /// Short machine-readable label carried in `BaseResponse.status`
    pub fn status_label(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "validation_error",
            AuthError::Conflict(_) => "conflict",
            AuthError::NotFound(_) => "not_found",
            e if e.is_unauthorized() => "unauthorized",
            AuthError::Unavailable(_) => "unavailable",
            _ => "internal_error",
        }
    }

    /// Convert to gRPC Status for wire protocol
    pub fn to_status(&self) -> Status {
        match self {
            AuthError::Validation(msg) => Status::new(Code::InvalidArgument, msg.clone()),
            AuthError::Conflict(msg) => Status::new(Code::AlreadyExists, msg.clone()),
            AuthError::NotFound(msg) => Status::new(Code::NotFound, msg.clone()),
            AuthError::Unauthorized(msg) => Status::new(Code::Unauthenticated, msg.clone()),
            AuthError::InvalidToken(_) => Status::new(Code::Unauthenticated, "invalid token"),
            AuthError::TokenExpired => Status::new(Code::Unauthenticated, "token expired"),
            AuthError::TokenRevoked => Status::new(Code::Unauthenticated, "token revoked"),
            AuthError::Unavailable(_) => Status::new(Code::Unavailable, "service unavailable"),
            AuthError::Hashing(_)
            | AuthError::MalformedHash
            | AuthError::Signing(_)
            | AuthError::Internal(_) => {
                // Don't leak internal details
                Status::new(Code::Internal, "internal server error")
            }
        }
    }
}

impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        err.to_status()
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenExpired => AuthError::TokenExpired,
            JwtError::InvalidToken(msg) => AuthError::InvalidToken(msg),
            JwtError::MissingSecret | JwtError::Signing(_) => AuthError::Signing(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Unavailable(err.to_string())
    }
}
