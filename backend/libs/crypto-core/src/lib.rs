//! Shared cryptographic primitives for the session core.
//!
//! - `jwt`: HS256 access token issuance and verification
//! - `hash`: SHA-256 helpers (token fingerprints for logs)

pub mod hash;
pub mod jwt;

pub use jwt::{Claims, IssuedToken, JwtError, JwtManager, Principal};
