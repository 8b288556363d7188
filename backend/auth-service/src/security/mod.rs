/// Security module for authentication
/// Provides password hashing and token revocation

// Re-export JWT module from shared crypto-core library
pub use crypto_core::jwt;
pub use crypto_core::jwt::{Claims, JwtManager, Principal};

pub mod password;
pub mod token_revocation;

pub use password::PasswordHasher;
pub use token_revocation::RevocationCache;
