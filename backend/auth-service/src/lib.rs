// Auth Service Library
//
// Session core: credential hashing, HS256 access tokens, logout revocation,
// and the gRPC surface that exposes Register / Login / Logout.

pub mod config;
pub mod db;
pub mod error;
pub mod grpc;
pub mod middleware;
pub mod models;
pub mod security;
pub mod services;

pub use error::{AuthError, Result};

// Re-export commonly used types
pub use models::User;
pub use services::SessionService;
