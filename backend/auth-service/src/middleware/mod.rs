//! gRPC middleware
//!
//! - `failure_classifier`: panic containment and error-to-status policy for
//!   every RPC
//! - `session_interceptor`: bearer-token authentication for services mounted
//!   next to the auth service

pub mod failure_classifier;
pub mod session_interceptor;

pub use failure_classifier::{guard, install_panic_hook};
pub use session_interceptor::{authorization_header, SessionInterceptor};
