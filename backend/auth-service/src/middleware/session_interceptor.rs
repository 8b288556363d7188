use tonic::metadata::MetadataMap;
use tonic::service::Interceptor;
use tonic::{Request, Status};
use tracing::{debug, warn};

use crate::services::SessionService;

pub const AUTHORIZATION: &str = "authorization";

/// Read the `authorization` metadata entry, if present.
pub fn authorization_header(metadata: &MetadataMap) -> Result<Option<&str>, Status> {
    match metadata.get(AUTHORIZATION) {
        None => Ok(None),
        Some(value) => value.to_str().map(Some).map_err(|e| {
            warn!("Invalid authorization header encoding: {}", e);
            Status::unauthenticated("invalid authorization header")
        }),
    }
}

/// Authenticates requests for services that sit behind the session core.
///
/// Verified [`crypto_core::Claims`] are stored in the request extensions.
/// Missing, invalid, expired, and revoked tokens all fail with
/// `Status::unauthenticated`.
#[derive(Clone)]
pub struct SessionInterceptor {
    sessions: SessionService,
}

impl SessionInterceptor {
    pub fn new(sessions: SessionService) -> Self {
        Self { sessions }
    }
}

impl Interceptor for SessionInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let header = authorization_header(request.metadata())?;

        let claims = self.sessions.authenticate(header).map_err(|e| {
            warn!(error = %e, "Request authentication failed");
            if e.is_unauthorized() {
                e.to_status()
            } else {
                Status::unauthenticated("authentication failed")
            }
        })?;

        debug!(user_id = %claims.sub, "Request authenticated");
        request.extensions_mut().insert(claims);
        Ok(request)
    }
}
