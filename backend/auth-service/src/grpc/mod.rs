/// gRPC service implementation for Auth Service
/// Every RPC runs inside the failure classifier (`middleware::guard`).
use tonic::{Request, Response, Status};
use tracing::warn;

use crate::error::AuthError;
use crate::middleware::{authorization_header, guard};
use crate::services::SessionService;

pub mod proto {
    tonic::include_proto!("auth");
}

pub use proto::auth_service_server::{AuthService, AuthServiceServer};
pub use proto::{
    BaseResponse, LoginRequest, LoginResponse, LogoutRequest, LogoutResponse, RegisterRequest,
    RegisterResponse,
};

/// gRPC AuthService implementation backed by [`SessionService`]
#[derive(Clone)]
pub struct AuthServiceImpl {
    sessions: SessionService,
}

impl AuthServiceImpl {
    pub fn new(sessions: SessionService) -> Self {
        Self { sessions }
    }

    pub fn into_server(self) -> AuthServiceServer<Self> {
        AuthServiceServer::new(self)
    }

    async fn handle_register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, AuthError> {
        let req = request.into_inner();

        let outcome = self
            .sessions
            .register(
                &req.email,
                &req.password,
                &req.password_confirmation,
                &req.full_name,
            )
            .await;

        let base = match outcome {
            Ok(()) => ok_base("registration successful"),
            Err(e) if e.is_business() => error_base(&e),
            Err(e) => return Err(e),
        };

        Ok(Response::new(RegisterResponse { base: Some(base) }))
    }

    async fn handle_login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, AuthError> {
        let req = request.into_inner();

        match self.sessions.login(&req.email, &req.password).await {
            Ok(issued) => Ok(Response::new(LoginResponse {
                base: Some(ok_base("login successful")),
                access_token: issued.token,
            })),
            // Unknown accounts look exactly like a wrong password.
            Err(AuthError::NotFound(detail)) => {
                warn!(event = "login_unknown_account", detail = %detail);
                Err(AuthError::Unauthorized("invalid credentials".to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn handle_logout(
        &self,
        request: Request<LogoutRequest>,
    ) -> Result<Response<LogoutResponse>, Status> {
        let header = authorization_header(request.metadata())?;
        self.sessions.logout(header).await?;

        Ok(Response::new(LogoutResponse {
            base: Some(ok_base("logout successful")),
        }))
    }
}

#[inline]
fn ok_base(message: impl Into<String>) -> BaseResponse {
    BaseResponse {
        status_code: 200,
        status: "ok".to_string(),
        message: message.into(),
        is_error: false,
    }
}

#[inline]
fn error_base(err: &AuthError) -> BaseResponse {
    BaseResponse {
        status_code: i32::from(err.status_code()),
        status: err.status_label().to_string(),
        message: err.to_string(),
        is_error: true,
    }
}

#[tonic::async_trait]
impl AuthService for AuthServiceImpl {
    /// Create a customer account. Business failures come back in `base`.
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, Status> {
        guard("Register", self.handle_register(request)).await
    }

    /// Exchange credentials for an access token.
    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        guard("Login", self.handle_login(request)).await
    }

    /// Revoke the bearer token in the `authorization` metadata.
    async fn logout(
        &self,
        request: Request<LogoutRequest>,
    ) -> Result<Response<LogoutResponse>, Status> {
        guard("Logout", self.handle_logout(request)).await
    }
}
