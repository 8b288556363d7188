/// gRPC surface tests for `auth.AuthService`
///
/// Covers the wire-level outcome policy:
/// - business failures come back success-shaped with `base.is_error`
/// - authentication failures are `Unauthenticated`
/// - unknown accounts are indistinguishable from wrong passwords
///
/// The last test runs the real tonic server over a loopback socket.
use std::net::SocketAddr;
use std::sync::Arc;

use auth_service::{
    db::InMemoryCredentialStore,
    grpc::{
        proto::auth_service_client::AuthServiceClient, AuthService, AuthServiceImpl,
        LoginRequest, LogoutRequest, RegisterRequest,
    },
    middleware::SessionInterceptor,
    security::{JwtManager, PasswordHasher, RevocationCache},
    SessionService,
};
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{transport::Server, Code, Request};

const TEST_SECRET: &[u8] = b"grpc-surface-test-secret-with-enough-bytes";

fn sessions() -> SessionService {
    SessionService::new(
        Arc::new(InMemoryCredentialStore::new()),
        PasswordHasher::with_params(1024, 1, 1).expect("valid test params"),
        Arc::new(JwtManager::from_secret(TEST_SECRET).expect("valid secret")),
        Arc::new(RevocationCache::new()),
    )
}

fn register_request(email: &str, password: &str, confirmation: &str) -> Request<RegisterRequest> {
    Request::new(RegisterRequest {
        email: email.to_string(),
        password: password.to_string(),
        password_confirmation: confirmation.to_string(),
        full_name: "Alice".to_string(),
    })
}

fn login_request(email: &str, password: &str) -> Request<LoginRequest> {
    Request::new(LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    })
}

fn logout_request(authorization: Option<&str>) -> Request<LogoutRequest> {
    let mut request = Request::new(LogoutRequest {});
    if let Some(value) = authorization {
        request
            .metadata_mut()
            .insert("authorization", value.parse().expect("ascii metadata"));
    }
    request
}

#[tokio::test]
async fn test_register_success_and_conflict() {
    let service = AuthServiceImpl::new(sessions());

    let ok = service
        .register(register_request("a@x.com", "pw1", "pw1"))
        .await
        .expect("register rpc")
        .into_inner();
    let base = ok.base.expect("base present");
    assert!(!base.is_error);
    assert_eq!(base.status_code, 200);

    let conflict = service
        .register(register_request("a@x.com", "pw1", "pw1"))
        .await
        .expect("conflict is success-shaped")
        .into_inner();
    let base = conflict.base.expect("base present");
    assert!(base.is_error);
    assert_eq!(base.status_code, 409);
    assert_eq!(base.status, "conflict");
}

#[tokio::test]
async fn test_register_confirmation_mismatch_is_validation_error() {
    let service = AuthServiceImpl::new(sessions());

    let response = service
        .register(register_request("a@x.com", "pw1", "pw2"))
        .await
        .expect("validation failure is success-shaped")
        .into_inner();

    let base = response.base.expect("base present");
    assert!(base.is_error);
    assert_eq!(base.status_code, 400);
    assert_eq!(base.status, "validation_error");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let service = AuthServiceImpl::new(sessions());
    service
        .register(register_request("a@x.com", "pw1", "pw1"))
        .await
        .expect("register rpc");

    let wrong_password = service
        .login(login_request("a@x.com", "wrong"))
        .await
        .expect_err("wrong password must fail");
    let unknown_account = service
        .login(login_request("nobody@x.com", "pw1"))
        .await
        .expect_err("unknown account must fail");

    assert_eq!(wrong_password.code(), Code::Unauthenticated);
    assert_eq!(unknown_account.code(), Code::Unauthenticated);
    assert_eq!(wrong_password.message(), unknown_account.message());
}

#[tokio::test]
async fn test_login_then_logout() {
    let service = AuthServiceImpl::new(sessions());
    service
        .register(register_request("a@x.com", "pw1", "pw1"))
        .await
        .expect("register rpc");

    let login = service
        .login(login_request("a@x.com", "pw1"))
        .await
        .expect("login rpc")
        .into_inner();
    assert!(!login.access_token.is_empty());
    assert!(!login.base.expect("base present").is_error);

    let header = format!("Bearer {}", login.access_token);
    let logout = service
        .logout(logout_request(Some(&header)))
        .await
        .expect("logout rpc")
        .into_inner();
    assert!(!logout.base.expect("base present").is_error);

    // Idempotent
    service
        .logout(logout_request(Some(&header)))
        .await
        .expect("second logout rpc");
}

#[tokio::test]
async fn test_logout_without_valid_bearer_is_unauthenticated() {
    let service = AuthServiceImpl::new(sessions());

    for header in [None, Some("Bearer"), Some("Basic abc"), Some("Bearer not.a.jwt")] {
        let status = service
            .logout(logout_request(header))
            .await
            .expect_err("logout must fail");
        assert_eq!(status.code(), Code::Unauthenticated, "{header:?}");
    }
}

#[tokio::test]
async fn test_over_the_wire_flow_with_protected_service() {
    let sessions = sessions();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind gRPC port");
    let addr: SocketAddr = listener.local_addr().expect("local addr");
    let incoming = TcpListenerStream::new(listener);

    let (mut health, health_service) = tonic_health::server::health_reporter();
    health
        .set_serving::<auth_service::grpc::AuthServiceServer<AuthServiceImpl>>()
        .await;

    let server_sessions = sessions.clone();
    tokio::spawn(async move {
        Server::builder()
            .add_service(health_service)
            .add_service(AuthServiceImpl::new(server_sessions).into_server())
            .serve_with_incoming(incoming)
            .await
            .expect("serve auth-service");
    });

    let mut client = AuthServiceClient::connect(format!("http://{addr}"))
        .await
        .expect("connect client");

    client
        .register(RegisterRequest {
            email: "wire@x.com".to_string(),
            password: "pw1".to_string(),
            password_confirmation: "pw1".to_string(),
            full_name: "Wire".to_string(),
        })
        .await
        .expect("register over the wire");

    let token = client
        .login(LoginRequest {
            email: "wire@x.com".to_string(),
            password: "pw1".to_string(),
        })
        .await
        .expect("login over the wire")
        .into_inner()
        .access_token;
    let header = format!("Bearer {token}");

    // A downstream service guarded by the session interceptor accepts the token...
    let mut interceptor = SessionInterceptor::new(sessions.clone());
    let mut protected = Request::new(());
    protected
        .metadata_mut()
        .insert("authorization", header.parse().expect("ascii metadata"));
    assert!(tonic::service::Interceptor::call(&mut interceptor, protected).is_ok());

    client
        .logout(logout_request(Some(&header)))
        .await
        .expect("logout over the wire");

    // ...and rejects it once the session is revoked.
    let mut protected = Request::new(());
    protected
        .metadata_mut()
        .insert("authorization", header.parse().expect("ascii metadata"));
    let status = tonic::service::Interceptor::call(&mut interceptor, protected)
        .expect_err("revoked token must be rejected");
    assert_eq!(status.code(), Code::Unauthenticated);

    let status = client
        .logout(logout_request(None))
        .await
        .expect_err("logout without credentials");
    assert_eq!(status.code(), Code::Unauthenticated);
}
