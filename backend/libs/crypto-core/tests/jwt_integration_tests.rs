/// Integration tests for crypto-core JWT functionality
///
/// This test module covers:
/// - Token issuance and verification through the public API
/// - Expiry handling against backdated issue times
/// - Rejection of malformed, tampered, and foreign tokens
use chrono::{Duration, Utc};
use crypto_core::jwt::{JwtError, JwtManager, Principal, TOKEN_VALIDITY_HOURS};
use uuid::Uuid;

// FOR TESTING ONLY
const TEST_SECRET: &str = "integration-test-secret-with-enough-entropy";

fn manager() -> JwtManager {
    JwtManager::from_secret(TEST_SECRET.as_bytes()).expect("Failed to build JWT manager")
}

fn principal(user_id: Uuid, email: &str, name: &str) -> Principal {
    Principal {
        subject: user_id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        role: "customer".to_string(),
    }
}

// ============================================================================
// Token Issuance Tests
// ============================================================================

#[test]
fn test_issue_access_token_success() {
    let user_id = Uuid::new_v4();
    let result = manager().issue(&principal(user_id, "test@example.com", "Test User"));

    assert!(result.is_ok(), "Should issue access token successfully");
    let issued = result.unwrap();
    assert!(!issued.token.is_empty(), "Token should not be empty");
    assert_eq!(
        issued.token.matches('.').count(),
        2,
        "JWT should have 3 parts separated by dots"
    );
}

#[test]
fn test_two_issuers_sharing_a_secret_accept_each_other() {
    let user_id = Uuid::new_v4();
    let issued = manager()
        .issue(&principal(user_id, "test@example.com", "Test User"))
        .expect("Failed to issue token");

    let claims = manager()
        .verify(&issued.token)
        .expect("A second manager with the same secret should verify");
    assert_eq!(claims.sub, user_id.to_string());
}

// ============================================================================
// Token Validation Tests
// ============================================================================

#[test]
fn test_extract_claims_from_valid_token() {
    let user_id = Uuid::new_v4();
    let email = "user@example.com";
    let name = "John Doe";

    let issued = manager()
        .issue(&principal(user_id, email, name))
        .expect("Failed to issue token");
    let claims = manager().verify(&issued.token).expect("Failed to verify token");

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.email, email);
    assert_eq!(claims.name, name);
    assert_eq!(claims.role, "customer");
    assert!(claims.exp > Utc::now().timestamp());
}

#[test]
fn test_validate_malformed_token() {
    let malformed_tokens = vec!["invalid", "two.parts", "", "...", "invalid!@#$.token"];

    for malformed in malformed_tokens {
        let result = manager().verify(malformed);
        assert!(
            matches!(result, Err(JwtError::InvalidToken(_))),
            "Should reject malformed token: {}",
            malformed
        );
    }
}

#[test]
fn test_validate_tampered_signature() {
    let issued = manager()
        .issue(&principal(Uuid::new_v4(), "test@example.com", "Test User"))
        .expect("Failed to issue token");

    let (unsigned, signature) = issued
        .token
        .rsplit_once('.')
        .expect("token has a signature segment");
    let flipped: String = signature
        .chars()
        .rev()
        .collect();
    let tampered = format!("{unsigned}.{flipped}");

    assert!(
        matches!(manager().verify(&tampered), Err(JwtError::InvalidToken(_))),
        "Should reject tampered token"
    );
}

// ============================================================================
// Token Expiration Tests
// ============================================================================

#[test]
fn test_token_valid_just_inside_window() {
    let issued_at = Utc::now() - Duration::hours(TOKEN_VALIDITY_HOURS) + Duration::minutes(5);
    let issued = manager()
        .issue_at(&principal(Uuid::new_v4(), "test@example.com", "Test User"), issued_at)
        .expect("Failed to issue token");

    assert!(manager().verify(&issued.token).is_ok());
}

#[test]
fn test_token_expired_just_outside_window() {
    let issued_at = Utc::now() - Duration::hours(TOKEN_VALIDITY_HOURS) - Duration::minutes(5);
    let issued = manager()
        .issue_at(&principal(Uuid::new_v4(), "test@example.com", "Test User"), issued_at)
        .expect("Failed to issue token");

    assert!(matches!(
        manager().verify(&issued.token),
        Err(JwtError::TokenExpired)
    ));
}

// ============================================================================
// Integration Tests
// ============================================================================

#[test]
fn test_complete_token_lifecycle() {
    let user_id = Uuid::new_v4();
    let manager = manager();

    // 1. Issue
    let issued = manager
        .issue(&principal(user_id, "integration@example.com", "Integration User"))
        .expect("Failed to issue token");

    // 2. Verify
    let claims = manager.verify(&issued.token).expect("Failed to verify token");
    assert_eq!(claims, issued.claims);

    // 3. Remaining lifetime is within the fixed window
    let remaining = claims.remaining_lifetime(Utc::now());
    assert!(remaining > Duration::zero());
    assert!(remaining <= Duration::hours(TOKEN_VALIDITY_HOURS));

    // 4. Expiry timestamp is representable
    let expires_at = claims.expires_at().expect("exp is a valid timestamp");
    assert!(expires_at > Utc::now());
}
