use std::time::Duration;

use keygate::auth::token::{extract_bearer_token, unix_now, Claims, TokenIssuer};
use keygate::constants::BEARER_TOKEN_TYPE;
use keygate::error::KeygateError;

const SECRET: &str = "test-signing-secret-for-token-tests-0123456789";
const TTL: Duration = Duration::from_secs(3600);

/// Flip one byte of the token's signature segment
fn tamper_signature(token: &str) -> String {
    let dot = token.rfind('.').expect("JWT has a signature segment");
    let (head, signature) = token.split_at(dot + 1);
    let mut bytes = signature.as_bytes().to_vec();
    let last = bytes.last_mut().unwrap();
    *last = if *last == b'A' { b'B' } else { b'A' };
    format!("{}{}", head, String::from_utf8(bytes).unwrap())
}

#[test]
fn test_issue_and_validate_round_trip() {
    let issuer = TokenIssuer::new(SECRET, TTL);

    let token = issuer.issue("alice").unwrap();
    assert!(!token.access_token.is_empty());
    assert_eq!(token.token_type, BEARER_TOKEN_TYPE);

    let claims = issuer.validate(&token.access_token).unwrap();
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.exp, claims.iat + TTL.as_secs() as usize);
}

#[test]
fn test_expiry_is_issuance_plus_ttl() {
    let issuer = TokenIssuer::new(SECRET, TTL);

    let issued_at = 1_700_000_000;
    let token = issuer.issue_at("alice", issued_at).unwrap();

    // Signed with the right key, but long past expiry
    let err = issuer.validate(&token.access_token).unwrap_err();
    assert!(matches!(err, KeygateError::TokenExpired));
}

#[test]
fn test_token_valid_until_ttl_elapses() {
    let issuer = TokenIssuer::new(SECRET, TTL);

    // Issued just inside the TTL window: still valid
    let token = issuer
        .issue_at("alice", unix_now() - TTL.as_secs() as usize + 60)
        .unwrap();
    assert!(issuer.validate(&token.access_token).is_ok());

    // Issued just outside: expired
    let token = issuer
        .issue_at("alice", unix_now() - TTL.as_secs() as usize - 60)
        .unwrap();
    let err = issuer.validate(&token.access_token).unwrap_err();
    assert!(matches!(err, KeygateError::TokenExpired));
}

#[test]
fn test_tampered_signature_is_invalid_not_expired() {
    let issuer = TokenIssuer::new(SECRET, TTL);

    let token = issuer.issue("alice").unwrap();
    let tampered = tamper_signature(&token.access_token);
    assert_ne!(tampered, token.access_token);

    let err = issuer.validate(&tampered).unwrap_err();
    assert!(matches!(err, KeygateError::TokenInvalid));
}

#[test]
fn test_token_signed_with_other_key_rejected() {
    let issuer = TokenIssuer::new(SECRET, TTL);
    let other = TokenIssuer::new("a-completely-different-signing-secret-42", TTL);

    let token = other.issue("alice").unwrap();
    let err = issuer.validate(&token.access_token).unwrap_err();
    assert!(matches!(err, KeygateError::TokenInvalid));
}

#[test]
fn test_garbage_token_is_invalid() {
    let issuer = TokenIssuer::new(SECRET, TTL);

    for garbage in ["", "not-a-jwt", "a.b", "a.b.c", "..", "Bearer abc"] {
        let err = issuer.validate(garbage).unwrap_err();
        assert!(matches!(err, KeygateError::TokenInvalid), "input: {garbage:?}");
    }
}

#[test]
fn test_claims_expiry_check() {
    let now = unix_now();
    let live = Claims::new("alice".to_string(), now, TTL);
    assert!(!live.is_expired());

    let stale = Claims::new("alice".to_string(), now - 2 * TTL.as_secs() as usize, TTL);
    assert!(stale.is_expired());
}

#[test]
fn test_extract_bearer_token() {
    assert_eq!(
        extract_bearer_token("Bearer abc123"),
        Some("abc123".to_string())
    );
    assert_eq!(extract_bearer_token("bearer abc123"), None);
    assert_eq!(extract_bearer_token("Basic abc123"), None);
    assert_eq!(extract_bearer_token(""), None);
}
