use pitstop_backend::config::JwtConfig;
use pitstop_backend::util::jwt::*;

// Helper function to create JWT utils for testing
fn create_test_jwt_utils() -> JwtTokenUtilsImpl {
    JwtTokenUtilsImpl::from_test_env()
}

#[test]
fn test_jwt_utils_creation() {
    let jwt_utils = create_test_jwt_utils();
    assert!(!jwt_utils.jwt_config.jwt_secret.is_empty());
    assert!(jwt_utils.jwt_config.access_token_expiration > 0);
}

#[test]
fn test_generate_and_validate_access_token() {
    let jwt_utils = create_test_jwt_utils();
    let token = jwt_utils
        .generate_access_token("65f1a2b3c4d5e6f7a8b9c0d1", "garage@example.com", "garage")
        .expect("token generation should succeed");

    let claims = jwt_utils
        .validate_access_token(&token)
        .expect("token validation should succeed");
    assert_eq!(claims.sub, "65f1a2b3c4d5e6f7a8b9c0d1");
    assert_eq!(claims.email, "garage@example.com");
    assert_eq!(claims.role, "garage");
    assert_eq!(claims.token_type, "access");
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_tokens_get_unique_jti() {
    let jwt_utils = create_test_jwt_utils();
    let a = jwt_utils
        .generate_access_token("user1", "a@example.com", "garage")
        .unwrap();
    let b = jwt_utils
        .generate_access_token("user1", "a@example.com", "garage")
        .unwrap();
    let claims_a = jwt_utils.validate_access_token(&a).unwrap();
    let claims_b = jwt_utils.validate_access_token(&b).unwrap();
    assert_ne!(claims_a.jti, claims_b.jti);
}

#[test]
fn test_validate_rejects_garbage_token() {
    let jwt_utils = create_test_jwt_utils();
    assert!(jwt_utils.validate_access_token("not.a.token").is_err());
    assert!(jwt_utils.validate_access_token("").is_err());
}

#[test]
fn test_validate_rejects_wrong_secret() {
    let jwt_utils = create_test_jwt_utils();
    let token = jwt_utils
        .generate_access_token("user1", "a@example.com", "garage")
        .unwrap();

    let other = JwtTokenUtilsImpl::new(JwtConfig {
        jwt_secret: "a-completely-different-secret-also-long-enough".to_string(),
        access_token_expiration: 15,
    });
    assert!(other.validate_access_token(&token).is_err());
}

#[test]
fn test_validate_rejects_expired_token() {
    let expired = JwtTokenUtilsImpl::new(JwtConfig {
        jwt_secret: "test-secret-key-that-is-long-enough-for-hs256".to_string(),
        access_token_expiration: -10,
    });
    let token = expired
        .generate_access_token("user1", "a@example.com", "garage")
        .unwrap();
    let jwt_utils = create_test_jwt_utils();
    assert!(jwt_utils.validate_access_token(&token).is_err());
}

#[test]
fn test_extract_token_from_header() {
    let jwt_utils = create_test_jwt_utils();
    assert_eq!(
        jwt_utils.extract_token_from_header("Bearer abc.def.ghi").unwrap(),
        "abc.def.ghi"
    );
    assert!(jwt_utils.extract_token_from_header("Basic abc").is_err());
    assert!(jwt_utils.extract_token_from_header("Bearer ").is_err());
    assert!(jwt_utils.extract_token_from_header("").is_err());
}
