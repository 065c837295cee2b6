use chrono::Utc;
use stockflow_auth::{REFRESH_TOKEN_EXPIRY, TokenManager};
use stockflow_config::JwtConfig;
use stockflow_core::{AuthError, UserRole};
use uuid::Uuid;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: "test_access_secret_for_testing_purposes".to_string(),
        refresh_secret: "test_refresh_secret_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

#[test]
fn test_create_access_token_all_roles() {
    let tokens = TokenManager::new(&get_test_jwt_config());
    let user_id = Uuid::new_v4().to_string();

    for role in UserRole::ALL {
        let token = tokens.issue_access_token(&user_id, role).unwrap();
        let claims = tokens.verify_access_token(&token).unwrap();

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.role, role);
    }
}

#[test]
fn test_access_token_expiry_follows_config() {
    let mut config = get_test_jwt_config();
    config.access_token_expiry = 120;
    let tokens = TokenManager::new(&config);

    let before = Utc::now().timestamp() as usize;
    let token = tokens.issue_access_token("user-1", UserRole::Staff).unwrap();
    let claims = tokens.verify_access_token(&token).unwrap();

    assert_eq!(claims.exp - claims.iat, 120);
    assert!(claims.iat >= before);
}

#[test]
fn test_refresh_token_lasts_thirty_days() {
    assert_eq!(REFRESH_TOKEN_EXPIRY, 2_592_000);

    let tokens = TokenManager::new(&get_test_jwt_config());
    let token = tokens.issue_refresh_token("user-2").unwrap();
    let claims = tokens.verify_refresh_token(&token).unwrap();

    assert_eq!((claims.exp - claims.iat) as i64, REFRESH_TOKEN_EXPIRY);
    assert!(!claims.jti.is_empty());
}

#[test]
fn test_access_token_just_expired() {
    let tokens = TokenManager::new(&get_test_jwt_config());
    let issued_at = Utc::now().timestamp() - 3601;

    let token = tokens
        .issue_access_token_at("user-3", UserRole::Admin, issued_at)
        .unwrap();

    assert!(matches!(
        tokens.verify_access_token(&token),
        Err(AuthError::InvalidToken)
    ));
}

#[test]
fn test_token_expired_when_exp_equals_now() {
    let tokens = TokenManager::new(&get_test_jwt_config());
    let now = Utc::now().timestamp();

    let access = tokens
        .issue_access_token_at("user-3", UserRole::Manager, now - 3600)
        .unwrap();
    let refresh = tokens
        .issue_refresh_token_at("user-3", now - REFRESH_TOKEN_EXPIRY)
        .unwrap();

    assert!(matches!(
        tokens.verify_access_token(&access),
        Err(AuthError::InvalidToken)
    ));
    assert!(matches!(
        tokens.verify_refresh_token(&refresh),
        Err(AuthError::InvalidToken)
    ));
}

#[test]
fn test_access_token_near_expiry_still_valid() {
    let tokens = TokenManager::new(&get_test_jwt_config());
    let issued_at = Utc::now().timestamp() - 3500;

    let token = tokens
        .issue_access_token_at("user-4", UserRole::Manager, issued_at)
        .unwrap();

    assert!(tokens.verify_access_token(&token).is_ok());
}

#[test]
fn test_verify_token_wrong_secret() {
    let tokens = TokenManager::new(&get_test_jwt_config());
    let token = tokens.issue_refresh_token("user-5").unwrap();

    let mut rotated = get_test_jwt_config();
    rotated.refresh_secret = "rotated_refresh_secret_after_incident".to_string();
    let other = TokenManager::new(&rotated);

    assert!(matches!(
        other.verify_refresh_token(&token),
        Err(AuthError::InvalidToken)
    ));
}

#[test]
fn test_token_kinds_are_not_interchangeable() {
    let tokens = TokenManager::new(&get_test_jwt_config());
    let access = tokens.issue_access_token("user-6", UserRole::Staff).unwrap();
    let refresh = tokens.issue_refresh_token("user-6").unwrap();

    assert!(tokens.verify_refresh_token(&access).is_err());
    assert!(tokens.verify_access_token(&refresh).is_err());
}

#[test]
fn test_verify_token_malformed() {
    let tokens = TokenManager::new(&get_test_jwt_config());

    for token in ["", "abc", "a.b.c", "Bearer xyz"] {
        assert!(matches!(
            tokens.verify_access_token(token),
            Err(AuthError::InvalidToken)
        ));
    }
}

#[test]
fn test_debug_output_hides_secrets() {
    let config = get_test_jwt_config();
    let tokens = TokenManager::new(&config);

    let manager_debug = format!("{:?}", tokens);
    let config_debug = format!("{:?}", config);

    assert!(!manager_debug.contains("test_access_secret"));
    assert!(!config_debug.contains("test_access_secret"));
    assert!(!config_debug.contains("test_refresh_secret"));
}
