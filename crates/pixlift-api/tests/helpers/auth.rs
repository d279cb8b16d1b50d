use pixlift_api::auth::JwtService;
use uuid::Uuid;

/// Test JWT secret (must match setup_test_app).
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

/// Test user data: a fresh user id and a token signed for it.
pub struct TestUser {
    pub user_id: Uuid,
    pub token: String,
}

/// Mint a token for a fresh user id. No server round trip is needed; the
/// middleware trusts any token signed with the configured secret.
pub fn register_test_user() -> TestUser {
    let user_id = Uuid::new_v4();
    let token = JwtService::new(TEST_JWT_SECRET)
        .issue_token(user_id, 3600)
        .expect("Failed to issue test token");
    TestUser { user_id, token }
}

/// Token that expired a minute ago, for auth failure tests.
pub fn expired_token() -> String {
    JwtService::new(TEST_JWT_SECRET)
        .issue_token(Uuid::new_v4(), -60)
        .expect("Failed to issue expired test token")
}

/// Token signed with the wrong secret, for auth failure tests.
pub fn foreign_token() -> String {
    JwtService::new("some-other-secret-that-the-server-never-saw")
        .issue_token(Uuid::new_v4(), 3600)
        .expect("Failed to issue foreign test token")
}
