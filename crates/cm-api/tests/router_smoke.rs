use axum::{body::Body, http::Request, http::StatusCode};
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;

use cm_api::auth::{Claims, Role};

fn mint_token(secret: &str, sub: &str, role: Role) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        role,
        exp: (now_epoch() + 3600) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("token encoding should succeed")
}

fn now_epoch() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_secs()
}

#[tokio::test]
async fn livez_healthy_and_jobs_require_auth() {
    let state = cm_api::test_state("test-secret");
    let app = cm_api::create_router(state);

    let livez_response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/livez")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(livez_response.status(), StatusCode::OK);

    let unauthorized = app
        .oneshot(
            Request::builder()
                .uri("/api/jobs")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn recruiter_endpoints_reject_seeker_tokens() {
    let state = cm_api::test_state("test-secret");
    let app = cm_api::create_router(state);

    let token = mint_token("test-secret", "42", Role::Seeker);

    let forbidden = app
        .oneshot(
            Request::builder()
                .uri("/api/matches/dashboard")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn garbled_bearer_token_is_unauthorized() {
    let state = cm_api::test_state("test-secret");
    let app = cm_api::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/jobs")
                .header("authorization", "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_wrong_secret_is_unauthorized() {
    let state = cm_api::test_state("test-secret");
    let app = cm_api::create_router(state);

    let token = mint_token("some-other-secret", "42", Role::Recruiter);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/jobs")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
