use axum::async_trait;
use axum::extract::FromRef;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Roles carried in the token. Tokens are minted by the identity service;
/// this API only verifies and gates on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Seeker,
    Recruiter,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: usize,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AuthConfig::from_ref(state);
        authorize_bearer(parts, &config)
    }
}

/// Extractor that additionally requires the seeker role.
#[derive(Debug, Clone)]
pub struct Seeker(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for Seeker
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Seeker {
            return Err(ApiError::Forbidden("seeker role required".into()));
        }
        Ok(Seeker(user))
    }
}

/// Extractor that additionally requires the recruiter role.
#[derive(Debug, Clone)]
pub struct Recruiter(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for Recruiter
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Recruiter {
            return Err(ApiError::Forbidden("recruiter role required".into()));
        }
        Ok(Recruiter(user))
    }
}

fn authorize_bearer(parts: &Parts, config: &AuthConfig) -> Result<AuthUser, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".into()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("expected Bearer token".into()))?;

    let validation = Validation::new(Algorithm::HS256);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|err| ApiError::Unauthorized(format!("invalid token: {err}")))?;

    let id = data
        .claims
        .sub
        .parse::<i32>()
        .map_err(|_| ApiError::Unauthorized("token subject is not a user id".into()))?;

    Ok(AuthUser {
        id,
        role: data.claims.role,
    })
}

#[cfg(test)]
mod tests {
    use axum::http::Request;
    use jsonwebtoken::{encode, EncodingKey, Header};

    use super::*;

    fn parts_with_token(token: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    fn mint(secret: &str, sub: &str, role: Role) -> String {
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
        .unwrap()
    }

    fn now_epoch() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    #[test]
    fn accepts_valid_token_and_parses_identity() {
        let config = AuthConfig {
            jwt_secret: "secret".into(),
        };
        let parts = parts_with_token(&mint("secret", "42", Role::Recruiter));

        let user = authorize_bearer(&parts, &config).unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.role, Role::Recruiter);
    }

    #[test]
    fn rejects_wrong_secret() {
        let config = AuthConfig {
            jwt_secret: "secret".into(),
        };
        let parts = parts_with_token(&mint("other-secret", "42", Role::Seeker));

        let err = authorize_bearer(&parts, &config).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn rejects_non_numeric_subject() {
        let config = AuthConfig {
            jwt_secret: "secret".into(),
        };
        let parts = parts_with_token(&mint("secret", "alice", Role::Seeker));

        let err = authorize_bearer(&parts, &config).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
