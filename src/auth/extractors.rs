use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use axum_extra::extract::CookieJar;
use tracing::warn;
use uuid::Uuid;

use super::claims::{Role, TokenKind};
use super::jwt::JwtKeys;
use crate::error::ApiError;

pub const AUTH_COOKIE: &str = "chef_token";
pub const REFRESH_COOKIE: &str = "chef_refresh";

/// Strongly-typed request principal, populated by the auth extractor.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub chef_id: Uuid,
    pub role: Role,
}

impl Principal {
    /// Same-chef-or-admin gate for every chef-scoped route.
    pub fn require_chef(&self, chef_id: Uuid) -> Result<(), ApiError> {
        if self.chef_id == chef_id || self.role == Role::Admin {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "You can only access your own resources".into(),
            ))
        }
    }
}

/// The auth cookie is the primary carrier; a Bearer header is accepted for
/// non-browser clients.
pub(crate) fn raw_token(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    if let Some(cookie) = jar.get(AUTH_COOKIE) {
        return Some(cookie.value().to_string());
    }
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("bearer ")))
        .map(|t| t.to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        let token = raw_token(&parts.headers, &jar)
            .ok_or_else(|| ApiError::Unauthorized("Missing authentication token".into()))?;

        let claims = keys.verify(&token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::Unauthorized("Invalid or expired token".into())
        })?;

        if claims.kind != TokenKind::Access {
            return Err(ApiError::Unauthorized("Access token required".into()));
        }

        Ok(Principal {
            chef_id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::http::Request;

    #[test]
    fn require_chef_allows_owner_and_admin() {
        let chef_id = Uuid::new_v4();
        let owner = Principal {
            chef_id,
            role: Role::Chef,
        };
        assert!(owner.require_chef(chef_id).is_ok());

        let admin = Principal {
            chef_id: Uuid::new_v4(),
            role: Role::Admin,
        };
        assert!(admin.require_chef(chef_id).is_ok());

        let stranger = Principal {
            chef_id: Uuid::new_v4(),
            role: Role::Chef,
        };
        let err = stranger.require_chef(chef_id).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::FORBIDDEN);
    }

    fn parts_with_headers(headers: &[(&str, String)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, value);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn extracts_principal_from_cookie() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let chef_id = Uuid::new_v4();
        let token = keys.sign_access(chef_id, Role::Chef).unwrap();

        let mut parts =
            parts_with_headers(&[("cookie", format!("{AUTH_COOKIE}={token}"))]);
        let principal = Principal::from_request_parts(&mut parts, &state)
            .await
            .expect("cookie token should authenticate");
        assert_eq!(principal.chef_id, chef_id);
        assert_eq!(principal.role, Role::Chef);
    }

    #[tokio::test]
    async fn extracts_principal_from_bearer_header() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let chef_id = Uuid::new_v4();
        let token = keys.sign_access(chef_id, Role::Admin).unwrap();

        let mut parts =
            parts_with_headers(&[("authorization", format!("Bearer {token}"))]);
        let principal = Principal::from_request_parts(&mut parts, &state)
            .await
            .expect("bearer token should authenticate");
        assert_eq!(principal.chef_id, chef_id);
        assert_eq!(principal.role, Role::Admin);
    }

    #[tokio::test]
    async fn rejects_missing_and_refresh_tokens() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);

        let mut parts = parts_with_headers(&[]);
        let err = Principal::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);

        let refresh = keys.sign_refresh(Uuid::new_v4(), Role::Chef).unwrap();
        let mut parts =
            parts_with_headers(&[("cookie", format!("{AUTH_COOKIE}={refresh}"))]);
        let err = Principal::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
