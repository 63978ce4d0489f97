//! Request extractors: JSON bodies and path parameters with API-shaped
//! rejections, and role-gated caller identity.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use std::marker::PhantomData;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, AppState};
use crate::services::authenticator::{
    AuthContext, Credentials, Role, SESSION_IDENTITY_KEY, SessionIdentity,
};

/// `Json<T>` whose rejection is a 400 [`ApiError`].
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// `Path<T>` whose rejection is a 400 [`ApiError`], e.g. `/movies/abc`.
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Role a route demands from its caller.
pub trait AccessPolicy: Send + Sync + 'static {
    const ROLE: Role;
    /// Reject callers above the required role.
    const STRICT: bool = false;
}

/// Any signed-in user, admins included.
pub struct AnyReviewer;

impl AccessPolicy for AnyReviewer {
    const ROLE: Role = Role::Reviewer;
}

/// Reviewers only; admins are refused.
pub struct ReviewerOnly;

impl AccessPolicy for ReviewerOnly {
    const ROLE: Role = Role::Reviewer;
    const STRICT: bool = true;
}

pub struct AdminOnly;

impl AccessPolicy for AdminOnly {
    const ROLE: Role = Role::Admin;
}

/// Authenticated caller that satisfied policy `P`.
///
/// ```ignore
/// async fn handler(auth: Authorized<AdminOnly>) -> impl IntoResponse {
///     let user_id = auth.user_id;
/// }
/// ```
pub struct Authorized<P> {
    pub context: AuthContext,
    policy: PhantomData<fn() -> P>,
}

impl<P> std::ops::Deref for Authorized<P> {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

impl<P> FromRequestParts<Arc<AppState>> for Authorized<P>
where
    P: AccessPolicy,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::internal(msg))?;

        let identity = session
            .get::<SessionIdentity>(SESSION_IDENTITY_KEY)
            .await
            .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

        let credentials = Credentials {
            session: identity,
            bearer: bearer_token(&parts.headers),
        };

        let context = state
            .authenticator()
            .authenticate(&credentials, P::ROLE, P::STRICT)
            .await
            .inspect_err(|e| tracing::info!(reason = %e, "Request not authorized"))?;

        tracing::Span::current().record("user_id", context.user_id);

        Ok(Self {
            context,
            policy: PhantomData,
        })
    }
}

/// Token from `Authorization: Bearer <token>`. Other schemes are ignored.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer  xyz "));
        assert_eq!(bearer_token(&headers).as_deref(), Some("xyz"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&headers), None);
    }
}
