//! Authentication middleware and extractors for axum.
//!
//! The middleware validates Bearer tokens through the `SessionValidator`
//! port and injects the authenticated caller into request extensions;
//! handlers pull it back out with the `RequireAuth` or `RequireEducator`
//! extractors. Routes without a token pass through untouched so public
//! endpoints and the signature-authenticated webhook share the router.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Auth middleware state - the session validator port.
pub type AuthState = Arc<dyn SessionValidator>;

/// Validates Bearer tokens and injects `AuthenticatedUser`.
///
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates it via the `SessionValidator` port
/// 3. On success, injects `AuthenticatedUser` into request extensions
/// 4. On missing token, continues without injecting
/// 5. On invalid token, returns 401 Unauthorized
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some(token) => match validator.validate(token).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
            Err(e) => {
                let (status, message) = match &e {
                    AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
                    AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
                    AuthError::ServiceUnavailable(msg) => {
                        tracing::error!("auth service unavailable: {}", msg);
                        (
                            StatusCode::SERVICE_UNAVAILABLE,
                            "Authentication service unavailable",
                        )
                    }
                };

                (
                    status,
                    Json(serde_json::json!({
                        "error": message,
                        "code": "AUTH_ERROR"
                    })),
                )
                    .into_response()
            }
        },
        None => next.run(request).await,
    }
}

/// Rejection for the auth extractors.
pub enum AuthRejection {
    /// No validated caller on the request.
    Unauthenticated,
    /// Caller is authenticated but lacks the educator role.
    EducatorRequired,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthRejection::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "AUTHENTICATION_REQUIRED",
                "Authentication is required",
            ),
            AuthRejection::EducatorRequired => (
                StatusCode::FORBIDDEN,
                "EDUCATOR_REQUIRED",
                "Educator role is required",
            ),
        };
        (
            status,
            Json(serde_json::json!({ "error": message, "code": code })),
        )
            .into_response()
    }
}

/// Extractor that requires an authenticated caller.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<AuthenticatedUser>()
                .cloned()
                .map(RequireAuth)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

/// Extractor that requires an authenticated educator.
#[derive(Debug, Clone)]
pub struct RequireEducator(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for RequireEducator
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user = parts
                .extensions
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or(AuthRejection::Unauthenticated)?;

            if !user.is_educator() {
                return Err(AuthRejection::EducatorRequired);
            }
            Ok(RequireEducator(user))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{UserId, UserRole};
    use axum::extract::FromRequestParts;
    use axum::http::Request as HttpRequest;

    fn parts_with(user: Option<AuthenticatedUser>) -> axum::http::request::Parts {
        let mut request = HttpRequest::builder().body(()).unwrap();
        if let Some(user) = user {
            request.extensions_mut().insert(user);
        }
        request.into_parts().0
    }

    fn student() -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::new("user_s").unwrap(),
            email: "s@example.com".to_string(),
            display_name: None,
            image_url: None,
            role: UserRole::Student,
        }
    }

    fn educator() -> AuthenticatedUser {
        AuthenticatedUser {
            role: UserRole::Educator,
            ..student()
        }
    }

    #[tokio::test]
    async fn require_auth_accepts_injected_user() {
        let mut parts = parts_with(Some(student()));
        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn require_auth_rejects_missing_user() {
        let mut parts = parts_with(None);
        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthRejection::Unauthenticated)));
    }

    #[tokio::test]
    async fn require_educator_rejects_student() {
        let mut parts = parts_with(Some(student()));
        let result = RequireEducator::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthRejection::EducatorRequired)));
    }

    #[tokio::test]
    async fn require_educator_accepts_educator() {
        let mut parts = parts_with(Some(educator()));
        let result = RequireEducator::from_request_parts(&mut parts, &()).await;
        assert!(result.is_ok());
    }
}
