use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::token::TokenIssuer;
use crate::utils::error::AppError;

/// Identity attached to the request once the gate has verified a token.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i64,
}

/// Token gate for protected routes. Verifies the bearer token and attaches
/// [`CurrentUser`] to the request; it does not consult the user table, so a
/// token issued to a since-deleted account still passes here.
pub async fn require_auth(
    State(tokens): State<TokenIssuer>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = header.and_then(bearer_token).ok_or_else(|| {
        tracing::warn!("Missing bearer token");
        AppError::Auth("Access denied. No token provided.".to_string())
    })?;

    let user_id = tokens.verify(token)?;

    request.extensions_mut().insert(CurrentUser { id: user_id });
    Ok(next.run(request).await)
}

fn bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum::{Extension, Router};
    use tower::ServiceExt;

    #[test]
    fn bearer_extraction() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc"), None);
        assert_eq!(bearer_token("Basic dXNlcg=="), None);
        assert_eq!(bearer_token("Bearer"), None);
    }

    fn gated_router(issuer: TokenIssuer) -> Router {
        async fn whoami(Extension(user): Extension<CurrentUser>) -> String {
            user.id.to_string()
        }

        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(from_fn_with_state(issuer, require_auth))
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let router = gated_router(TokenIssuer::new("gate-secret"));

        let response = router
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_scheme_is_unauthorized() {
        let router = gated_router(TokenIssuer::new("gate-secret"));

        let response = router
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .header(AUTHORIZATION, "Basic dXNlcjpwYXNz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_token_is_bad_request() {
        let router = gated_router(TokenIssuer::new("gate-secret"));

        let response = router
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .header(AUTHORIZATION, "Bearer garbage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_identity() {
        let issuer = TokenIssuer::new("gate-secret");
        let token = issuer.issue(42).unwrap();
        let router = gated_router(issuer);

        let response = router
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        assert_eq!(&bytes[..], b"42");
    }
}
