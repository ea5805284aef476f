//! Authentication extractors.
//!
//! The session token is read from an `Authorization: Bearer` header or, for
//! browser sessions, from the `access_token` cookie set at login.

use std::fmt;
use std::future::{Ready, ready};

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, ResponseError,
    dev::Payload,
    http::{StatusCode, header},
    web,
};
use url::form_urlencoded;

use scribe_core::ports::{AuthError, TokenClaims};

use crate::state::AppState;

/// Cookie carrying the session token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

const FALLBACK_LOGIN_URL: &str = "/auth/login/";

/// Authenticated user identity extractor.
///
/// Anonymous requests are redirected to the login page with `next` set to
/// the requested path:
/// ```ignore
/// async fn create_post(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// `{login_url}?next={next}`, keeping slashes in `next` readable.
pub fn login_redirect(login_url: &str, next: &str) -> String {
    let next: String = form_urlencoded::byte_serialize(next.as_bytes()).collect();
    format!("{}?next={}", login_url, next.replace("%2F", "/"))
}

/// Rejection for anonymous callers: a 302 to the login page.
#[derive(Debug)]
pub struct LoginRequired {
    pub location: String,
}

impl fmt::Display for LoginRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Login required, redirecting to {}", self.location)
    }
}

impl ResponseError for LoginRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, self.location.clone()))
            .finish()
    }
}

fn token_from(req: &HttpRequest) -> Result<String, AuthError> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        let auth_str = value
            .to_str()
            .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

        return auth_str
            .strip_prefix("Bearer ")
            .map(str::to_string)
            .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()));
    }

    req.cookie(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(AuthError::MissingAuth)
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AuthError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AuthError::InvalidToken("Server configuration error".to_string())
    })?;

    let token = token_from(req)?;
    state.tokens.validate_token(&token).map(Identity::from)
}

impl FromRequest for Identity {
    type Error = LoginRequired;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(|e| {
            let login_url = req
                .app_data::<web::Data<AppState>>()
                .map(|state| state.settings.login_url.as_str())
                .unwrap_or(FALLBACK_LOGIN_URL);
            let next = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or_else(|| req.path());

            tracing::debug!(error = %e, path = req.path(), "Anonymous request, redirecting to login");
            LoginRequired {
                location: login_redirect(login_url, next),
            }
        }))
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn user_id(&self) -> Option<i64> {
        self.0.as_ref().map(|identity| identity.user_id)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(authenticate(req).ok())))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;
    use scribe_infra::SystemClock;

    use super::*;
    use crate::config::Settings;

    fn state() -> AppState {
        AppState::in_memory(Arc::new(SystemClock), Settings::default())
    }

    #[test]
    fn test_login_redirect_keeps_path_readable() {
        assert_eq!(
            login_redirect("/auth/login/", "/create/"),
            "/auth/login/?next=/create/"
        );
        assert_eq!(
            login_redirect("/auth/login/", "/follow/?page=2"),
            "/auth/login/?next=/follow/%3Fpage%3D2"
        );
    }

    #[actix_web::test]
    async fn test_identity_from_cookie() {
        let state = state();
        let token = state.tokens.generate_token(3, "morpheus").unwrap();
        let req = TestRequest::default()
            .app_data(web::Data::new(state))
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, token))
            .to_http_request();

        let identity = Identity::extract(&req).await.unwrap();
        assert_eq!(identity.user_id, 3);
        assert_eq!(identity.username, "morpheus");
    }

    #[actix_web::test]
    async fn test_identity_from_bearer_header() {
        let state = state();
        let token = state.tokens.generate_token(5, "trinity").unwrap();
        let req = TestRequest::default()
            .app_data(web::Data::new(state))
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_http_request();

        let identity = OptionalIdentity::extract(&req).await.unwrap();
        assert_eq!(identity.user_id(), Some(5));
    }

    #[actix_web::test]
    async fn test_anonymous_is_redirected() {
        let req = TestRequest::with_uri("/create/")
            .app_data(web::Data::new(state()))
            .to_http_request();

        let rejection = Identity::extract(&req).await.unwrap_err();
        assert_eq!(rejection.location, "/auth/login/?next=/create/");
        assert_eq!(rejection.status_code(), StatusCode::FOUND);

        let anonymous = OptionalIdentity::extract(&req).await.unwrap();
        assert!(anonymous.0.is_none());
    }
}
