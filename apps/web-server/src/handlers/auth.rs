//! Account handlers: signup, login and logout.

use actix_web::{
    HttpRequest, HttpResponse,
    cookie::{Cookie, SameSite, time::Duration},
    http::header,
    web,
};
use serde::Deserialize;

use scribe_core::domain::NewUser;
use scribe_core::error::RepoError;
use scribe_core::forms::{
    FormErrors, INVALID_LOGIN, LoginForm, NON_FIELD_ERRORS, SignupForm, USERNAME_TAKEN,
};
use scribe_shared::dto::{LoggedOutPage, LoginPage, SignupPage};

use crate::form_data::FormData;
use crate::middleware::auth::ACCESS_TOKEN_COOKIE;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build(ACCESS_TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(state.tokens.expiration_seconds()))
        .finish()
}

/// Only local paths are followed after login.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

/// Redirect to `next` with a fresh session cookie.
fn logged_in(state: &AppState, user_id: i64, username: &str, next: &str) -> AppResult<HttpResponse> {
    let token = state.tokens.generate_token(user_id, username)?;

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, next))
        .cookie(session_cookie(state, token))
        .finish())
}

fn signup_rejected(form: SignupForm, errors: FormErrors) -> HttpResponse {
    HttpResponse::Ok().json(SignupPage {
        username: form.username,
        email: form.email,
        errors: errors.into_map(),
    })
}

/// GET /auth/signup/
pub async fn signup_form() -> HttpResponse {
    HttpResponse::Ok().json(SignupPage::default())
}

/// POST /auth/signup/
pub async fn signup(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let fields = FormData::parse(&req, body).await?;
    let form = SignupForm {
        username: fields.text("username"),
        email: fields.text("email"),
        password1: fields.text("password1"),
        password2: fields.text("password2"),
    };

    let taken = state
        .users
        .find_by_username(form.username.trim())
        .await?
        .is_some();

    let clean = match form.validate(taken) {
        Ok(clean) => clean,
        Err(errors) => {
            tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "Signup rejected");
            return Ok(signup_rejected(form, errors));
        }
    };

    let password_hash = state.passwords.hash(&clean.password)?;
    let created = state
        .users
        .create(NewUser::new(
            clean.username,
            clean.email,
            password_hash,
            state.clock.now(),
        ))
        .await;

    let user = match created {
        Ok(user) => user,
        // Another signup took the name between the check and the insert.
        Err(RepoError::Constraint(detail)) => {
            tracing::debug!(%detail, username = %form.username, "Signup lost username race");
            let mut errors = FormErrors::new();
            errors.add("username", USERNAME_TAKEN);
            return Ok(signup_rejected(form, errors));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, username = %user.username, "User signed up");
    logged_in(&state, user.id, &user.username, "/")
}

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// GET /auth/login/
pub async fn login_form(query: web::Query<NextQuery>) -> HttpResponse {
    HttpResponse::Ok().json(LoginPage {
        next: query.into_inner().next,
        ..Default::default()
    })
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let fields = FormData::parse(&req, body).await?;
    let form = LoginForm {
        username: fields.text("username"),
        password: fields.text("password"),
        next: fields.optional("next"),
    };

    let rejected = |errors: FormErrors| {
        HttpResponse::Ok().json(LoginPage {
            username: form.username.clone(),
            next: form.next.clone(),
            errors: errors.into_map(),
        })
    };

    if let Err(errors) = form.validate() {
        return Ok(rejected(errors));
    }

    let user = state.users.find_by_username(form.username.trim()).await?;
    let verified = match &user {
        Some(user) => state.passwords.verify(&form.password, &user.password_hash)?,
        None => false,
    };

    match user {
        Some(user) if verified => {
            tracing::info!(user_id = user.id, "User logged in");
            logged_in(&state, user.id, &user.username, safe_next(form.next.as_deref()))
        }
        _ => {
            tracing::debug!(username = %form.username, "Login rejected");
            let mut errors = FormErrors::new();
            errors.add(NON_FIELD_ERRORS, INVALID_LOGIN);
            Ok(rejected(errors))
        }
    }
}

/// GET /auth/logout/
pub async fn logout() -> HttpResponse {
    let mut removal = Cookie::build(ACCESS_TOKEN_COOKIE, "").path("/").finish();
    removal.make_removal();

    HttpResponse::Ok()
        .cookie(removal)
        .json(LoggedOutPage { logged_out: true })
}

#[cfg(test)]
mod tests {
    use super::safe_next;

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/create/")), "/create/");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("https://evil.example/")), "/");
        assert_eq!(safe_next(None), "/");
    }
}
