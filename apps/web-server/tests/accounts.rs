#[macro_use]
mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use async_trait::async_trait;

use common::{TestEnv, get, json, location, post_form};
use scribe_core::domain::{NewUser, User};
use scribe_core::error::RepoError;
use scribe_core::forms::{INVALID_LOGIN, NON_FIELD_ERRORS, PASSWORD_MISMATCH, USERNAME_TAKEN};
use scribe_core::ports::{BaseRepository, UserRepository};
use web_server::middleware::auth::ACCESS_TOKEN_COOKIE;

const SIGNUP: &str = "username=neo&email=neo%40matrix.io&password1=followthewhiterabbit&password2=followthewhiterabbit";

fn session_token<B>(res: &actix_web::dev::ServiceResponse<B>) -> Option<String> {
    res.response()
        .cookies()
        .find(|c| c.name() == ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
}

#[actix_web::test]
async fn test_signup_logs_the_user_in() {
    let env = TestEnv::new();
    let app = init_app!(env);

    let res = test::call_service(&app, post_form("/auth/signup/", None, SIGNUP).to_request()).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");
    let token = session_token(&res).unwrap();

    let user = env.state.users.find_by_username("neo").await.unwrap().unwrap();
    assert_eq!(user.email.as_deref(), Some("neo@matrix.io"));
    assert_ne!(user.password_hash, "followthewhiterabbit");

    let res = test::call_service(&app, get("/create/", Some(&token)).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_signup_form_is_public() {
    let env = TestEnv::new();
    let app = init_app!(env);

    let res = test::call_service(&app, get("/auth/signup/", None).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_signup_password_mismatch() {
    let env = TestEnv::new();
    let app = init_app!(env);

    let res = test::call_service(
        &app,
        post_form(
            "/auth/signup/",
            None,
            "username=neo&password1=followthewhiterabbit&password2=somethingelse",
        )
        .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(session_token(&res).is_none());

    let body = json(res).await;
    assert_eq!(body["username"], "neo");
    assert_eq!(body["errors"]["password2"][0], PASSWORD_MISMATCH);
    assert!(env.state.users.find_by_username("neo").await.unwrap().is_none());
}

#[actix_web::test]
async fn test_signup_duplicate_username() {
    let env = TestEnv::new();
    env.user("neo").await;
    let app = init_app!(env);

    let res = test::call_service(&app, post_form("/auth/signup/", None, SIGNUP).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json(res).await;
    assert_eq!(body["errors"]["username"][0], USERNAME_TAKEN);
}

/// Lookups miss every user, as when a concurrent signup inserts the same
/// name right after the availability check.
struct StaleLookups(Arc<dyn UserRepository>);

#[async_trait]
impl BaseRepository<User, i64> for StaleLookups {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        self.0.find_by_id(id).await
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        self.0.save(user).await
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.0.delete(id).await
    }
}

#[async_trait]
impl UserRepository for StaleLookups {
    async fn find_by_username(&self, _username: &str) -> Result<Option<User>, RepoError> {
        Ok(None)
    }

    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        self.0.create(user).await
    }
}

#[actix_web::test]
async fn test_signup_username_race_rerenders_form() {
    let mut env = TestEnv::new();
    env.user("neo").await;
    env.state.users = Arc::new(StaleLookups(env.state.users.clone()));
    let app = init_app!(env);

    let res = test::call_service(&app, post_form("/auth/signup/", None, SIGNUP).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(session_token(&res).is_none());

    let body = json(res).await;
    assert_eq!(body["username"], "neo");
    assert_eq!(body["errors"]["username"][0], USERNAME_TAKEN);
}

#[actix_web::test]
async fn test_login_follows_next() {
    let env = TestEnv::new();
    let app = init_app!(env);
    test::call_service(&app, post_form("/auth/signup/", None, SIGNUP).to_request()).await;

    let form = json(test::call_service(&app, get("/auth/login/?next=/create/", None).to_request()).await).await;
    assert_eq!(form["next"], "/create/");

    let res = test::call_service(
        &app,
        post_form(
            "/auth/login/",
            None,
            "username=neo&password=followthewhiterabbit&next=%2Fcreate%2F",
        )
        .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/create/");
    assert!(session_token(&res).is_some());
}

#[actix_web::test]
async fn test_login_ignores_external_next() {
    let env = TestEnv::new();
    let app = init_app!(env);
    test::call_service(&app, post_form("/auth/signup/", None, SIGNUP).to_request()).await;

    let res = test::call_service(
        &app,
        post_form(
            "/auth/login/",
            None,
            "username=neo&password=followthewhiterabbit&next=https%3A%2F%2Fevil.example%2F",
        )
        .to_request(),
    )
    .await;
    assert_eq!(location(&res), "/");
}

#[actix_web::test]
async fn test_wrong_password_is_rejected() {
    let env = TestEnv::new();
    let app = init_app!(env);
    test::call_service(&app, post_form("/auth/signup/", None, SIGNUP).to_request()).await;

    for body in ["username=neo&password=bluepill", "username=smith&password=bluepill"] {
        let res = test::call_service(&app, post_form("/auth/login/", None, body).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(session_token(&res).is_none());

        let page = json(res).await;
        assert_eq!(page["errors"][NON_FIELD_ERRORS][0], INVALID_LOGIN);
    }
}

#[actix_web::test]
async fn test_logout_removes_session_cookie() {
    let env = TestEnv::new();
    let (_, token) = env.user("neo").await;
    let app = init_app!(env);

    let res = test::call_service(&app, get("/auth/logout/", Some(&token)).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(session_token(&res).as_deref(), Some(""));
    assert_eq!(json(res).await["logged_out"], true);
}
