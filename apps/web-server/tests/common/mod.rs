//! Shared helpers for the HTTP integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::test::{self, TestRequest};
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;

use scribe_core::domain::{Group, NewGroup, NewPost, NewUser, Post, User};
use scribe_core::ports::Clock;
use scribe_infra::ManualClock;
use web_server::middleware::auth::ACCESS_TOKEN_COOKIE;
use web_server::{AppState, Settings};

/// Build the full application over the environment's state.
macro_rules! init_app {
    ($env:expr) => {{
        let state = $env.state.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(web_server::middleware::RequestIdMiddleware)
                .app_data(actix_web::web::Data::new(state.clone()))
                .configure(|cfg| web_server::handlers::configure_routes(cfg, &state))
                .default_service(actix_web::web::to(web_server::handlers::not_found)),
        )
        .await
    }};
}

pub struct TestEnv {
    pub state: AppState,
    pub clock: Arc<ManualClock>,
}

impl TestEnv {
    pub fn new() -> Self {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let state = AppState::in_memory(clock.clone(), Settings::default());
        Self { state, clock }
    }

    /// A user with a valid session token. The password hash is never checked.
    pub async fn user(&self, username: &str) -> (User, String) {
        let user = self
            .state
            .users
            .create(NewUser::new(
                username.to_string(),
                None,
                "not-a-real-hash".to_string(),
                self.clock.now(),
            ))
            .await
            .unwrap();
        let token = self
            .state
            .tokens
            .generate_token(user.id, &user.username)
            .unwrap();
        (user, token)
    }

    pub async fn group(&self, title: &str, slug: &str) -> Group {
        self.state
            .groups
            .create(NewGroup::new(title, slug, format!("About {title}")))
            .await
            .unwrap()
    }

    /// Each post is published one second after the previous one.
    pub async fn post(&self, author: &User, text: &str, group: Option<&Group>) -> Post {
        self.clock.advance(Duration::seconds(1));
        self.state
            .posts
            .create(NewPost {
                text: text.to_string(),
                author_id: author.id,
                group_id: group.map(|g| g.id),
                image: None,
                pub_date: self.clock.now(),
            })
            .await
            .unwrap()
    }
}

pub fn get(uri: &str, token: Option<&str>) -> TestRequest {
    with_session(TestRequest::get().uri(uri), token)
}

pub fn post_form(uri: &str, token: Option<&str>, body: &str) -> TestRequest {
    with_session(
        TestRequest::post()
            .uri(uri)
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload(body.to_string()),
        token,
    )
}

fn with_session(req: TestRequest, token: Option<&str>) -> TestRequest {
    match token {
        Some(token) => req.cookie(Cookie::new(ACCESS_TOKEN_COOKIE, token.to_string())),
        None => req,
    }
}

pub fn location<B>(res: &ServiceResponse<B>) -> String {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn json<B: MessageBody>(res: ServiceResponse<B>) -> Value {
    let body = test::read_body(res).await;
    serde_json::from_slice(&body).unwrap()
}

/// Texts of the posts on a rendered page, in order.
pub fn texts(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["text"].as_str().unwrap().to_string())
        .collect()
}
