//! HTTP handlers and route configuration.

mod auth;
mod follow;
mod health;
mod media;
mod posts;

use actix_web::{HttpResponse, http::header, web};

use crate::form_data::MAX_FORM_BYTES;
use crate::middleware::PageCache;
use crate::middleware::error::AppError;
use crate::state::AppState;

/// Cache key prefix of the global feed.
pub const INDEX_PAGE_CACHE_PREFIX: &str = "index_page";

pub(crate) fn redirect(location: impl Into<String>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.into()))
        .finish()
}

pub(crate) fn profile_url(username: &str) -> String {
    format!("/profile/{username}/")
}

pub(crate) fn post_detail_url(post_id: i64) -> String {
    format!("/posts/{post_id}/")
}

/// Fallback for unknown routes.
pub async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound("No route matches this URL".to_string()))
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::PayloadConfig::new(MAX_FORM_BYTES))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::resource("/")
                .wrap(PageCache::new(
                    state.cache.clone(),
                    INDEX_PAGE_CACHE_PREFIX,
                    state.settings.page_cache_ttl,
                ))
                .route(web::get().to(posts::index)),
        )
        .route("/group/{slug}/", web::get().to(posts::group_posts))
        .route("/follow/", web::get().to(posts::follow_index))
        .service(
            web::resource("/create/")
                .route(web::get().to(posts::post_create_form))
                .route(web::post().to(posts::post_create)),
        )
        .route("/profile/{username}/", web::get().to(posts::profile))
        .route(
            "/profile/{username}/follow/",
            web::get().to(follow::profile_follow),
        )
        .route(
            "/profile/{username}/unfollow/",
            web::get().to(follow::profile_unfollow),
        )
        .route("/posts/{post_id}/", web::get().to(posts::post_detail))
        .service(
            web::resource("/posts/{post_id}/edit/")
                .route(web::get().to(posts::post_edit_form))
                .route(web::post().to(posts::post_edit)),
        )
        .route(
            "/posts/{post_id}/comment/",
            web::post().to(posts::add_comment),
        )
        .route("/media/{path:.*}", web::get().to(media::serve))
        .service(
            web::scope("/auth")
                .service(
                    web::resource("/signup/")
                        .route(web::get().to(auth::signup_form))
                        .route(web::post().to(auth::signup)),
                )
                .service(
                    web::resource("/login/")
                        .route(web::get().to(auth::login_form))
                        .route(web::post().to(auth::login)),
                )
                .route("/logout/", web::get().to(auth::logout)),
        );
}
