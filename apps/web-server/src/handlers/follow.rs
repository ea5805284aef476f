//! Follow and unfollow actions.

use actix_web::{HttpResponse, web};

use scribe_core::domain::User;

use super::{profile_url, redirect};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn author(state: &AppState, username: &str) -> AppResult<User> {
    state
        .users
        .find_by_username(username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", username)))
}

/// GET /profile/{username}/follow/
pub async fn profile_follow(
    state: web::Data<AppState>,
    identity: Identity,
    username: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = author(&state, &username).await?;
    let outcome = state.follows.follow(identity.user_id, author.id).await?;

    tracing::debug!(?outcome, follower = %identity.username, author = %author.username, "Follow");
    Ok(redirect(profile_url(&author.username)))
}

/// GET /profile/{username}/unfollow/ - 404 when there is nothing to undo.
pub async fn profile_unfollow(
    state: web::Data<AppState>,
    identity: Identity,
    username: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = author(&state, &username).await?;
    let outcome = state.follows.unfollow(identity.user_id, author.id).await?;

    tracing::debug!(?outcome, follower = %identity.username, author = %author.username, "Unfollow");
    Ok(redirect(profile_url(&author.username)))
}
