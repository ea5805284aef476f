//! Post listings, post detail, and the create/edit/comment actions.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use scribe_core::domain::{FeedScope, Group, NewComment, NewPost, Post};
use scribe_core::forms::{CommentForm, ImageChange, PostForm};
use scribe_shared::dto::{
    CommentFormContext, FieldErrors, FollowPage, GroupPage, IndexPage, PostDetailPage,
    PostFormPage, PostFormValues, ProfilePage,
};

use super::{post_detail_url, profile_url, redirect};
use crate::form_data::FormData;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// GET / - every post, newest first. Served through the page cache.
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .feed
        .page(FeedScope::All, query.page.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(IndexPage {
        page: views::page(page),
    }))
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let group = state
        .groups
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("group {} not found", slug)))?;

    let page = state
        .feed
        .page(FeedScope::Group(group.id), query.page.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(GroupPage {
        group: views::group(group),
        page: views::page(page),
    }))
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let author = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", username)))?;

    let page = state
        .feed
        .page(FeedScope::Author(author.id), query.page.as_deref())
        .await?;
    let following = state
        .follows
        .is_following(viewer.user_id(), author.id)
        .await?;

    Ok(HttpResponse::Ok().json(ProfilePage {
        author: views::author(author.as_author()),
        post_count: page.count,
        following,
        page: views::page(page),
    }))
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post_id = post_id.into_inner();
    let view = state
        .posts
        .find_view(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {} not found", post_id)))?;

    let author_post_count = state.feed.count(FeedScope::Author(view.author.id)).await?;
    let comments = state.comments.list_for_post(post_id).await?;

    Ok(HttpResponse::Ok().json(PostDetailPage {
        title: views::title(&view.post.text),
        author_post_count,
        comments: comments.into_iter().map(views::comment).collect(),
        form: CommentFormContext::default(),
        post: views::post(view),
    }))
}

/// GET /follow/ - posts by the authors the caller follows.
pub async fn follow_index(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .feed
        .page(FeedScope::FollowedBy(identity.user_id), query.page.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(FollowPage {
        page: views::page(page),
    }))
}

fn form_page(
    post_id: Option<i64>,
    form: PostFormValues,
    groups: &[Group],
    errors: FieldErrors,
) -> HttpResponse {
    HttpResponse::Ok().json(PostFormPage {
        is_edit: post_id.is_some(),
        post_id,
        form,
        groups: groups.iter().map(|g| views::group_link(g.to_ref())).collect(),
        errors,
    })
}

fn submitted_values(form: &PostForm, current_image: Option<&str>) -> PostFormValues {
    PostFormValues {
        text: form.text.clone(),
        group: form.group.clone(),
        image: current_image.map(views::media_url),
    }
}

/// GET /create/
pub async fn post_create_form(
    state: web::Data<AppState>,
    _identity: Identity,
) -> AppResult<HttpResponse> {
    let groups = state.groups.list().await?;
    Ok(form_page(
        None,
        PostFormValues::default(),
        &groups,
        FieldErrors::new(),
    ))
}

/// POST /create/
pub async fn post_create(
    state: web::Data<AppState>,
    identity: Identity,
    req: HttpRequest,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let form = FormData::parse(&req, body).await?.into_post_form();
    let groups = state.groups.list().await?;
    let values = submitted_values(&form, None);

    let clean = match form.validate(&groups) {
        Ok(clean) => clean,
        Err(errors) => {
            tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "Post form rejected");
            return Ok(form_page(None, values, &groups, errors.into_map()));
        }
    };

    let image = match clean.image {
        ImageChange::Replace(upload) => Some(
            state
                .media
                .save(&upload.storage_name(), &upload.content)
                .await?,
        ),
        ImageChange::Keep | ImageChange::Clear => None,
    };

    let post = state
        .posts
        .create(NewPost {
            text: clean.text,
            author_id: identity.user_id,
            group_id: clean.group_id,
            image,
            pub_date: state.clock.now(),
        })
        .await?;

    tracing::info!(post_id = post.id, author = %identity.username, "Post created");
    Ok(redirect(profile_url(&identity.username)))
}

/// Loads the post for editing, or the redirect for a caller who may not edit it.
async fn editable_post(
    state: &AppState,
    identity: &Identity,
    post_id: i64,
) -> AppResult<Result<Post, HttpResponse>> {
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {} not found", post_id)))?;

    if post.is_authored_by(identity.user_id) {
        Ok(Ok(post))
    } else {
        tracing::debug!(post_id, user_id = identity.user_id, "Edit refused, not the author");
        Ok(Err(redirect(post_detail_url(post_id))))
    }
}

/// GET /posts/{post_id}/edit/
pub async fn post_edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post = match editable_post(&state, &identity, post_id.into_inner()).await? {
        Ok(post) => post,
        Err(redirect) => return Ok(redirect),
    };

    let groups = state.groups.list().await?;
    let values = PostFormValues {
        text: post.text.clone(),
        group: post.group_id.map(|id| id.to_string()),
        image: post.image.as_deref().map(views::media_url),
    };

    Ok(form_page(Some(post.id), values, &groups, FieldErrors::new()))
}

/// POST /posts/{post_id}/edit/
pub async fn post_edit(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<i64>,
    req: HttpRequest,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let mut post = match editable_post(&state, &identity, post_id.into_inner()).await? {
        Ok(post) => post,
        Err(redirect) => return Ok(redirect),
    };

    let form = FormData::parse(&req, body).await?.into_post_form();
    let groups = state.groups.list().await?;
    let values = submitted_values(&form, post.image.as_deref());

    let clean = match form.validate(&groups) {
        Ok(clean) => clean,
        Err(errors) => {
            tracing::debug!(post_id = post.id, "Post edit rejected");
            return Ok(form_page(Some(post.id), values, &groups, errors.into_map()));
        }
    };

    let replaced = match clean.image {
        ImageChange::Keep => None,
        ImageChange::Clear => post.image.take(),
        ImageChange::Replace(upload) => {
            let name = state
                .media
                .save(&upload.storage_name(), &upload.content)
                .await?;
            post.image.replace(name)
        }
    };

    post.text = clean.text;
    post.group_id = clean.group_id;
    let post = state.posts.save(post).await?;

    if let Some(old) = replaced {
        if let Err(e) = state.media.delete(&old).await {
            tracing::warn!(image = %old, error = %e, "Failed to delete replaced image");
        }
    }

    tracing::info!(post_id = post.id, "Post updated");
    Ok(redirect(post_detail_url(post.id)))
}

/// POST /posts/{post_id}/comment/ - always lands back on the post.
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<i64>,
    req: HttpRequest,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let post_id = post_id.into_inner();
    if state.posts.find_by_id(post_id).await?.is_none() {
        return Err(AppError::NotFound(format!("post {} not found", post_id)));
    }

    let form = FormData::parse(&req, body).await?;
    let comment = CommentForm {
        text: form.text("text"),
    };

    match comment.validate() {
        Ok(text) => {
            let comment = state
                .comments
                .create(NewComment {
                    post_id,
                    author_id: identity.user_id,
                    text,
                    created: state.clock.now(),
                })
                .await?;
            tracing::info!(post_id, comment_id = comment.id, "Comment added");
        }
        Err(_) => tracing::debug!(post_id, "Empty comment ignored"),
    }

    Ok(redirect(post_detail_url(post_id)))
}
