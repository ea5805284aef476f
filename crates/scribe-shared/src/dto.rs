//! Data Transfer Objects - the JSON page contexts rendered by the server.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Field name to validation messages; `__all__` holds non-field errors.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: i64,
    pub username: String,
}

/// A group as linked from a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLink {
    pub id: i64,
    pub title: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub text: String,
    /// First 15 characters of the text.
    pub short_text: String,
    pub pub_date: DateTime<Utc>,
    /// URL of the attached image, if any.
    pub image: Option<String>,
    pub author: AuthorResponse,
    pub group: Option<GroupLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
    pub author: AuthorResponse,
}

/// One page of a paginated listing with its navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<u64>,
    pub previous_page_number: Option<u64>,
}

/// `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexPage {
    pub page: PageResponse<PostResponse>,
}

/// `GET /group/{slug}/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupPage {
    pub group: GroupResponse,
    pub page: PageResponse<PostResponse>,
}

/// `GET /profile/{username}/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilePage {
    pub author: AuthorResponse,
    pub post_count: u64,
    /// Whether the viewer follows this author. Always false for anonymous viewers.
    pub following: bool,
    pub page: PageResponse<PostResponse>,
}

/// `GET /follow/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowPage {
    pub page: PageResponse<PostResponse>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentFormContext {
    pub text: String,
    pub errors: FieldErrors,
}

/// `GET /posts/{id}/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailPage {
    /// First 30 characters of the text.
    pub title: String,
    pub post: PostResponse,
    pub author_post_count: u64,
    pub comments: Vec<CommentResponse>,
    pub form: CommentFormContext,
}

/// Submitted (or current) values of the post form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFormValues {
    pub text: String,
    pub group: Option<String>,
    pub image: Option<String>,
}

/// `GET /create/` and `GET /posts/{id}/edit/`, and their failed submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFormPage {
    pub is_edit: bool,
    pub post_id: Option<i64>,
    pub form: PostFormValues,
    /// Choices for the group select, ordered by title.
    pub groups: Vec<GroupLink>,
    pub errors: FieldErrors,
}

/// `GET /auth/login/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginPage {
    pub username: String,
    pub next: Option<String>,
    pub errors: FieldErrors,
}

/// `GET /auth/signup/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupPage {
    pub username: String,
    pub email: String,
    pub errors: FieldErrors,
}

/// `GET /auth/logout/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedOutPage {
    pub logged_out: bool,
}
