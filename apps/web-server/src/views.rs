//! Domain to page-context conversions.

use scribe_core::domain::{AuthorRef, CommentView, Group, GroupRef, PostView};
use scribe_core::pagination::Page;
use scribe_shared::dto::{
    AuthorResponse, CommentResponse, GroupLink, GroupResponse, PageResponse, PostResponse,
};

/// Characters of the post text used as the detail page title.
pub const TITLE_LEN: usize = 30;

pub fn media_url(name: &str) -> String {
    format!("/media/{name}")
}

pub fn author(author: AuthorRef) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        username: author.username,
    }
}

pub fn group_link(group: GroupRef) -> GroupLink {
    GroupLink {
        id: group.id,
        title: group.title,
        slug: group.slug,
    }
}

pub fn group(group: Group) -> GroupResponse {
    GroupResponse {
        id: group.id,
        title: group.title,
        slug: group.slug,
        description: group.description,
    }
}

pub fn post(view: PostView) -> PostResponse {
    PostResponse {
        id: view.post.id,
        short_text: view.post.short_text(),
        pub_date: view.post.pub_date,
        image: view.post.image.as_deref().map(media_url),
        text: view.post.text,
        author: author(view.author),
        group: view.group.map(group_link),
    }
}

pub fn comment(view: CommentView) -> CommentResponse {
    CommentResponse {
        id: view.comment.id,
        text: view.comment.text,
        created: view.comment.created,
        author: author(view.author),
    }
}

pub fn title(text: &str) -> String {
    text.chars().take(TITLE_LEN).collect()
}

pub fn page(page: Page<PostView>) -> PageResponse<PostResponse> {
    PageResponse {
        has_next: page.has_next(),
        has_previous: page.has_previous(),
        next_page_number: page.next_page_number(),
        previous_page_number: page.previous_page_number(),
        number: page.number,
        num_pages: page.num_pages,
        count: page.count,
        items: page.items.into_iter().map(post).collect(),
    }
}
