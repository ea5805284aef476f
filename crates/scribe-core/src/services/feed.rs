use std::sync::Arc;

use crate::domain::{FeedScope, PostView};
use crate::error::DomainError;
use crate::pagination::{Page, Paginator};
use crate::ports::PostRepository;

/// Paginated, newest-first post listings for every feed scope.
#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostRepository>,
    paginator: Paginator,
}

impl FeedService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self {
            posts,
            paginator: Paginator::default(),
        }
    }

    pub fn with_paginator(mut self, paginator: Paginator) -> Self {
        self.paginator = paginator;
        self
    }

    /// Fetch the page named by the raw `page` query value.
    pub async fn page(
        &self,
        scope: FeedScope,
        requested: Option<&str>,
    ) -> Result<Page<PostView>, DomainError> {
        let count = self.posts.count(scope).await?;
        let window = self.paginator.window(count, requested);
        let items = self.posts.list(scope, window.offset, window.limit).await?;

        tracing::debug!(
            ?scope,
            page = window.number,
            num_pages = window.num_pages,
            count,
            "Feed page loaded"
        );

        Ok(Page::new(items, window, count))
    }

    /// Total posts in a scope, e.g. an author's post count.
    pub async fn count(&self, scope: FeedScope) -> Result<u64, DomainError> {
        Ok(self.posts.count(scope).await?)
    }
}
