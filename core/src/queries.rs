//! The blog's query service: `BlogApi` reads behind two `QueryCache`s.
//!
//! Constructed once at startup and handed to every consumer; nothing here is
//! global.

use std::time::Duration;

use futures::future::BoxFuture;

use crate::api::BlogApi;
use crate::error::TransportError;
use crate::query::{QueryCache, QueryState};
use crate::types::{NewPost, Post};

/// Cache descriptors for the blog's reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The whole `/blogs` collection.
    Posts,
    /// One item of the collection.
    Post(String),
}

#[derive(Debug, Clone, Default)]
pub struct QueryConfig {
    /// How long a successful read counts as fresh. Zero revalidates on every
    /// observation.
    pub stale_time: Duration,
}

#[derive(Clone)]
pub struct BlogQueries {
    api: BlogApi,
    posts: QueryCache<(), Vec<Post>>,
    post: QueryCache<String, Post>,
}

impl BlogQueries {
    pub fn new(api: BlogApi, config: QueryConfig) -> Self {
        Self {
            api,
            posts: QueryCache::new("posts", config.stale_time),
            post: QueryCache::new("post", config.stale_time),
        }
    }

    pub fn posts_state(&self) -> QueryState<Vec<Post>> {
        self.posts.observe((), self.list_fetcher())
    }

    pub fn post_state(&self, id: &str) -> QueryState<Post> {
        self.post.observe(id.to_string(), self.item_fetcher(id))
    }

    pub async fn settle_posts(&self) -> QueryState<Vec<Post>> {
        self.posts.settle((), self.list_fetcher()).await
    }

    pub async fn settle_post(&self, id: &str) -> QueryState<Post> {
        self.post.settle(id.to_string(), self.item_fetcher(id)).await
    }

    pub async fn posts(&self) -> Result<Vec<Post>, TransportError> {
        self.posts.fetch((), self.list_fetcher()).await
    }

    pub async fn post(&self, id: &str) -> Result<Post, TransportError> {
        self.post.fetch(id.to_string(), self.item_fetcher(id)).await
    }

    /// Create a post, then invalidate the collection so the next list read
    /// refetches.
    pub async fn create_post(&self, input: &NewPost) -> Result<Post, TransportError> {
        let post = self.api.create_post(input).await?;
        self.invalidate(&QueryKey::Posts);
        Ok(post)
    }

    pub fn invalidate(&self, key: &QueryKey) {
        match key {
            QueryKey::Posts => self.posts.invalidate(&()),
            QueryKey::Post(id) => self.post.invalidate(id),
        }
    }

    /// Allow a user-driven read of a key whose last attempt failed.
    pub fn retry_failed(&self, key: &QueryKey) {
        match key {
            QueryKey::Posts => self.posts.retry_failed(&()),
            QueryKey::Post(id) => self.post.retry_failed(id),
        }
    }

    fn list_fetcher(
        &self,
    ) -> impl Fn() -> BoxFuture<'static, Result<Vec<Post>, TransportError>> {
        let api = self.api.clone();
        move || {
            let api = api.clone();
            Box::pin(async move { api.list_posts().await })
        }
    }

    fn item_fetcher(
        &self,
        id: &str,
    ) -> impl Fn() -> BoxFuture<'static, Result<Post, TransportError>> {
        let api = self.api.clone();
        let id = id.to_string();
        move || {
            let api = api.clone();
            let id = id.clone();
            Box::pin(async move { api.get_post(&id).await })
        }
    }
}
