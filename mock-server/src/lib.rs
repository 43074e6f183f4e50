use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub category: Vec<String>,
    pub description: String,
    pub date: String,
    pub cover_image: String,
    pub content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    pub title: String,
    pub category: Vec<String>,
    pub description: String,
    pub cover_image: String,
    pub content: String,
    pub date: Option<String>,
}

/// Seed file layout: `{ "blogs": [...] }`.
#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub blogs: Vec<Post>,
}

/// Posts in insertion order; listing returns them as stored.
pub type Db = Arc<RwLock<Vec<Post>>>;

pub fn app() -> Router {
    app_with(Vec::new())
}

pub fn app_with(posts: Vec<Post>) -> Router {
    let db: Db = Arc::new(RwLock::new(posts));
    Router::new()
        .route("/blogs", get(list_posts).post(create_post))
        .route("/blogs/{id}", get(get_post))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, posts: Vec<Post>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(posts)).await
}

async fn list_posts(State(db): State<Db>) -> Json<Vec<Post>> {
    Json(db.read().await.clone())
}

async fn create_post(
    State(db): State<Db>,
    Json(input): Json<CreatePost>,
) -> (StatusCode, Json<Post>) {
    let post = Post {
        id: Uuid::new_v4().to_string(),
        title: input.title,
        category: input.category,
        description: input.description,
        date: input
            .date
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        cover_image: input.cover_image,
        content: input.content,
    };
    tracing::info!(id = %post.id, title = %post.title, "created post");
    db.write().await.push(post.clone());
    (StatusCode::CREATED, Json(post))
}

async fn get_post(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Post>, StatusCode> {
    let posts = db.read().await;
    posts
        .iter()
        .find(|post| post.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_serializes_to_json() {
        let post = Post {
            id: "1".to_string(),
            title: "Test".to_string(),
            category: vec!["TECH".to_string()],
            description: "d".to_string(),
            date: "2024-01-01T00:00:00.000Z".to_string(),
            cover_image: "https://example.com/c.jpg".to_string(),
            content: "c".to_string(),
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["coverImage"], "https://example.com/c.jpg");
        assert_eq!(json["category"][0], "TECH");
    }

    #[test]
    fn create_post_date_is_optional() {
        let input: CreatePost = serde_json::from_str(
            r#"{"title":"T","category":["A"],"description":"d","coverImage":"u","content":"c"}"#,
        )
        .unwrap();
        assert!(input.date.is_none());
    }

    #[test]
    fn create_post_rejects_missing_title() {
        let result: Result<CreatePost, _> = serde_json::from_str(
            r#"{"category":["A"],"description":"d","coverImage":"u","content":"c"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn seed_reads_blogs_array() {
        let seed: Seed = serde_json::from_str(
            r#"{"blogs":[{"id":"1","title":"T","category":["A"],"description":"d","date":"2024-01-01T00:00:00.000Z","coverImage":"u","content":"c"}]}"#,
        )
        .unwrap();
        assert_eq!(seed.blogs.len(), 1);
        assert_eq!(seed.blogs[0].id, "1");
    }

    #[test]
    fn seed_without_blogs_is_empty() {
        let seed: Seed = serde_json::from_str("{}").unwrap();
        assert!(seed.blogs.is_empty());
    }
}
