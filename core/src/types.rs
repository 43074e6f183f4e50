//! Domain DTOs for the blog API.
//!
//! # Design
//! These types mirror the backend's `/blogs` schema but are defined
//! independently of the mock-server crate. Field names follow the wire
//! format (`coverImage`) through serde renaming; integration tests catch any
//! schema drift between the two crates.
//!
//! `date` stays a string on the wire type: the backend owns the collection and
//! may hand back timestamps this client did not produce. [`Post::published_at`]
//! parses it on demand.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A single post returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
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

impl Post {
    /// The creation timestamp, if `date` is valid RFC 3339.
    pub fn published_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.date).ok()
    }
}

/// Request payload for creating a new post: every `Post` field except the
/// server-assigned `id` and the client-stamped `date`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub category: Vec<String>,
    pub content: String,
    pub cover_image: String,
}

/// Wire body of `POST /blogs`: the draft plus its creation timestamp.
#[derive(Debug, Serialize)]
pub(crate) struct CreatePostBody<'a> {
    #[serde(flatten)]
    pub post: &'a NewPost,
    pub date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Post {
        Post {
            id: "1".to_string(),
            title: "Ledger basics".to_string(),
            category: vec!["FINANCE".to_string()],
            description: "Debits and credits".to_string(),
            date: "2024-01-15T10:00:00.000Z".to_string(),
            cover_image: "https://example.com/cover.jpg".to_string(),
            content: "line one\nline two".to_string(),
        }
    }

    #[test]
    fn post_uses_camel_case_on_the_wire() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["coverImage"], "https://example.com/cover.jpg");
        assert!(json.get("cover_image").is_none());
        assert_eq!(json["category"][0], "FINANCE");
    }

    #[test]
    fn published_at_parses_iso_timestamps() {
        let at = sample().published_at().unwrap();
        assert_eq!(at.to_rfc3339(), "2024-01-15T10:00:00+00:00");
    }

    #[test]
    fn published_at_is_none_for_garbage() {
        let mut post = sample();
        post.date = "yesterday".to_string();
        assert!(post.published_at().is_none());
    }

    #[test]
    fn create_body_flattens_draft_and_omits_id() {
        let draft = NewPost {
            title: "T".to_string(),
            description: "D".to_string(),
            category: vec!["A".to_string(), "B".to_string()],
            content: "C".to_string(),
            cover_image: "https://example.com/c.jpg".to_string(),
        };
        let body = CreatePostBody {
            post: &draft,
            date: "2024-01-15T10:00:00.000Z".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["title"], "T");
        assert_eq!(json["coverImage"], "https://example.com/c.jpg");
        assert_eq!(json["date"], "2024-01-15T10:00:00.000Z");
        assert!(json.get("id").is_none());
    }
}
