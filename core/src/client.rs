//! Stateless HTTP request builder and response parser for the blog API.
//!
//! # Design
//! `BlogClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! [`BlogApi`](crate::api::BlogApi) glues the two halves to a transport.

use chrono::{DateTime, SecondsFormat, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreatePostBody, NewPost, Post};

/// Everything but RFC 3986 unreserved characters is escaped, so an id
/// always stays a single path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode an opaque id for use as one URL path segment.
pub fn path_segment(id: &str) -> String {
    utf8_percent_encode(id, PATH_SEGMENT).to_string()
}

/// Synchronous, stateless client for the `/blogs` collection.
#[derive(Debug, Clone)]
pub struct BlogClient {
    base_url: String,
}

impl BlogClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_posts(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/blogs", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get_post(&self, id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/blogs/{}", self.base_url, path_segment(id)),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Build the creation request, stamping `date` as an ISO-8601 UTC
    /// timestamp with millisecond precision.
    pub fn build_create_post(
        &self,
        input: &NewPost,
        date: DateTime<Utc>,
    ) -> Result<HttpRequest, TransportError> {
        let body = CreatePostBody {
            post: input,
            date: date.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        let body = serde_json::to_string(&body).map_err(|e| TransportError::Encode(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/blogs", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn parse_list_posts(&self, response: HttpResponse) -> Result<Vec<Post>, TransportError> {
        decode(response)
    }

    pub fn parse_get_post(&self, response: HttpResponse) -> Result<Post, TransportError> {
        decode(response)
    }

    pub fn parse_create_post(&self, response: HttpResponse) -> Result<Post, TransportError> {
        decode(response)
    }
}

/// Reject non-2xx statuses, then decode the JSON body.
fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, TransportError> {
    if !response.is_success() {
        return Err(TransportError::Status {
            status: response.status,
            body: response.body,
        });
    }
    serde_json::from_str(&response.body).map_err(|e| TransportError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const POST_JSON: &str = r#"{"id":"7","title":"Test","category":["TECH"],"description":"d","date":"2024-01-15T10:00:00.000Z","coverImage":"https://example.com/c.jpg","content":"body"}"#;

    fn client() -> BlogClient {
        BlogClient::new("http://localhost:3001")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_posts_produces_correct_request() {
        let req = client().build_list_posts();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3001/blogs");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_post_produces_correct_request() {
        let req = client().build_get_post("abc-123");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3001/blogs/abc-123");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_get_post_keeps_id_in_one_segment() {
        let req = client().build_get_post("a/b?x#y z");
        assert_eq!(req.url, "http://localhost:3001/blogs/a%2Fb%3Fx%23y%20z");
        assert_eq!(path_segment("post_1.v2~-"), "post_1.v2~-");
    }

    #[test]
    fn build_create_post_stamps_date_and_omits_id() {
        let input = NewPost {
            title: "Closing the books".to_string(),
            description: "Month-end".to_string(),
            category: vec!["FINANCE".to_string(), "TECH".to_string()],
            content: "Step one\nStep two".to_string(),
            cover_image: "https://example.com/c.jpg".to_string(),
        };
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let req = client().build_create_post(&input, date).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3001/blogs");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "Closing the books");
        assert_eq!(body["category"], serde_json::json!(["FINANCE", "TECH"]));
        assert_eq!(body["coverImage"], "https://example.com/c.jpg");
        assert_eq!(body["date"], "2024-03-01T09:30:00.000Z");
        assert!(body.get("id").is_none());
    }

    #[test]
    fn parse_list_posts_success() {
        let posts = client()
            .parse_list_posts(response(200, &format!("[{POST_JSON}]")))
            .unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Test");
        assert_eq!(posts[0].cover_image, "https://example.com/c.jpg");
    }

    #[test]
    fn parse_list_posts_empty_collection() {
        let posts = client().parse_list_posts(response(200, "[]")).unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn parse_get_post_not_found() {
        let err = client().parse_get_post(response(404, "")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn parse_create_post_accepts_200_and_201() {
        for status in [200, 201] {
            let post = client().parse_create_post(response(status, POST_JSON)).unwrap();
            assert_eq!(post.id, "7");
        }
    }

    #[test]
    fn parse_create_post_wrong_status() {
        let err = client()
            .parse_create_post(response(500, "internal error"))
            .unwrap_err();
        assert_eq!(
            err,
            TransportError::Status {
                status: 500,
                body: "internal error".to_string()
            }
        );
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = BlogClient::new("http://localhost:3001/");
        assert_eq!(client.build_list_posts().url, "http://localhost:3001/blogs");
    }

    #[test]
    fn parse_list_posts_bad_json() {
        let err = client().parse_list_posts(response(200, "not json")).unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }
}
