use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::client::BlogClient;
use crate::error::TransportError;
use crate::transport::Transport;
use crate::types::{NewPost, Post};

/// The three blog operations, each one full request/response round-trip.
///
/// Every call either returns a decoded value or fails with a
/// `TransportError`; nothing is retried.
#[derive(Clone)]
pub struct BlogApi {
    client: BlogClient,
    transport: Arc<dyn Transport>,
}

impl BlogApi {
    pub fn new(client: BlogClient, transport: Arc<dyn Transport>) -> Self {
        Self { client, transport }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_posts(&self) -> Result<Vec<Post>, TransportError> {
        let response = self
            .transport
            .execute(self.client.build_list_posts())
            .await
            .inspect_err(log_failure)?;
        let posts = self.client.parse_list_posts(response).inspect_err(log_failure)?;
        debug!(count = posts.len(), "listed posts");
        Ok(posts)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_post(&self, id: &str) -> Result<Post, TransportError> {
        let response = self
            .transport
            .execute(self.client.build_get_post(id))
            .await
            .inspect_err(log_failure)?;
        self.client.parse_get_post(response).inspect_err(log_failure)
    }

    #[tracing::instrument(skip_all, fields(title = %input.title))]
    pub async fn create_post(&self, input: &NewPost) -> Result<Post, TransportError> {
        let request = self.client.build_create_post(input, Utc::now())?;
        let response = self.transport.execute(request).await.inspect_err(log_failure)?;
        let post = self.client.parse_create_post(response).inspect_err(log_failure)?;
        debug!(id = %post.id, "created post");
        Ok(post)
    }
}

fn log_failure(err: &TransportError) {
    warn!(error = %err, "blog request failed");
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::DateTime;

    use super::*;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Records requests and answers each with the next canned response.
    struct Scripted {
        seen: Mutex<Vec<HttpRequest>>,
        responses: Mutex<Vec<Result<HttpResponse, TransportError>>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<HttpResponse, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
                responses: Mutex::new(responses),
            })
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request);
            self.responses.lock().unwrap().remove(0)
        }
    }

    fn ok(status: u16, body: &str) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        })
    }

    fn draft() -> NewPost {
        NewPost {
            title: "Audit season".to_string(),
            description: "What to expect".to_string(),
            category: vec!["FINANCE".to_string()],
            content: "Prepare early.".to_string(),
            cover_image: "https://example.com/c.jpg".to_string(),
        }
    }

    #[tokio::test]
    async fn create_post_sends_timestamp_not_before_call_start() {
        let transport = Scripted::new(vec![ok(
            201,
            r#"{"id":"42","title":"Audit season","category":["FINANCE"],"description":"What to expect","date":"2024-01-01T00:00:00.000Z","coverImage":"https://example.com/c.jpg","content":"Prepare early."}"#,
        )]);
        let api = BlogApi::new(BlogClient::new("http://backend"), transport.clone());

        let started = Utc::now();
        let post = api.create_post(&draft()).await.unwrap();
        assert_eq!(post.id, "42");

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].method, HttpMethod::Post);
        let body: serde_json::Value = serde_json::from_str(seen[0].body.as_deref().unwrap()).unwrap();
        let stamped = DateTime::parse_from_rfc3339(body["date"].as_str().unwrap()).unwrap();
        // Millisecond truncation can put the stamp just under `started`.
        assert!(stamped.timestamp_millis() >= started.timestamp_millis());
    }

    #[tokio::test]
    async fn network_failure_propagates_unchanged() {
        let transport = Scripted::new(vec![Err(TransportError::Network("refused".to_string()))]);
        let api = BlogApi::new(BlogClient::new("http://backend"), transport);
        let err = api.list_posts().await.unwrap_err();
        assert_eq!(err, TransportError::Network("refused".to_string()));
    }

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn network_failure_is_logged() {
        let logs = Captured::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let transport = Scripted::new(vec![Err(TransportError::Network("refused".to_string()))]);
        let api = BlogApi::new(BlogClient::new("http://backend"), transport);
        api.get_post("1").await.unwrap_err();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("blog request failed"));
        assert!(output.contains("refused"));
    }

    #[tokio::test]
    async fn get_post_surfaces_not_found_as_status_error() {
        let transport = Scripted::new(vec![ok(404, "{}")]);
        let api = BlogApi::new(BlogClient::new("http://backend"), transport.clone());
        let err = api.get_post("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(transport.seen.lock().unwrap()[0].url, "http://backend/blogs/missing");
    }
}
