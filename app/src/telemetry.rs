//! Tracing setup and HTTP request logging.

use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,blog_app=debug,blog_core=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub trait HttpLoggingExt<S> {
    fn with_http_logging(self) -> Self;
}

impl<S> HttpLoggingExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Log every request path and response status.
    fn with_http_logging(self) -> Router<S> {
        self.layer(
            tower_http::trace::TraceLayer::new_for_http()
                .on_request(|request: &axum::http::Request<_>, _span: &_| {
                    tracing::info!(target: "tower_http", method = %request.method(), path = %request.uri().path());
                })
                .on_response(|response: &axum::http::Response<_>, latency: std::time::Duration, _span: &_| {
                    tracing::info!(target: "tower_http", status = response.status().as_u16(), ?latency);
                }),
        )
    }
}
