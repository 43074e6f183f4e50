//! Client core for the blog service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern); a `Transport` executes the
//! round-trip in between. On top of that sit the query cache every view reads
//! through, the write-post form state, and the client's navigation state.
//!
//! # Design
//! - `BlogClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `BlogQueries` is constructed once and passed to its consumers. Reads are
//!   coalesced and cached per `QueryKey`; creating a post invalidates the
//!   collection.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod error;
pub mod form;
pub mod http;
pub mod nav;
pub mod queries;
pub mod query;
pub mod transport;
pub mod types;

pub use api::BlogApi;
pub use client::{path_segment, BlogClient};
pub use error::TransportError;
pub use form::{split_categories, CreateForm, Draft, DraftError, DraftField, Notice, SubmitError, SubmitStatus};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use nav::{Navigation, Scroll, ViewMode};
pub use queries::{BlogQueries, QueryConfig, QueryKey};
pub use query::{QueryCache, QueryState};
pub use transport::{Transport, UreqTransport};
pub use types::{NewPost, Post};
