//! Server-rendered single-page client for the blog service.
//!
//! # Overview
//! Renders the post list, a post's detail and the write-post form with
//! `maud`, reading every piece of server data through `BlogQueries`. The
//! browser side is htmx: navigation and form edits post back to the server,
//! which owns each client's session state and answers with HTML regions.

pub mod components;
pub mod config;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::AppConfig;
pub use routes::router;
pub use state::{AppState, ClientSession, Session, SESSION_COOKIE};
