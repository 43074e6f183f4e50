//! Shared server state and per-client sessions.
//!
//! # Design
//! `BlogQueries` is process-wide: every client reads through the same cache.
//! Navigation and the write-post draft belong to one client only and live in
//! a `Session` keyed by the id in the client's session cookie.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use blog_core::{BlogQueries, CreateForm, Navigation, Scroll, ViewMode};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "blog_session";

/// One client's view state: where it is and what it has typed into the
/// write-post form.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub nav: Navigation,
    pub form: CreateForm,
}

impl Session {
    /// Apply a navigation transition. Leaving the write-post view discards
    /// its draft.
    pub fn navigate(&mut self, transition: impl FnOnce(&mut Navigation) -> Scroll) -> Scroll {
        let was_creating = *self.nav.mode() == ViewMode::Creating;
        let scroll = transition(&mut self.nav);
        if was_creating && *self.nav.mode() != ViewMode::Creating {
            self.form = CreateForm::default();
        }
        scroll
    }
}

/// Handle to one client's session, placed in request extensions by
/// [`with_session`].
#[derive(Clone, Default)]
pub struct ClientSession(Arc<Mutex<Session>>);

impl ClientSession {
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, Session> {
        self.0.lock().await
    }

    /// Copy of the session; the lock is released before anything renders.
    pub async fn snapshot(&self) -> Session {
        self.0.lock().await.clone()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub queries: BlogQueries,
    sessions: Arc<DashMap<Uuid, ClientSession>>,
}

impl AppState {
    pub fn new(queries: BlogQueries) -> Self {
        Self {
            queries,
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// The session for `id`, created empty on first use.
    pub fn session(&self, id: Uuid) -> ClientSession {
        self.sessions.entry(id).or_default().clone()
    }
}

/// Middleware resolving the client's session from its cookie. A client
/// without a valid cookie gets a fresh session and a `Set-Cookie`.
pub async fn with_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let known = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());
    let id = known.unwrap_or_else(Uuid::new_v4);

    request.extensions_mut().insert(state.session(id));
    let response = next.run(request).await;

    if known.is_some() {
        return response;
    }
    debug!(%id, "started client session");
    let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), response).into_response()
}
