//! HTTP surface of the single-page client.
//!
//! # Design
//! Navigation is a `POST` that mutates the session and answers with the whole
//! `#app` region (or the full document for non-htmx requests). Data regions
//! that are still loading come back as placeholders carrying `hx-get` to a
//! fragment route; the fragment route settles the read before rendering.
//!
//! Each handler works on the calling client's `Session`, resolved from its
//! cookie by `with_session`. A detail fragment is only swapped in while its
//! post is still that client's selection; a response for an earlier
//! selection answers `204 No Content`, which htmx leaves unswapped.
//!
//! Background loads never retry a failed read. A page load or a navigation
//! is the user asking again, so those re-arm failed keys first.

use std::collections::HashMap;

use axum::{
    extract::{Extension, Path, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use blog_core::{CreateForm, DraftField, Navigation, Notice, QueryKey, Scroll};
use maud::Markup;
use tracing::{debug, warn};

use crate::components::{create_post, post_detail, post_list, shell};
use crate::state::{with_session, AppState, ClientSession, Session};
use crate::telemetry::HttpLoggingExt;

const HX_REQUEST: HeaderName = HeaderName::from_static("hx-request");
const HX_RESWAP: HeaderName = HeaderName::from_static("hx-reswap");
const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");
const SCROLL_TOP: HeaderValue = HeaderValue::from_static("outerHTML show:window:top");

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/nav/home", post(go_home))
        .route("/nav/write", post(write_post))
        .route("/nav/posts/{id}", post(select_post))
        .route("/fragments/posts", get(list_fragment))
        .route("/fragments/posts/{id}", get(detail_fragment))
        .route("/write/draft", post(update_draft))
        .route("/write", post(submit_post))
        .layer(middleware::from_fn_with_state(state.clone(), with_session))
        .with_state(state)
        .with_http_logging()
}

async fn index(
    State(state): State<AppState>,
    Extension(client): Extension<ClientSession>,
) -> Markup {
    let session = client.snapshot().await;
    retry_failed_reads(&state, &session);
    shell::page(shell::render(&state.queries, &session))
}

async fn health() -> &'static str {
    "ok"
}

async fn go_home(
    State(state): State<AppState>,
    Extension(client): Extension<ClientSession>,
    headers: HeaderMap,
) -> Response {
    let scroll = client.lock().await.navigate(Navigation::go_home);
    navigated(&state, &client, &headers, scroll).await
}

async fn write_post(
    State(state): State<AppState>,
    Extension(client): Extension<ClientSession>,
    headers: HeaderMap,
) -> Response {
    let scroll = client.lock().await.navigate(Navigation::write_post);
    navigated(&state, &client, &headers, scroll).await
}

async fn select_post(
    State(state): State<AppState>,
    Extension(client): Extension<ClientSession>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let scroll = client.lock().await.navigate(|nav| nav.select(id));
    navigated(&state, &client, &headers, scroll).await
}

/// Re-arm the failed reads this page is about to show.
fn retry_failed_reads(state: &AppState, session: &Session) {
    state.queries.retry_failed(&QueryKey::Posts);
    if let Some(id) = session.nav.selected_id() {
        state.queries.retry_failed(&QueryKey::Post(id.to_string()));
    }
}

/// Re-render after a transition. `Scroll::Top` asks htmx to bring the
/// viewport to the top once the region is swapped.
async fn navigated(
    state: &AppState,
    client: &ClientSession,
    headers: &HeaderMap,
    scroll: Scroll,
) -> Response {
    let session = client.snapshot().await;
    retry_failed_reads(state, &session);
    let app = shell::render(&state.queries, &session);
    let body = if headers.contains_key(HX_REQUEST) {
        app
    } else {
        shell::page(app)
    };
    match scroll {
        Scroll::Top => ([(HX_RESWAP, SCROLL_TOP)], body).into_response(),
        Scroll::Keep => body.into_response(),
    }
}

async fn list_fragment(
    State(state): State<AppState>,
    Extension(client): Extension<ClientSession>,
) -> Markup {
    let posts = state.queries.settle_posts().await;
    let session = client.snapshot().await;
    post_list::render(&posts, session.nav.selected_id())
}

async fn detail_fragment(
    State(state): State<AppState>,
    Extension(client): Extension<ClientSession>,
    Path(id): Path<String>,
) -> Response {
    let post = state.queries.settle_post(&id).await;
    let still_selected = client.lock().await.nav.selected_id() == Some(id.as_str());
    if !still_selected {
        debug!(%id, "selection moved on; dropping detail response");
        return StatusCode::NO_CONTENT.into_response();
    }
    post_detail::render(&id, &post).into_response()
}

/// Mirror form edits into the session draft. Ignored while a submission is
/// running so the payload being sent stays the one on screen.
async fn update_draft(
    Extension(client): Extension<ClientSession>,
    Form(fields): Form<HashMap<String, String>>,
) -> StatusCode {
    let mut session = client.lock().await;
    if !session.form.is_submitting() {
        apply_fields(&mut session.form, fields);
    }
    StatusCode::NO_CONTENT
}

async fn submit_post(
    State(state): State<AppState>,
    Extension(client): Extension<ClientSession>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let begun = {
        let mut session = client.lock().await;
        if !session.form.is_submitting() {
            apply_fields(&mut session.form, fields);
        }
        session.form.begin_submit()
    };

    let notice = match begun {
        Err(err) => {
            warn!(error = %err, "rejected post submission");
            Notice::Failed(err.to_string())
        }
        Ok(input) => {
            // The create runs to completion even if the browser goes away, so
            // the form always returns to idle.
            let queries = state.queries.clone();
            let task_client = client.clone();
            let task = tokio::spawn(async move {
                let result = queries.create_post(&input).await;
                task_client.lock().await.form.finish(result)
            });
            match task.await {
                Ok(notice) => notice,
                Err(err) => {
                    warn!(error = %err, "post submission task failed");
                    Notice::Failed(err.to_string())
                }
            }
        }
    };

    let session = client.snapshot().await;
    let body = create_post::render(&session.form, Some(&notice));
    match notice {
        Notice::Created(_) => {
            let changed = HeaderValue::from_static(post_list::CHANGED_EVENT);
            ([(HX_TRIGGER, changed)], body).into_response()
        }
        Notice::Failed(_) => body.into_response(),
    }
}

fn apply_fields(form: &mut CreateForm, fields: HashMap<String, String>) {
    for (name, value) in fields {
        match name.parse::<DraftField>() {
            Ok(field) => form.update(|draft| draft.apply(field, value)),
            Err(err) => debug!(error = %err, "ignoring form field"),
        }
    }
}
