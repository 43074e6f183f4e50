use blog_core::{BlogQueries, ViewMode};
use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::{create_post, post_detail, post_list};
use crate::state::Session;

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@2.0.4";

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: #f8fafc; color: #0f172a; }
.top-bar { display: flex; justify-content: space-between; align-items: center; padding: 1rem 2rem; background: #fff; border-bottom: 1px solid #e2e8f0; }
.layout { display: grid; grid-template-columns: minmax(18rem, 1fr) 2fr; gap: 2rem; padding: 2rem; }
.post-card { padding: 1rem; margin-bottom: 1rem; background: #fff; border: 1px solid #e2e8f0; border-radius: .75rem; cursor: pointer; }
.post-card.selected { border-color: #2563eb; box-shadow: 0 0 0 2px #bfdbfe; }
.badge { display: inline-block; margin-right: .25rem; padding: .1rem .5rem; font-size: .7rem; font-weight: 600; background: #dbeafe; color: #1d4ed8; border-radius: 999px; }
.skeleton { background: #e2e8f0; border-radius: .5rem; margin-bottom: 1rem; animation: pulse 1.5s infinite; }
.skeleton-row { height: 6rem; }
.skeleton-hero { height: 16rem; }
.skeleton-title { height: 2rem; width: 60%; }
.skeleton-meta { height: 1rem; width: 30%; }
.skeleton-line { height: 1rem; }
.hero img { width: 100%; max-height: 22rem; object-fit: cover; border-radius: .75rem; }
.error { color: #b91c1c; }
.notice.created { color: #15803d; }
.notice.failed { color: #b91c1c; }
.field { display: flex; flex-direction: column; margin-bottom: 1rem; }
.submit .label-busy, .htmx-request .submit .label-idle, .submit.submitting .label-idle { display: none; }
.htmx-request .submit .label-busy, .submit.submitting .label-busy { display: inline; }
@keyframes pulse { 50% { opacity: .5; } }
"#;

/// Full HTML document around the `#app` region.
pub fn page(app: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Blog" }
                script src=(HTMX_SRC) {}
                style { (PreEscaped(STYLE)) }
            }
            body {
                (app)
            }
        }
    }
}

/// The `#app` region for the current session. Regions whose data is not
/// cached yet render placeholders that load themselves.
pub fn render(queries: &BlogQueries, session: &Session) -> Markup {
    let selected = session.nav.selected_id();
    html! {
        div #app {
            header .top-bar {
                a .logo href="/" hx-post="/nav/home" hx-target="#app" hx-swap="outerHTML" {
                    "Blog"
                }
                nav {
                    button type="button" hx-post="/nav/write" hx-target="#app" hx-swap="outerHTML" {
                        "Write Post"
                    }
                }
            }
            div .layout {
                aside {
                    h2 { "Latest Articles" }
                    (post_list::render(&queries.posts_state(), selected))
                }
                section .main {
                    (main_region(queries, session))
                }
            }
        }
    }
}

fn main_region(queries: &BlogQueries, session: &Session) -> Markup {
    match session.nav.mode() {
        ViewMode::Home => hero(),
        ViewMode::Viewing(id) if id.is_empty() => html! {},
        ViewMode::Viewing(id) => html! {
            button type="button" .back hx-post="/nav/home" hx-target="#app" hx-swap="outerHTML" {
                "Back to articles"
            }
            (post_detail::render(id, &queries.post_state(id)))
        },
        ViewMode::Creating => create_post::render(&session.form, None),
    }
}

fn hero() -> Markup {
    html! {
        div .welcome {
            h1 { "Knowledge Hub" }
            p { "Select an article from the list to start reading, or share what you know." }
            button type="button" hx-post="/nav/write" hx-target="#app" hx-swap="outerHTML" {
                "Start Writing"
            }
        }
    }
}
