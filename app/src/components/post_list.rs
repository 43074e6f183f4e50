use blog_core::{path_segment, Post, QueryState};
use maud::{html, Markup};

use super::short_date;

pub const ERROR_MESSAGE: &str = "Error loading posts.";
pub const EMPTY_MESSAGE: &str = "No posts yet.";
const PLACEHOLDER_ROWS: usize = 3;
const FRAGMENT_URL: &str = "/fragments/posts";
/// Fired on `body` after a post is created.
pub const CHANGED_EVENT: &str = "posts-changed";

/// The collection in server order. While loading or revalidating, the region
/// reloads itself from `/fragments/posts` once the read settles; otherwise it
/// reloads when a post is created.
pub fn render(state: &QueryState<Vec<Post>>, selected: Option<&str>) -> Markup {
    match state {
        QueryState::Pending => html! {
            div #post-list .post-list aria-busy="true"
                hx-get=(FRAGMENT_URL) hx-trigger="load" hx-swap="outerHTML" {
                @for _ in 0..PLACEHOLDER_ROWS {
                    div .skeleton.skeleton-row {}
                }
            }
        },
        QueryState::Error(_) => html! {
            div #post-list .post-list
                hx-get=(FRAGMENT_URL) hx-trigger=(changed_trigger()) hx-swap="outerHTML" {
                p .error { (ERROR_MESSAGE) }
            }
        },
        QueryState::Success { data, fetching, .. } => html! {
            div #post-list .post-list
                hx-get=(FRAGMENT_URL)
                hx-trigger=(if *fetching { "load".to_string() } else { changed_trigger() })
                hx-swap="outerHTML" {
                @if data.is_empty() {
                    p .empty { (EMPTY_MESSAGE) }
                }
                @for post in data {
                    (row(post, selected == Some(post.id.as_str())))
                }
            }
        },
    }
}

fn changed_trigger() -> String {
    format!("{CHANGED_EVENT} from:body")
}

fn row(post: &Post, selected: bool) -> Markup {
    html! {
        article .post-card.selected[selected]
            hx-post=(format!("/nav/posts/{}", path_segment(&post.id))) hx-target="#app" hx-swap="outerHTML" {
            header {
                div .categories {
                    @for label in &post.category {
                        span .badge { (label) }
                    }
                }
                time datetime=(post.date) { (short_date(post)) }
            }
            h3 { (post.title) }
            p .description { (post.description) }
        }
    }
}
