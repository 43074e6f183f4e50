use blog_core::{path_segment, Post, QueryState};
use maud::{html, Markup};

use super::medium_date;

pub const ERROR_MESSAGE: &str = "Failed to load content.";
pub const AUTHOR: &str = "Editorial Team";

/// One post's full content. An empty `id` renders nothing.
pub fn render(id: &str, state: &QueryState<Post>) -> Markup {
    if id.is_empty() {
        return html! {};
    }
    let fragment_url = format!("/fragments/posts/{}", path_segment(id));
    match state {
        QueryState::Pending => html! {
            div #post-detail .post-detail aria-busy="true"
                hx-get=(fragment_url) hx-trigger="load" hx-swap="outerHTML" {
                div .skeleton.skeleton-hero {}
                div .skeleton.skeleton-title {}
                div .skeleton.skeleton-meta {}
                @for _ in 0..3 {
                    div .skeleton.skeleton-line {}
                }
            }
        },
        QueryState::Error(_) => html! {
            div #post-detail .post-detail {
                p .error { (ERROR_MESSAGE) }
            }
        },
        QueryState::Success { data, fetching, .. } => html! {
            div #post-detail .post-detail
                hx-get=[fetching.then_some(fragment_url.as_str())]
                hx-trigger=[fetching.then_some("load")]
                hx-swap=[fetching.then_some("outerHTML")] {
                (body(data))
            }
        },
    }
}

fn body(post: &Post) -> Markup {
    html! {
        figure .hero {
            img src=(post.cover_image) alt=(post.title);
            figcaption {
                div .categories {
                    @for label in &post.category {
                        span .badge { (label) }
                    }
                }
                h1 { (post.title) }
            }
        }
        div .meta {
            span .avatar aria-hidden="true" {}
            div {
                p .author { (AUTHOR) }
                p .published {
                    time datetime=(post.date) { (medium_date(post)) }
                    " · 5 min read"
                }
            }
        }
        article .content {
            p style="white-space: pre-wrap" { (post.content) }
        }
        footer .engagement {
            button type="button" .like { "Like" }
            button type="button" .comments { "Comments" }
        }
    }
}
