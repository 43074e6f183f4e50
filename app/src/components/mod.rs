//! Server-rendered regions of the page. Each region renders from a
//! `QueryState` snapshot and never waits on the network itself.

pub mod create_post;
pub mod post_detail;
pub mod post_list;
pub mod shell;

use blog_core::Post;

/// `1/15/2024`; falls back to the raw `date` string.
pub(crate) fn short_date(post: &Post) -> String {
    post.published_at()
        .map(|at| at.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| post.date.clone())
}

/// `Jan 15, 2024`; falls back to the raw `date` string.
pub(crate) fn medium_date(post: &Post) -> String {
    post.published_at()
        .map(|at| at.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| post.date.clone())
}
