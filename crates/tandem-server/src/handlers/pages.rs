//! Static pages

use axum::response::Html;

/// The forum front page, embedded at compile time. No API contract.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}
