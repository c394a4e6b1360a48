use axum::response::Html;

/// Editor page served at `/`, embedded at build time.
const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// GET /
pub async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}
