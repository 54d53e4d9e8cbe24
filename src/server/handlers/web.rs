use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../../assets/index.html");

/// GET / - the single text-in/text-out recommendation form.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
