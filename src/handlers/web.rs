use axum::extract::State;
use axum::response::Html;
use tracing::debug;

use crate::assets::{INDEX_HTML, INDEX_TEMPLATE};
use crate::AppState;

/// Serves `todos.html` from the template folder, or the bundled copy when
/// the folder has none.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let path = state.template_folder.join(INDEX_TEMPLATE);
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "Using bundled index page");
            Html(INDEX_HTML.to_string())
        }
    }
}
