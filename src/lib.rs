pub mod assets;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod validate;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use db::DbPool;

/// Per-process context handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub template_folder: Arc<PathBuf>,
}

impl AppState {
    pub fn new(db: DbPool, template_folder: impl Into<PathBuf>) -> Self {
        AppState {
            db,
            template_folder: Arc::new(template_folder.into()),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::web::index))
        .route(
            "/todos",
            get(handlers::api::list_all_todos).post(handlers::api::create_new_todo),
        )
        .route(
            "/categories",
            get(handlers::api::list_all_categories).post(handlers::api::create_new_category),
        )
        .route("/toggle-todo/{id}", post(handlers::api::toggle))
        .layer(
            tower::ServiceBuilder::new()
                .layer(tower_http::trace::TraceLayer::new_for_http())
                .layer(tower_http::compression::CompressionLayer::new()),
        )
        .with_state(state)
}
