use axum::extract::{Path, State};
use axum::{http::StatusCode, Json};
use tracing::info;

use crate::db::{create_category, create_todo, list_categories, list_todos, toggle_todo};
use crate::error::AppError;
use crate::extract::ValidJson;
use crate::models::{Category, NewCategory, NewTodo, Todo};
use crate::AppState;

pub async fn list_all_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = list_todos(&state.db)?;
    info!(count = todos.len(), "Listed todos");
    Ok(Json(todos))
}

pub async fn create_new_todo(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<NewTodo>,
) -> Result<(StatusCode, Json<i64>), AppError> {
    let id = create_todo(&state.db, &req.task, req.category_id)?;
    info!(id, category_id = req.category_id, task = %req.task, "Created todo");
    Ok((StatusCode::CREATED, Json(id)))
}

pub async fn list_all_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = list_categories(&state.db)?;
    info!(count = categories.len(), "Listed categories");
    Ok(Json(categories))
}

pub async fn create_new_category(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<NewCategory>,
) -> Result<(StatusCode, Json<i64>), AppError> {
    let id = create_category(&state.db, &req.name)?;
    info!(id, name = %req.name, "Created category");
    Ok((StatusCode::CREATED, Json(id)))
}

pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<bool>, AppError> {
    match toggle_todo(&state.db, id)? {
        Some(done) => {
            info!(id, done, "Toggled todo");
            Ok(Json(done))
        }
        None => Err(AppError::NotFound),
    }
}
