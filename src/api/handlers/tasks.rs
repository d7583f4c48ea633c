//! Task HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::{AppState, CurrentUser};
use crate::error::AppResult;
use crate::models::task::{AddComment, CreateTask, SetTaskStatus, TaskDetail, TaskFilter, UpdateTask};
use crate::models::{CommentThread, Task};
use crate::services::tasks;

pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<TaskFilter>,
) -> AppResult<Json<Vec<Task>>> {
    tasks::list_tasks(&state.store, &user, &filter).await.map(Json)
}

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let task = tasks::create_task(&state.store, &state.notifier, &user, req).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<TaskDetail>> {
    tasks::get_task(&state.store, &user, &id).await.map(Json)
}

pub async fn update_task(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTask>,
) -> AppResult<Json<Task>> {
    tasks::update_task(&state.store, &state.notifier, &user, &id, req)
        .await
        .map(Json)
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<SetTaskStatus>,
) -> AppResult<Json<Task>> {
    tasks::update_status(&state.store, &state.notifier, &user, &id, req.status)
        .await
        .map(Json)
}

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<CommentThread>>> {
    tasks::comment_threads(&state.store, &user, &id).await.map(Json)
}

pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<AddComment>,
) -> AppResult<(StatusCode, Json<TaskDetail>)> {
    let detail = tasks::add_comment(&state.store, &state.notifier, &user, &id, req).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    tasks::delete_task(&state.store, &user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
