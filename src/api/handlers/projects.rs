//! Project HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::{AppState, CurrentUser};
use crate::error::AppResult;
use crate::models::project::{CreateProject, UpdateProject};
use crate::models::Project;
use crate::services::projects;

pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Project>>> {
    projects::list_projects(&state.store, &user).await.map(Json)
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let project = projects::create_project(&state.store, &user, req).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Project>> {
    projects::get_project(&state.store, &user, &id).await.map(Json)
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    projects::update_project(&state.store, &user, &id, req).await.map(Json)
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    projects::delete_project(&state.store, &user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
