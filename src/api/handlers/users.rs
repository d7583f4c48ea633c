//! User management HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::{AppState, CurrentUser};
use crate::error::AppResult;
use crate::models::user::{AssignProjects, CreateUser, UpdateUser};
use crate::models::UserProfile;
use crate::services::users;

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<UserProfile>>> {
    users::list_users(&state.store, &user).await.map(Json)
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<UserProfile>)> {
    let created = users::create_user(&state.store, &user, req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<UserProfile>> {
    users::get_user(&state.store, &user, &id).await.map(Json)
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateUser>,
) -> AppResult<Json<UserProfile>> {
    users::update_user(&state.store, &user, &id, req).await.map(Json)
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    users::delete_user(&state.store, &user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn assign_projects(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<AssignProjects>,
) -> AppResult<Json<UserProfile>> {
    users::assign_projects(&state.store, &user, &id, req).await.map(Json)
}
