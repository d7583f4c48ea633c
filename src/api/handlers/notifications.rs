//! Notification HTTP handlers. Every route acts on the caller's own
//! notifications.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::{AppState, CurrentUser};
use crate::error::AppResult;
use crate::models::notification::UnreadCount;
use crate::models::Notification;
use crate::services::notifications;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    unread_only: bool,
}

#[derive(Serialize)]
pub struct MarkedResponse {
    updated: usize,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    notifications::list(&state.store, &user, query.unread_only)
        .await
        .map(Json)
}

pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<UnreadCount>> {
    notifications::unread_count(&state.store, &user).await.map(Json)
}

pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Notification>> {
    notifications::mark_read(&state.store, &user, &id).await.map(Json)
}

pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<MarkedResponse>> {
    let updated = notifications::mark_all_read(&state.store, &user).await?;
    Ok(Json(MarkedResponse { updated }))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    notifications::delete(&state.store, &user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
