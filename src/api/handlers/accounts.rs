//! Finance ledger HTTP handlers (admin only, enforced by the service)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::today;
use crate::api::{AppState, CurrentUser};
use crate::error::AppResult;
use crate::models::account::{CreateEntry, UpdateEntry};
use crate::models::{AccountEntry, AccountFilter, AccountSummary};
use crate::services::accounts;

pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<AccountFilter>,
) -> AppResult<Json<Vec<AccountEntry>>> {
    accounts::list_entries(&state.store, &user, &filter, today())
        .await
        .map(Json)
}

pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateEntry>,
) -> AppResult<(StatusCode, Json<AccountEntry>)> {
    let entry = accounts::create_entry(&state.store, &user, req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AccountEntry>> {
    accounts::get_entry(&state.store, &user, &id).await.map(Json)
}

pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateEntry>,
) -> AppResult<Json<AccountEntry>> {
    accounts::update_entry(&state.store, &user, &id, req).await.map(Json)
}

pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    accounts::delete_entry(&state.store, &user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn summary(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<AccountFilter>,
) -> AppResult<Json<AccountSummary>> {
    accounts::summary(&state.store, &user, &filter, today())
        .await
        .map(Json)
}

pub async fn categories(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<String>>> {
    accounts::categories(&state.store, &user).await.map(Json)
}
