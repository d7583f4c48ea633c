//! Lead HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::today;
use crate::api::{AppState, CurrentUser};
use crate::error::AppResult;
use crate::models::lead::{CreateLead, LeadFilter, SetLeadStatus, UpdateLead};
use crate::models::timeline::AddEntry;
use crate::models::Lead;
use crate::services::leads;

pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<LeadFilter>,
) -> AppResult<Json<Vec<Lead>>> {
    leads::list_leads(&state.store, &user, &filter, today()).await.map(Json)
}

pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateLead>,
) -> AppResult<(StatusCode, Json<Lead>)> {
    let lead = leads::create_lead(&state.store, &state.notifier, &user, req).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

pub async fn get_lead(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Lead>> {
    leads::get_lead(&state.store, &user, &id).await.map(Json)
}

pub async fn update_lead(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateLead>,
) -> AppResult<Json<Lead>> {
    leads::update_lead(&state.store, &state.notifier, &user, &id, req)
        .await
        .map(Json)
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<SetLeadStatus>,
) -> AppResult<Json<Lead>> {
    leads::update_status(&state.store, &user, &id, req.status).await.map(Json)
}

pub async fn add_remark(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<AddEntry>,
) -> AppResult<Json<Lead>> {
    leads::add_remark(&state.store, &user, &id, &req.text).await.map(Json)
}

pub async fn delete_lead(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    leads::delete_lead(&state.store, &user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
