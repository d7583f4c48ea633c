//! Campaign HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::{AppState, CurrentUser};
use crate::error::AppResult;
use crate::models::campaign::{
    CampaignView, CreateCampaign, ImportLeads, ImportResult, UpdateCampaign, UpdateCampaignLead,
};
use crate::models::Lead;
use crate::services::campaigns;

pub async fn list_campaigns(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<CampaignView>>> {
    campaigns::list_campaigns(&state.store, &user).await.map(Json)
}

pub async fn create_campaign(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateCampaign>,
) -> AppResult<(StatusCode, Json<CampaignView>)> {
    let campaign = campaigns::create_campaign(&state.store, &state.notifier, &user, req).await?;
    Ok((StatusCode::CREATED, Json(campaign)))
}

pub async fn get_campaign(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<CampaignView>> {
    campaigns::get_campaign(&state.store, &user, &id).await.map(Json)
}

pub async fn update_campaign(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateCampaign>,
) -> AppResult<Json<CampaignView>> {
    campaigns::update_campaign(&state.store, &state.notifier, &user, &id, req)
        .await
        .map(Json)
}

pub async fn delete_campaign(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    campaigns::delete_campaign(&state.store, &user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn import_leads(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<ImportLeads>,
) -> AppResult<Json<ImportResult>> {
    campaigns::import_leads(&state.store, &user, &id, req).await.map(Json)
}

pub async fn update_campaign_lead(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path((id, row_id)): Path<(String, String)>,
    Json(req): Json<UpdateCampaignLead>,
) -> AppResult<Json<CampaignView>> {
    campaigns::update_campaign_lead(&state.store, &user, &id, &row_id, req)
        .await
        .map(Json)
}

/// Returns the created pipeline lead
pub async fn convert_campaign_lead(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path((id, row_id)): Path<(String, String)>,
) -> AppResult<(StatusCode, Json<Lead>)> {
    let lead =
        campaigns::convert_campaign_lead(&state.store, &state.notifier, &user, &id, &row_id).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}
