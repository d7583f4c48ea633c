//! Inventory HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::{AppState, CurrentUser};
use crate::error::AppResult;
use crate::models::inventory::{
    CreateInventory, InventoryFilter, InventoryView, RentOut, UpdateInventory,
};
use crate::models::timeline::AddEntry;
use crate::services::inventory;

pub async fn list_items(
    State(state): State<Arc<AppState>>,
    CurrentUser(_): CurrentUser,
    Query(filter): Query<InventoryFilter>,
) -> AppResult<Json<Vec<InventoryView>>> {
    inventory::list_items(&state.store, &filter).await.map(Json)
}

pub async fn create_item(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateInventory>,
) -> AppResult<(StatusCode, Json<InventoryView>)> {
    let item = inventory::create_item(&state.store, &user, req).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_item(
    State(state): State<Arc<AppState>>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<InventoryView>> {
    inventory::get_item(&state.store, &id).await.map(Json)
}

pub async fn update_item(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateInventory>,
) -> AppResult<Json<InventoryView>> {
    inventory::update_item(&state.store, &user, &id, req).await.map(Json)
}

pub async fn add_note(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<AddEntry>,
) -> AppResult<Json<InventoryView>> {
    inventory::add_note(&state.store, &user, &id, &req.text).await.map(Json)
}

pub async fn mark_rented(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<RentOut>,
) -> AppResult<Json<InventoryView>> {
    inventory::mark_rented(&state.store, &user, &id, req).await.map(Json)
}

pub async fn mark_vacant(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<InventoryView>> {
    inventory::mark_vacant(&state.store, &user, &id).await.map(Json)
}

pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    inventory::delete_item(&state.store, &user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
