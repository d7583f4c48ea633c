use axum::{extract::State, Json};
use std::sync::Arc;

use super::today;
use crate::api::{AppState, CurrentUser};
use crate::error::AppResult;
use crate::models::DashboardSummary;
use crate::services::dashboard;

pub async fn summary(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<DashboardSummary>> {
    dashboard::summary(&state.store, &user, today()).await.map(Json)
}
