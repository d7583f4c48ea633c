//! HTTP request handlers
//!
//! Handlers unpack the request, call the matching service with the
//! signed-in user and hand the result back as JSON. Errors render through
//! `AppError`'s `IntoResponse`.

pub mod accounts;
pub mod campaigns;
pub mod dashboard;
pub mod inventory;
pub mod leads;
pub mod notifications;
pub mod projects;
pub mod tasks;
pub mod users;

use axum::{extract::State, Json};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use ts_rs::TS;

use super::{AppState, CurrentUser};
use crate::config::UiOptions;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Option lists for the client's forms
#[derive(Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OptionsResponse {
    lead_sources: Vec<String>,
    account_categories: Vec<String>,
}

pub async fn options(
    State(state): State<Arc<AppState>>,
    CurrentUser(_): CurrentUser,
) -> Json<OptionsResponse> {
    let UiOptions {
        lead_sources,
        account_categories,
    } = state.config.ui.clone();
    Json(OptionsResponse {
        lead_sources,
        account_categories,
    })
}

/// Calendar day used for date presets (UTC)
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
