use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AppError, AppResult};
use crate::format::normalize_phone;
use crate::models::clean;
use crate::store::Store;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

// Digits with optional leading +, spaces, dashes, dots and parentheses
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ()\-.]+$").expect("valid phone regex"));

pub const MIN_PASSWORD_LEN: usize = 8;

/// Trimmed, non-empty text
pub fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::invalid_params(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

pub fn email(value: &str) -> AppResult<String> {
    let value = value.trim().to_lowercase();
    if !EMAIL_RE.is_match(&value) {
        return Err(AppError::invalid_params("Invalid email address").with_details(value));
    }
    Ok(value)
}

/// Contact numbers keep their formatting but must hold 7-15 digits
pub fn phone(value: &str) -> AppResult<String> {
    let value = value.trim();
    let digits = normalize_phone(value).len();
    if !PHONE_RE.is_match(value) || !(7..=15).contains(&digits) {
        return Err(AppError::invalid_params("Invalid contact number").with_details(value.to_string()));
    }
    Ok(value.to_string())
}

pub fn password(value: &str) -> AppResult<()> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid_params(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

pub fn non_negative(field: &str, value: f64) -> AppResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::invalid_params(format!("{} must be zero or more", field)));
    }
    Ok(value)
}

pub fn positive(field: &str, value: f64) -> AppResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AppError::invalid_params(format!("{} must be greater than zero", field)));
    }
    Ok(value)
}

/// Resolve an optional user link; blank clears it, unknown ids are rejected
pub async fn user_ref(store: &Store, id: Option<String>) -> AppResult<Option<String>> {
    match clean(id) {
        Some(id) => {
            if store.users.get(&id).await?.is_none() {
                return Err(AppError::invalid_params("Unknown user").with_details(id));
            }
            Ok(Some(id))
        }
        None => Ok(None),
    }
}

pub async fn project_ref(store: &Store, id: Option<String>) -> AppResult<Option<String>> {
    match clean(id) {
        Some(id) => {
            if store.projects.get(&id).await?.is_none() {
                return Err(AppError::invalid_params("Unknown project").with_details(id));
            }
            Ok(Some(id))
        }
        None => Ok(None),
    }
}

pub async fn lead_ref(store: &Store, id: Option<String>) -> AppResult<Option<String>> {
    match clean(id) {
        Some(id) => {
            if store.leads.get(&id).await?.is_none() {
                return Err(AppError::invalid_params("Unknown lead").with_details(id));
            }
            Ok(Some(id))
        }
        None => Ok(None),
    }
}
