//! Authentication middleware and login handlers
//!
//! Users sign in with email and password and get an opaque session token.
//! Sessions live in memory and expire after `auth.session_ttl_hours`.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ts_rs::TS;

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{User, UserProfile};
use crate::services::users;

pub const SESSION_HEADER: &str = "x-propdesk-session";

#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn is_expired(&self, at: DateTime<Utc>) -> bool {
        self.expires_at <= at
    }
}

/// Token -> session
pub type SessionStore = Arc<DashMap<String, Session>>;

/// Generate a random session token
pub fn generate_session_token() -> String {
    let token: [u8; 32] = rand::thread_rng().gen();
    hex::encode(token)
}

/// The signed-in user, attached to the request by [`auth_middleware`]
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

/// Authentication middleware
///
/// Checks for a valid session token in:
/// 1. `Authorization: Bearer <token>` header
/// 2. `X-PropDesk-Session` header
///
/// The user is re-read from the store on every request so role changes and
/// deletions take effect immediately.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_session_token(request.headers()) else {
        return AppError::unauthorized("Authentication required").into_response();
    };

    let user = match resolve_session(&state, &token).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(CurrentUser(user));
    next.run(request).await
}

async fn resolve_session(state: &AppState, token: &str) -> AppResult<User> {
    let session = state
        .sessions
        .get(token)
        .map(|s| s.value().clone())
        .ok_or_else(|| AppError::unauthorized("Invalid session"))?;

    if session.is_expired(Utc::now()) {
        state.sessions.remove(token);
        return Err(AppError::unauthorized("Session expired"));
    }

    match state.store.users.get(&session.user_id).await? {
        Some(user) => Ok(user),
        None => {
            state.sessions.remove(token);
            Err(AppError::unauthorized("Account no longer exists"))
        }
    }
}

fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        if let Some(token) = auth.strip_prefix("Bearer ") {
            return Some(token.trim().to_string());
        }
    }

    // Tokens are never read from query params: URLs end up in access logs
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
}

// Auth route handlers

#[derive(Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    session_token: String,
    expires_at: DateTime<Utc>,
    user: UserProfile,
}

/// When a session started at `at` runs out
fn session_expiry(at: DateTime<Utc>, ttl_hours: i64) -> AppResult<DateTime<Utc>> {
    Duration::try_hours(ttl_hours)
        .and_then(|ttl| at.checked_add_signed(ttl))
        .ok_or_else(|| {
            AppError::config("auth.session_ttl_hours is out of range")
                .with_details(ttl_hours.to_string())
        })
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = match users::authenticate(&state.store, &req.email, &req.password).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(email = %req.email.trim(), "Failed login attempt");
            return Err(e);
        }
    };

    let at = Utc::now();
    state.sessions.retain(|_, s| !s.is_expired(at));

    let token = generate_session_token();
    let expires_at = session_expiry(at, state.config.auth.session_ttl_hours)?;
    state.sessions.insert(
        token.clone(),
        Session {
            user_id: user.id.clone(),
            expires_at,
        },
    );
    tracing::info!(user = %user.id, "User signed in");

    Ok(Json(LoginResponse {
        session_token: token,
        expires_at,
        user: UserProfile::from(&user),
    }))
}

pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = extract_session_token(&headers) {
        state.sessions.remove(&token);
    }
    StatusCode::NO_CONTENT
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(UserProfile::from(&user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_token_is_64_hex_chars() {
        let token = generate_session_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_session_token());
    }

    #[test]
    fn test_extract_token_from_either_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_session_token(&headers), None);

        headers.insert(SESSION_HEADER, HeaderValue::from_static("abc"));
        assert_eq!(extract_session_token(&headers).as_deref(), Some("abc"));

        headers.insert("authorization", HeaderValue::from_static("Bearer xyz"));
        assert_eq!(extract_session_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_session_expiry() {
        let at = Utc::now();
        let session = Session {
            user_id: "u1".into(),
            expires_at: at,
        };
        assert!(session.is_expired(at));
        assert!(!session.is_expired(at - Duration::seconds(1)));
    }

    #[test]
    fn test_session_expiry_rejects_overflowing_ttl() {
        let at = Utc::now();
        assert_eq!(session_expiry(at, 12).unwrap(), at + Duration::hours(12));
        assert!(session_expiry(at, i64::MAX / 2).is_err());
        assert!(session_expiry(at, i64::MAX).is_err());
    }
}
