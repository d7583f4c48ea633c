//! HTTP API route definitions

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use super::auth;
use super::handlers;
use super::ws;
use super::AppState;

/// Create the main API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    // Routes reachable without a session
    let public_routes = Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/auth/login", post(auth::login));

    let protected_routes = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/options", get(handlers::options))
        .route("/api/dashboard", get(handlers::dashboard::summary))
        // Users
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/api/users/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route("/api/users/{id}/projects", put(handlers::users::assign_projects))
        // Projects
        .route(
            "/api/projects",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route(
            "/api/projects/{id}",
            get(handlers::projects::get_project)
                .put(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        )
        // Leads
        .route(
            "/api/leads",
            get(handlers::leads::list_leads).post(handlers::leads::create_lead),
        )
        .route(
            "/api/leads/{id}",
            get(handlers::leads::get_lead)
                .put(handlers::leads::update_lead)
                .delete(handlers::leads::delete_lead),
        )
        .route("/api/leads/{id}/status", put(handlers::leads::update_status))
        .route("/api/leads/{id}/remarks", post(handlers::leads::add_remark))
        // Tasks
        .route(
            "/api/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route(
            "/api/tasks/{id}",
            get(handlers::tasks::get_task)
                .put(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        )
        .route("/api/tasks/{id}/status", put(handlers::tasks::update_status))
        .route(
            "/api/tasks/{id}/comments",
            get(handlers::tasks::list_comments).post(handlers::tasks::add_comment),
        )
        // Inventory
        .route(
            "/api/inventory",
            get(handlers::inventory::list_items).post(handlers::inventory::create_item),
        )
        .route(
            "/api/inventory/{id}",
            get(handlers::inventory::get_item)
                .put(handlers::inventory::update_item)
                .delete(handlers::inventory::delete_item),
        )
        .route("/api/inventory/{id}/notes", post(handlers::inventory::add_note))
        .route("/api/inventory/{id}/rent", post(handlers::inventory::mark_rented))
        .route("/api/inventory/{id}/vacate", post(handlers::inventory::mark_vacant))
        // Accounts (static routes before dynamic {id} routes)
        .route(
            "/api/accounts",
            get(handlers::accounts::list_entries).post(handlers::accounts::create_entry),
        )
        .route("/api/accounts/summary", get(handlers::accounts::summary))
        .route("/api/accounts/categories", get(handlers::accounts::categories))
        .route(
            "/api/accounts/{id}",
            get(handlers::accounts::get_entry)
                .put(handlers::accounts::update_entry)
                .delete(handlers::accounts::delete_entry),
        )
        // Campaigns
        .route(
            "/api/campaigns",
            get(handlers::campaigns::list_campaigns).post(handlers::campaigns::create_campaign),
        )
        .route(
            "/api/campaigns/{id}",
            get(handlers::campaigns::get_campaign)
                .put(handlers::campaigns::update_campaign)
                .delete(handlers::campaigns::delete_campaign),
        )
        .route("/api/campaigns/{id}/import", post(handlers::campaigns::import_leads))
        .route(
            "/api/campaigns/{id}/leads/{row_id}",
            put(handlers::campaigns::update_campaign_lead),
        )
        .route(
            "/api/campaigns/{id}/leads/{row_id}/convert",
            post(handlers::campaigns::convert_campaign_lead),
        )
        // Notifications
        .route("/api/notifications", get(handlers::notifications::list))
        .route(
            "/api/notifications/unread-count",
            get(handlers::notifications::unread_count),
        )
        .route(
            "/api/notifications/read-all",
            post(handlers::notifications::mark_all_read),
        )
        .route(
            "/api/notifications/{id}",
            delete(handlers::notifications::delete),
        )
        .route("/api/notifications/{id}/read", put(handlers::notifications::mark_read))
        // WebSocket endpoints
        .route("/api/ws/notifications", get(ws::notifications_stream))
        .layer(middleware::from_fn_with_state(state.clone(), auth::auth_middleware));

    public_routes.merge(protected_routes).with_state(state)
}
