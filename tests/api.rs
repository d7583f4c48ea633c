//! End-to-end tests through the HTTP router against a temporary data dir

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

use propdesk_lib::api::{build_app, AppState};
use propdesk_lib::config::{AppConfig, BootstrapAdmin};
use propdesk_lib::services::users;
use propdesk_lib::store::Store;
use propdesk_lib::utils::paths;

const ADMIN_EMAIL: &str = "admin@propdesk.test";
const ADMIN_PASSWORD: &str = "admin-pass-1";

struct TestApp {
    dir: TempDir,
    state: Arc<AppState>,
    app: Router,
}

impl TestApp {
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(&paths::records_dir(dir.path())).unwrap();
        let admin = BootstrapAdmin {
            name: "Asha Admin".into(),
            email: ADMIN_EMAIL.into(),
            password_hash: users::hash_password(ADMIN_PASSWORD).unwrap(),
        };
        assert!(users::bootstrap_admin(&store, &admin).await.unwrap());
        // A second run must not create another admin
        assert!(!users::bootstrap_admin(&store, &admin).await.unwrap());

        let state = Arc::new(AppState::new(store, AppConfig::default()));
        Self {
            app: build_app(state.clone()),
            dir,
            state,
        }
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, value)
    }

    async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    async fn delete(&self, uri: &str, token: &str) -> StatusCode {
        self.send(Method::DELETE, uri, Some(token), None).await.0
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["sessionToken"].as_str().unwrap().to_string()
    }

    async fn admin(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    async fn create_project(&self, admin: &str, name: &str) -> String {
        let (status, body) = self
            .post("/api/projects", admin, json!({ "name": name, "location": "Pune" }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_str().unwrap().to_string()
    }

    /// Create a manager assigned to `project_ids`; returns (id, token)
    async fn create_manager(&self, admin: &str, email: &str, project_ids: &[&str]) -> (String, String) {
        let (status, body) = self
            .post(
                "/api/users",
                admin,
                json!({
                    "name": "Manoj Manager",
                    "email": email,
                    "password": "manager-pass-1",
                    "role": "manager",
                    "projectIds": project_ids,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert!(body.get("passwordHash").is_none());
        let id = body["id"].as_str().unwrap().to_string();
        let token = self.login(email, "manager-pass-1").await;
        (id, token)
    }
}

#[tokio::test]
async fn test_health_is_public_and_api_requires_session() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.send(Method::GET, "/api/leads", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = app.get("/api/leads", "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_logout_and_me() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": ADMIN_EMAIL, "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");

    // Emails are matched case-insensitively
    let token = app.login("ADMIN@propdesk.test", ADMIN_PASSWORD).await;
    let (status, me) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["role"], "admin");

    let (status, _) = app.send(Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_manager_sees_only_scoped_leads() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let north = app.create_project(&admin, "North Plaza").await;
    let south = app.create_project(&admin, "South Arcade").await;
    let (manager_id, manager) = app.create_manager(&admin, "manoj@propdesk.test", &[&north]).await;

    let (status, north_lead) = app
        .post(
            "/api/leads",
            &admin,
            json!({ "name": "Meera", "contactNo": "98765 43210", "projectId": north, "leadSource": "Website" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", north_lead);
    let (_, south_lead) = app
        .post(
            "/api/leads",
            &admin,
            json!({ "name": "Vikram", "contactNo": "91234 56789", "projectId": south }),
        )
        .await;

    let (status, visible) = app.get("/api/leads", &manager).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = visible.as_array().unwrap().iter().map(|l| l["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Meera"]);

    let uri = format!("/api/leads/{}", south_lead["id"].as_str().unwrap());
    let (status, body) = app.get(&uri, &manager).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = app
        .post("/api/leads", &manager, json!({ "name": "Kiran", "contactNo": "99887 76655", "projectId": south }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Unassigned leads created by a manager land with that manager
    let (status, own) = app
        .post("/api/leads", &manager, json!({ "name": "Kiran", "contactNo": "99887 76655", "projectId": north }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(own["assignedTo"], manager_id.as_str());

    let (status, _) = app
        .post("/api/leads", &admin, json!({ "name": "Bad", "contactNo": "12ab" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, filtered) = app.get("/api/leads?q=meera&status=new", &admin).await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);

    // Only admins delete leads
    let uri = format!("/api/leads/{}", own["id"].as_str().unwrap());
    let (status, _) = app.send(Method::DELETE, &uri, Some(&manager), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.send(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_lead_assignment_notifies_assignee() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (manager_id, manager) = app.create_manager(&admin, "manoj@propdesk.test", &[]).await;

    let (status, lead) = app
        .post(
            "/api/leads",
            &admin,
            json!({ "name": "Meera", "contactNo": "98765 43210", "assignedTo": manager_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, count) = app.get("/api/notifications/unread-count", &manager).await;
    assert_eq!(count["unread"], 1);
    let (_, list) = app.get("/api/notifications", &manager).await;
    assert_eq!(list[0]["type"], "leadAssigned");
    assert_eq!(list[0]["leadId"], lead["id"]);

    // Assigned leads are visible even without a project in scope
    let uri = format!("/api/leads/{}/remarks", lead["id"].as_str().unwrap());
    let (status, updated) = app.post(&uri, &manager, json!({ "text": "Called, wants a site visit" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["remarks"][0]["authorName"], "Manoj Manager");

    let (status, body) = app.post("/api/notifications/read-all", &manager, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);
    let (_, count) = app.get("/api/notifications/unread-count", &manager).await;
    assert_eq!(count["unread"], 0);
}

#[tokio::test]
async fn test_task_comments_thread_and_notify() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (manager_id, manager) = app.create_manager(&admin, "manoj@propdesk.test", &[]).await;

    let (status, task) = app
        .post("/api/tasks", &admin, json!({ "title": "Collect rent cheque", "assignedTo": manager_id }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["number"], 1);
    let (_, second) = app.post("/api/tasks", &admin, json!({ "title": "Site visit" })).await;
    assert_eq!(second["number"], 2);

    let task_id = task["id"].as_str().unwrap();
    let comments = format!("/api/tasks/{}/comments", task_id);
    let (status, detail) = app.post(&comments, &manager, json!({ "text": "On it" })).await;
    assert_eq!(status, StatusCode::CREATED);
    let root_id = detail["comments"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = app.post(&comments, &admin, json!({ "text": "Thanks", "parentId": root_id })).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = app.post(&comments, &admin, json!({ "text": "?", "parentId": "missing" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PARAMS");

    let (_, threads) = app.get(&comments, &manager).await;
    assert_eq!(threads.as_array().unwrap().len(), 1);
    assert_eq!(threads[0]["comment"]["text"], "On it");
    assert_eq!(threads[0]["replies"][0]["comment"]["text"], "Thanks");

    // Manager completes the admin's task: admin hears about comment and status
    let status_uri = format!("/api/tasks/{}/status", task_id);
    let (status, updated) = app.put(&status_uri, &manager, json!({ "status": "completed" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "completed");

    let (_, admin_notes) = app.get("/api/notifications", &admin).await;
    let kinds: Vec<&str> = admin_notes.as_array().unwrap().iter().map(|n| n["type"].as_str().unwrap()).collect();
    assert!(kinds.contains(&"taskComment"));
    assert!(kinds.contains(&"taskStatus"));

    // Manager sees its assigned task but not the unassigned one
    let (_, visible) = app.get("/api/tasks", &manager).await;
    assert_eq!(visible.as_array().unwrap().len(), 1);
    let (_, by_number) = app.get("/api/tasks?q=%232", &admin).await;
    assert_eq!(by_number[0]["title"], "Site visit");
}

#[tokio::test]
async fn test_campaign_import_and_convert() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (manager_id, manager) = app.create_manager(&admin, "manoj@propdesk.test", &[]).await;

    let (status, campaign) = app
        .post(
            "/api/campaigns",
            &admin,
            json!({
                "name": "Diwali Offices",
                "assignedTo": manager_id,
                "leads": [
                    { "name": "Asha", "contactNo": "98765 43210", "requirement": "Office" },
                    { "name": "Asha dup", "contactNo": "98765-43210" },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", campaign);
    assert_eq!(campaign["leads"].as_array().unwrap().len(), 1);
    assert_eq!(campaign["counts"]["pending"], 1);
    let campaign_id = campaign["id"].as_str().unwrap();

    let import = format!("/api/campaigns/{}/import", campaign_id);
    let (status, result) = app
        .post(
            &import,
            &manager,
            json!({ "leads": [
                { "name": "Asha again", "contactNo": "(98765) 43210" },
                { "name": "Ravi", "contactNo": "91234 56789" },
            ] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["added"], 1);
    assert_eq!(result["skipped"], 1);

    let (_, view) = app.get(&format!("/api/campaigns/{}", campaign_id), &manager).await;
    let row_id = view["leads"][0]["id"].as_str().unwrap();

    let convert = format!("/api/campaigns/{}/leads/{}/convert", campaign_id, row_id);
    let (status, lead) = app.post(&convert, &manager, json!({})).await;
    assert_eq!(status, StatusCode::CREATED, "{}", lead);
    assert_eq!(lead["leadSource"], "campaign:Diwali Offices");
    assert_eq!(lead["assignedTo"], manager_id.as_str());
    assert_eq!(lead["campaignId"], campaign_id);

    let (status, _) = app.post(&convert, &manager, json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, view) = app.get(&format!("/api/campaigns/{}", campaign_id), &manager).await;
    assert_eq!(view["counts"]["converted"], 1);
    assert_eq!(view["leads"][0]["leadId"], lead["id"]);

    // Managers may change status but not reassign
    let uri = format!("/api/campaigns/{}", campaign_id);
    let (status, _) = app.put(&uri, &manager, json!({ "status": "paused" })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.put(&uri, &manager, json!({ "assignedTo": manager_id })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, notes) = app.get("/api/notifications", &manager).await;
    assert_eq!(notes[0]["type"], "campaignAssigned");
}

#[tokio::test]
async fn test_accounts_are_admin_only() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (_, manager) = app.create_manager(&admin, "manoj@propdesk.test", &[]).await;

    let (status, _) = app.get("/api/accounts", &manager).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    for (amount, kind, mode, category) in [
        (100000.0, "income", "bank", "Rent"),
        (20000.0, "expense", "cash", "maintenance"),
        (5000.0, "payout", "upi", "Commission"),
    ] {
        let (status, body) = app
            .post(
                "/api/accounts",
                &admin,
                json!({ "date": "2026-04-10", "amount": amount, "type": kind, "mode": mode, "category": category }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
    }

    let (status, summary) = app.get("/api/accounts/summary", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["netBalance"], 75000.0);
    assert_eq!(summary["entryCount"], 3);
    assert_eq!(summary["netBalanceFormatted"], "₹75,000.00");

    let (_, categories) = app.get("/api/accounts/categories", &admin).await;
    assert_eq!(categories, json!(["Commission", "maintenance", "Rent"]));

    let (_, expenses) = app.get("/api/accounts?type=expense", &admin).await;
    assert_eq!(expenses.as_array().unwrap().len(), 1);

    let (status, _) = app
        .post(
            "/api/accounts",
            &admin,
            json!({ "date": "2026-04-10", "amount": -5, "type": "income", "mode": "cash" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_inventory_rent_and_vacate() {
    let app = TestApp::new().await;
    let admin = app.admin().await;

    let (status, _) = app
        .post(
            "/api/inventory",
            &admin,
            json!({ "location": "MG Road", "propertyType": "shop", "size": 0, "unit": "sqFt" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, item) = app
        .post(
            "/api/inventory",
            &admin,
            json!({ "location": "MG Road", "propertyType": "shop", "size": 400, "unit": "sqFt", "rent": 125000 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", item);
    assert_eq!(item["rentFormatted"], "₹1,25,000.00");
    assert_eq!(item["rentInWords"], "One Lakh Twenty Five Thousand");

    let id = item["id"].as_str().unwrap();
    let (status, _) = app
        .post(&format!("/api/inventory/{}/rent", id), &admin, json!({ "tenantName": " " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, rented) = app
        .post(
            &format!("/api/inventory/{}/rent", id),
            &admin,
            json!({ "tenantName": "Sharma Traders", "rentedOn": "2026-04-01" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rented["rented"], true);

    let (_, dashboard) = app.get("/api/dashboard", &admin).await;
    assert_eq!(dashboard["inventory"]["rented"], 1);
    assert_eq!(dashboard["inventory"]["monthlyRentRoll"], 125000.0);

    let (status, vacant) = app
        .send(Method::POST, &format!("/api/inventory/{}/vacate", id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(vacant["rented"], false);
    assert!(vacant.get("tenantName").is_none());

    let (_, listed) = app.get("/api/inventory?rented=false&minSize=300", &admin).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_last_admin_is_protected() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (_, me) = app.get("/api/auth/me", &admin).await;
    let uri = format!("/api/users/{}", me["id"].as_str().unwrap());

    let (status, _) = app.put(&uri, &admin, json!({ "role": "manager" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = app.send(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_inventory_writes_need_project_scope() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let north = app.create_project(&admin, "North Plaza").await;
    let south = app.create_project(&admin, "South Arcade").await;
    let (_, manager) = app.create_manager(&admin, "manoj@propdesk.test", &[&north]).await;

    let mut ids = Vec::new();
    for project in [&north, &south] {
        let (status, item) = app
            .post(
                "/api/inventory",
                &admin,
                json!({ "projectId": project, "location": "Block A", "propertyType": "office", "size": 900, "unit": "sqFt", "rent": 60000 }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", item);
        ids.push(item["id"].as_str().unwrap().to_string());
    }
    let (north_unit, south_unit) = (&ids[0], &ids[1]);

    // Everything is readable
    let (status, _) = app.get(&format!("/api/inventory/{}", south_unit), &manager).await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/api/inventory/{}", south_unit);
    let (status, body) = app.put(&uri, &manager, json!({ "rent": 1 })).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{}", body);
    let (status, _) = app.post(&format!("{}/notes", uri), &manager, json!({ "text": "Lift broken" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.post(&format!("{}/rent", uri), &manager, json!({ "tenantName": "Rao & Sons" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.post(&format!("{}/rent", uri), &admin, json!({ "tenantName": "Rao & Sons" })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.send(Method::POST, &format!("{}/vacate", uri), Some(&manager), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, unit) = app.get(&uri, &admin).await;
    assert_eq!(unit["rent"], 60000.0);
    assert_eq!(unit["rented"], true);
    assert!(unit["notes"].as_array().unwrap().is_empty());

    // Units in the manager's own project stay editable
    let uri = format!("/api/inventory/{}", north_unit);
    let (status, unit) = app.put(&uri, &manager, json!({ "rent": 65000 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unit["rent"], 65000.0);
    let (status, _) = app.post(&format!("{}/rent", uri), &manager, json!({ "tenantName": "Kapoor Travels" })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.send(Method::POST, &format!("{}/vacate", uri), Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_project_delete_detaches_users() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let north = app.create_project(&admin, "North Plaza").await;
    let south = app.create_project(&admin, "South Arcade").await;
    let (manager_id, _) = app.create_manager(&admin, "manoj@propdesk.test", &[&north, &south]).await;

    assert_eq!(app.delete(&format!("/api/projects/{}", north), &admin).await, StatusCode::NO_CONTENT);

    let (status, user) = app.get(&format!("/api/users/{}", manager_id), &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["projectIds"], json!([south]));
    let (status, _) = app.get(&format!("/api/projects/{}", north), &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_notifications_of_others_are_not_found() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (owner_id, owner) = app.create_manager(&admin, "manoj@propdesk.test", &[]).await;
    let (_, other) = app.create_manager(&admin, "nisha@propdesk.test", &[]).await;

    let (status, _) = app
        .post("/api/tasks", &admin, json!({ "title": "Renew lease", "assignedTo": owner_id }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, list) = app.get("/api/notifications", &owner).await;
    let id = list[0]["id"].as_str().unwrap().to_string();

    let (status, body) = app.put(&format!("/api/notifications/{}/read", id), &other, json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(app.delete(&format!("/api/notifications/{}", id), &other).await, StatusCode::NOT_FOUND);

    let (_, count) = app.get("/api/notifications/unread-count", &owner).await;
    assert_eq!(count["unread"], 1);
    let (status, read) = app.put(&format!("/api/notifications/{}/read", id), &owner, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["read"], true);
    assert_eq!(app.delete(&format!("/api/notifications/{}", id), &owner).await, StatusCode::NO_CONTENT);
    let (_, list) = app.get("/api/notifications", &owner).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_manager_can_only_edit_own_name_and_password() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (manager_id, manager) = app.create_manager(&admin, "manoj@propdesk.test", &[]).await;
    let (_, me) = app.get("/api/auth/me", &admin).await;
    let admin_id = me["id"].as_str().unwrap();

    let own = format!("/api/users/{}", manager_id);
    let (status, _) = app.put(&own, &manager, json!({ "email": "boss@propdesk.test" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.put(&own, &manager, json!({ "role": "admin" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.put(&format!("/api/users/{}", admin_id), &manager, json!({ "name": "Hijacked" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = app
        .put(&own, &manager, json!({ "name": "Manoj Kumar", "password": "fresh-pass-22" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Manoj Kumar");
    assert_eq!(updated["role"], "manager");
    app.login("manoj@propdesk.test", "fresh-pass-22").await;

    let (_, users) = app.get("/api/users", &manager).await;
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_campaign_rows_convert_only_through_convert() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (manager_id, manager) = app.create_manager(&admin, "manoj@propdesk.test", &[]).await;

    let (_, campaign) = app
        .post(
            "/api/campaigns",
            &admin,
            json!({ "name": "Warehouse push", "assignedTo": manager_id, "leads": [{ "name": "Gupta", "contactNo": "98111 22233" }] }),
        )
        .await;
    let campaign_id = campaign["id"].as_str().unwrap();
    let row_id = campaign["leads"][0]["id"].as_str().unwrap();
    let row = format!("/api/campaigns/{}/leads/{}", campaign_id, row_id);

    let (status, body) = app.put(&row, &manager, json!({ "status": "converted" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    let (status, view) = app.put(&row, &manager, json!({ "status": "interested", "remark": "Needs 5000 sq ft" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["leads"][0]["status"], "interested");

    let (status, lead) = app.post(&format!("{}/convert", row), &manager, json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(lead["remarks"][0]["text"], "Needs 5000 sq ft");

    let (status, _) = app.put(&row, &manager, json!({ "status": "called" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, view) = app.put(&row, &manager, json!({ "remark": "Visit booked" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["leads"][0]["status"], "converted");
    assert_eq!(view["leads"][0]["remark"], "Visit booked");
}

#[tokio::test]
async fn test_notification_feed_is_per_user() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (first_id, _) = app.create_manager(&admin, "manoj@propdesk.test", &[]).await;
    let (second_id, _) = app.create_manager(&admin, "nisha@propdesk.test", &[]).await;

    let (status, _) = app.send(Method::GET, "/api/ws/notifications", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut feed = app.state.notifier.subscribe_user(first_id.clone());
    app.post("/api/tasks", &admin, json!({ "title": "Not for Manoj", "assignedTo": second_id }))
        .await;
    app.post("/api/tasks", &admin, json!({ "title": "Meter reading", "assignedTo": first_id }))
        .await;

    let received = tokio::time::timeout(Duration::from_secs(5), feed.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(received.user_id, first_id);
    assert!(received.message.contains("Meter reading"), "{}", received.message);
}

#[tokio::test]
async fn test_dates_can_be_cleared() {
    let app = TestApp::new().await;
    let admin = app.admin().await;

    let (_, task) = app
        .post("/api/tasks", &admin, json!({ "title": "Renew lease", "dueDate": "2026-05-01" }))
        .await;
    let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());
    let (_, kept) = app.put(&uri, &admin, json!({ "title": "Renew lease (Block A)" })).await;
    assert_eq!(kept["dueDate"], "2026-05-01");
    let (status, cleared) = app.put(&uri, &admin, json!({ "dueDate": null })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared.get("dueDate").is_none());

    let (_, lead) = app
        .post("/api/leads", &admin, json!({ "name": "Meera", "contactNo": "98765 43210", "followUpDate": "2026-05-03" }))
        .await;
    let uri = format!("/api/leads/{}", lead["id"].as_str().unwrap());
    let (status, cleared) = app.put(&uri, &admin, json!({ "followUpDate": null })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared.get("followUpDate").is_none());
}

#[tokio::test]
async fn test_updates_keep_unreadable_records() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let project = app.create_project(&admin, "North Plaza").await;

    let path = paths::collection_path(&paths::records_dir(app.dir.path()), "projects");
    let mut text = std::fs::read_to_string(&path).unwrap();
    text.push_str("{\"id\":\"legacy-1\",\"title\":\"old format\"}\n");
    std::fs::write(&path, text).unwrap();

    let (status, _) = app
        .put(&format!("/api/projects/{}", project), &admin, json!({ "location": "Nashik" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("legacy-1"));
}
