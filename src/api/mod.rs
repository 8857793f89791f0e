//! Clario REST API
//!
//! HTTP API layer for Clario, built with Axum.
//!
//! # Endpoints
//!
//! ## Users and sessions
//! - `POST /api/users/register` - Create an account
//! - `POST /api/users/login` - Issue a bearer token
//! - `POST /api/users/logout` - Revoke the presented token
//! - `GET /api/users/me` - The authenticated account
//! - `GET /api/users` - List accounts (admin)
//! - `POST /api/users` - Create an account directly (admin)
//! - `GET /api/users/:id` - Get an account (admin)
//! - `PUT /api/users/:id` - Update an account (admin or self)
//! - `DELETE /api/users/:id` - Delete an account (admin or self)
//! - `GET /api/users/dashboard/stats` - Dashboard digest
//!
//! ## Tasks
//! - `GET /api/tasks` - List tasks
//! - `POST /api/tasks` - Create a task
//! - `GET /api/tasks/:id` - Get a task
//! - `PUT /api/tasks/:id` - Update a task
//! - `DELETE /api/tasks/:id` - Delete a task
//! - `GET /api/tasks/stats` - Completion-state statistics
//!
//! ## Events
//! - `GET /api/events` - List events
//! - `POST /api/events` - Create an event
//! - `GET /api/events/range` - Events overlapping a window
//! - `GET /api/events/:id` - Get an event
//! - `PUT /api/events/:id` - Update an event
//! - `DELETE /api/events/:id` - Delete an event
//!
//! ## Moods
//! - `GET /api/moods` - List mood entries
//! - `POST /api/moods` - Create a mood entry
//! - `GET /api/moods/:id` - Get a mood entry
//! - `PUT /api/moods/:id` - Update a mood entry
//! - `DELETE /api/moods/:id` - Delete a mood entry
//! - `GET /api/moods/stats` - Per-symbol statistics
//! - `GET /api/moods/date/:date` - Entries on a calendar day
//!
//! ## Health
//! - `GET /health` - Liveness and uptime
//!
//! All private routes expect `Authorization: Bearer <token>`. Success
//! responses are wrapped as `{success: true, count?, data}`.

pub mod dto;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use extract::CurrentUser;
pub use state::{ApiConfig, AppState};

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/register", post(routes::users::register))
        .route("/login", post(routes::users::login))
        .route("/logout", post(routes::users::logout))
        .route("/me", get(routes::users::me))
        .route("/", get(routes::users::list_users))
        .route("/", post(routes::users::create_user))
        .route("/:id", get(routes::users::get_user))
        .route("/:id", put(routes::users::update_user))
        .route("/:id", delete(routes::users::delete_user))
        .route("/dashboard/stats", get(routes::users::dashboard_stats));

    let task_routes = Router::new()
        .route("/", get(routes::tasks::list_tasks))
        .route("/", post(routes::tasks::create_task))
        .route("/stats", get(routes::tasks::task_stats))
        .route("/:id", get(routes::tasks::get_task))
        .route("/:id", put(routes::tasks::update_task))
        .route("/:id", delete(routes::tasks::delete_task));

    let event_routes = Router::new()
        .route("/", get(routes::events::list_events))
        .route("/", post(routes::events::create_event))
        .route("/range", get(routes::events::events_in_range))
        .route("/:id", get(routes::events::get_event))
        .route("/:id", put(routes::events::update_event))
        .route("/:id", delete(routes::events::delete_event));

    let mood_routes = Router::new()
        .route("/", get(routes::moods::list_moods))
        .route("/", post(routes::moods::create_mood))
        .route("/stats", get(routes::moods::mood_stats))
        .route("/date/:date", get(routes::moods::moods_by_date))
        .route("/:id", get(routes::moods::get_mood))
        .route("/:id", put(routes::moods::update_mood))
        .route("/:id", delete(routes::moods::delete_mood));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/tasks", task_routes)
        .nest("/api/events", event_routes)
        .nest("/api/moods", mood_routes)
        .route("/health", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()) // Configure properly in production
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Clario API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Clario API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::RecordStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn test_now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    fn create_test_app() -> (Router, Arc<RecordStore>) {
        let store = Arc::new(RecordStore::open_in_memory().unwrap());
        let clock = Arc::new(FixedClock(test_now()));
        let state = AppState::new(Arc::clone(&store), clock, ApiConfig::default());
        (build_router(state), store)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let body = match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        };
        builder.body(body).unwrap()
    }

    async fn register(app: &Router, email: &str) -> String {
        let (status, body) = send(
            app,
            request(
                "POST",
                "/api/users/register",
                None,
                Some(json!({"name": "Alice", "email": email, "password": "secret1"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _store) = create_test_app();
        let (status, body) = send(&app, request("GET", "/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (app, _store) = create_test_app();
        register(&app, "a@example.com").await;

        // Duplicate email is a conflict
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/users/register",
                None,
                Some(json!({"name": "Alice", "email": "a@example.com", "password": "secret1"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);

        // Wrong password is rejected
        let (status, _) = send(
            &app,
            request(
                "POST",
                "/api/users/login",
                None,
                Some(json!({"email": "a@example.com", "password": "wrong!"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        // Correct password issues a token
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/users/login",
                None,
                Some(json!({"email": "a@example.com", "password": "secret1"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["token"].as_str().unwrap().len() > 32);
    }

    #[tokio::test]
    async fn test_private_routes_require_token() {
        let (app, _store) = create_test_app();

        let (status, _) = send(&app, request("GET", "/api/tasks", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, request("GET", "/api/tasks", Some("bogus"), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let (app, _store) = create_test_app();
        let token = register(&app, "a@example.com").await;

        let (status, _) = send(&app, request("POST", "/api/users/logout", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, request("GET", "/api/users/me", Some(&token), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_task_crud_and_stats() {
        let (app, _store) = create_test_app();
        let token = register(&app, "a@example.com").await;

        for (title, priority, completed) in [
            ("report", "high", false),
            ("review", "high", false),
            ("email", "medium", false),
            ("standup", "low", true),
        ] {
            let (status, _) = send(
                &app,
                request(
                    "POST",
                    "/api/tasks",
                    Some(&token),
                    Some(json!({"title": title, "priority": priority, "completed": completed})),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&app, request("GET", "/api/tasks", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 4);

        // Pending group first: two high + one medium -> avg (3+3+2)/3
        let (status, body) = send(&app, request("GET", "/api/tasks/stats", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        let stats = body["data"].as_array().unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0]["completed"], false);
        assert_eq!(stats[0]["count"], 3);
        assert!((stats[0]["avgPriority"].as_f64().unwrap() - 8.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats[1]["completed"], true);

        // Update flips completion
        let id = body_first_task_id(&app, &token).await;
        let (status, body) = send(
            &app,
            request(
                "PUT",
                &format!("/api/tasks/{}", id),
                Some(&token),
                Some(json!({"completed": true})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["completed"], true);

        // Delete then 404
        let (status, _) = send(
            &app,
            request("DELETE", &format!("/api/tasks/{}", id), Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(
            &app,
            request("GET", &format!("/api/tasks/{}", id), Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    async fn body_first_task_id(app: &Router, token: &str) -> i64 {
        let (_, body) = send(app, request("GET", "/api/tasks", Some(token), None)).await;
        body["data"][0]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_tasks_are_owner_scoped_across_users() {
        let (app, _store) = create_test_app();
        let alice = register(&app, "a@example.com").await;
        let bob = register(&app, "b@example.com").await;

        let (_, body) = send(
            &app,
            request(
                "POST",
                "/api/tasks",
                Some(&alice),
                Some(json!({"title": "private"})),
            ),
        )
        .await;
        let id = body["data"]["id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            request("GET", &format!("/api/tasks/{}", id), Some(&bob), None),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&app, request("GET", "/api/tasks", Some(&bob), None)).await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_event_validation_and_upcoming_count() {
        let (app, _store) = create_test_app();
        let token = register(&app, "a@example.com").await;

        // end before start is rejected
        let (status, _) = send(
            &app,
            request(
                "POST",
                "/api/events",
                Some(&token),
                Some(json!({
                    "title": "backwards",
                    "start": "2024-03-11T10:00:00Z",
                    "end": "2024-03-11T09:00:00Z"
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // One past, one future relative to the fixed clock (2024-03-10 12:00)
        for (title, start, end) in [
            ("past", "2024-03-09T10:00:00Z", "2024-03-09T11:00:00Z"),
            ("future", "2024-03-11T10:00:00Z", "2024-03-11T11:00:00Z"),
        ] {
            let (status, _) = send(
                &app,
                request(
                    "POST",
                    "/api/events",
                    Some(&token),
                    Some(json!({"title": title, "start": start, "end": end})),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (_, body) = send(
            &app,
            request("GET", "/api/users/dashboard/stats", Some(&token), None),
        )
        .await;
        assert_eq!(body["data"]["upcomingEvents"], 1);
    }

    #[tokio::test]
    async fn test_events_range_matches_overlapping_events() {
        let (app, _store) = create_test_app();
        let token = register(&app, "a@example.com").await;

        for (title, start, end) in [
            ("spans", "2024-03-01T00:00:00Z", "2024-03-31T00:00:00Z"),
            ("inside", "2024-03-10T09:00:00Z", "2024-03-10T10:00:00Z"),
            ("outside", "2024-03-20T09:00:00Z", "2024-03-20T10:00:00Z"),
        ] {
            let (status, _) = send(
                &app,
                request(
                    "POST",
                    "/api/events",
                    Some(&token),
                    Some(json!({"title": title, "start": start, "end": end})),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(
            &app,
            request(
                "GET",
                "/api/events/range?start=2024-03-10T00:00:00Z&end=2024-03-11T00:00:00Z",
                Some(&token),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        let titles: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["spans", "inside"]);

        // Both bounds are required
        let (status, body) = send(
            &app,
            request(
                "GET",
                "/api/events/range?start=2024-03-10T00:00:00Z",
                Some(&token),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_explicit_null_clears_optional_fields() {
        let (app, _store) = create_test_app();
        let token = register(&app, "a@example.com").await;

        let (_, body) = send(
            &app,
            request(
                "POST",
                "/api/tasks",
                Some(&token),
                Some(json!({
                    "title": "report",
                    "description": "draft it",
                    "dueDate": "2024-03-15T09:00:00Z"
                })),
            ),
        )
        .await;
        let id = body["data"]["id"].as_i64().unwrap();

        // Absent fields keep their value
        let (_, body) = send(
            &app,
            request(
                "PUT",
                &format!("/api/tasks/{}", id),
                Some(&token),
                Some(json!({"completed": true})),
            ),
        )
        .await;
        assert_eq!(body["data"]["description"], "draft it");
        assert!(!body["data"]["dueDate"].is_null());

        // Explicit nulls clear them
        let (status, body) = send(
            &app,
            request(
                "PUT",
                &format!("/api/tasks/{}", id),
                Some(&token),
                Some(json!({"description": null, "dueDate": null})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["description"].is_null());
        assert!(body["data"]["dueDate"].is_null());

        let (_, body) = send(
            &app,
            request("GET", &format!("/api/tasks/{}", id), Some(&token), None),
        )
        .await;
        assert!(body["data"]["dueDate"].is_null());
    }

    #[tokio::test]
    async fn test_mood_note_cleared_by_null() {
        let (app, _store) = create_test_app();
        let token = register(&app, "a@example.com").await;

        let (_, body) = send(
            &app,
            request(
                "POST",
                "/api/moods",
                Some(&token),
                Some(json!({"mood": "😊", "note": "good day"})),
            ),
        )
        .await;
        let id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            request(
                "PUT",
                &format!("/api/moods/{}", id),
                Some(&token),
                Some(json!({"note": null})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["note"].is_null());
    }

    #[tokio::test]
    async fn test_mood_stats_endpoint() {
        let (app, _store) = create_test_app();
        let token = register(&app, "a@example.com").await;

        for (mood, intensity, date, activities) in [
            ("😊", 4, "2024-03-01T09:00:00Z", json!(["work", "work"])),
            ("😊", 5, "2024-03-02T09:00:00Z", json!(["gym", "work"])),
            ("😊", 3, "2024-03-03T09:00:00Z", json!(["gym", "read"])),
            ("😢", 2, "2024-03-04T09:00:00Z", json!([])),
        ] {
            let (status, _) = send(
                &app,
                request(
                    "POST",
                    "/api/moods",
                    Some(&token),
                    Some(json!({
                        "mood": mood,
                        "intensity": intensity,
                        "date": date,
                        "activities": activities
                    })),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&app, request("GET", "/api/moods/stats", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);

        let stats = body["data"]["stats"].as_array().unwrap();
        assert_eq!(stats[0]["mood"], "😊");
        assert_eq!(stats[0]["count"], 3);
        assert_eq!(
            stats[0]["topActivities"],
            json!(["work", "gym", "read"])
        );

        let overall = &body["data"]["overall"];
        assert_eq!(overall["totalMoods"], 4);
        // Three happy (5) and one sad (2): (15 + 2) / 4
        assert!((overall["averageMood"].as_f64().unwrap() - 17.0 / 4.0).abs() < 1e-9);

        // Range filter excludes the sad entry
        let (_, body) = send(
            &app,
            request(
                "GET",
                "/api/moods/stats?startDate=2024-03-01&endDate=2024-03-03",
                Some(&token),
                None,
            ),
        )
        .await;
        assert_eq!(body["data"]["overall"]["totalMoods"], 3);
        assert_eq!(body["data"]["overall"]["averageMood"], 5.0);
    }

    #[tokio::test]
    async fn test_mood_stats_empty() {
        let (app, _store) = create_test_app();
        let token = register(&app, "a@example.com").await;

        let (status, body) = send(&app, request("GET", "/api/moods/stats", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["stats"], json!([]));
        assert_eq!(body["data"]["overall"]["totalMoods"], 0);
        assert!(body["data"]["overall"].get("averageMood").is_none());
    }

    #[tokio::test]
    async fn test_mood_create_defaults_date_to_clock_now() {
        let (app, _store) = create_test_app();
        let token = register(&app, "a@example.com").await;

        let (status, body) = send(
            &app,
            request("POST", "/api/moods", Some(&token), Some(json!({"mood": "😐"}))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["intensity"], 3);

        let date: chrono::DateTime<Utc> =
            serde_json::from_value(body["data"]["date"].clone()).unwrap();
        assert_eq!(date, test_now());
    }

    #[tokio::test]
    async fn test_moods_by_date() {
        let (app, _store) = create_test_app();
        let token = register(&app, "a@example.com").await;

        for date in ["2024-03-05T08:00:00Z", "2024-03-05T20:00:00Z", "2024-03-06T08:00:00Z"] {
            send(
                &app,
                request(
                    "POST",
                    "/api/moods",
                    Some(&token),
                    Some(json!({"mood": "😊", "date": date})),
                ),
            )
            .await;
        }

        let (status, body) = send(
            &app,
            request("GET", "/api/moods/date/2024-03-05", Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
    }

    #[tokio::test]
    async fn test_dashboard_stats() {
        let (app, _store) = create_test_app();
        let token = register(&app, "a@example.com").await;

        // Empty account: zero counts, no insight
        let (status, body) = send(
            &app,
            request("GET", "/api/users/dashboard/stats", Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["tasks"], json!({"total": 0, "completed": 0, "pending": 0}));
        assert!(body["data"].get("moodInsight").is_none());

        for completed in [true, false, false] {
            send(
                &app,
                request(
                    "POST",
                    "/api/tasks",
                    Some(&token),
                    Some(json!({"title": "t", "completed": completed})),
                ),
            )
            .await;
        }
        for (mood, date) in [
            ("😊", "2024-03-01T09:00:00Z"),
            ("😊", "2024-03-02T09:00:00Z"),
            ("😢", "2024-03-03T09:00:00Z"),
        ] {
            send(
                &app,
                request(
                    "POST",
                    "/api/moods",
                    Some(&token),
                    Some(json!({"mood": mood, "date": date})),
                ),
            )
            .await;
        }

        let (_, body) = send(
            &app,
            request("GET", "/api/users/dashboard/stats", Some(&token), None),
        )
        .await;
        assert_eq!(body["data"]["tasks"], json!({"total": 3, "completed": 1, "pending": 2}));
        assert_eq!(body["data"]["recentMoods"].as_array().unwrap().len(), 3);
        // Newest first
        assert_eq!(body["data"]["recentMoods"][0]["mood"], "😢");
        assert_eq!(body["data"]["moodInsight"]["mood"], "😊");
        assert_eq!(body["data"]["moodInsight"]["count"], 2);
    }

    #[tokio::test]
    async fn test_admin_only_user_listing() {
        let (app, store) = create_test_app();
        let token = register(&app, "a@example.com").await;

        let (status, _) = send(&app, request("GET", "/api/users", Some(&token), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Promote via the store and authenticate as an admin
        let admin = store
            .create_user("Root", "root@example.com", crate::store::Role::Admin, "x", test_now())
            .unwrap();
        store.insert_token(admin.id, "admin-token", test_now()).unwrap();

        let (status, body) = send(&app, request("GET", "/api/users", Some("admin-token"), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
    }

    #[tokio::test]
    async fn test_admin_user_management() {
        let (app, store) = create_test_app();
        let token = register(&app, "a@example.com").await;

        let admin = store
            .create_user("Root", "root@example.com", crate::store::Role::Admin, "x", test_now())
            .unwrap();
        store.insert_token(admin.id, "admin-token", test_now()).unwrap();

        // Regular users cannot create or inspect other accounts
        let (status, _) = send(
            &app,
            request(
                "POST",
                "/api/users",
                Some(&token),
                Some(json!({"name": "Eve", "email": "e@example.com", "password": "secret1"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            request("GET", &format!("/api/users/{}", admin.id), Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Admin creates an account with an explicit role
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/users",
                Some("admin-token"),
                Some(json!({
                    "name": "Bob",
                    "email": "b@example.com",
                    "password": "secret1",
                    "role": "user"
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let bob_id = body["data"]["id"].as_i64().unwrap();
        assert_eq!(body["data"]["role"], "user");

        // Admin looks it up and promotes it
        let (status, body) = send(
            &app,
            request("GET", &format!("/api/users/{}", bob_id), Some("admin-token"), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["email"], "b@example.com");

        let (status, body) = send(
            &app,
            request(
                "PUT",
                &format!("/api/users/{}", bob_id),
                Some("admin-token"),
                Some(json!({"name": "Robert", "role": "admin"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Robert");
        assert_eq!(body["data"]["role"], "admin");
    }

    #[tokio::test]
    async fn test_self_update_cannot_change_role() {
        let (app, _store) = create_test_app();
        let token = register(&app, "a@example.com").await;

        let (_, body) = send(&app, request("GET", "/api/users/me", Some(&token), None)).await;
        let id = body["data"]["id"].as_i64().unwrap();

        // Renaming yourself is allowed
        let (status, body) = send(
            &app,
            request(
                "PUT",
                &format!("/api/users/{}", id),
                Some(&token),
                Some(json!({"name": "Alicia"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Alicia");

        // Promoting yourself is not
        let (status, _) = send(
            &app,
            request(
                "PUT",
                &format!("/api/users/{}", id),
                Some(&token),
                Some(json!({"role": "admin"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_password_change_takes_effect_on_login() {
        let (app, _store) = create_test_app();
        let token = register(&app, "a@example.com").await;

        let (_, body) = send(&app, request("GET", "/api/users/me", Some(&token), None)).await;
        let id = body["data"]["id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            request(
                "PUT",
                &format!("/api/users/{}", id),
                Some(&token),
                Some(json!({"password": "fresh-pw"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app,
            request(
                "POST",
                "/api/users/login",
                None,
                Some(json!({"email": "a@example.com", "password": "secret1"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &app,
            request(
                "POST",
                "/api/users/login",
                None,
                Some(json!({"email": "a@example.com", "password": "fresh-pw"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_mood_symbol_rejected() {
        let (app, _store) = create_test_app();
        let token = register(&app, "a@example.com").await;

        let (status, body) = send(
            &app,
            request("POST", "/api/moods", Some(&token), Some(json!({"mood": "🤖"}))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
