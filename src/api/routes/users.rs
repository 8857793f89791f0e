//! User Routes
//!
//! Registration, login, session management, account administration, and the
//! dashboard digest.
//!
//! - POST /api/users/register - Create an account
//! - POST /api/users/login - Issue a bearer token
//! - POST /api/users/logout - Revoke the presented token
//! - GET /api/users/me - The authenticated account
//! - GET /api/users - List accounts (admin)
//! - POST /api/users - Create an account directly (admin)
//! - GET /api/users/:id - Get an account (admin)
//! - PUT /api/users/:id - Update an account (admin or self)
//! - DELETE /api/users/:id - Delete an account (admin or self)
//! - GET /api/users/dashboard/stats - Dashboard digest

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{
    AuthResponse, CreateUserRequest, Envelope, LoginRequest, RegisterRequest, UpdateUserRequest,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{require_admin, CurrentUser};
use crate::api::state::AppState;
use crate::auth::{generate_token, hash_password, verify_password};
use crate::stats::{compute_dashboard, DashboardDigest};
use crate::store::types::{Role, TaskFilter, User, UserId};

/// How many recent mood entries the dashboard carries
const RECENT_MOOD_LIMIT: u32 = 5;

/// POST /api/users/register
///
/// Create an account and issue its first bearer token.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<AuthResponse>>)> {
    validate_registration(&req)?;

    let hash = hash_password(&req.password)?;
    let now = state.clock.now();
    let user = state
        .store
        .create_user(req.name.trim(), req.email.trim(), Role::User, &hash, now)?;

    let token = issue_token(&state, &user)?;

    tracing::info!(user_id = user.id, "Registered user");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(AuthResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            token,
        })),
    ))
}

/// POST /api/users/login
///
/// Verify credentials and issue a fresh bearer token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Envelope<AuthResponse>>> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "Please provide an email and password".to_string(),
        ));
    }

    // A missing account and a wrong password are indistinguishable to the caller
    let invalid = || ApiError::Unauthenticated("Invalid credentials".to_string());

    let user = state
        .store
        .find_user_by_email(req.email.trim())?
        .ok_or_else(invalid)?;

    let stored_hash = state
        .store
        .password_hash_for(user.id)?
        .ok_or_else(invalid)?;

    if !verify_password(&req.password, &stored_hash)? {
        return Err(invalid());
    }

    let token = issue_token(&state, &user)?;

    Ok(Json(Envelope::new(AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        token,
    })))
}

/// POST /api/users/logout
///
/// Revoke the token the caller presented.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<Envelope<serde_json::Value>>> {
    state.store.delete_token(&current.token)?;
    Ok(Json(Envelope::new(serde_json::json!({}))))
}

/// GET /api/users/me
pub async fn me(current: CurrentUser) -> ApiResult<Json<Envelope<User>>> {
    Ok(Json(Envelope::new(current.user)))
}

/// GET /api/users
///
/// List all accounts. Admin only.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<Envelope<Vec<User>>>> {
    require_admin(&current.user)?;
    let users = state.store.list_users()?;
    Ok(Json(Envelope::list(users)))
}

/// POST /api/users
///
/// Create an account directly, without issuing a token. Admin only; the
/// role defaults to a regular user when absent.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<User>>)> {
    require_admin(&current.user)?;
    validate_registration(&RegisterRequest {
        name: req.name.clone(),
        email: req.email.clone(),
        password: req.password.clone(),
    })?;

    let hash = hash_password(&req.password)?;
    let user = state.store.create_user(
        req.name.trim(),
        req.email.trim(),
        req.role.unwrap_or(Role::User),
        &hash,
        state.clock.now(),
    )?;

    tracing::info!(user_id = user.id, created_by = current.user.id, "Created user");

    Ok((StatusCode::CREATED, Json(Envelope::new(user))))
}

/// GET /api/users/:id
///
/// Look up any account by id. Admin only.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<UserId>,
) -> ApiResult<Json<Envelope<User>>> {
    require_admin(&current.user)?;
    let user = state.store.get_user(id)?;
    Ok(Json(Envelope::new(user)))
}

/// PUT /api/users/:id
///
/// Patch an account; callers may update themselves, admins anyone.
/// Changing the role always requires the admin role.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<UserId>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<Envelope<User>>> {
    if id != current.user.id {
        require_admin(&current.user)?;
    }

    let mut user = state.store.get_user(id)?;

    if let Some(name) = req.name {
        if name.trim().is_empty() || name.len() > 100 {
            return Err(ApiError::Validation(
                "Name must be between 1 and 100 characters".to_string(),
            ));
        }
        user.name = name.trim().to_string();
    }
    if let Some(email) = req.email {
        if !email.contains('@') {
            return Err(ApiError::Validation(
                "Please provide a valid email".to_string(),
            ));
        }
        user.email = email.trim().to_string();
    }
    if let Some(role) = req.role {
        require_admin(&current.user)?;
        user.role = role;
    }
    if let Some(password) = &req.password {
        if password.len() < 6 {
            return Err(ApiError::Validation(
                "Password must be at least 6 characters".to_string(),
            ));
        }
    }

    state.store.update_user(&user)?;

    if let Some(password) = req.password {
        let hash = hash_password(&password)?;
        state.store.set_password_hash(user.id, &hash)?;
    }

    tracing::info!(user_id = user.id, updated_by = current.user.id, "Updated user");

    Ok(Json(Envelope::new(user)))
}

/// DELETE /api/users/:id
///
/// Delete an account; callers may delete themselves, admins anyone.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<UserId>,
) -> ApiResult<Json<Envelope<serde_json::Value>>> {
    if id != current.user.id {
        require_admin(&current.user)?;
    }
    state.store.delete_user(id)?;

    tracing::info!(user_id = id, deleted_by = current.user.id, "Deleted user");

    Ok(Json(Envelope::new(serde_json::json!({}))))
}

/// GET /api/users/dashboard/stats
///
/// Compute the dashboard digest from the caller's current records: task
/// counts, upcoming-event count, the five most recent mood entries, and the
/// most frequent mood among them. Nothing is cached; each call recomputes
/// from the live snapshot.
pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<Envelope<DashboardDigest>>> {
    let user_id = current.user.id;

    // Three independent reads; the digest needs all of them
    let tasks = state.store.list_tasks(user_id, &TaskFilter::default())?;
    let upcoming = state
        .store
        .count_upcoming_events(user_id, state.clock.now())?;
    let recent = state.store.recent_moods(user_id, RECENT_MOOD_LIMIT)?;

    let digest = compute_dashboard(&tasks, upcoming, &recent);

    Ok(Json(Envelope::new(digest)))
}

fn issue_token(state: &AppState, user: &User) -> ApiResult<String> {
    let token = generate_token();
    state.store.insert_token(user.id, &token, state.clock.now())?;
    Ok(token)
}

/// Validate a registration request
fn validate_registration(req: &RegisterRequest) -> ApiResult<()> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "Please include all fields".to_string(),
        ));
    }
    if req.name.len() > 100 {
        return Err(ApiError::Validation(
            "Name cannot be more than 100 characters".to_string(),
        ));
    }
    if !req.email.contains('@') {
        return Err(ApiError::Validation(
            "Please provide a valid email".to_string(),
        ));
    }
    if req.password.len() < 6 {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}
