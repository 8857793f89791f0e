//! Task Routes
//!
//! CRUD endpoints for the caller's tasks plus the per-completion-state
//! statistics breakdown.
//!
//! - GET /api/tasks - List tasks (filter by completed, dueDate, category)
//! - POST /api/tasks - Create a task
//! - GET /api/tasks/:id - Get a task
//! - PUT /api/tasks/:id - Update a task
//! - DELETE /api/tasks/:id - Delete a task
//! - GET /api/tasks/stats - Completion-state statistics

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{CreateTaskRequest, Envelope, TaskListParams, UpdateTaskRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::CurrentUser;
use crate::api::state::AppState;
use crate::stats::{compute_task_stats, TaskStat};
use crate::store::types::{RecordId, Task, TaskFilter};

/// GET /api/tasks
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(params): Query<TaskListParams>,
) -> ApiResult<Json<Envelope<Vec<Task>>>> {
    let filter = TaskFilter {
        completed: params.completed,
        due_on: params.due_date,
        category: params.category,
    };
    let tasks = state.store.list_tasks(current.user.id, &filter)?;
    Ok(Json(Envelope::list(tasks)))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<Task>>)> {
    validate_title(&req.title)?;
    validate_description(req.description.as_deref())?;

    let task = state.store.insert_task(Task {
        id: 0, // assigned by the store
        user_id: current.user.id,
        title: req.title.trim().to_string(),
        description: req.description,
        due_date: req.due_date,
        completed: req.completed,
        priority: req.priority,
        category: req.category,
        created_at: state.clock.now(),
    })?;

    Ok((StatusCode::CREATED, Json(Envelope::new(task))))
}

/// GET /api/tasks/:id
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<RecordId>,
) -> ApiResult<Json<Envelope<Task>>> {
    let task = state.store.get_task(current.user.id, id)?;
    Ok(Json(Envelope::new(task)))
}

/// PUT /api/tasks/:id
///
/// Patch-style update: absent fields keep their stored value, an explicit
/// `null` clears an optional field.
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<RecordId>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Envelope<Task>>> {
    let mut task = state.store.get_task(current.user.id, id)?;

    if let Some(title) = req.title {
        validate_title(&title)?;
        task.title = title.trim().to_string();
    }
    if let Some(description) = req.description {
        validate_description(description.as_deref())?;
        task.description = description;
    }
    if let Some(due_date) = req.due_date {
        task.due_date = due_date;
    }
    if let Some(completed) = req.completed {
        task.completed = completed;
    }
    if let Some(priority) = req.priority {
        task.priority = priority;
    }
    if let Some(category) = req.category {
        task.category = category;
    }

    state.store.update_task(&task)?;
    Ok(Json(Envelope::new(task)))
}

/// DELETE /api/tasks/:id
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<RecordId>,
) -> ApiResult<Json<Envelope<serde_json::Value>>> {
    state.store.delete_task(current.user.id, id)?;
    Ok(Json(Envelope::new(serde_json::json!({}))))
}

/// GET /api/tasks/stats
///
/// Group the caller's tasks by completion state: count, priority-weighted
/// average, and due-date extremes per group, pending before completed.
pub async fn task_stats(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<Envelope<Vec<TaskStat>>>> {
    let tasks = state
        .store
        .list_tasks(current.user.id, &TaskFilter::default())?;
    let stats = compute_task_stats(&tasks);
    Ok(Json(Envelope::new(stats)))
}

fn validate_title(title: &str) -> ApiResult<()> {
    if title.trim().is_empty() {
        return Err(ApiError::Validation(
            "Please provide a title".to_string(),
        ));
    }
    if title.len() > 100 {
        return Err(ApiError::Validation(
            "Title cannot be more than 100 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> ApiResult<()> {
    if let Some(description) = description {
        if description.len() > 500 {
            return Err(ApiError::Validation(
                "Description cannot be more than 500 characters".to_string(),
            ));
        }
    }
    Ok(())
}
