//! Student HTTP Routes
//!
//! CRUD endpoints for student records, nested under `/api/students`.
//! Request shape is validated here; invalid input never reaches the service.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::student::{ServiceResult, Student, StudentPayload, StudentService};

use super::errors::{ApiError, ApiResult};

// ==================
// Shared State
// ==================

/// Student state shared across handlers
pub struct StudentState {
    pub service: Arc<StudentService>,
}

impl StudentState {
    pub fn new(service: Arc<StudentService>) -> Self {
        Self { service }
    }

    /// Run a service call on the blocking pool.
    ///
    /// Store and cache I/O block, so they stay off the async workers.
    async fn call<T, F>(&self, op: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&StudentService) -> ServiceResult<T> + Send + 'static,
    {
        let service = Arc::clone(&self.service);
        let result = tokio::task::spawn_blocking(move || op(&service))
            .await
            .map_err(|e| ApiError::Internal(format!("service task failed: {}", e)))?;
        Ok(result?)
    }
}

// ==================
// Request Types
// ==================

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub name: Option<String>,
}

// ==================
// Student Routes
// ==================

/// Create student routes
pub fn student_routes(state: Arc<StudentState>) -> Router {
    Router::new()
        .route("/insert", post(create_student_handler))
        .route("/fetch", get(list_students_handler))
        .route("/search", get(search_students_handler))
        .route("/:id", put(update_student_handler).delete(delete_student_handler))
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

fn parse_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    let Path(id) = path?;
    if id <= 0 {
        return Err(ApiError::InvalidId(format!("{} is not a positive integer", id)));
    }
    Ok(id)
}

// ==================
// Handlers
// ==================

async fn create_student_handler(
    State(state): State<Arc<StudentState>>,
    payload: Result<Json<StudentPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Student>)> {
    let Json(payload) = payload?;
    let candidate = payload.into_new_student()?;

    let student = state
        .call(move |service| service.create_student(candidate))
        .await?;

    Ok((StatusCode::CREATED, Json(student)))
}

async fn list_students_handler(
    State(state): State<Arc<StudentState>>,
) -> ApiResult<Json<Vec<Student>>> {
    let students = state.call(|service| service.get_all_students()).await?;
    Ok(Json(students))
}

async fn search_students_handler(
    State(state): State<Arc<StudentState>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Student>>> {
    let Query(query) = query?;
    let name = query
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or(ApiError::MissingParam("name"))?;

    let students = state
        .call(move |service| service.search_students_by_name(&name))
        .await?;
    Ok(Json(students))
}

async fn update_student_handler(
    State(state): State<Arc<StudentState>>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<StudentPayload>, JsonRejection>,
) -> ApiResult<Json<Student>> {
    let id = parse_id(path)?;
    let Json(payload) = payload?;
    let patch = payload.into_patch()?;

    let student = state
        .call(move |service| service.update_student(id, patch))
        .await?;
    Ok(Json(student))
}

async fn delete_student_handler(
    State(state): State<Arc<StudentState>>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = parse_id(path)?;
    state.call(move |service| service.delete_student(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NoopCache;
    use crate::storage::MemoryStore;

    fn state() -> StudentState {
        let service = StudentService::new(Arc::new(MemoryStore::new()), Arc::new(NoopCache));
        StudentState::new(Arc::new(service))
    }

    #[test]
    fn test_parse_id_rejects_non_positive() {
        assert_eq!(parse_id(Ok(Path(3))).unwrap(), 3);
        assert!(matches!(parse_id(Ok(Path(0))), Err(ApiError::InvalidId(_))));
        assert!(matches!(parse_id(Ok(Path(-4))), Err(ApiError::InvalidId(_))));
    }

    #[test]
    fn test_router_builds() {
        let _router = student_routes(Arc::new(state()));
    }

    #[tokio::test]
    async fn test_call_maps_service_errors() {
        let state = state();
        let err = state
            .call(|service| service.delete_student(8))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(8)));
    }
}
