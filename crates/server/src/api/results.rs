use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use gradebook_api_types::{CalculateResultRequest, ResultResponse};
use gradebook_core::domain::StudentId;

use super::{error::ApiError, state::AppState};

pub fn create_results_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/results/calculate", post(calculate_result))
        .route("/api/results/student/{student_id}", get(list_student_results))
}

async fn calculate_result(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CalculateResultRequest>,
) -> Result<Json<ResultResponse>, ApiError> {
    let result = state
        .results
        .calculate(StudentId::new(request.student_id), request.semester.as_deref())
        .await?;
    Ok(Json(result))
}

async fn list_student_results(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<i64>,
) -> Result<Json<Vec<ResultResponse>>, ApiError> {
    let results = state
        .results
        .list_for_student(StudentId::new(student_id))
        .await?;
    Ok(Json(results))
}
