use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use gradebook_api_types::{GradingSchemaRequest, GradingSchemaResponse};
use gradebook_core::domain::GradingSchemaId;

use super::{error::ApiError, state::AppState};

pub fn create_grading_schema_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/grading-schemas",
            get(list_schemas).post(create_schema),
        )
        .route("/api/grading-schemas/active", get(active_schema))
        .route("/api/grading-schemas/{id}", put(update_schema))
        .route("/api/grading-schemas/{id}/activate", post(activate_schema))
}

/// 格式错误的 id 不可能对应已存储的方案。
fn parse_schema_id(raw: &str) -> Result<GradingSchemaId, ApiError> {
    raw.parse().map_err(|_| ApiError::unknown_schema(raw))
}

async fn list_schemas(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GradingSchemaResponse>>, ApiError> {
    Ok(Json(state.grading_schemas.list().await?))
}

async fn create_schema(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GradingSchemaRequest>,
) -> Result<(StatusCode, Json<GradingSchemaResponse>), ApiError> {
    let schema = state.grading_schemas.create(request).await?;
    Ok((StatusCode::CREATED, Json(schema)))
}

async fn active_schema(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Option<GradingSchemaResponse>>, ApiError> {
    Ok(Json(state.grading_schemas.active().await?))
}

async fn update_schema(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<GradingSchemaRequest>,
) -> Result<Json<GradingSchemaResponse>, ApiError> {
    let id = parse_schema_id(&id)?;
    Ok(Json(state.grading_schemas.update(id, request).await?))
}

async fn activate_schema(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GradingSchemaResponse>, ApiError> {
    let id = parse_schema_id(&id)?;
    Ok(Json(state.grading_schemas.activate(id).await?))
}
