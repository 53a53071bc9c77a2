use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use gradebook_api_types::{
    ClassPerformance, PassFailStats, RankingEntry, SectionPerformance, SubjectAnalysis,
};
use gradebook_core::domain::HierarchyFilter;
use serde::Deserialize;

use super::{error::ApiError, state::AppState};
use crate::service::AnalyticsQuery;

pub fn create_analytics_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/analytics/class-performance", get(class_performance))
        .route("/api/analytics/section-performance", get(section_performance))
        .route("/api/analytics/subject-analysis", get(subject_analysis))
        .route("/api/analytics/pass-fail", get(pass_fail))
        .route("/api/analytics/rankings", get(rankings))
        .route("/api/analytics/toppers", get(toppers))
}

/// 统计视图共用的查询参数，空字符串视为未提供。
#[derive(Debug, Default, Deserialize)]
struct AnalyticsParams {
    semester: Option<String>,
    course: Option<String>,
    department: Option<String>,
    class: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ToppersParams {
    #[serde(flatten)]
    scope: AnalyticsParams,
    limit: Option<String>,
}

fn parse_param<T>(name: &str, value: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => T::from_str(value)
            .map(Some)
            .map_err(|e| ApiError::invalid_filter(format!("invalid {name} '{value}': {e}"))),
    }
}

impl AnalyticsParams {
    fn into_query(self) -> Result<AnalyticsQuery, ApiError> {
        let filter = HierarchyFilter {
            course: parse_param("course", self.course.as_deref())?,
            department: parse_param("department", self.department.as_deref())?,
            class: parse_param("class", self.class.as_deref())?,
        };
        Ok(AnalyticsQuery {
            semester: self.semester,
            filter,
        })
    }
}

async fn class_performance(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<Vec<ClassPerformance>>, ApiError> {
    let query = params.into_query()?;
    Ok(Json(state.analytics.class_performance(&query).await?))
}

async fn section_performance(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<Vec<SectionPerformance>>, ApiError> {
    let query = params.into_query()?;
    Ok(Json(state.analytics.section_performance(&query).await?))
}

async fn subject_analysis(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<Vec<SubjectAnalysis>>, ApiError> {
    let query = params.into_query()?;
    Ok(Json(state.analytics.subject_analysis(&query).await?))
}

async fn pass_fail(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<PassFailStats>, ApiError> {
    let query = params.into_query()?;
    Ok(Json(state.analytics.pass_fail(&query).await?))
}

async fn rankings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<Vec<RankingEntry>>, ApiError> {
    let query = params.into_query()?;
    Ok(Json(state.rankings.rankings(&query).await?))
}

async fn toppers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ToppersParams>,
) -> Result<Json<Vec<RankingEntry>>, ApiError> {
    let limit = parse_param("limit", params.limit.as_deref())?;
    let query = params.scope.into_query()?;
    Ok(Json(state.rankings.toppers(&query, limit).await?))
}
