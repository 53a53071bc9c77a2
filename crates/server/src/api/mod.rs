//! 成绩、统计与评分方案服务的 HTTP 路由。

mod analytics;
mod error;
mod grading_schemas;
mod results;
mod state;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use gradebook_api_types::HealthCheckResponse;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use analytics::create_analytics_router;
pub use error::ApiError;
pub use grading_schemas::create_grading_schema_router;
pub use results::create_results_router;
pub use state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .merge(create_results_router())
        .merge(create_analytics_router())
        .merge(create_grading_schema_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::repository::memory::MemoryStore;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use gradebook_core::domain::{ClassId, Grade};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn router(store: &Arc<MemoryStore>) -> Router {
        let state = AppState::new(store.repositories(), &AppConfig::default());
        create_router(Arc::new(state))
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.expect("router response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let store = MemoryStore::new();
        let (status, body) = send(router(&store), get("/api/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn calculate_then_read_back() {
        let store = MemoryStore::new();
        let student = store.add_student(7, "Ada", None, None);
        let maths = store.add_subject("Maths", 100.0);
        let physics = store.add_subject("Physics", 100.0);
        store.add_mark(student, maths, "S1", 92.0);
        store.add_mark(student, physics, "S1", 78.0);

        let (status, body) = send(
            router(&store),
            post_json("/api/results/calculate", json!({"studentId": 7, "semester": "S1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["percentage"], json!(85.0));
        assert_eq!(body["grade"], json!("A"));
        assert_eq!(body["status"], json!("pending"));

        let (status, body) = send(router(&store), get("/api/results/student/7")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(1));
        assert_eq!(body[0]["semester"], json!("S1"));
    }

    #[tokio::test]
    async fn calculate_without_marks_is_not_found() {
        let store = MemoryStore::new();
        store.add_student(1, "Ada", None, None);

        let (status, body) = send(
            router(&store),
            post_json("/api/results/calculate", json!({"studentId": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], json!("NO_MARKS_FOUND"));
    }

    #[tokio::test]
    async fn analytics_reject_malformed_filters() {
        let store = MemoryStore::new();
        let (status, body) = send(router(&store), get("/api/analytics/rankings?class=ten")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("INVALID_FILTER"));
    }

    #[tokio::test]
    async fn analytics_treat_empty_params_as_absent() {
        let store = MemoryStore::new();
        let class = ClassId::new();
        let ada = store.add_student(1, "Ada", Some((class, "10")), Some("A"));
        store.add_result(ada, "S1", 81.0, Grade::A);

        let (status, body) = send(
            router(&store),
            get("/api/analytics/pass-fail?semester=&course=&department=&class="),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"total": 1, "passCount": 1, "failCount": 0, "passRate": 100.0})
        );
    }

    #[tokio::test]
    async fn toppers_honour_limit_param() {
        let store = MemoryStore::new();
        for (id, percentage) in [(1, 95.0), (2, 95.0), (3, 95.0), (4, 90.0)] {
            let student = store.add_student(id, &format!("Student {id}"), None, None);
            store.add_result(student, "S1", percentage, Grade::APlus);
        }

        let (status, body) = send(
            router(&store),
            get("/api/analytics/toppers?semester=S1&limit=3"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let ranks: Vec<u64> = body
            .as_array()
            .expect("array body")
            .iter()
            .filter_map(|entry| entry["rank"].as_u64())
            .collect();
        assert_eq!(ranks, vec![1, 2, 3]);

        let (status, body) = send(router(&store), get("/api/analytics/toppers?limit=many")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("INVALID_FILTER"));
    }

    #[tokio::test]
    async fn toppers_reject_limits_beyond_u32() {
        let store = MemoryStore::new();
        let student = store.add_student(1, "Ada", None, None);
        store.add_result(student, "S1", 70.0, Grade::BPlus);

        for limit in ["18446744073709551615", "4294967296", "-1"] {
            let (status, body) = send(
                router(&store),
                get(&format!("/api/analytics/toppers?limit={limit}")),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "limit={limit}");
            assert_eq!(body["code"], json!("INVALID_FILTER"));
        }

        let (status, body) = send(
            router(&store),
            get("/api/analytics/toppers?limit=4294967295"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn grading_schema_lifecycle() {
        let store = MemoryStore::new();
        let schema = json!({
            "name": "Standard",
            "ranges": [
                {"grade": "A", "minPercentage": 50, "maxPercentage": 100, "gradePoint": 9},
                {"grade": "F", "minPercentage": 0, "maxPercentage": 49.99, "gradePoint": 0}
            ]
        });

        let (status, created) =
            send(router(&store), post_json("/api/grading-schemas", schema)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["isActive"], json!(false));
        let id = created["id"].as_str().expect("schema id").to_string();

        let (status, active) = send(router(&store), get("/api/grading-schemas/active")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(active, Value::Null);

        let (status, activated) = send(
            router(&store),
            post_json(&format!("/api/grading-schemas/{id}/activate"), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(activated["isActive"], json!(true));

        let (status, listed) = send(router(&store), get("/api/grading-schemas")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn grading_schema_errors_map_to_codes() {
        let store = MemoryStore::new();
        let overlapping = json!({
            "name": "Broken",
            "ranges": [
                {"grade": "A", "minPercentage": 50, "maxPercentage": 100, "gradePoint": 9},
                {"grade": "B", "minPercentage": 40, "maxPercentage": 60, "gradePoint": 8}
            ]
        });

        let (status, body) =
            send(router(&store), post_json("/api/grading-schemas", overlapping)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("INVALID_GRADING_SCHEMA"));

        let (status, body) = send(
            router(&store),
            post_json("/api/grading-schemas/not-a-uuid/activate", json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], json!("SCHEMA_NOT_FOUND"));
    }
}
