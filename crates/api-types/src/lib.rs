//! Shared request/response types used by API-facing crates.

mod analytics;
mod grading;
mod results;

use serde::{Deserialize, Serialize};

pub use analytics::{
    ClassPerformance, GroupPerformance, PassFailStats, RankingEntry, SectionPerformance,
    StudentStanding, SubjectAnalysis, TopScorer,
};
pub use grading::{GradeRangePayload, GradingSchemaRequest, GradingSchemaResponse};
pub use results::{CalculateResultRequest, ResultResponse};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
}

impl HealthCheckResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_ok_payload() {
        let response = HealthCheckResponse::ok();
        assert_eq!(response.status, "ok");
    }

    #[test]
    fn error_response_round_trip_json() {
        let response = ErrorResponse {
            code: "NO_MARKS_FOUND".to_string(),
            message: "no marks found".to_string(),
        };

        let json = serde_json::to_string(&response).expect("serialize error response");
        let decoded: ErrorResponse =
            serde_json::from_str(&json).expect("deserialize error response");

        assert_eq!(decoded, response);
    }
}
