use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRangePayload {
    pub grade: String,
    pub min_percentage: f64,
    pub max_percentage: f64,
    pub grade_point: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingSchemaRequest {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: i32,
    pub ranges: Vec<GradeRangePayload>,
    #[serde(default = "default_pass_percentage")]
    pub pass_percentage: f64,
    #[serde(default)]
    pub is_active: bool,
}

fn default_version() -> i32 {
    1
}

fn default_pass_percentage() -> f64 {
    33.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingSchemaResponse {
    pub id: String,
    pub name: String,
    pub version: i32,
    pub ranges: Vec<GradeRangePayload>,
    pub pass_percentage: f64,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_request_defaults() {
        let request: GradingSchemaRequest = serde_json::from_str(
            r#"{"name":"Standard","ranges":[{"grade":"A","minPercentage":80,"maxPercentage":100,"gradePoint":9}]}"#,
        )
        .expect("deserialize schema request");

        assert_eq!(request.version, 1);
        assert_eq!(request.pass_percentage, 33.0);
        assert!(!request.is_active);
        assert_eq!(request.ranges[0].min_percentage, 80.0);
    }
}
