use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One student's line inside a class or section group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStanding {
    pub student_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub percentage: f64,
    pub grade: String,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPerformance {
    pub total_students: u32,
    pub result_count: u32,
    pub average_percentage: f64,
    pub pass_count: u32,
    pub fail_count: u32,
    pub pass_rate: f64,
    pub grade_distribution: BTreeMap<String, u32>,
    pub students: Vec<StudentStanding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPerformance {
    pub section: String,
    #[serde(flatten)]
    pub performance: GroupPerformance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassPerformance {
    pub class_name: String,
    #[serde(flatten)]
    pub performance: GroupPerformance,
    pub sections: Vec<SectionPerformance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopScorer {
    pub student_id: i64,
    pub student_name: String,
    pub marks: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAnalysis {
    pub subject_name: String,
    pub max_marks: f64,
    pub total_students: u32,
    pub average_marks: f64,
    pub average_percentage: f64,
    pub highest_marks: f64,
    pub lowest_marks: f64,
    pub pass_count: u32,
    pub fail_count: u32,
    pub pass_rate: f64,
    pub top_scorers: Vec<TopScorer>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassFailStats {
    pub total: u32,
    pub pass_count: u32,
    pub fail_count: u32,
    pub pass_rate: f64,
}

/// Entry of the full ranking and of the toppers list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub rank: u32,
    pub student_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub percentage: f64,
    pub grade: String,
    pub semester: String,
}
