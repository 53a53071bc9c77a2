use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use gradebook_api_types::ResultResponse;
use gradebook_core::domain::{MarkLine, ResultComputation, ResultStatus, StudentId, semester_key};
use tracing::{info, warn};

use super::{GradingPolicyResolver, ServiceError};
use crate::repository::{
    MarksRepository, Repositories, ResultRecord, ResultRepository, SubjectRepository,
};

/// 将学生的原始成绩汇总为每个学期键一条持久化结果。
#[derive(Clone)]
pub struct ResultCalculator {
    marks: Arc<dyn MarksRepository>,
    subjects: Arc<dyn SubjectRepository>,
    results: Arc<dyn ResultRepository>,
    grading: GradingPolicyResolver,
    protect_frozen: bool,
}

impl ResultCalculator {
    pub fn new(
        repositories: &Repositories,
        grading: GradingPolicyResolver,
        protect_frozen: bool,
    ) -> Self {
        Self {
            marks: repositories.marks.clone(),
            subjects: repositories.subjects.clone(),
            results: repositories.results.clone(),
            grading,
            protect_frozen,
        }
    }

    /// 重新计算并写入 `(student_id, semester)` 的结果。
    ///
    /// 未指定学期时统计该学生全部成绩，结果存于 `N/A` 键下。此处从不修改已存储的状态。
    pub async fn calculate(
        &self,
        student_id: StudentId,
        semester: Option<&str>,
    ) -> Result<ResultResponse, ServiceError> {
        let semester_filter = semester.map(str::trim).filter(|value| !value.is_empty());
        let key = semester_key(semester_filter);

        let marks = self
            .marks
            .list_for_student(student_id, semester_filter)
            .await?;
        if marks.is_empty() {
            return Err(ServiceError::NoMarksFound {
                student_id,
                semester: key,
            });
        }

        let subject_ids: Vec<_> = marks
            .iter()
            .map(|mark| mark.subject_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let max_marks: HashMap<_, _> = self
            .subjects
            .list_by_ids(&subject_ids)
            .await?
            .into_iter()
            .map(|subject| (subject.id, subject.max_marks))
            .collect();

        let lines: Vec<MarkLine> = marks
            .iter()
            .map(|mark| MarkLine {
                marks_obtained: mark.marks_obtained,
                max_marks: max_marks.get(&mark.subject_id).copied(),
            })
            .collect();

        let policy = self.grading.resolve().await?;
        let computation = ResultComputation::compute(&lines, policy.as_ref()).ok_or_else(|| {
            ServiceError::NoMarksFound {
                student_id,
                semester: key.clone(),
            }
        })?;

        // 冻结判断在 upsert 语句内完成，期间落下的冻结同样生效。
        let Some(record) = self
            .results
            .upsert(student_id, &key, &computation, self.protect_frozen)
            .await?
        else {
            return Err(ServiceError::ResultFrozen {
                student_id,
                semester: key,
            });
        };
        if record.status == ResultStatus::Frozen {
            warn!(%student_id, semester = %key, "recomputed a frozen result");
        }
        info!(
            %student_id,
            semester = %key,
            marks = marks.len(),
            percentage = record.percentage,
            grade = %record.grade,
            "result computed"
        );

        Ok(result_response(record))
    }

    pub async fn list_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<ResultResponse>, ServiceError> {
        let records = self.results.list_for_student(student_id).await?;
        Ok(records.into_iter().map(result_response).collect())
    }
}

fn result_response(record: ResultRecord) -> ResultResponse {
    ResultResponse {
        student_id: record.student_id.value(),
        semester: record.semester,
        total_marks: record.total_marks,
        total_max_marks: record.total_max_marks,
        percentage: record.percentage,
        grade: record.grade.as_str().to_string(),
        sgpa: record.sgpa,
        cgpa: record.cgpa,
        status: record.status.as_str().to_string(),
    }
}
