use std::collections::HashMap;

use gradebook_core::domain::{HierarchyFilter, StudentId, join_resolved};
use tracing::debug;

use super::ServiceError;
use crate::repository::{ResultRecord, ResultRepository, StudentRecord, StudentRepository};

/// 各统计视图共用的查询条件：可选学期与层级过滤。
#[derive(Debug, Clone, Default)]
pub struct AnalyticsQuery {
    pub semester: Option<String>,
    pub filter: HierarchyFilter,
}

impl AnalyticsQuery {
    pub fn semester(&self) -> Option<&str> {
        self.semester
            .as_deref()
            .map(str::trim)
            .filter(|semester| !semester.is_empty())
    }
}

/// 层级过滤选中的学生，按 id 建索引用于关联。
pub(crate) struct StudentScope {
    pub students: HashMap<StudentId, StudentRecord>,
}

impl StudentScope {
    /// 过滤条件非空却没有匹配任何学生时返回 `None`。
    pub async fn load(
        repository: &dyn StudentRepository,
        filter: &HierarchyFilter,
    ) -> Result<Option<Self>, ServiceError> {
        let students = repository.list(filter).await?;

        if !filter.is_unconstrained() && students.is_empty() {
            debug!(?filter, "hierarchy filter matched no students");
            return Ok(None);
        }

        Ok(Some(Self {
            students: students
                .into_iter()
                .map(|student| (student.id, student))
                .collect(),
        }))
    }
}

/// 查询范围内的成绩与对应学生，保持存储顺序；学生无法解析的成绩被丢弃。
pub(crate) async fn joined_results(
    students: &dyn StudentRepository,
    results: &dyn ResultRepository,
    query: &AnalyticsQuery,
) -> Result<Vec<(ResultRecord, StudentRecord)>, ServiceError> {
    let Some(scope) = StudentScope::load(students, &query.filter).await? else {
        return Ok(Vec::new());
    };

    let records = results
        .list(query.semester(), &query.filter)
        .await?;
    let total = records.len();

    let joined: Vec<(ResultRecord, StudentRecord)> =
        join_resolved(records, &scope.students, |result| result.student_id)
            .map(|(result, student)| (result, student.clone()))
            .collect();

    log_skipped("result", total - joined.len());
    Ok(joined)
}

pub(crate) fn log_skipped(kind: &str, skipped: usize) {
    if skipped > 0 {
        debug!(kind, skipped, "skipped rows with unresolved references");
    }
}

pub(crate) fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
