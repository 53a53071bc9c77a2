use std::sync::Arc;

use gradebook_api_types::RankingEntry;
use gradebook_core::domain::{join_resolved, rank_by_position, rank_with_shared_ties};
use tracing::debug;

use super::ServiceError;
use super::scope::{AnalyticsQuery, StudentScope, joined_results, log_skipped, non_blank};
use crate::config::AnalyticsConfig;
use crate::repository::{
    Repositories, ResultRecord, ResultRepository, StudentRecord, StudentRepository,
};

#[derive(Clone)]
pub struct RankingService {
    students: Arc<dyn StudentRepository>,
    results: Arc<dyn ResultRepository>,
    toppers_limit: u32,
}

fn entry(rank: u32, result: ResultRecord, student: &StudentRecord, name: &str) -> RankingEntry {
    RankingEntry {
        rank,
        student_id: result.student_id.value(),
        name: name.to_string(),
        class_name: student.class_name.clone(),
        section: student.section.clone(),
        percentage: result.percentage,
        grade: result.grade.as_str().to_string(),
        semester: result.semester,
    }
}

impl RankingService {
    pub fn new(repositories: &Repositories, config: &AnalyticsConfig) -> Self {
        Self {
            students: repositories.students.clone(),
            results: repositories.results.clone(),
            toppers_limit: config.toppers_limit,
        }
    }

    /// 范围内全部可解析的结果，按百分比从高到低。百分比相同者名次并列，
    /// 下一个较低百分比取其位置序号。
    pub async fn rankings(&self, query: &AnalyticsQuery) -> Result<Vec<RankingEntry>, ServiceError> {
        let joined =
            joined_results(self.students.as_ref(), self.results.as_ref(), query).await?;
        let total = joined.len();

        let named: Vec<(ResultRecord, StudentRecord)> = joined
            .into_iter()
            .filter(|(_, student)| non_blank(&student.name).is_some())
            .collect();
        log_skipped("nameless student", total - named.len());

        Ok(rank_with_shared_ties(named, |(result, _)| result.percentage)
            .into_iter()
            .map(|ranked| {
                let (result, student) = ranked.item;
                let name = student.name.trim().to_string();
                entry(ranked.rank, result, &student, &name)
            })
            .collect())
    }

    /// 按百分比取前 `limit` 条，名次即位置序号。
    /// 截断之后才丢弃学生无法解析的结果，返回条数可能少于 `limit`。
    pub async fn toppers(
        &self,
        query: &AnalyticsQuery,
        limit: Option<u32>,
    ) -> Result<Vec<RankingEntry>, ServiceError> {
        let limit = limit.unwrap_or(self.toppers_limit);
        if limit == 0 {
            return Ok(Vec::new());
        }

        let Some(scope) = StudentScope::load(self.students.as_ref(), &query.filter).await? else {
            return Ok(Vec::new());
        };

        let top = self
            .results
            .top_by_percentage(query.semester(), &query.filter, limit)
            .await?;
        let fetched = top.len();

        let resolved: Vec<(ResultRecord, &StudentRecord, &str)> =
            join_resolved(top, &scope.students, |result| result.student_id)
                .filter_map(|(result, student)| {
                    non_blank(&student.name).map(|name| (result, student, name))
                })
                .collect();
        log_skipped("topper", fetched - resolved.len());
        debug!(limit, fetched, kept = resolved.len(), "toppers selected");

        Ok(rank_by_position(resolved)
            .into_iter()
            .map(|ranked| {
                let (result, student, name) = ranked.item;
                entry(ranked.rank, result, student, name)
            })
            .collect())
    }
}
