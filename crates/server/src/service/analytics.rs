use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use gradebook_api_types::{
    ClassPerformance, GroupPerformance, PassFailStats, SectionPerformance, StudentStanding,
    SubjectAnalysis, TopScorer,
};
use gradebook_core::domain::{
    Grade, SUBJECT_PASS_PERCENTAGE, StudentId, join_resolved, rank_by_position, round2,
    sort_by_score_desc,
};
use tracing::debug;

use super::ServiceError;
use super::scope::{AnalyticsQuery, StudentScope, joined_results, log_skipped, non_blank};
use crate::config::AnalyticsConfig;
use crate::repository::{
    MarksRepository, Repositories, ResultRecord, ResultRepository, StudentRecord,
    StudentRepository, SubjectRepository,
};

/// 分组缺失或为空的学生归入此桶。
const NO_SECTION: &str = "-";

/// 基于已存储结果与成绩的只读统计，每次请求实时计算。
#[derive(Clone)]
pub struct AnalyticsService {
    students: Arc<dyn StudentRepository>,
    subjects: Arc<dyn SubjectRepository>,
    marks: Arc<dyn MarksRepository>,
    results: Arc<dyn ResultRepository>,
    top_scorers_limit: usize,
}

/// 关联后同时具备学生姓名与班级名称的结果行。
struct GroupRow {
    student_id: StudentId,
    name: String,
    class_name: String,
    section: String,
    percentage: f64,
    grade: Grade,
}

impl GroupRow {
    fn from_joined((result, student): (ResultRecord, StudentRecord)) -> Option<Self> {
        let name = non_blank(&student.name)?.to_string();
        let class_name = student.class_name.as_deref().and_then(non_blank)?.to_string();
        let section = student
            .section
            .as_deref()
            .and_then(non_blank)
            .unwrap_or(NO_SECTION)
            .to_string();

        Some(Self {
            student_id: result.student_id,
            name,
            class_name,
            section,
            percentage: result.percentage,
            grade: result.grade,
        })
    }
}

#[derive(Default)]
struct GroupAccumulator {
    result_count: u32,
    percentage_sum: f64,
    pass_count: u32,
    fail_count: u32,
    grades: BTreeMap<String, u32>,
    student_ids: HashSet<StudentId>,
    students: Vec<StudentStanding>,
}

impl GroupAccumulator {
    fn add(&mut self, row: &GroupRow, with_class_name: bool) {
        self.result_count += 1;
        self.percentage_sum += row.percentage;
        if row.grade.is_pass() {
            self.pass_count += 1;
        } else {
            self.fail_count += 1;
        }
        *self
            .grades
            .entry(row.grade.as_str().to_string())
            .or_default() += 1;
        self.student_ids.insert(row.student_id);
        self.students.push(StudentStanding {
            student_id: row.student_id.value(),
            name: row.name.clone(),
            class_name: with_class_name.then(|| row.class_name.clone()),
            percentage: row.percentage,
            grade: row.grade.as_str().to_string(),
            rank: 0,
        });
    }

    /// 组内排序后名次即位置序号。
    fn finish(mut self) -> GroupPerformance {
        let average_percentage = if self.result_count > 0 {
            round2(self.percentage_sum / f64::from(self.result_count))
        } else {
            0.0
        };

        sort_by_score_desc(&mut self.students, |standing| standing.percentage);
        let students = rank_by_position(self.students)
            .into_iter()
            .map(|ranked| StudentStanding {
                rank: ranked.rank,
                ..ranked.item
            })
            .collect();

        GroupPerformance {
            total_students: u32::try_from(self.student_ids.len()).unwrap_or(u32::MAX),
            result_count: self.result_count,
            average_percentage,
            pass_count: self.pass_count,
            fail_count: self.fail_count,
            pass_rate: rate(self.pass_count, self.result_count),
            grade_distribution: self.grades,
            students,
        }
    }
}

struct SubjectAccumulator {
    max_marks: f64,
    total_marks: f64,
    count: u32,
    pass_count: u32,
    fail_count: u32,
    highest_marks: f64,
    lowest_marks: f64,
    scorers: Vec<TopScorer>,
}

impl SubjectAccumulator {
    fn new(max_marks: f64) -> Self {
        Self {
            max_marks,
            total_marks: 0.0,
            count: 0,
            pass_count: 0,
            fail_count: 0,
            highest_marks: f64::NEG_INFINITY,
            lowest_marks: f64::INFINITY,
            scorers: Vec::new(),
        }
    }

    fn add(&mut self, student: &StudentRecord, marks: f64) {
        let percentage = percentage_of(marks, self.max_marks);
        self.total_marks += marks;
        self.count += 1;
        if percentage >= SUBJECT_PASS_PERCENTAGE {
            self.pass_count += 1;
        } else {
            self.fail_count += 1;
        }
        self.highest_marks = self.highest_marks.max(marks);
        self.lowest_marks = self.lowest_marks.min(marks);

        if let Some(name) = non_blank(&student.name) {
            self.scorers.push(TopScorer {
                student_id: student.id.value(),
                student_name: name.to_string(),
                marks,
                percentage: round2(percentage),
            });
        }
    }

    fn finish(mut self, subject_name: String, top_scorers_limit: usize) -> SubjectAnalysis {
        let average_marks = if self.count > 0 {
            self.total_marks / f64::from(self.count)
        } else {
            0.0
        };

        sort_by_score_desc(&mut self.scorers, |scorer| scorer.marks);
        self.scorers.truncate(top_scorers_limit);

        SubjectAnalysis {
            subject_name,
            max_marks: self.max_marks,
            total_students: self.count,
            average_marks: round2(average_marks),
            average_percentage: round2(percentage_of(average_marks, self.max_marks)),
            highest_marks: if self.count > 0 { self.highest_marks } else { 0.0 },
            lowest_marks: if self.count > 0 { self.lowest_marks } else { 0.0 },
            pass_count: self.pass_count,
            fail_count: self.fail_count,
            pass_rate: rate(self.pass_count, self.count),
            top_scorers: self.scorers,
        }
    }
}

fn percentage_of(marks: f64, max_marks: f64) -> f64 {
    if max_marks > 0.0 {
        marks / max_marks * 100.0
    } else {
        0.0
    }
}

fn rate(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(f64::from(part) / f64::from(total) * 100.0)
    }
}

impl AnalyticsService {
    pub fn new(repositories: &Repositories, config: &AnalyticsConfig) -> Self {
        Self {
            students: repositories.students.clone(),
            subjects: repositories.subjects.clone(),
            marks: repositories.marks.clone(),
            results: repositories.results.clone(),
            top_scorers_limit: config.top_scorers_limit,
        }
    }

    async fn group_rows(&self, query: &AnalyticsQuery) -> Result<Vec<GroupRow>, ServiceError> {
        let joined =
            joined_results(self.students.as_ref(), self.results.as_ref(), query).await?;
        let total = joined.len();
        let rows: Vec<GroupRow> = joined.into_iter().filter_map(GroupRow::from_joined).collect();
        log_skipped("nameless or classless student", total - rows.len());
        Ok(rows)
    }

    /// 按班级统计并嵌套分组统计，班级与分组均按名称排序。
    pub async fn class_performance(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<Vec<ClassPerformance>, ServiceError> {
        let rows = self.group_rows(query).await?;

        let mut classes: BTreeMap<String, (GroupAccumulator, BTreeMap<String, GroupAccumulator>)> =
            BTreeMap::new();
        for row in &rows {
            let (class, sections) = classes.entry(row.class_name.clone()).or_default();
            class.add(row, false);
            sections
                .entry(row.section.clone())
                .or_default()
                .add(row, false);
        }

        Ok(classes
            .into_iter()
            .map(|(class_name, (class, sections))| ClassPerformance {
                class_name,
                performance: class.finish(),
                sections: sections
                    .into_iter()
                    .map(|(section, group)| SectionPerformance {
                        section,
                        performance: group.finish(),
                    })
                    .collect(),
            })
            .collect())
    }

    /// 跨班级按分组统计，学生条目附带班级名称。
    pub async fn section_performance(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<Vec<SectionPerformance>, ServiceError> {
        let rows = self.group_rows(query).await?;

        let mut sections: BTreeMap<String, GroupAccumulator> = BTreeMap::new();
        for row in &rows {
            sections.entry(row.section.clone()).or_default().add(row, true);
        }

        Ok(sections
            .into_iter()
            .map(|(section, group)| SectionPerformance {
                section,
                performance: group.finish(),
            })
            .collect())
    }

    /// 基于原始分数按科目统计，使用固定的科目及格线。
    pub async fn subject_analysis(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<Vec<SubjectAnalysis>, ServiceError> {
        let Some(scope) = StudentScope::load(self.students.as_ref(), &query.filter).await? else {
            return Ok(Vec::new());
        };

        let marks = self
            .marks
            .list(query.semester(), &query.filter)
            .await?;
        if marks.is_empty() {
            return Ok(Vec::new());
        }

        let subject_ids: Vec<_> = marks
            .iter()
            .map(|mark| mark.subject_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let subjects: HashMap<_, _> = self
            .subjects
            .list_by_ids(&subject_ids)
            .await?
            .into_iter()
            .map(|subject| (subject.id, subject))
            .collect();

        let total = marks.len();
        let mut used = 0usize;
        let mut groups: BTreeMap<String, SubjectAccumulator> = BTreeMap::new();
        for (mark, student) in join_resolved(marks, &scope.students, |mark| mark.student_id) {
            let Some(subject) = subjects.get(&mark.subject_id) else {
                continue;
            };
            used += 1;
            groups
                .entry(subject.name.clone())
                .or_insert_with(|| SubjectAccumulator::new(subject.max_marks))
                .add(student, mark.marks_obtained);
        }
        log_skipped("mark", total - used);

        let limit = self.top_scorers_limit;
        Ok(groups
            .into_iter()
            .map(|(subject_name, group)| group.finish(subject_name, limit))
            .collect())
    }

    pub async fn pass_fail(&self, query: &AnalyticsQuery) -> Result<PassFailStats, ServiceError> {
        let joined =
            joined_results(self.students.as_ref(), self.results.as_ref(), query).await?;

        let total = u32::try_from(joined.len()).unwrap_or(u32::MAX);
        let pass_count = u32::try_from(
            joined
                .iter()
                .filter(|(result, _)| result.grade.is_pass())
                .count(),
        )
        .unwrap_or(u32::MAX);
        let fail_count = total - pass_count;
        debug!(total, pass_count, fail_count, "pass/fail computed");

        Ok(PassFailStats {
            total,
            pass_count,
            fail_count,
            pass_rate: rate(pass_count, total),
        })
    }
}
