use crate::entity::student_result;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use gradebook_core::domain::{Grade, HierarchyFilter, ResultComputation, ResultStatus, StudentId};
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, OnConflict},
};

use super::student_repository::in_hierarchy;

#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub student_id: StudentId,
    pub semester: String,
    pub total_marks: f64,
    pub total_max_marks: f64,
    pub percentage: f64,
    pub grade: Grade,
    pub sgpa: f64,
    pub cgpa: f64,
    pub status: ResultStatus,
}

#[async_trait]
pub trait ResultRepository: Send + Sync {
    async fn find(&self, student_id: StudentId, semester: &str) -> Result<Option<ResultRecord>>;

    /// 以单条语句插入或覆盖 `(student_id, semester)` 的计算字段。
    ///
    /// 新行状态为 pending，已有行保留原状态。`skip_frozen` 为真时冻结行不被
    /// 覆盖，此时返回 `None`。
    async fn upsert(
        &self,
        student_id: StudentId,
        semester: &str,
        computation: &ResultComputation,
        skip_frozen: bool,
    ) -> Result<Option<ResultRecord>>;

    /// 按存储顺序返回。
    async fn list(
        &self,
        semester: Option<&str>,
        filter: &HierarchyFilter,
    ) -> Result<Vec<ResultRecord>>;

    async fn list_for_student(&self, student_id: StudentId) -> Result<Vec<ResultRecord>>;

    /// 按百分比降序取前 `limit` 条，百分比相同的保持存储顺序。
    async fn top_by_percentage(
        &self,
        semester: Option<&str>,
        filter: &HierarchyFilter,
        limit: u32,
    ) -> Result<Vec<ResultRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmResultRepository {
    db: DatabaseConnection,
}

impl SeaOrmResultRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_status(code: i16) -> Result<ResultStatus> {
        match code {
            0 => Ok(ResultStatus::Pending),
            1 => Ok(ResultStatus::Approved),
            2 => Ok(ResultStatus::Frozen),
            _ => Err(anyhow!("invalid student_result.status code from database: {code}")),
        }
    }

    fn map_status_code(status: ResultStatus) -> i16 {
        match status {
            ResultStatus::Pending => 0,
            ResultStatus::Approved => 1,
            ResultStatus::Frozen => 2,
        }
    }

    fn map_model(model: student_result::Model) -> Result<ResultRecord> {
        let grade = model.grade.parse::<Grade>().map_err(|e| {
            anyhow!("invalid student_result.grade '{}' from database: {e}", model.grade)
        })?;

        Ok(ResultRecord {
            student_id: StudentId::new(model.student_id),
            semester: model.semester,
            total_marks: model.total_marks,
            total_max_marks: model.total_max_marks,
            percentage: model.percentage,
            grade,
            sgpa: model.sgpa,
            cgpa: model.cgpa,
            status: Self::map_status(model.status)?,
        })
    }

    fn scope(semester: Option<&str>, filter: &HierarchyFilter) -> Condition {
        Condition::all()
            .add_option(semester.map(|semester| student_result::Column::Semester.eq(semester)))
            .add_option(in_hierarchy(student_result::Column::StudentId, filter))
    }
}

#[async_trait]
impl ResultRepository for SeaOrmResultRepository {
    async fn find(&self, student_id: StudentId, semester: &str) -> Result<Option<ResultRecord>> {
        let model = student_result::Entity::find()
            .filter(student_result::Column::StudentId.eq(student_id.value()))
            .filter(student_result::Column::Semester.eq(semester))
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn upsert(
        &self,
        student_id: StudentId,
        semester: &str,
        computation: &ResultComputation,
        skip_frozen: bool,
    ) -> Result<Option<ResultRecord>> {
        let now = chrono::Utc::now().naive_utc();
        let active_model = student_result::ActiveModel {
            id: NotSet,
            student_id: Set(student_id.value()),
            semester: Set(semester.to_string()),
            total_marks: Set(computation.total_marks),
            total_max_marks: Set(computation.total_max_marks),
            percentage: Set(computation.percentage),
            grade: Set(computation.grade.as_str().to_string()),
            sgpa: Set(computation.sgpa),
            cgpa: Set(computation.cgpa),
            status: Set(Self::map_status_code(ResultStatus::Pending)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // 冲突时 status 与 created_at 保持原值。
        let mut on_conflict = OnConflict::columns([
            student_result::Column::StudentId,
            student_result::Column::Semester,
        ])
        .update_columns([
            student_result::Column::TotalMarks,
            student_result::Column::TotalMaxMarks,
            student_result::Column::Percentage,
            student_result::Column::Grade,
            student_result::Column::Sgpa,
            student_result::Column::Cgpa,
            student_result::Column::UpdatedAt,
        ])
        .to_owned();
        if skip_frozen {
            on_conflict.action_and_where(
                Expr::col((student_result::Entity, student_result::Column::Status))
                    .ne(Self::map_status_code(ResultStatus::Frozen)),
            );
        }

        let affected = student_result::Entity::insert(active_model)
            .on_conflict(on_conflict)
            .exec_without_returning(&self.db)
            .await?;
        if skip_frozen && affected == 0 {
            return Ok(None);
        }

        self.find(student_id, semester).await?.map(Some).ok_or_else(|| {
            anyhow!("result for student {student_id} in semester '{semester}' vanished after upsert")
        })
    }

    async fn list(
        &self,
        semester: Option<&str>,
        filter: &HierarchyFilter,
    ) -> Result<Vec<ResultRecord>> {
        let models = student_result::Entity::find()
            .filter(Self::scope(semester, filter))
            .order_by_asc(student_result::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn list_for_student(&self, student_id: StudentId) -> Result<Vec<ResultRecord>> {
        let models = student_result::Entity::find()
            .filter(student_result::Column::StudentId.eq(student_id.value()))
            .order_by_asc(student_result::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn top_by_percentage(
        &self,
        semester: Option<&str>,
        filter: &HierarchyFilter,
        limit: u32,
    ) -> Result<Vec<ResultRecord>> {
        let models = student_result::Entity::find()
            .filter(Self::scope(semester, filter))
            .order_by_desc(student_result::Column::Percentage)
            .order_by_asc(student_result::Column::Id)
            .limit(u64::from(limit))
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }
}
