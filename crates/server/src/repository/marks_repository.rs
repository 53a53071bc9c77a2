use crate::entity::marks;
use anyhow::Result;
use async_trait::async_trait;
use gradebook_core::domain::{HierarchyFilter, StudentId, SubjectId};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::parse_id;
use super::student_repository::in_hierarchy;

/// 成绩计算只关心这三项；考试类型与定稿标记不影响结果。
#[derive(Debug, Clone, PartialEq)]
pub struct MarkRecord {
    pub student_id: StudentId,
    pub subject_id: SubjectId,
    pub marks_obtained: f64,
}

/// 成绩的只读视图，写入由成绩录入模块负责。
#[async_trait]
pub trait MarksRepository: Send + Sync {
    async fn list_for_student(
        &self,
        student_id: StudentId,
        semester: Option<&str>,
    ) -> Result<Vec<MarkRecord>>;

    /// 按存储顺序返回，可按学期与层级过滤。
    async fn list(
        &self,
        semester: Option<&str>,
        filter: &HierarchyFilter,
    ) -> Result<Vec<MarkRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmMarksRepository {
    db: DatabaseConnection,
}

impl SeaOrmMarksRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: marks::Model) -> Result<MarkRecord> {
        Ok(MarkRecord {
            student_id: StudentId::new(model.student_id),
            subject_id: parse_id("marks.subject_id", &model.subject_id)?,
            marks_obtained: model.marks_obtained,
        })
    }

    async fn fetch(&self, condition: Condition) -> Result<Vec<MarkRecord>> {
        let models = marks::Entity::find()
            .filter(condition)
            .order_by_asc(marks::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }
}

#[async_trait]
impl MarksRepository for SeaOrmMarksRepository {
    async fn list_for_student(
        &self,
        student_id: StudentId,
        semester: Option<&str>,
    ) -> Result<Vec<MarkRecord>> {
        let condition = Condition::all()
            .add(marks::Column::StudentId.eq(student_id.value()))
            .add_option(semester.map(|semester| marks::Column::Semester.eq(semester)));

        self.fetch(condition).await
    }

    async fn list(
        &self,
        semester: Option<&str>,
        filter: &HierarchyFilter,
    ) -> Result<Vec<MarkRecord>> {
        let condition = Condition::all()
            .add_option(semester.map(|semester| marks::Column::Semester.eq(semester)))
            .add_option(in_hierarchy(marks::Column::StudentId, filter));

        self.fetch(condition).await
    }
}
