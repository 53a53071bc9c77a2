use crate::entity::{class, student};
use anyhow::Result;
use async_trait::async_trait;
use gradebook_core::domain::{ClassId, CourseId, DepartmentId, HierarchyFilter, StudentId};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    QueryTrait, sea_query::SimpleExpr,
};

use super::parse_optional_id;

#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub id: StudentId,
    pub name: String,
    pub course_id: Option<CourseId>,
    pub department_id: Option<DepartmentId>,
    pub class_id: Option<ClassId>,
    /// 关联班级的名称，班级不存在时为 `None`。
    pub class_name: Option<String>,
    pub section: Option<String>,
}

/// 按课程、院系、班级约束学生；缺省字段不参与过滤。
fn hierarchy_condition(filter: &HierarchyFilter) -> Condition {
    Condition::all()
        .add_option(
            filter
                .course
                .map(|id| student::Column::CourseId.eq(id.to_string())),
        )
        .add_option(
            filter
                .department
                .map(|id| student::Column::DepartmentId.eq(id.to_string())),
        )
        .add_option(
            filter
                .class
                .map(|id| student::Column::ClassId.eq(id.to_string())),
        )
}

/// `column IN (SELECT id FROM student WHERE ...)`，过滤条件为空时返回 `None`。
///
/// 以子查询下推，绑定参数个数与匹配的学生数无关。
pub(super) fn in_hierarchy<C: ColumnTrait>(
    column: C,
    filter: &HierarchyFilter,
) -> Option<SimpleExpr> {
    if filter.is_unconstrained() {
        return None;
    }

    let students = student::Entity::find()
        .select_only()
        .column(student::Column::Id)
        .filter(hierarchy_condition(filter))
        .into_query();
    Some(column.in_subquery(students))
}

#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// 满足过滤条件的学生，按 id 排序。
    async fn list(&self, filter: &HierarchyFilter) -> Result<Vec<StudentRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmStudentRepository {
    db: DatabaseConnection,
}

impl SeaOrmStudentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: student::Model, class: Option<class::Model>) -> Result<StudentRecord> {
        Ok(StudentRecord {
            id: StudentId::new(model.id),
            name: model.name,
            course_id: parse_optional_id("student.course_id", model.course_id.as_deref())?,
            department_id: parse_optional_id(
                "student.department_id",
                model.department_id.as_deref(),
            )?,
            class_id: parse_optional_id("student.class_id", model.class_id.as_deref())?,
            class_name: class.map(|class| class.name),
            section: model.section,
        })
    }
}

#[async_trait]
impl StudentRepository for SeaOrmStudentRepository {
    async fn list(&self, filter: &HierarchyFilter) -> Result<Vec<StudentRecord>> {
        let rows = student::Entity::find()
            .filter(hierarchy_condition(filter))
            .find_also_related(class::Entity)
            .order_by_asc(student::Column::Id)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|(model, class)| Self::map_model(model, class))
            .collect()
    }
}
