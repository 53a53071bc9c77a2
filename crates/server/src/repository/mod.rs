mod grading_schema_repository;
mod marks_repository;
#[cfg(test)]
pub(crate) mod memory;
mod result_repository;
mod student_repository;
mod subject_repository;

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use sea_orm::DatabaseConnection;

pub use grading_schema_repository::{
    GradingSchemaRecord, GradingSchemaRepository, SeaOrmGradingSchemaRepository,
};
pub use marks_repository::{MarkRecord, MarksRepository, SeaOrmMarksRepository};
pub use result_repository::{ResultRecord, ResultRepository, SeaOrmResultRepository};
pub use student_repository::{SeaOrmStudentRepository, StudentRecord, StudentRepository};
pub use subject_repository::{SeaOrmSubjectRepository, SubjectRecord, SubjectRepository};

/// 服务层读写的全部存储。
#[derive(Clone)]
pub struct Repositories {
    pub students: Arc<dyn StudentRepository>,
    pub subjects: Arc<dyn SubjectRepository>,
    pub marks: Arc<dyn MarksRepository>,
    pub results: Arc<dyn ResultRepository>,
    pub grading_schemas: Arc<dyn GradingSchemaRepository>,
}

impl Repositories {
    pub fn sea_orm(db: DatabaseConnection) -> Self {
        Self {
            students: Arc::new(SeaOrmStudentRepository::new(db.clone())),
            subjects: Arc::new(SeaOrmSubjectRepository::new(db.clone())),
            marks: Arc::new(SeaOrmMarksRepository::new(db.clone())),
            results: Arc::new(SeaOrmResultRepository::new(db.clone())),
            grading_schemas: Arc::new(SeaOrmGradingSchemaRepository::new(db)),
        }
    }
}

fn parse_id<T>(column: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    T::from_str(value).map_err(|e| anyhow!("invalid {column} '{value}' from database: {e}"))
}

fn parse_optional_id<T>(column: &str, value: Option<&str>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.map(|value| parse_id(column, value)).transpose()
}
