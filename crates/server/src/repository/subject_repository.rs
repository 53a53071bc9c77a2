use crate::entity::subject;
use anyhow::Result;
use async_trait::async_trait;
use gradebook_core::domain::SubjectId;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use super::parse_id;

#[derive(Debug, Clone, PartialEq)]
pub struct SubjectRecord {
    pub id: SubjectId,
    pub name: String,
    pub max_marks: f64,
}

#[async_trait]
pub trait SubjectRepository: Send + Sync {
    /// 按 id 查询科目，未知 id 直接忽略。
    async fn list_by_ids(&self, ids: &[SubjectId]) -> Result<Vec<SubjectRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmSubjectRepository {
    db: DatabaseConnection,
}

impl SeaOrmSubjectRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: subject::Model) -> Result<SubjectRecord> {
        Ok(SubjectRecord {
            id: parse_id("subject.id", &model.id)?,
            name: model.name,
            max_marks: model.max_marks,
        })
    }
}

#[async_trait]
impl SubjectRepository for SeaOrmSubjectRepository {
    async fn list_by_ids(&self, ids: &[SubjectId]) -> Result<Vec<SubjectRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = subject::Entity::find()
            .filter(subject::Column::Id.is_in(ids.iter().map(ToString::to_string)))
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }
}
