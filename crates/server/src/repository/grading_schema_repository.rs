use crate::entity::grading_schema;
use anyhow::{Context, Result};
use async_trait::async_trait;
use gradebook_core::domain::{Grade, GradeRange, GradingSchema, GradingSchemaId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait, sea_query::Expr,
};
use serde::{Deserialize, Serialize};

use super::parse_id;

#[derive(Debug, Clone, PartialEq)]
pub struct GradingSchemaRecord {
    pub id: GradingSchemaId,
    pub schema: GradingSchema,
    pub is_active: bool,
}

/// 评分方案，任一时刻至多一个处于激活状态。
///
/// 激活某方案的写操作在同一事务内先停用其余方案。
#[async_trait]
pub trait GradingSchemaRepository: Send + Sync {
    async fn create(&self, schema: GradingSchema, active: bool) -> Result<GradingSchemaRecord>;
    async fn update(
        &self,
        id: GradingSchemaId,
        schema: GradingSchema,
        active: bool,
    ) -> Result<Option<GradingSchemaRecord>>;
    async fn list(&self) -> Result<Vec<GradingSchemaRecord>>;
    async fn find_active(&self) -> Result<Option<GradingSchemaRecord>>;
    async fn activate(&self, id: GradingSchemaId) -> Result<Option<GradingSchemaRecord>>;
}

/// `ranges` 列中单个分数段的 JSON 结构。
#[derive(Debug, Serialize, Deserialize)]
struct StoredRange {
    grade: String,
    min_percentage: f64,
    max_percentage: f64,
    grade_point: f64,
}

#[derive(Clone)]
pub struct SeaOrmGradingSchemaRepository {
    db: DatabaseConnection,
}

impl SeaOrmGradingSchemaRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn encode_ranges(schema: &GradingSchema) -> Result<String> {
        let stored: Vec<StoredRange> = schema
            .ranges()
            .iter()
            .map(|range| StoredRange {
                grade: range.grade.as_str().to_string(),
                min_percentage: range.min_percentage,
                max_percentage: range.max_percentage,
                grade_point: range.grade_point,
            })
            .collect();
        serde_json::to_string(&stored).context("failed to encode grading schema ranges")
    }

    fn map_model(model: grading_schema::Model) -> Result<GradingSchemaRecord> {
        let stored: Vec<StoredRange> = serde_json::from_str(&model.ranges).with_context(|| {
            format!("invalid grading_schema.ranges for schema '{}'", model.id)
        })?;
        let ranges = stored
            .into_iter()
            .map(|range| {
                let grade = range.grade.parse::<Grade>()?;
                Ok(GradeRange::new(
                    grade,
                    range.min_percentage,
                    range.max_percentage,
                    range.grade_point,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        let schema = GradingSchema::new(model.name, model.version, ranges, model.pass_percentage)
            .with_context(|| format!("invalid grading schema '{}' in database", model.id))?;

        Ok(GradingSchemaRecord {
            id: parse_id("grading_schema.id", &model.id)?,
            schema,
            is_active: model.is_active,
        })
    }

    /// 先锁住全部方案行再清除激活标记，并发激活因此串行执行。
    async fn deactivate_all<C: sea_orm::ConnectionTrait>(conn: &C) -> Result<()> {
        grading_schema::Entity::find()
            .select_only()
            .column(grading_schema::Column::Id)
            .lock_exclusive()
            .into_tuple::<String>()
            .all(conn)
            .await?;

        grading_schema::Entity::update_many()
            .col_expr(grading_schema::Column::IsActive, Expr::value(false))
            .filter(grading_schema::Column::IsActive.eq(true))
            .exec(conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl GradingSchemaRepository for SeaOrmGradingSchemaRepository {
    async fn create(&self, schema: GradingSchema, active: bool) -> Result<GradingSchemaRecord> {
        let id = GradingSchemaId::new();
        let now = chrono::Utc::now().naive_utc();

        let active_model = grading_schema::ActiveModel {
            id: Set(id.to_string()),
            name: Set(schema.name().to_string()),
            version: Set(schema.version()),
            ranges: Set(Self::encode_ranges(&schema)?),
            pass_percentage: Set(schema.pass_percentage()),
            is_active: Set(active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let txn = self.db.begin().await?;
        if active {
            Self::deactivate_all(&txn).await?;
        }
        let model = active_model.insert(&txn).await?;
        txn.commit().await?;

        Self::map_model(model)
    }

    async fn update(
        &self,
        id: GradingSchemaId,
        schema: GradingSchema,
        active: bool,
    ) -> Result<Option<GradingSchemaRecord>> {
        let txn = self.db.begin().await?;
        let Some(model) = grading_schema::Entity::find_by_id(id.to_string())
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        if active {
            Self::deactivate_all(&txn).await?;
        }

        let mut active_model: grading_schema::ActiveModel = model.into();
        active_model.name = Set(schema.name().to_string());
        active_model.version = Set(schema.version());
        active_model.ranges = Set(Self::encode_ranges(&schema)?);
        active_model.pass_percentage = Set(schema.pass_percentage());
        active_model.is_active = Set(active);
        active_model.updated_at = Set(chrono::Utc::now().naive_utc());

        let updated = active_model.update(&txn).await?;
        txn.commit().await?;

        Self::map_model(updated).map(Some)
    }

    async fn list(&self) -> Result<Vec<GradingSchemaRecord>> {
        let models = grading_schema::Entity::find()
            .order_by_asc(grading_schema::Column::CreatedAt)
            .order_by_asc(grading_schema::Column::Name)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn find_active(&self) -> Result<Option<GradingSchemaRecord>> {
        let model = grading_schema::Entity::find()
            .filter(grading_schema::Column::IsActive.eq(true))
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn activate(&self, id: GradingSchemaId) -> Result<Option<GradingSchemaRecord>> {
        let txn = self.db.begin().await?;
        let Some(model) = grading_schema::Entity::find_by_id(id.to_string())
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        Self::deactivate_all(&txn).await?;

        let mut active_model: grading_schema::ActiveModel = model.into();
        active_model.is_active = Set(true);
        active_model.updated_at = Set(chrono::Utc::now().naive_utc());
        let updated = active_model.update(&txn).await?;
        txn.commit().await?;

        Self::map_model(updated).map(Some)
    }
}
