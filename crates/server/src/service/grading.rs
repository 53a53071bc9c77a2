use std::sync::Arc;

use gradebook_core::domain::{FixedGradingPolicy, GradingPolicy, SchemaGradingPolicy};
use tracing::debug;

use super::ServiceError;
use crate::config::GradingMode;
use crate::repository::GradingSchemaRepository;

/// 选择成绩计算使用的评分策略。
#[derive(Clone)]
pub struct GradingPolicyResolver {
    mode: GradingMode,
    schemas: Arc<dyn GradingSchemaRepository>,
}

impl GradingPolicyResolver {
    pub fn new(mode: GradingMode, schemas: Arc<dyn GradingSchemaRepository>) -> Self {
        Self { mode, schemas }
    }

    pub async fn resolve(&self) -> Result<Box<dyn GradingPolicy>, ServiceError> {
        match self.mode {
            GradingMode::Fixed => Ok(Box::new(FixedGradingPolicy)),
            GradingMode::ActiveSchema => match self.schemas.find_active().await? {
                Some(record) => {
                    debug!(schema = %record.id, name = record.schema.name(), "grading with active schema");
                    Ok(Box::new(SchemaGradingPolicy::new(&record.schema)))
                }
                None => {
                    debug!("no active grading schema, falling back to the fixed table");
                    Ok(Box::new(FixedGradingPolicy))
                }
            },
        }
    }
}
