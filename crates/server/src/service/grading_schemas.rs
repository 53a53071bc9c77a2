use std::sync::Arc;

use gradebook_api_types::{GradeRangePayload, GradingSchemaRequest, GradingSchemaResponse};
use gradebook_core::domain::{DomainError, Grade, GradeRange, GradingSchema, GradingSchemaId};
use tracing::info;

use super::ServiceError;
use crate::repository::{GradingSchemaRecord, GradingSchemaRepository};

#[derive(Clone)]
pub struct GradingSchemaService {
    schemas: Arc<dyn GradingSchemaRepository>,
}

impl GradingSchemaService {
    pub fn new(schemas: Arc<dyn GradingSchemaRepository>) -> Self {
        Self { schemas }
    }

    pub async fn create(
        &self,
        request: GradingSchemaRequest,
    ) -> Result<GradingSchemaResponse, ServiceError> {
        let active = request.is_active;
        let schema = to_domain(request)?;
        let record = self.schemas.create(schema, active).await?;
        info!(schema = %record.id, active, "grading schema created");
        Ok(to_response(record))
    }

    pub async fn update(
        &self,
        id: GradingSchemaId,
        request: GradingSchemaRequest,
    ) -> Result<GradingSchemaResponse, ServiceError> {
        let active = request.is_active;
        let schema = to_domain(request)?;
        let record = self
            .schemas
            .update(id, schema, active)
            .await?
            .ok_or(ServiceError::GradingSchemaNotFound(id))?;
        info!(schema = %id, active, "grading schema updated");
        Ok(to_response(record))
    }

    pub async fn list(&self) -> Result<Vec<GradingSchemaResponse>, ServiceError> {
        let records = self.schemas.list().await?;
        Ok(records.into_iter().map(to_response).collect())
    }

    pub async fn active(&self) -> Result<Option<GradingSchemaResponse>, ServiceError> {
        Ok(self.schemas.find_active().await?.map(to_response))
    }

    pub async fn activate(&self, id: GradingSchemaId) -> Result<GradingSchemaResponse, ServiceError> {
        let record = self
            .schemas
            .activate(id)
            .await?
            .ok_or(ServiceError::GradingSchemaNotFound(id))?;
        info!(schema = %id, "grading schema activated");
        Ok(to_response(record))
    }
}

fn to_domain(request: GradingSchemaRequest) -> Result<GradingSchema, DomainError> {
    let ranges = request
        .ranges
        .iter()
        .map(|range| {
            Ok(GradeRange::new(
                range.grade.parse::<Grade>()?,
                range.min_percentage,
                range.max_percentage,
                range.grade_point,
            ))
        })
        .collect::<Result<Vec<_>, DomainError>>()?;

    GradingSchema::new(request.name, request.version, ranges, request.pass_percentage)
}

fn to_response(record: GradingSchemaRecord) -> GradingSchemaResponse {
    GradingSchemaResponse {
        id: record.id.to_string(),
        name: record.schema.name().to_string(),
        version: record.schema.version(),
        ranges: record
            .schema
            .ranges()
            .iter()
            .map(|range| GradeRangePayload {
                grade: range.grade.as_str().to_string(),
                min_percentage: range.min_percentage,
                max_percentage: range.max_percentage,
                grade_point: range.grade_point,
            })
            .collect(),
        pass_percentage: record.schema.pass_percentage(),
        is_active: record.is_active,
    }
}
