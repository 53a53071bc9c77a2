use gradebook_core::domain::{DomainError, GradingSchemaId, StudentId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no marks found for student {student_id} in semester {semester}")]
    NoMarksFound {
        student_id: StudentId,
        semester: String,
    },

    #[error("result for student {student_id} in semester {semester} is frozen")]
    ResultFrozen {
        student_id: StudentId,
        semester: String,
    },

    #[error("grading schema not found: {0}")]
    GradingSchemaNotFound(GradingSchemaId),

    #[error("invalid grading schema: {0}")]
    InvalidGradingSchema(#[from] DomainError),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
