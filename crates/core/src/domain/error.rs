use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    #[error("unknown grade: {0}")]
    UnknownGrade(String),
    #[error("grading schema name must not be empty")]
    EmptySchemaName,
    #[error("grading schema must define at least one grade range")]
    EmptyGradeRanges,
    #[error("invalid range for grade {grade}: [{min}, {max}] must lie within [0, 100] with min <= max")]
    InvalidGradeRange { grade: String, min: f64, max: f64 },
    #[error("invalid grade point for grade {grade}: {point}")]
    InvalidGradePoint { grade: String, point: f64 },
    #[error("grade {0} is defined more than once")]
    DuplicateGrade(String),
    #[error("grade ranges {first} and {second} overlap")]
    OverlappingGradeRanges { first: String, second: String },
    #[error("invalid pass percentage: {0}. pass percentage must be in [0, 100]")]
    InvalidPassPercentage(f64),
}
