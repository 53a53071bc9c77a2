mod computation;
mod error;
mod grade;
mod grading;
mod grading_schema;
mod hierarchy;
mod ids;
mod join;
mod ranking;
mod result_status;

pub use computation::{MarkLine, NO_SEMESTER, ResultComputation, round2, semester_key};
pub use error::DomainError;
pub use grade::Grade;
pub use grading::{FixedGradingPolicy, GradingPolicy, SUBJECT_PASS_PERCENTAGE, SchemaGradingPolicy};
pub use grading_schema::{GradeRange, GradingSchema};
pub use hierarchy::HierarchyFilter;
pub use ids::{ClassId, CourseId, DepartmentId, GradingSchemaId, StudentId, SubjectId};
pub use join::join_resolved;
pub use ranking::{Ranked, rank_by_position, rank_with_shared_ties, sort_by_score_desc};
pub use result_status::ResultStatus;
