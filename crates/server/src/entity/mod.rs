pub mod class;
pub mod grading_schema;
pub mod marks;
pub mod student;
pub mod student_result;
pub mod subject;
