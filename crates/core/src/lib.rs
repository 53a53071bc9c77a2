//! Pure grading, ranking and result-computation rules shared by the server.

pub mod domain;
