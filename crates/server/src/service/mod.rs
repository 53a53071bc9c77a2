mod analytics;
mod error;
mod grading;
mod grading_schemas;
mod ranking;
mod result_calculator;
mod scope;

pub use analytics::AnalyticsService;
pub use error::ServiceError;
pub use grading::GradingPolicyResolver;
pub use grading_schemas::GradingSchemaService;
pub use ranking::RankingService;
pub use result_calculator::ResultCalculator;
pub use scope::AnalyticsQuery;
