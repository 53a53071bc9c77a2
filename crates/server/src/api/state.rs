use crate::config::AppConfig;
use crate::repository::Repositories;
use crate::service::{
    AnalyticsService, GradingPolicyResolver, GradingSchemaService, RankingService,
    ResultCalculator,
};

/// 统一的应用状态，包含所有路由共享的服务。
#[derive(Clone)]
pub struct AppState {
    pub results: ResultCalculator,
    pub analytics: AnalyticsService,
    pub rankings: RankingService,
    pub grading_schemas: GradingSchemaService,
}

impl AppState {
    pub fn new(repositories: Repositories, config: &AppConfig) -> Self {
        let resolver =
            GradingPolicyResolver::new(config.grading.policy, repositories.grading_schemas.clone());
        Self {
            results: ResultCalculator::new(
                &repositories,
                resolver,
                config.results.protect_frozen,
            ),
            analytics: AnalyticsService::new(&repositories, &config.analytics),
            rankings: RankingService::new(&repositories, &config.analytics),
            grading_schemas: GradingSchemaService::new(repositories.grading_schemas.clone()),
        }
    }
}
