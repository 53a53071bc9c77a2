use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
type Result<T> = anyhow::Result<T>;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub listen: String,
    pub database_url: Option<String>,
    pub grading: GradingConfig,
    pub results: ResultsConfig,
    pub analytics: AnalyticsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            database_url: None,
            grading: GradingConfig::default(),
            results: ResultsConfig::default(),
            analytics: AnalyticsConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("failed to deserialize server config")
    }

    /// `path` 存在时读取，否则使用默认值，随后应用环境变量覆盖。
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(listen) = lookup("GRADEBOOK_LISTEN") {
            self.listen = listen;
        }
    }
}

/// 成绩计算使用的等级表。
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GradingMode {
    #[default]
    Fixed,
    ActiveSchema,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct GradingConfig {
    pub policy: GradingMode,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ResultsConfig {
    /// 拒绝重新计算已冻结的结果。
    pub protect_frozen: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub toppers_limit: u32,
    pub top_scorers_limit: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            toppers_limit: 10,
            top_scorers_limit: 10,
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:3000".to_string()
}
