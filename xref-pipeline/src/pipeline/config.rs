use std::time::Duration;

use common::{error::AppError, utils::config::AppConfig};
use url::Url;

pub const DEFAULT_SAMPLE_SIZE: usize = 5;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub index_url: Url,
    /// Records older than this are refreshed before use.
    pub max_age: Duration,
    pub serve_stale_on_error: bool,
}

impl PipelineConfig {
    pub fn new(index_url: Url) -> Self {
        Self {
            index_url,
            max_age: Duration::from_secs(600),
            serve_stale_on_error: false,
        }
    }

    pub fn from_app_config(config: &AppConfig) -> Result<Self, AppError> {
        let index_url = Url::parse(&config.index_url).map_err(|err| {
            AppError::Validation(format!("invalid index URL {}: {err}", config.index_url))
        })?;

        Ok(Self {
            index_url,
            max_age: config.cache_max_age(),
            serve_stale_on_error: config.serve_stale_on_error,
        })
    }
}

#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub class_name: String,
    /// Raw language name as supplied by the caller; matched case-insensitively.
    pub language: String,
    pub max_count: usize,
    pub take_all: bool,
    pub force_refresh: bool,
}

impl QueryRequest {
    pub fn new(class_name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            language: language.into(),
            max_count: DEFAULT_SAMPLE_SIZE,
            take_all: false,
            force_refresh: false,
        }
    }

    #[must_use]
    pub fn with_max_count(mut self, max_count: usize) -> Self {
        self.max_count = max_count;
        self
    }

    #[must_use]
    pub fn with_take_all(mut self, take_all: bool) -> Self {
        self.take_all = take_all;
        self
    }

    #[must_use]
    pub fn with_force_refresh(mut self, force_refresh: bool) -> Self {
        self.force_refresh = force_refresh;
        self
    }
}
