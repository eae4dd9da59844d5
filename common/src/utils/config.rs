use std::{path::PathBuf, time::Duration};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_INDEX_URL: &str =
    "https://raw.githubusercontent.com/Kitware/vtk-examples/gh-pages/src/Coverage/vtk_vtk-examples_xref.json";

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_index_url")]
    pub index_url: String,
    /// Directory holding the cache record; the platform temp dir when unset.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    #[serde(default = "default_cache_max_age_secs")]
    pub cache_max_age_secs: u64,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub serve_stale_on_error: bool,
}

fn default_index_url() -> String {
    DEFAULT_INDEX_URL.to_string()
}

fn default_cache_max_age_secs() -> u64 {
    600
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            index_url: default_index_url(),
            cache_dir: None,
            cache_max_age_secs: default_cache_max_age_secs(),
            request_timeout_secs: None,
            serve_stale_on_error: false,
        }
    }
}

impl AppConfig {
    pub fn resolved_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn cache_max_age(&self) -> Duration {
        Duration::from_secs(self.cache_max_age_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("xref").required(false))
        .add_source(Environment::with_prefix("XREF"))
        .build()?;

    config.try_deserialize()
}
