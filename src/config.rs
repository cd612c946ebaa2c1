use serde::Deserialize;
use std::path::Path;

use crate::segmentation::LocatorStrategy;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "CHAPTER_QUIZ";

/// 读取 API key 的备用环境变量
pub const API_KEY_FALLBACK_ENV: &str = "GEMINI_API_KEY";

/// 应用配置
///
/// 加载顺序：可选的 TOML 配置文件，然后是 `CHAPTER_QUIZ_` 前缀的环境变量
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_strategy")]
    pub strategy: LocatorStrategy,
    #[serde(default = "default_max_body_chars")]
    pub max_body_chars: usize,
    #[serde(default = "default_title_scan_chars")]
    pub title_scan_chars: usize,
    #[serde(default = "default_min_title_chars")]
    pub min_title_chars: usize,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_strategy() -> LocatorStrategy {
    LocatorStrategy::Ai
}

fn default_max_body_chars() -> usize {
    10_000
}

fn default_title_scan_chars() -> usize {
    8_000
}

fn default_min_title_chars() -> usize {
    5
}

impl AppConfig {
    /// 从配置文件（可选）和环境变量加载配置
    pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_from(file, Self::environment())
    }

    /// `CHAPTER_QUIZ_` 前缀的环境变量源
    ///
    /// 配置结构是扁平的，前缀之后的部分整体作为字段名（`CHAPTER_QUIZ_MAX_BODY_CHARS` -> `max_body_chars`）
    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .try_parsing(true)
    }

    fn load_from(
        file: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder.add_source(environment).build()?.try_deserialize()
    }

    /// 生效的 API key
    ///
    /// 配置中没有时读取 `GEMINI_API_KEY`；空字符串视为未配置
    pub fn api_key(&self) -> Option<String> {
        self.api_key_or(std::env::var(API_KEY_FALLBACK_ENV).ok())
    }

    fn api_key_or(&self, fallback: Option<String>) -> Option<String> {
        self.api_key
            .clone()
            .or(fallback)
            .filter(|key| !key.trim().is_empty())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            strategy: default_strategy(),
            max_body_chars: default_max_body_chars(),
            title_scan_chars: default_title_scan_chars(),
            min_title_chars: default_min_title_chars(),
        }
    }
}
