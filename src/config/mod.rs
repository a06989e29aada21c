//! 配置管理模块
//!
//! 提供 YAML 配置文件支持，环境变量覆盖后端地址与用户标识

mod path_utils;
mod types;
mod yaml;

pub use path_utils::{collapse_tilde, expand_tilde};
pub use types::{
    ApiConfig, Config, ImageConfig, LoggingConfig, QuotaConfig, DEFAULT_BASE_URL,
    DEFAULT_MEME_LIMIT, DEFAULT_TIMEOUT_SECS,
};
pub use yaml::{
    default_config_path, load_config, load_config_from, save_config_to, validate, ConfigError,
    ENV_BASE_URL, ENV_USER_ID,
};

#[cfg(test)]
mod tests;
