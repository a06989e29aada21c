//! YAML 配置读写

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::Config;

/// 覆盖后端地址的环境变量
pub const ENV_BASE_URL: &str = "CHATMEME_API_BASE_URL";
/// 覆盖用户标识的环境变量
pub const ENV_USER_ID: &str = "CHATMEME_USER_ID";

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件失败 {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("写入配置文件失败 {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("解析配置文件失败: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("无效的后端地址 '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("user_id 不能为空")]
    EmptyUserId,
}

/// 默认配置文件路径 ~/.chatmeme/config.yaml
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".chatmeme")
        .join("config.yaml")
}

/// 从默认路径加载配置，并应用环境变量覆盖
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&default_config_path())
}

/// 从指定路径加载配置
///
/// 文件不存在时使用默认值
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)?
        }
    } else {
        tracing::debug!("[CONFIG] 配置文件不存在，使用默认配置: {}", path.display());
        Config::default()
    };

    let config = apply_overrides(config, |key| std::env::var(key).ok());
    validate(config)
}

/// 保存配置到指定路径
pub fn save_config_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("[CONFIG] 配置已保存: {}", path.display());
    Ok(())
}

/// 应用环境变量覆盖
pub(super) fn apply_overrides(
    mut config: Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Config {
    if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
        tracing::debug!("[CONFIG] 使用环境变量 {} 覆盖后端地址", ENV_BASE_URL);
        config.api.base_url = url;
    }
    if let Some(user) = lookup(ENV_USER_ID).filter(|v| !v.trim().is_empty()) {
        config.user_id = user;
    }
    config
}

/// 校验并规范化配置
pub fn validate(mut config: Config) -> Result<Config, ConfigError> {
    let trimmed = config.api.base_url.trim().trim_end_matches('/').to_string();
    let parsed = url::Url::parse(&trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
        url: config.api.base_url.clone(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: config.api.base_url.clone(),
            reason: format!("不支持的协议 {}", parsed.scheme()),
        });
    }
    config.api.base_url = trimmed;

    config.user_id = config.user_id.trim().to_string();
    if config.user_id.is_empty() {
        return Err(ConfigError::EmptyUserId);
    }
    Ok(config)
}
