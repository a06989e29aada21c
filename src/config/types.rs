//! 配置类型定义

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::path_utils::expand_tilde;

/// 默认后端地址（本地开发时 Flask 服务监听 8080）
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
/// 默认请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
/// 每个用户可生成的表情包数量
pub const DEFAULT_MEME_LIMIT: u32 = 5;

/// 主配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 后端 API 配置
    pub api: ApiConfig,
    /// 配额配置
    pub quota: QuotaConfig,
    /// 图片输出配置
    pub images: ImageConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 配额按此用户标识计数
    pub user_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            quota: QuotaConfig::default(),
            images: ImageConfig::default(),
            logging: LoggingConfig::default(),
            user_id: whoami::username(),
        }
    }
}

/// 后端 API 配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// 后端基础地址，不含 `/api`
    pub base_url: String,
    /// 单次请求超时（秒），0 表示不设超时
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// 配额配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuotaConfig {
    /// 上限
    pub limit: u32,
    /// 计数文件路径，支持 `~`
    pub store_path: String,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_MEME_LIMIT,
            store_path: "~/.chatmeme/quota.json".to_string(),
        }
    }
}

impl QuotaConfig {
    pub fn store_path(&self) -> PathBuf {
        expand_tilde(&self.store_path)
    }
}

/// 图片输出配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageConfig {
    /// 生成图片的落盘目录，用于预览
    pub dir: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            dir: "~/.chatmeme/images".to_string(),
        }
    }
}

impl ImageConfig {
    pub fn dir(&self) -> PathBuf {
        expand_tilde(&self.dir)
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// 默认日志级别，RUST_LOG 优先
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
