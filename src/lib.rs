//! chatmeme 客户端库
//!
//! 上传聊天记录，按提示词生成基于聊天内容的表情包

pub mod commands;
pub mod config;
pub mod converter;
pub mod error;
pub mod logger;
pub mod models;
pub mod providers;
pub mod services;
pub mod session;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::MemeError;
pub use session::MemeSession;
