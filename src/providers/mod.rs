//! 后端 API 客户端
//!
//! - `/api/ping` 存活探测
//! - `/api/ingest-chat` 聊天记录摄取
//! - `/api/generate-meme` 表情包生成

pub mod backend;
pub mod generate;
pub mod ingest;

pub use backend::BackendClient;
pub use generate::MemeGenerationClient;
pub use ingest::ChatIngestionClient;
