//! CLI 子命令实现
//!
//! 每个命令返回 `anyhow::Result`，错误在 main 中渲染为一行提示

pub mod generate_cmd;
pub mod ingest_cmd;
pub mod ping_cmd;
pub mod quota_cmd;
pub mod run_cmd;
pub mod suggest_cmd;
