//! 会话模块
//!
//! 提供以下功能：
//! - 上传控制（文件选择、拖放、摄取）
//! - 三步流程编排与配额观察
//! - `@` 提及自动补全
//! - 生成图片的生命周期管理

mod flow;
mod image_handle;
mod meme_session;
mod mention;
mod upload;

pub use flow::{spawn_quota_observer, FlowStep, GenerateGate, StepOrchestrator};
pub use image_handle::{ImageHandle, DEFAULT_DOWNLOAD_NAME};
pub use meme_session::MemeSession;
pub use mention::{
    apply_mention, complete_unique, detect_mention, filter_participants, suggest, MentionQuery,
    MentionSuggestions,
};
pub use upload::{UploadController, UploadState};
