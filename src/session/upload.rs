//! 上传控制器
//!
//! 管理文件选择、拖放状态和摄取请求。选择失败时保留之前的状态，
//! 解压器的提示原样作为可见错误。

use std::path::Path;

use crate::error::{ExtractError, FlowError, MemeError};
use crate::models::{IngestedSession, UploadCandidate};
use crate::providers::ChatIngestionClient;
use crate::services::ArchiveService;

/// 选择状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    NoFile,
    FileSelected(UploadCandidate),
}

#[derive(Debug)]
pub struct UploadController {
    state: UploadState,
    drag_active: bool,
    error: Option<String>,
}

impl Default for UploadController {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadController {
    pub fn new() -> Self {
        Self {
            state: UploadState::NoFile,
            drag_active: false,
            error: None,
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn selected(&self) -> Option<&UploadCandidate> {
        match &self.state {
            UploadState::FileSelected(file) => Some(file),
            UploadState::NoFile => None,
        }
    }

    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    /// 当前可见的错误提示
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn drag_enter(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_over(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_active = false;
    }

    /// 拖放完成，按选择处理
    pub fn drop_file(&mut self, candidate: UploadCandidate) -> Result<(), ExtractError> {
        self.drag_active = false;
        self.select(candidate)
    }

    /// 选择文件并立即归一化
    pub fn select(&mut self, candidate: UploadCandidate) -> Result<(), ExtractError> {
        match ArchiveService::extract(candidate) {
            Ok(file) => {
                tracing::info!("[UPLOAD] 已选择文件: {} ({} bytes)", file.name, file.size());
                self.state = UploadState::FileSelected(file);
                self.error = None;
                Ok(())
            }
            Err(e) => self.reject(e),
        }
    }

    /// 从磁盘选择文件
    pub async fn select_path(&mut self, path: &Path) -> Result<(), ExtractError> {
        match ArchiveService::extract_path(path).await {
            Ok(file) => {
                tracing::info!("[UPLOAD] 已选择文件: {} ({} bytes)", file.name, file.size());
                self.state = UploadState::FileSelected(file);
                self.error = None;
                Ok(())
            }
            Err(e) => self.reject(e),
        }
    }

    fn reject(&mut self, err: ExtractError) -> Result<(), ExtractError> {
        tracing::warn!("[UPLOAD] 文件选择失败: {}", err);
        self.error = Some(err.to_string());
        Err(err)
    }

    /// 上传已选择的文件
    ///
    /// 成功后丢弃文件；失败时文件保持选中，错误提示可见。
    /// 请求期间持有 `&mut self`，同一控制器不会有第二个摄取请求
    pub async fn process(
        &mut self,
        client: &ChatIngestionClient,
    ) -> Result<IngestedSession, MemeError> {
        let file = match &self.state {
            UploadState::FileSelected(file) => file,
            UploadState::NoFile => {
                self.error = Some(FlowError::NoFileSelected.to_string());
                return Err(FlowError::NoFileSelected.into());
            }
        };

        match client.ingest(file).await {
            Ok(session) => {
                self.state = UploadState::NoFile;
                self.error = None;
                Ok(session)
            }
            Err(e) => {
                tracing::error!("[UPLOAD] 摄取失败: {}", e);
                self.error = Some(e.to_string());
                Err(MemeError::IngestFailed(e))
            }
        }
    }
}
