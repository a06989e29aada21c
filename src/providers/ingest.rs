//! 聊天记录摄取客户端

use reqwest::multipart::{Form, Part};

use super::backend::{read_json, BackendClient, INGEST_PATH};
use crate::error::ApiError;
use crate::models::{FileKind, IngestResponse, IngestedSession, UploadCandidate};

/// 摄取客户端
///
/// 单次请求，不重试；失败后由用户手动重新触发
#[derive(Debug, Clone)]
pub struct ChatIngestionClient {
    backend: BackendClient,
}

impl ChatIngestionClient {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// 以 multipart 表单字段 `file` 上传聊天记录
    ///
    /// 不修改传入的文件
    pub async fn ingest(&self, file: &UploadCandidate) -> Result<IngestedSession, ApiError> {
        let url = self.backend.endpoint(INGEST_PATH);
        let mime = file.kind.unwrap_or(FileKind::PlainText).mime_type();
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(mime)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        let form = Form::new().part("file", part);

        tracing::info!(
            "[INGEST] 上传聊天记录 {} ({} bytes) -> {}",
            file.name,
            file.size(),
            url
        );

        let resp = self
            .backend
            .http()
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let body: IngestResponse = read_json(resp, "Error processing chat").await?;
        let session = IngestedSession::from(body);

        tracing::info!(
            "[INGEST] 摄取完成: group={} participants={}",
            session.group_name,
            session.participants.len()
        );
        Ok(session)
    }
}
