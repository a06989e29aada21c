//! 后端基础客户端：地址拼接、超时、错误归一化

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{ErrorBody, PingResponse};

pub const PING_PATH: &str = "/api/ping";
pub const INGEST_PATH: &str = "/api/ingest-chat";
pub const GENERATE_PATH: &str = "/api/generate-meme";

/// 共享的 HTTP 客户端，clone 成本很低
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(api: &ApiConfig) -> Self {
        Self::with_base_url(&api.base_url, api.timeout())
    }

    pub fn with_base_url(base_url: &str, timeout: Option<Duration>) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 存活探测，返回后端的 message
    pub async fn ping(&self) -> Result<String, ApiError> {
        let url = self.endpoint(PING_PATH);
        tracing::debug!("[BACKEND] GET {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ApiError::from_transport)?;
        let body: PingResponse = read_json(resp, "Ping failed").await?;
        Ok(body
            .message
            .or(body.status)
            .unwrap_or_else(|| "ok".to_string()))
    }
}

/// 读取 JSON 响应
///
/// 非 2xx 时优先使用响应体的 error 字段，否则为 `{fallback}: {状态行}`
pub(crate) async fn read_json<T: DeserializeOwned>(
    resp: Response,
    fallback: &str,
) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.error)
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| format!("{}: {}", fallback, status));
        tracing::warn!("[BACKEND] 请求失败: status={} message={}", status, message);
        return Err(ApiError::Http {
            status: status.as_u16(),
            message,
        });
    }

    let bytes = resp.bytes().await.map_err(ApiError::from_transport)?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}
