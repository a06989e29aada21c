//! 表情包生成客户端

use super::backend::{read_json, BackendClient, GENERATE_PATH};
use crate::converter::{decode_image_payload, normalize_context_chunks};
use crate::error::{ApiError, GenerateError};
use crate::models::{GenerateRequest, GenerateResponse, GeneratedMeme};
use crate::session::ImageHandle;

/// 生成客户端
#[derive(Debug, Clone)]
pub struct MemeGenerationClient {
    backend: BackendClient,
}

impl MemeGenerationClient {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// 发送提示词，返回解码后的图片与上下文
    pub async fn generate(&self, prompt: &str) -> Result<GeneratedMeme, GenerateError> {
        if prompt.trim().is_empty() {
            return Err(GenerateError::EmptyPrompt);
        }

        let url = self.backend.endpoint(GENERATE_PATH);
        tracing::info!(
            "[GENERATE] 请求生成表情包 ({} chars) -> {}",
            prompt.chars().count(),
            url
        );

        let resp = self
            .backend
            .http()
            .post(&url)
            .json(&GenerateRequest { query: prompt })
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let body: GenerateResponse = read_json(resp, "Error generating meme").await?;
        let meme = Self::decode_response(body)?;

        tracing::info!(
            "[GENERATE] 生成完成: image={} bytes, context={} chunks",
            meme.image.len(),
            meme.context.len()
        );
        Ok(meme)
    }

    /// 解析成功响应
    ///
    /// 缺少 image_data 与十六进制损坏是两种不同的错误
    pub fn decode_response(body: GenerateResponse) -> Result<GeneratedMeme, GenerateError> {
        let payload = body.image_data.ok_or(GenerateError::MissingImageData)?;
        let bytes = decode_image_payload(&payload)?;
        let context =
            normalize_context_chunks(&body.context_chunks).map_err(ApiError::InvalidResponse)?;

        Ok(GeneratedMeme {
            image: ImageHandle::from_jpeg(bytes),
            context,
            template_explanation: body.template_explanation,
            template_format: body.template_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockBackend;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    fn response(value: Value) -> GenerateResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decode_full_response() {
        let meme = MemeGenerationClient::decode_response(response(json!({
            "image_data": "ffd8ffe0",
            "context_chunks": [
                ["[2024-01-01 10:00:00] Dana: late", {"start_time": "10:00"}],
                ["[2024-01-02 09:00:00] Omer: again", {}]
            ],
            "template_explanation": "Classic lateness",
            "template_format": "Drake"
        })))
        .unwrap();

        assert_eq!(meme.image.bytes(), &[0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(meme.image.mime_type(), "image/jpeg");
        assert_eq!(meme.context.len(), 2);
        assert!(meme.context[0].content.contains("Dana"));
        assert_eq!(meme.template_format.as_deref(), Some("Drake"));
        assert!(meme.has_explanation());
    }

    #[test]
    fn test_missing_image_data() {
        let err = MemeGenerationClient::decode_response(response(json!({
            "context_chunks": []
        })))
        .unwrap_err();
        assert!(matches!(err, GenerateError::MissingImageData));

        let err = MemeGenerationClient::decode_response(response(json!({
            "image_data": null
        })))
        .unwrap_err();
        assert!(matches!(err, GenerateError::MissingImageData));
    }

    #[test]
    fn test_malformed_image_data() {
        let odd = MemeGenerationClient::decode_response(response(json!({
            "image_data": "ffd"
        })))
        .unwrap_err();
        assert!(matches!(odd, GenerateError::MalformedImagePayload(_)));

        let bad_char = MemeGenerationClient::decode_response(response(json!({
            "image_data": "ffdx"
        })))
        .unwrap_err();
        assert!(matches!(bad_char, GenerateError::MalformedImagePayload(_)));
    }

    #[tokio::test]
    async fn test_empty_prompt_is_not_sent() {
        let base_url = MockBackend::unused_base_url().await;
        let client = MemeGenerationClient::new(BackendClient::with_base_url(&base_url, None));
        assert!(matches!(
            client.generate("   ").await,
            Err(GenerateError::EmptyPrompt)
        ));
    }

    #[tokio::test]
    async fn test_generate_round_trip() {
        let backend = MockBackend::start(Router::new().route(
            GENERATE_PATH,
            post(|Json(body): Json<Value>| async move {
                let query = body["query"].as_str().unwrap_or_default().to_string();
                Json(json!({
                    "image_data": "ffd8",
                    "context_chunks": [[query, {"source": "echo"}]],
                    "template_explanation": null,
                }))
            }),
        ))
        .await;
        let client =
            MemeGenerationClient::new(BackendClient::with_base_url(&backend.base_url(), None));

        let meme = client.generate("meme about @Dana").await.unwrap();
        assert_eq!(meme.context[0].content, "meme about @Dana");
        assert_eq!(meme.context[0].metadata_str("source"), Some("echo"));
        assert!(!meme.has_explanation());
    }

    #[tokio::test]
    async fn test_generate_http_error() {
        let backend = MockBackend::start(Router::new().route(
            GENERATE_PATH,
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "No relevant context found"})),
                )
            }),
        ))
        .await;
        let client =
            MemeGenerationClient::new(BackendClient::with_base_url(&backend.base_url(), None));

        let err = client.generate("anything").await.unwrap_err();
        assert!(matches!(err, GenerateError::Api(ApiError::Http { status: 500, .. })));
        assert_eq!(err.to_string(), "No relevant context found");
    }
}
