//! 表情包生成相关的数据模型

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::session::ImageHandle;

/// 生成接口请求体
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    pub query: &'a str,
}

/// 生成接口的原始响应
///
/// context_chunks 每项是 `[text, metadata]` 二元组，保持后端给出的顺序
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub image_data: Option<String>,
    #[serde(default)]
    pub context_chunks: Vec<Value>,
    #[serde(default)]
    pub template_explanation: Option<String>,
    #[serde(default)]
    pub template_format: Option<String>,
}

/// 错误响应体，error 字段可选
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// 存活探测响应
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PingResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// 一段用于生成的聊天上下文
///
/// metadata 的结构由后端决定，按开放的键值表保存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextExcerpt {
    pub content: String,
    pub metadata: Map<String, Value>,
}

impl ContextExcerpt {
    /// 读取字符串类型的元数据
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }

    /// 时间范围描述，如 `2024-01-01 10:00 - 2024-01-01 11:30`
    pub fn time_range(&self) -> Option<String> {
        match (
            self.metadata_str("start_time"),
            self.metadata_str("end_time"),
        ) {
            (Some(start), Some(end)) => Some(format!("{} - {}", start, end)),
            (Some(start), None) => Some(start.to_string()),
            _ => None,
        }
    }
}

/// 一次成功生成的结果
#[derive(Debug)]
pub struct GeneratedMeme {
    pub image: ImageHandle,
    pub context: Vec<ContextExcerpt>,
    pub template_explanation: Option<String>,
    pub template_format: Option<String>,
}

impl GeneratedMeme {
    /// 是否有可展示的模板说明
    pub fn has_explanation(&self) -> bool {
        self.template_explanation.is_some() || self.template_format.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generate_response_optional_fields() {
        let resp: GenerateResponse = serde_json::from_value(json!({
            "image_data": "ffd8",
            "context_chunks": [["hello", {"start_time": "10:00"}]]
        }))
        .unwrap();
        assert_eq!(resp.image_data.as_deref(), Some("ffd8"));
        assert_eq!(resp.context_chunks.len(), 1);
        assert!(resp.template_explanation.is_none());

        let empty: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.image_data.is_none());
        assert!(empty.context_chunks.is_empty());
    }

    #[test]
    fn test_time_range() {
        let mut metadata = Map::new();
        metadata.insert("start_time".to_string(), json!("2024-03-01 20:00"));
        metadata.insert("end_time".to_string(), json!("2024-03-01 21:15"));
        let excerpt = ContextExcerpt {
            content: String::new(),
            metadata,
        };
        assert_eq!(
            excerpt.time_range().as_deref(),
            Some("2024-03-01 20:00 - 2024-03-01 21:15")
        );
    }
}
