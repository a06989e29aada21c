//! context_chunks 归一化
//!
//! `[[text, metadata], ...]` → `Vec<ContextExcerpt>`，顺序即后端给出的相关度顺序，不重排

use serde_json::{Map, Value};

use crate::models::ContextExcerpt;

/// 将原始 context_chunks 转为统一结构
///
/// metadata 缺失或为 null 时视为空表；其他形状返回错误描述
pub fn normalize_context_chunks(chunks: &[Value]) -> Result<Vec<ContextExcerpt>, String> {
    chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| normalize_chunk(index, chunk))
        .collect()
}

fn normalize_chunk(index: usize, chunk: &Value) -> Result<ContextExcerpt, String> {
    let pair = chunk
        .as_array()
        .ok_or_else(|| format!("context chunk {} is not a [text, metadata] pair", index))?;

    let content = pair
        .first()
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("context chunk {} has no text", index))?
        .to_string();

    let metadata = match pair.get(1) {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(other) => {
            return Err(format!(
                "context chunk {} metadata is not an object: {}",
                index, other
            ))
        }
    };

    Ok(ContextExcerpt { content, metadata })
}
