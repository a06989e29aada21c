//! 响应数据转换
//!
//! - 十六进制图片负载解码
//! - context_chunks 归一化
//! - 聊天片段拆分与解析

pub mod chat_excerpt;
pub mod context_chunk;
pub mod hex_image;

pub use chat_excerpt::{parse_chat_line, parse_excerpt, split_messages, ChatLine};
pub use context_chunk::normalize_context_chunks;
pub use hex_image::{decode_image_payload, looks_like_jpeg, JPEG_MIME};
