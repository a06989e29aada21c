//! 上传文件归一化
//!
//! `.zip` 在内存中打开，取第一个 `.txt` 条目；`.txt` 原样通过；其他类型拒绝。

use std::io::{Cursor, Read};
use std::path::Path;

use zip::ZipArchive;

use crate::error::ExtractError;
use crate::models::upload_model::{has_suffix, TXT_EXTENSION};
use crate::models::{FileKind, UploadCandidate};

/// 预分配缓冲区的上限，超出部分由 read_to_end 按实际内容增长
const CAPACITY_HINT_LIMIT: u64 = 1 << 20;

/// 压缩包解压服务
pub struct ArchiveService;

impl ArchiveService {
    /// 将用户选择的文件归一化为纯文本文件
    ///
    /// 除读取输入缓冲区外没有副作用
    pub fn extract(candidate: UploadCandidate) -> Result<UploadCandidate, ExtractError> {
        match candidate.kind {
            Some(FileKind::PlainText) => Ok(candidate),
            Some(FileKind::Archive) => Self::extract_first_text_entry(&candidate),
            None => {
                tracing::debug!("[ARCHIVE] 拒绝不支持的文件类型: {}", candidate.name);
                Err(ExtractError::UnsupportedFileType {
                    name: candidate.name,
                })
            }
        }
    }

    /// 从磁盘读取文件并归一化
    pub async fn extract_path(path: &Path) -> Result<UploadCandidate, ExtractError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        // 后缀不对时不必读文件
        if FileKind::from_name(&name).is_none() {
            return Err(ExtractError::UnsupportedFileType { name });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ExtractError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::extract(UploadCandidate::new(name, bytes))
    }

    /// 按中央目录顺序扫描，返回第一个非目录的 `.txt` 条目
    fn extract_first_text_entry(
        archive_file: &UploadCandidate,
    ) -> Result<UploadCandidate, ExtractError> {
        let mut archive = ZipArchive::new(Cursor::new(archive_file.bytes.as_slice()))
            .map_err(|e| {
                tracing::warn!("[ARCHIVE] 无法打开压缩包 {}: {}", archive_file.name, e);
                ExtractError::ArchiveCorrupt(e)
            })?;

        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(ExtractError::ArchiveCorrupt)?;

            if entry.is_dir() || !has_suffix(entry.name(), TXT_EXTENSION) {
                continue;
            }

            let name = entry.name().to_string();
            // 声明的大小不可信，只作为容量提示
            let hint = entry.size().min(CAPACITY_HINT_LIMIT) as usize;
            let mut bytes = Vec::with_capacity(hint);
            entry
                .read_to_end(&mut bytes)
                .map_err(|e| ExtractError::ArchiveCorrupt(e.into()))?;

            tracing::info!(
                "[ARCHIVE] 从 {} 中提取 {} ({} bytes)",
                archive_file.name,
                name,
                bytes.len()
            );
            return Ok(UploadCandidate::plain_text(name, bytes));
        }

        Err(ExtractError::NoTextEntryInArchive)
    }
}
