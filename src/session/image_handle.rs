//! 生成图片的持有者
//!
//! 图片可以落盘到预览目录供外部查看器打开，handle 被替换或 drop 时删除该文件。
//! 一个会话同时最多只有一个存活的 handle。

use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::converter::JPEG_MIME;

/// 下载时的默认文件名
pub const DEFAULT_DOWNLOAD_NAME: &str = "generated-meme.jpg";

#[derive(Debug)]
pub struct ImageHandle {
    id: String,
    bytes: Vec<u8>,
    mime: &'static str,
    materialized: Option<PathBuf>,
}

impl ImageHandle {
    pub fn from_jpeg(bytes: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            bytes,
            mime: JPEG_MIME,
            materialized: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime
    }

    /// 已落盘的预览文件路径
    pub fn path(&self) -> Option<&Path> {
        self.materialized.as_deref()
    }

    /// 写入预览目录，重复调用返回同一路径
    pub fn materialize(&mut self, dir: &Path) -> io::Result<&Path> {
        let path = match self.materialized.take() {
            Some(path) => path,
            None => {
                std::fs::create_dir_all(dir)?;
                let path = dir.join(format!("meme-{}.jpg", self.id));
                std::fs::write(&path, &self.bytes)?;
                tracing::debug!("[IMAGE] 图片已写入预览文件: {}", path.display());
                path
            }
        };
        Ok(self.materialized.insert(path).as_path())
    }

    /// 保存一份副本（下载），目标是目录时使用默认文件名
    ///
    /// 副本不受 handle 生命周期影响
    pub fn save_to(&self, dest: &Path) -> io::Result<PathBuf> {
        let target = if dest.is_dir() {
            dest.join(DEFAULT_DOWNLOAD_NAME)
        } else {
            dest.to_path_buf()
        };
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, &self.bytes)?;
        tracing::info!("[IMAGE] 表情包已保存: {}", target.display());
        Ok(target)
    }

    /// 释放预览文件
    pub fn release(&mut self) {
        if let Some(path) = self.materialized.take() {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!("[IMAGE] 已释放预览文件: {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!("[IMAGE] 释放预览文件失败 {}: {}", path.display(), e),
            }
        }
    }
}

impl Drop for ImageHandle {
    fn drop(&mut self) {
        self.release();
    }
}
