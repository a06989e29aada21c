//! 配额计数存储
//!
//! 计数由外部服务持有，这里只定义读写接口。
//! 接口没有原子的"带上限自增"，调用方是先读后写。

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::QuotaError;

/// 单个用户的计数记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaRecord {
    pub count: u32,
    pub last_generated_at: DateTime<Utc>,
}

impl QuotaRecord {
    pub fn new(count: u32) -> Self {
        Self {
            count,
            last_generated_at: Utc::now(),
        }
    }
}

/// 外部计数存储
#[async_trait]
pub trait QuotaStore: Send + Sync {
    /// 读取计数，记录不存在时返回 None
    async fn get_count(&self, user_id: &str) -> Result<Option<u32>, QuotaError>;

    /// 创建初始记录（计数为 0）
    async fn create(&self, user_id: &str) -> Result<(), QuotaError>;

    /// 覆盖写入计数
    async fn update(&self, user_id: &str, count: u32) -> Result<(), QuotaError>;
}

/// 内存存储，用于测试和未配置持久化的场景
#[derive(Debug, Default)]
pub struct MemoryQuotaStore {
    records: DashMap<String, QuotaRecord>,
}

impl MemoryQuotaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置计数
    pub fn with_count(user_id: &str, count: u32) -> Self {
        let store = Self::default();
        store
            .records
            .insert(user_id.to_string(), QuotaRecord::new(count));
        store
    }
}

#[async_trait]
impl QuotaStore for MemoryQuotaStore {
    async fn get_count(&self, user_id: &str) -> Result<Option<u32>, QuotaError> {
        Ok(self.records.get(user_id).map(|r| r.count))
    }

    async fn create(&self, user_id: &str) -> Result<(), QuotaError> {
        self.records
            .entry(user_id.to_string())
            .or_insert_with(|| QuotaRecord::new(0));
        Ok(())
    }

    async fn update(&self, user_id: &str, count: u32) -> Result<(), QuotaError> {
        self.records
            .insert(user_id.to_string(), QuotaRecord::new(count));
        Ok(())
    }
}

/// JSON 文件存储，所有用户记录保存在一个文件中
pub struct FileQuotaStore {
    path: PathBuf,
    /// 串行化同一进程内的读改写
    lock: Mutex<()>,
}

impl FileQuotaStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn read_all(&self) -> Result<HashMap<String, QuotaRecord>, QuotaError> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(HashMap::new());
        }
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| QuotaError::Store(format!("读取配额文件失败: {}", e)))?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| QuotaError::Store(format!("解析配额文件失败: {}", e)))
    }

    async fn write_all(&self, records: &HashMap<String, QuotaRecord>) -> Result<(), QuotaError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| QuotaError::Store(format!("创建配额目录失败: {}", e)))?;
        }
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| QuotaError::Store(format!("序列化配额失败: {}", e)))?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| QuotaError::Store(format!("写入配额文件失败: {}", e)))
    }
}

#[async_trait]
impl QuotaStore for FileQuotaStore {
    async fn get_count(&self, user_id: &str) -> Result<Option<u32>, QuotaError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.get(user_id).map(|r| r.count))
    }

    async fn create(&self, user_id: &str) -> Result<(), QuotaError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        if records.contains_key(user_id) {
            return Ok(());
        }
        records.insert(user_id.to_string(), QuotaRecord::new(0));
        self.write_all(&records).await
    }

    async fn update(&self, user_id: &str, count: u32) -> Result<(), QuotaError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        records.insert(user_id.to_string(), QuotaRecord::new(count));
        self.write_all(&records).await
    }
}
