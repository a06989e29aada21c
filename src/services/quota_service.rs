//! 配额服务
//!
//! 每个用户最多生成 `limit` 张表情包。计数由外部存储持有，
//! 流程是先读后写，没有比较并交换：同一用户的两个会话并发生成时可能都通过检查，
//! 最终计数会少记。要严格限额，外部存储需要提供原子的"带上限自增"。
//!
//! 计数变化通过 watch 通道广播，观察者据此把流程切到 LimitReached。

use std::sync::Arc;

use tokio::sync::watch;

use super::quota_store::{FileQuotaStore, QuotaStore};
use crate::config::Config;
use crate::error::QuotaError;

/// 配额快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaSnapshot {
    pub count: u32,
    pub limit: u32,
}

impl QuotaSnapshot {
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.count)
    }

    pub fn is_exhausted(&self) -> bool {
        self.count >= self.limit
    }
}

/// 配额服务
pub struct QuotaService {
    store: Arc<dyn QuotaStore>,
    user_id: String,
    limit: u32,
    tx: watch::Sender<QuotaSnapshot>,
}

impl QuotaService {
    pub fn new(store: Arc<dyn QuotaStore>, user_id: impl Into<String>, limit: u32) -> Self {
        let (tx, _rx) = watch::channel(QuotaSnapshot { count: 0, limit });
        Self {
            store,
            user_id: user_id.into(),
            limit,
            tx,
        }
    }

    /// 按配置创建，计数保存在本地 JSON 文件
    pub fn from_config(config: &Config) -> Self {
        let store = Arc::new(FileQuotaStore::new(config.quota.store_path()));
        Self::new(store, config.user_id.clone(), config.quota.limit)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// 最近一次读到的快照
    pub fn snapshot(&self) -> QuotaSnapshot {
        *self.tx.borrow()
    }

    /// 订阅配额变化
    pub fn subscribe(&self) -> watch::Receiver<QuotaSnapshot> {
        self.tx.subscribe()
    }

    /// 从存储读取计数，记录不存在时创建
    pub async fn refresh(&self) -> Result<QuotaSnapshot, QuotaError> {
        let count = match self.store.get_count(&self.user_id).await? {
            Some(count) => count,
            None => {
                tracing::info!("[QUOTA] 用户 {} 没有计数记录，创建新记录", self.user_id);
                self.store.create(&self.user_id).await?;
                0
            }
        };
        Ok(self.publish(count))
    }

    /// 生成前的主动检查，读取最新计数
    pub async fn check(&self) -> Result<QuotaSnapshot, QuotaError> {
        let snapshot = self.refresh().await?;
        if snapshot.is_exhausted() {
            tracing::info!(
                "[QUOTA] 用户 {} 已达上限 {}/{}",
                self.user_id,
                snapshot.count,
                snapshot.limit
            );
            return Err(QuotaError::Exhausted { limit: self.limit });
        }
        Ok(snapshot)
    }

    /// 生成成功后计数加一
    ///
    /// 先读后写，失败时重新读取以保持快照与存储一致
    pub async fn increment(&self) -> Result<QuotaSnapshot, QuotaError> {
        let current = self.refresh().await?;
        if current.is_exhausted() {
            return Err(QuotaError::Exhausted { limit: self.limit });
        }

        let next = current.count + 1;
        if let Err(e) = self.store.update(&self.user_id, next).await {
            tracing::error!("[QUOTA] 更新计数失败: {}", e);
            if let Err(refresh_err) = self.refresh().await {
                tracing::warn!("[QUOTA] 重新读取计数失败: {}", refresh_err);
            }
            return Err(e);
        }

        tracing::debug!(
            "[QUOTA] 用户 {} 计数 {} -> {}",
            self.user_id,
            current.count,
            next
        );
        Ok(self.publish(next))
    }

    fn publish(&self, count: u32) -> QuotaSnapshot {
        let snapshot = QuotaSnapshot {
            count,
            limit: self.limit,
        };
        self.tx.send_replace(snapshot);
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::quota_store::MemoryQuotaStore;
    use async_trait::async_trait;

    #[tokio::test]
    async fn test_refresh_creates_missing_record() {
        let store = Arc::new(MemoryQuotaStore::new());
        let quota = QuotaService::new(store.clone(), "dana", 5);
        let snapshot = quota.refresh().await.unwrap();
        assert_eq!(snapshot.count, 0);
        assert_eq!(snapshot.remaining(), 5);
        assert_eq!(store.get_count("dana").await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn test_increment_until_exhausted() {
        let store = Arc::new(MemoryQuotaStore::with_count("dana", 3));
        let quota = QuotaService::new(store, "dana", 5);

        assert!(quota.check().await.is_ok());
        assert_eq!(quota.increment().await.unwrap().count, 4);
        let last = quota.increment().await.unwrap();
        assert!(last.is_exhausted());
        assert_eq!(last.remaining(), 0);

        assert!(matches!(
            quota.check().await,
            Err(QuotaError::Exhausted { limit: 5 })
        ));
        assert!(matches!(
            quota.increment().await,
            Err(QuotaError::Exhausted { .. })
        ));
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let store = Arc::new(MemoryQuotaStore::with_count("omer", 4));
        let quota = QuotaService::new(store, "omer", 5);
        let mut rx = quota.subscribe();

        quota.increment().await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_exhausted());
    }

    /// 写入总是失败的存储
    struct BrokenStore;

    #[async_trait]
    impl QuotaStore for BrokenStore {
        async fn get_count(&self, _user_id: &str) -> Result<Option<u32>, QuotaError> {
            Ok(Some(1))
        }
        async fn create(&self, _user_id: &str) -> Result<(), QuotaError> {
            Ok(())
        }
        async fn update(&self, _user_id: &str, _count: u32) -> Result<(), QuotaError> {
            Err(QuotaError::Store("offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_failed_update_keeps_stored_count() {
        let quota = QuotaService::new(Arc::new(BrokenStore), "dana", 5);
        assert!(matches!(
            quota.increment().await,
            Err(QuotaError::Store(_))
        ));
        assert_eq!(quota.snapshot().count, 1);
    }
}
