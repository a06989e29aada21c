//! 查看配额

use anyhow::Result;

use crate::config::{collapse_tilde, Config};
use crate::services::QuotaService;

pub async fn quota(config: &Config) -> Result<()> {
    let service = QuotaService::from_config(config);
    let snapshot = service.refresh().await?;

    println!(
        "{}: used {} of {} memes, {} remaining",
        service.user_id(),
        snapshot.count,
        snapshot.limit,
        snapshot.remaining()
    );
    tracing::debug!(
        "[QUOTA] 计数文件: {}",
        collapse_tilde(&config.quota.store_path())
    );
    Ok(())
}
