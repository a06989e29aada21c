//! 后端存活探测

use anyhow::Result;

use crate::config::Config;
use crate::providers::BackendClient;

pub async fn ping(config: &Config) -> Result<()> {
    let backend = BackendClient::new(&config.api);
    let message = backend.ping().await?;
    println!("{} -> {}", backend.base_url(), message);
    Ok(())
}
