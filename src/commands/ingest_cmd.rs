//! 上传聊天记录

use std::path::Path;

use anyhow::Result;

use crate::config::Config;
use crate::models::IngestedSession;
use crate::session::MemeSession;

pub async fn ingest(config: &Config, file: &Path) -> Result<()> {
    let mut session = MemeSession::from_config(config);
    session.upload_mut().select_path(file).await?;
    let ingested = session.ingest().await?;
    print_session(ingested);
    Ok(())
}

/// 打印群名和成员
pub(crate) fn print_session(session: &IngestedSession) {
    let group = if session.group_name.is_empty() {
        "(unnamed group)"
    } else {
        session.group_name.as_str()
    };
    println!("Group: {}", group);
    println!("Participants ({}):", session.participants.len());
    for name in &session.participants {
        println!("  @{}", name);
    }
}
