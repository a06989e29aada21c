//! 生成单张表情包
//!
//! 直接使用后端已有的聊天记录，不经过上传步骤

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::{collapse_tilde, Config};
use crate::converter::{parse_excerpt, split_messages};
use crate::error::MemeError;
use crate::models::{ContextExcerpt, GeneratedMeme};
use crate::providers::{BackendClient, MemeGenerationClient};
use crate::services::QuotaService;

pub async fn generate(config: &Config, prompt: &str, out: Option<&Path>, open: bool) -> Result<()> {
    let quota = QuotaService::from_config(config);
    quota.check().await.map_err(MemeError::from)?;

    let client = MemeGenerationClient::new(BackendClient::new(&config.api));
    let meme = client.generate(prompt).await.map_err(MemeError::from)?;

    let snapshot = match quota.increment().await {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::warn!("[GENERATE] 更新配额失败: {}", e);
            None
        }
    };

    print_meme(&meme);
    let saved = save_meme(&meme, out, config)?;
    println!("Saved to {}", collapse_tilde(&saved));
    if let Some(snapshot) = snapshot {
        println!("{} of {} memes left", snapshot.remaining(), snapshot.limit);
    }

    if open {
        open_image(&saved);
    }
    Ok(())
}

/// 保存图片副本，未指定路径时写入图片目录
pub(crate) fn save_meme(meme: &GeneratedMeme, out: Option<&Path>, config: &Config) -> Result<PathBuf> {
    let target = match out {
        Some(path) => path.to_path_buf(),
        None => config
            .images
            .dir()
            .join(format!("meme-{}.jpg", meme.image.id())),
    };
    meme.image
        .save_to(&target)
        .with_context(|| format!("Failed to save image to {}", target.display()))
}

/// 用系统默认程序打开图片，失败只记日志
pub(crate) fn open_image(path: &Path) {
    if let Err(e) = open::that(path) {
        tracing::warn!("[GENERATE] 无法打开图片 {}: {}", path.display(), e);
    }
}

/// 打印模板说明与上下文片段
pub(crate) fn print_meme(meme: &GeneratedMeme) {
    if meme.has_explanation() {
        if let Some(format) = &meme.template_format {
            println!("Template: {}", format);
        }
        if let Some(explanation) = &meme.template_explanation {
            println!("{}", explanation);
        }
        println!();
    }

    if meme.context.is_empty() {
        return;
    }
    println!("Based on these messages:");
    for (index, excerpt) in meme.context.iter().enumerate() {
        print_excerpt(index + 1, excerpt);
    }
}

fn print_excerpt(number: usize, excerpt: &ContextExcerpt) {
    match excerpt.time_range() {
        Some(range) => println!("#{} ({})", number, range),
        None => println!("#{}", number),
    }

    let lines = parse_excerpt(&excerpt.content);
    if lines.is_empty() {
        for message in split_messages(&excerpt.content) {
            println!("  {}", message);
        }
        return;
    }
    for line in lines {
        println!("  [{}] {}: {}", line.display_time(), line.name, line.content);
    }
}
