//! 完整流程：上传 → 逐条输入提示词生成 → 配额耗尽为止

use std::path::Path;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::generate_cmd::{open_image, print_meme, save_meme};
use super::ingest_cmd::print_session;
use crate::config::{collapse_tilde, Config};
use crate::models::PromptDraft;
use crate::session::{complete_unique, FlowStep, MemeSession};

/// `out` 是保存图片的目录，缺省为配置中的图片目录
pub async fn run(config: &Config, file: &Path, out: Option<&Path>, open: bool) -> Result<()> {
    let mut session = MemeSession::from_config(config);
    session.watch_quota();

    let limit = session.quota().limit();
    let snapshot = session.refresh_quota().await?;
    if snapshot.is_exhausted() {
        print_limit_reached(limit);
        return Ok(());
    }

    // Step 1
    session.upload_mut().select_path(file).await?;
    let ingested = session.ingest().await?;
    print_session(ingested);

    // Step 2
    let suggestions = session.prompt_suggestions();
    println!();
    println!("Try one of these, or write your own (use @name to mention someone):");
    for (index, prompt) in suggestions.iter().enumerate() {
        println!("  {}. {}", index + 1, prompt);
    }
    println!("{} of {} memes left", snapshot.remaining(), snapshot.limit);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let prompt = pick_prompt(line, &suggestions, session.participants());
        let cursor = prompt.chars().count();
        session.set_prompt(prompt, cursor);
        println!("Generating: {}", session.draft().text());

        match session.generate().await {
            Ok(meme) => {
                // Step 3
                print_meme(meme);
                let target = out.map(|dir| dir.join(format!("meme-{}.jpg", meme.image.id())));
                let saved = save_meme(meme, target.as_deref(), config)?;
                println!("Saved to {}", collapse_tilde(&saved));
            }
            Err(e) if e.is_quota_exhausted() => {
                print_limit_reached(limit);
                break;
            }
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        }

        if open {
            preview(&mut session, config);
        }

        // 观察者在计数更新后切换步骤
        tokio::task::yield_now().await;
        if session.step() == FlowStep::LimitReached {
            print_limit_reached(limit);
            break;
        }
        let remaining = session.quota().snapshot().remaining();
        println!("{} of {} memes left", remaining, limit);
    }
    Ok(())
}

/// 数字选择预置提示词；否则补全唯一匹配的末尾 `@token`
fn pick_prompt(line: &str, suggestions: &[String], participants: &[String]) -> String {
    if let Some(prompt) = line
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| suggestions.get(i))
    {
        return prompt.clone();
    }

    let draft = PromptDraft::new(line);
    match complete_unique(&draft, participants) {
        Some(completed) => completed.text().to_string(),
        None => line.to_string(),
    }
}

/// 在预览目录落盘当前图片并打开，下一张生成时自动清理
fn preview(session: &mut MemeSession, config: &Config) {
    let dir = config.images.dir().join("preview");
    if let Some(meme) = session.meme_mut() {
        match meme.image.materialize(&dir) {
            Ok(path) => open_image(path),
            Err(e) => tracing::warn!("[RUN] 写入预览文件失败: {}", e),
        }
    }
}

fn print_limit_reached(limit: u32) {
    println!();
    println!("You've reached your limit of {} memes. Thanks for playing!", limit);
}
