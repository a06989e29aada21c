//! 聊天片段展示辅助
//!
//! 后端返回的片段是多条 `[2024-01-01 10:00:00] 名字: 内容` 拼接的文本

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

static TIMESTAMP_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*?\] ").expect("timestamp prefix regex"));

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 解析后的单条聊天消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub timestamp: NaiveDateTime,
    pub name: String,
    pub content: String,
}

impl ChatLine {
    /// 展示用时间，只保留时分
    pub fn display_time(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// 按 `[...] ` 时间戳前缀拆成单条消息，去掉空白项
pub fn split_messages(content: &str) -> Vec<String> {
    TIMESTAMP_PREFIX
        .split(content)
        .map(str::trim)
        .filter(|msg| !msg.is_empty())
        .map(str::to_string)
        .collect()
}

/// 解析一行 `[YYYY-MM-DD HH:MM:SS] name: content`
///
/// 格式不符时返回 None
pub fn parse_chat_line(line: &str) -> Option<ChatLine> {
    let line = line.trim();
    let rest = line.strip_prefix('[')?;
    let close = rest.find(']')?;
    let timestamp = NaiveDateTime::parse_from_str(&rest[..close], TIMESTAMP_FORMAT).ok()?;

    let remaining = rest[close + 1..].trim();
    let (name, content) = remaining.split_once(':')?;

    Some(ChatLine {
        timestamp,
        name: name.trim().to_string(),
        content: content.trim().to_string(),
    })
}

/// 逐行解析片段，跳过无法识别的行
pub fn parse_excerpt(content: &str) -> Vec<ChatLine> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_chat_line)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_messages() {
        let content =
            "[2024-01-01 10:00:00] Dana: late again [2024-01-01 10:05:00] Omer: as usual ";
        assert_eq!(
            split_messages(content),
            vec!["Dana: late again", "Omer: as usual"]
        );
        assert!(split_messages("   ").is_empty());
    }

    #[test]
    fn test_parse_chat_line() {
        let line = parse_chat_line("[2024-03-01 20:15:42] Dana: who brought the hummus?").unwrap();
        assert_eq!(line.name, "Dana");
        assert_eq!(line.content, "who brought the hummus?");
        assert_eq!(line.display_time(), "20:15");
    }

    #[test]
    fn test_content_may_contain_colons() {
        let line = parse_chat_line("[2024-03-01 08:00:00] Omer: meet at 9:30").unwrap();
        assert_eq!(line.content, "meet at 9:30");
    }

    #[test]
    fn test_unparseable_lines() {
        assert!(parse_chat_line("no timestamp here").is_none());
        assert!(parse_chat_line("[yesterday] Dana: hi").is_none());
        assert!(parse_chat_line("[2024-03-01 08:00:00] system message").is_none());
    }

    #[test]
    fn test_parse_excerpt_skips_noise() {
        let content = "[2024-03-01 08:00:00] Omer: hi\n\ngarbage\n[2024-03-01 08:01:00] Dana: hey";
        let lines = parse_excerpt(content);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].name, "Dana");
    }
}
