//! 离线演示 `@` 提及建议

use anyhow::Result;

use crate::models::PromptDraft;
use crate::session::suggest;

/// 光标缺省时放在末尾
pub fn suggest_mentions(text: &str, cursor: Option<usize>, names: &[String]) -> Result<()> {
    let draft = match cursor {
        Some(cursor) => PromptDraft::with_cursor(text, cursor),
        None => PromptDraft::new(text),
    };

    match suggest(&draft, names) {
        Some(suggestions) if suggestions.names.is_empty() => {
            println!("No participant matches \"{}\"", suggestions.query.filter);
        }
        Some(suggestions) => {
            for name in &suggestions.names {
                println!("@{}", name);
            }
        }
        None => println!("No active mention at cursor {}", draft.cursor()),
    }
    Ok(())
}
