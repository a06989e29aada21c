//! 提示词草稿与预置提示

use rand::seq::SliceRandom;
use rand::Rng;

/// 正在编辑的提示词
///
/// 光标按字符（Unicode 标量）计数，始终满足 `0 <= cursor <= 字符数`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptDraft {
    text: String,
    cursor: usize,
}

impl PromptDraft {
    /// 光标放在末尾
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    /// 指定光标位置，越界时截到末尾
    pub fn with_cursor(text: impl Into<String>, cursor: usize) -> Self {
        let text = text.into();
        let cursor = cursor.min(text.chars().count());
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// 是否只有空白
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// 每次按键后整体替换文本与光标
    pub fn update(&mut self, text: impl Into<String>, cursor: usize) {
        *self = Self::with_cursor(text, cursor);
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.len());
    }
}

/// 预置的提示词模板，随机挑一位群成员填入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptSuggestion {
    pub emoji: &'static str,
    pub label: &'static str,
    prefix: &'static str,
    suffix: &'static str,
}

pub const PROMPT_SUGGESTIONS: [PromptSuggestion; 3] = [
    PromptSuggestion {
        emoji: "🤣",
        label: "מם על בדיחות של אחד מחברי הקבוצה",
        prefix: "תעשה מם על הבדיחות של ",
        suffix: " ",
    },
    PromptSuggestion {
        emoji: "⏰",
        label: "מם על האיחורים של אחד מחברי הקבוצה",
        prefix: "תעשה מם על האיחורים של ",
        suffix: "",
    },
    PromptSuggestion {
        emoji: "🍔",
        label: "מם על האוכל שאחד מחברי הקבוצה מכין",
        prefix: "תעשה מם על האוכל של ",
        suffix: "",
    },
];

impl PromptSuggestion {
    /// 用指定成员填充模板
    pub fn fill(&self, sender: &str) -> String {
        format!("{}{}{}", self.prefix, sender, self.suffix)
    }

    /// 随机挑选一位成员填充，没有成员时填空串
    pub fn fill_random<R: Rng + ?Sized>(&self, participants: &[String], rng: &mut R) -> String {
        let sender = participants
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default();
        self.fill(sender)
    }
}
