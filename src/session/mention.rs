//! `@` 提及自动补全
//!
//! 建议列表完全由 (文本, 光标, 成员列表) 推导，不单独保存状态。
//! 所有位置按字符计数。

use crate::models::PromptDraft;

/// 光标前正在输入的 `@token`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionQuery {
    /// `@` 所在位置
    pub at: usize,
    /// 计算时的光标位置
    pub cursor: usize,
    /// `@` 与光标之间的文本，已转小写
    pub filter: String,
}

/// 当前可选的提及建议
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionSuggestions {
    pub query: MentionQuery,
    pub names: Vec<String>,
}

/// 查找光标前最近的 `@`，没有时提及不激活
pub fn detect_mention(text: &str, cursor: usize) -> Option<MentionQuery> {
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());
    let at = chars[..cursor].iter().rposition(|c| *c == '@')?;
    let filter = chars[at + 1..cursor]
        .iter()
        .collect::<String>()
        .to_lowercase();
    Some(MentionQuery { at, cursor, filter })
}

/// 按小写包含关系过滤成员，保持原有顺序
pub fn filter_participants<'a>(names: &'a [String], filter: &str) -> Vec<&'a str> {
    let filter = filter.to_lowercase();
    names
        .iter()
        .filter(|name| name.to_lowercase().contains(&filter))
        .map(String::as_str)
        .collect()
}

/// 根据草稿计算建议
pub fn suggest(draft: &PromptDraft, names: &[String]) -> Option<MentionSuggestions> {
    let query = detect_mention(draft.text(), draft.cursor())?;
    let names = filter_participants(names, &query.filter)
        .into_iter()
        .map(str::to_string)
        .collect();
    Some(MentionSuggestions { query, names })
}

/// 选中建议后，把 `@` 到光标之间替换为 `@name`
///
/// `captured_cursor` 是计算建议时的光标，而不是点击时的光标；
/// 替换区间之外的文本保持不变，新光标放在名字之后
pub fn apply_mention(text: &str, captured_cursor: usize, name: &str) -> Option<PromptDraft> {
    let query = detect_mention(text, captured_cursor)?;
    let chars: Vec<char> = text.chars().collect();

    let mut replaced: String = chars[..query.at].iter().collect();
    replaced.push('@');
    replaced.push_str(name);
    let new_cursor = replaced.chars().count();
    replaced.extend(chars[query.cursor..].iter());

    Some(PromptDraft::with_cursor(replaced, new_cursor))
}

/// 末尾的 `@token` 只匹配一个成员时直接补全
pub fn complete_unique(draft: &PromptDraft, names: &[String]) -> Option<PromptDraft> {
    let suggestions = suggest(draft, names)?;
    match suggestions.names.as_slice() {
        [only] => apply_mention(draft.text(), suggestions.query.cursor, only),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_key_at_end() {
        let query = detect_mention("hello @al", 9).unwrap();
        assert_eq!(query.filter, "al");
        assert_eq!(query.at, 6);
    }

    #[test]
    fn test_filter_key_mid_text() {
        let query = detect_mention("hello @al world", 9).unwrap();
        assert_eq!(query.filter, "al");
    }

    #[test]
    fn test_cursor_before_at_is_inactive() {
        assert!(detect_mention("hello @al", 5).is_none());
        assert!(detect_mention("no mentions", 11).is_none());
        assert!(detect_mention("", 0).is_none());
    }

    #[test]
    fn test_cursor_right_after_at() {
        let query = detect_mention("hi @", 4).unwrap();
        assert_eq!(query.filter, "");
    }

    #[test]
    fn test_filter_is_case_folded_and_ordered() {
        let list = names(&["Alice", "bob", "ALBERT", "Dana"]);
        let query = detect_mention("hey @AL", 7).unwrap();
        assert_eq!(query.filter, "al");
        assert_eq!(
            filter_participants(&list, &query.filter),
            vec!["Alice", "ALBERT"]
        );
        assert_eq!(filter_participants(&list, "").len(), 4);
    }

    #[test]
    fn test_apply_mention() {
        let draft = apply_mention("hi @a", 5, "alice").unwrap();
        assert_eq!(draft.text(), "hi @alice");
        assert_eq!(draft.cursor(), 9);
    }

    #[test]
    fn test_apply_mention_keeps_text_after_cursor() {
        let draft = apply_mention("hey @al, where are you", 7, "Alice").unwrap();
        assert_eq!(draft.text(), "hey @Alice, where are you");
    }

    #[test]
    fn test_stale_click_uses_captured_cursor() {
        // 建议在光标 5 时计算，之后光标移到了开头
        let mut draft = PromptDraft::with_cursor("hi @a and more", 5);
        let suggestions = suggest(&draft, &names(&["alice"])).unwrap();
        draft.set_cursor(0);

        let applied =
            apply_mention(draft.text(), suggestions.query.cursor, &suggestions.names[0]).unwrap();
        assert_eq!(applied.text(), "hi @alice and more");
    }

    #[test]
    fn test_hebrew_positions_are_chars() {
        let text = "תעשה מם על @דנ";
        let cursor = text.chars().count();
        let query = detect_mention(text, cursor).unwrap();
        assert_eq!(query.filter, "דנ");

        let draft = apply_mention(text, cursor, "דנה").unwrap();
        assert_eq!(draft.text(), "תעשה מם על @דנה");
        assert_eq!(draft.cursor(), draft.len());
    }

    #[test]
    fn test_complete_unique() {
        let list = names(&["Dana", "Omer", "Dor"]);
        let done = complete_unique(&PromptDraft::new("late @om"), &list).unwrap();
        assert_eq!(done.text(), "late @Omer");

        assert!(complete_unique(&PromptDraft::new("late @d"), &list).is_none());
        assert!(complete_unique(&PromptDraft::new("late"), &list).is_none());
    }

    proptest! {
        #[test]
        fn prop_replacement_only_touches_token(
            prefix in "[^@]{0,12}",
            token in "[^@]{0,6}",
            suffix in ".{0,12}",
            name in "[a-zA-Z]{1,8}",
        ) {
            let text = format!("{}@{}{}", prefix, token, suffix);
            let cursor = prefix.chars().count() + 1 + token.chars().count();

            let query = detect_mention(&text, cursor).unwrap();
            prop_assert_eq!(query.filter, token.to_lowercase());

            let draft = apply_mention(&text, cursor, &name).unwrap();
            prop_assert_eq!(draft.text(), format!("{}@{}{}", prefix, name, suffix));
            prop_assert!(draft.cursor() <= draft.len());
        }
    }
}
