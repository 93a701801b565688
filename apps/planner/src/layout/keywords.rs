//! Deterministic keyword extraction for image slot requests.
//!
//! Text is segmented into words with jieba (precise mode), then single
//! characters, punctuation and stop words are dropped. Segmentation keeps words
//! like `中国` or `行为` whole even though they contain a stop character.

use std::collections::HashSet;
use std::sync::OnceLock;

use jieba_rs::Jieba;

const STOP_WORDS: [&str; 13] = [
    "的", "是", "和", "与", "或", "在", "了", "有", "为", "以", "及", "等", "中",
];

pub const MAX_KEYWORDS: usize = 5;

/// The segmenter loads its dictionary once per process.
fn segmenter() -> &'static Jieba {
    static JIEBA: OnceLock<Jieba> = OnceLock::new();
    JIEBA.get_or_init(Jieba::new)
}

/// Distinct words of `text` in first-occurrence order, at most `MAX_KEYWORDS`.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    for word in segmenter().cut(text, true) {
        let token = word.trim().to_ascii_lowercase();
        if token.chars().count() <= 1
            || !token.chars().any(char::is_alphanumeric)
            || STOP_WORDS.contains(&token.as_str())
        {
            continue;
        }
        if seen.insert(token.clone()) {
            keywords.push(token);
            if keywords.len() == MAX_KEYWORDS {
                break;
            }
        }
    }
    keywords
}

/// Keywords for a slot: title first, then theme.
pub fn slot_keywords(title: &str, theme: &str) -> Vec<String> {
    extract_keywords(&format!("{title} {theme}"))
}
