//! Bilingual tokenizer shared by the inverted index, query normalization
//! and the description-overlap feature.
//!
//! Text is NFKC-folded and lowercased, every character that is neither an
//! ASCII word character nor CJK becomes a separator, and the resulting
//! tokens drop single characters and a fixed stop-word set. Script changes
//! between CJK and ASCII split tokens; CJK runs are otherwise kept whole,
//! there is no word segmentation.

use std::collections::HashSet;
use std::sync::LazyLock;

use unicode_normalization::UnicodeNormalization;

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // English
        "the", "and", "or", "of", "to", "in", "for", "with", "on", "at", "by", "is", "are",
        "be", "an", "as", "we", "you", "our", "your", "will", "from", "this", "that", "it",
        "have", "has", "can", "etc", "who", "all", "any",
        // Chinese
        "我们", "你们", "他们", "以及", "或者", "并且", "进行", "相关", "具有", "能够", "负责",
        "以上", "熟悉", "了解", "优先", "要求", "工作", "一定", "良好", "岗位", "职责",
    ]
    .into_iter()
    .collect()
});

/// Whether `c` is in the CJK Unified Ideographs blocks.
#[must_use]
pub fn is_cjk(c: char) -> bool {
    matches!(c, '\u{4e00}'..='\u{9fff}' | '\u{3400}'..='\u{4dbf}')
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || is_cjk(c)
}

/// Case-fold, replace punctuation with spaces and collapse whitespace.
///
/// ```
/// use jobmatch::search::tokenizer::normalize;
/// assert_eq!(normalize("  React/Vue，前端!! "), "react vue 前端");
/// ```
///
/// A space is also inserted wherever a CJK run meets an ASCII word, so
/// "熟悉React" yields "熟悉 react".
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    let mut previous_cjk: Option<bool> = None;
    for c in text.nfkc().flat_map(char::to_lowercase) {
        if !is_word_char(c) {
            folded.push(' ');
            previous_cjk = None;
            continue;
        }
        let cjk = is_cjk(c);
        if previous_cjk.is_some_and(|previous| previous != cjk) {
            folded.push(' ');
        }
        folded.push(c);
        previous_cjk = Some(cjk);
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tokens for indexing and matching, in text order (duplicates kept).
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|token| token.chars().count() > 1)
        .filter(|token| !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Distinct tokens of `text`.
#[must_use]
pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}
