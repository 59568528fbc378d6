//! Keyword matching over mixed Chinese/English text.
//!
//! Callers lowercase the text once and keep working on that copy, so byte
//! offsets returned here stay valid for every later regex pass.

/// Characters that end a clause for comparison-word scoping.
pub const CLAUSE_DELIMITERS: &[char] =
    &['，', ',', '。', ';', '；', '!', '！', '?', '？', '、', '\n'];

/// Byte spans of every occurrence of `keyword` in `haystack`.
///
/// Keywords containing an ASCII letter or digit only match on word
/// boundaries, so `ram` does not hit `program`. Other keywords (CJK,
/// symbols) match anywhere.
pub fn keyword_spans<'a>(
    haystack: &'a str,
    keyword: &'a str,
) -> impl Iterator<Item = (usize, usize)> + 'a {
    let bounded = keyword.chars().any(|ch| ch.is_ascii_alphanumeric());
    haystack.match_indices(keyword).filter_map(move |(start, matched)| {
        let end = start + matched.len();
        if bounded && !at_word_boundary(haystack, start, end) {
            return None;
        }
        Some((start, end))
    })
}

pub fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    keyword_spans(haystack, keyword).next().is_some()
}

fn at_word_boundary(haystack: &str, start: usize, end: usize) -> bool {
    let before = haystack[..start].chars().next_back();
    let after = haystack[end..].chars().next();
    !before.is_some_and(|ch| ch.is_ascii_alphanumeric())
        && !after.is_some_and(|ch| ch.is_ascii_alphanumeric())
}

/// Byte offset where the clause containing `position` starts.
pub fn clause_start(haystack: &str, position: usize) -> usize {
    haystack[..position]
        .char_indices()
        .rev()
        .find(|(_, ch)| CLAUSE_DELIMITERS.contains(ch))
        .map(|(index, ch)| index + ch.len_utf8())
        .unwrap_or(0)
}

pub fn overlaps(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 < b.1 && b.0 < a.1
}
