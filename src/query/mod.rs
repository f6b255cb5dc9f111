//! Success-filter splicing into an arbitrary SQL query.
//!
//! This is deliberately not a SQL parser: the query is split at the first
//! literal clause-keyword match and the predicate is appended to the head.
//! Keywords inside string literals, quoted identifiers or subqueries will
//! misfire the split; that limitation is accepted in exchange for handling
//! arbitrary analyst queries without an AST.

/// Query used when the caller does not supply one. The engine registers
/// the loaded file under the table name `df`.
pub const DEFAULT_QUERY: &str = "SELECT * FROM df";

/// Clause keywords that terminate the filterable head of a query.
/// Space-padded so only free-standing occurrences match.
const CLAUSE_KEYWORDS: [&str; 5] = [" order by ", " group by ", " limit ", " having ", " qualify "];

/// Splice `condition` into `query` as a row filter.
///
/// With no condition the query is returned unchanged. Otherwise the query
/// (minus trailing semicolons) is split before the leftmost trailing-clause
/// keyword, and the head gains either `AND (condition)` after an existing
/// `WHERE` or a fresh `WHERE condition`. The tail is re-appended verbatim.
pub fn apply_success_filter(query: &str, condition: Option<&str>) -> String {
    let condition = match condition.map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) => c,
        None => return query.to_string(),
    };

    let body = query.trim().trim_end_matches(';');
    // ASCII lowering keeps byte offsets aligned with `body`.
    let lower = body.to_ascii_lowercase();
    let split_at = CLAUSE_KEYWORDS
        .iter()
        .filter_map(|kw| lower.find(kw))
        .min()
        .unwrap_or(body.len());

    let head = body[..split_at].trim_end();
    let tail = &body[split_at..];

    let filtered = if contains_word(head, "where") {
        format!("{} AND ({})", head, condition)
    } else {
        format!("{} WHERE {}", head, condition)
    };

    format!("{}{}", filtered, tail).trim().to_string()
}

/// Case-insensitive word-boundary search, ASCII keywords only.
fn contains_word(text: &str, word: &str) -> bool {
    let haystack = text.to_ascii_lowercase();
    let needle = word.to_ascii_lowercase();
    let bytes = haystack.as_bytes();
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(&needle) {
        let at = start + pos;
        let end = at + needle.len();
        let before_ok = at == 0 || !is_word_byte(bytes[at - 1]);
        let after_ok = end >= bytes.len() || !is_word_byte(bytes[end]);
        if before_ok && after_ok {
            return true;
        }
        start = end;
    }
    false
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
