//! Placeholder extraction from SQL resource text.
//!
//! This is deliberately not a SQL parser. Placeholders are named bind
//! variables written as `:name`; finding them only needs line-comment
//! stripping and a split on the separator character class. Tokens written
//! with a double colon (`::jsonb`) are Postgres casts, not placeholders,
//! and a cast suffix glued onto a placeholder (`:payload::jsonb`) is
//! stripped.

use std::sync::LazyLock;

use compact_str::CompactString;
use indexmap::IndexSet;
use regex::Regex;

/// Characters that end a placeholder token inside SQL text.
pub const PLACEHOLDER_SEPARATORS: &str = r"[ ,)(\n;\r\t|=><]";

static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(PLACEHOLDER_SEPARATORS).expect("separator class is a valid regex")
});

/// Remove `--` line comments from SQL text.
///
/// Comment stripping is line based; block comments are not handled. The
/// line structure of the input is preserved so the result can be split on
/// newlines again.
pub fn strip_line_comments(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    for line in sql.split('\n') {
        match line.find("--") {
            Some(idx) => out.push_str(&line[..idx]),
            None => out.push_str(line)
        }
        out.push('\n');
    }
    out
}

/// Extract the distinct placeholder names from raw SQL text.
///
/// Names are case sensitive and returned in first-seen order. A token must
/// start with exactly one `:` to qualify; anything after a `::` inside the
/// token is a cast suffix and is dropped.
pub fn placeholders(sql: &str) -> Vec<CompactString> {
    let stripped = strip_line_comments(sql);
    let mut names: IndexSet<CompactString> = IndexSet::new();

    for part in SEPARATOR_RE.split(&stripped) {
        if !part.starts_with(':') || part.starts_with("::") {
            continue;
        }
        names.insert(to_placeholder(part));
    }

    names.into_iter().collect()
}

/// Strip the leading `:` and any trailing `::cast` from one token.
fn to_placeholder(part: &str) -> CompactString {
    let name = &part[1..];
    match name.find("::") {
        Some(idx) => CompactString::from(&name[..idx]),
        None => CompactString::from(name)
    }
}
