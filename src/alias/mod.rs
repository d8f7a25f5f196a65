//! Bilingual column-alias handling.
//!
//! A select-list column may end with a quoted identifier of the form
//! `"File Name|파일명"`. The part before `|` is the English label, the part
//! after is the Korean one. Labels are template text, never caller input.

use once_cell::sync::Lazy;
use regex::Regex;

/// Which label a caller wants back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    Ko,
}

/// One aliased column: its 0-based position in the select list plus both
/// labels. Derived per render, because positions depend on branch selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub position: usize,
    pub en: String,
    pub ko: String,
}

impl AliasEntry {
    pub fn label(&self, language: Language) -> &str {
        match language {
            Language::En => &self.en,
            Language::Ko => &self.ko,
        }
    }
}

/// Scan the select-list region of `sql` (text before the first top-level
/// `FROM` / `WHERE`) and collect alias entries in source order. A quoted
/// identifier without `|` degrades to the same label in both languages
/// rather than failing the render.
pub fn extract(sql: &str) -> Vec<AliasEntry> {
    let region = select_list_region(sql);
    let mut entries = Vec::new();

    for (position, column) in split_top_level_columns(region).into_iter().enumerate() {
        let column = if position == 0 {
            strip_statement_keywords(column)
        } else {
            column
        };
        let Some(inner) = trailing_quoted_identifier(column) else {
            continue;
        };
        match inner.split_once('|') {
            Some((en, ko)) => entries.push(AliasEntry {
                position,
                en: en.to_owned(),
                ko: ko.to_owned(),
            }),
            None => {
                log::debug!("alias `{inner}` has no `|` separator, using it for both languages");
                entries.push(AliasEntry {
                    position,
                    en: inner.to_owned(),
                    ko: inner.to_owned(),
                });
            }
        }
    }
    entries
}

static ALIAS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)(\s)"([^"|]+)\|([^"]+)""#).expect("alias pattern compiles"));

/// Rewrite every `"En|Ko"` quoted identifier to the selected language's
/// label. This is the DB-side alternative to relabeling fetched rows by
/// ordinal: the rewritten SQL reaches the server with plain `"En"` or
/// `"Ko"` aliases.
pub fn rewrite(sql: &str, language: Language) -> String {
    let replacement = match language {
        Language::En => "${1}\"${2}\"",
        Language::Ko => "${1}\"${3}\"",
    };
    ALIAS_RE.replace_all(sql, replacement).into_owned()
}

/// Text up to the first `FROM` / `WHERE` keyword at parenthesis depth 0,
/// outside any quoted literal. Subselects in the column list stay inside
/// the region because their keywords sit at depth ≥ 1.
fn select_list_region(sql: &str) -> &str {
    for (start, word) in top_level_words(sql) {
        if word.eq_ignore_ascii_case("from") || word.eq_ignore_ascii_case("where") {
            return &sql[..start];
        }
    }
    sql
}

/// Split the select-list region on commas at depth 0, outside quotes.
fn split_top_level_columns(region: &str) -> Vec<&str> {
    let mut columns = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0usize;

    for (i, c) in region.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    columns.push(&region[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }
    columns.push(&region[start..]);
    columns
}

/// Iterate `(byte_offset, word)` for bare words at depth 0 outside quotes.
fn top_level_words(sql: &str) -> Vec<(usize, &str)> {
    let mut words = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut word_start: Option<usize> = None;

    for (i, c) in sql.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => {
                flush_word(sql, &mut word_start, i, depth, &mut words);
                quote = Some(c);
            }
            '(' => {
                flush_word(sql, &mut word_start, i, depth, &mut words);
                depth += 1;
            }
            ')' => {
                flush_word(sql, &mut word_start, i, depth, &mut words);
                depth = depth.saturating_sub(1);
            }
            c if c.is_ascii_alphanumeric() || c == '_' => {
                if word_start.is_none() {
                    word_start = Some(i);
                }
            }
            _ => flush_word(sql, &mut word_start, i, depth, &mut words),
        }
    }
    if let Some(start) = word_start {
        if depth == 0 {
            words.push((start, &sql[start..]));
        }
    }
    words
}

fn flush_word<'a>(
    sql: &'a str,
    word_start: &mut Option<usize>,
    end: usize,
    depth: usize,
    words: &mut Vec<(usize, &'a str)>,
) {
    if let Some(start) = word_start.take() {
        if depth == 0 {
            words.push((start, &sql[start..end]));
        }
    }
}

/// Drop the statement keywords opening the first column (`SELECT`, then
/// `DISTINCT` or `ALL`). They are not an expression, so a bare quoted
/// identifier right after them must read as a column reference.
fn strip_statement_keywords(column: &str) -> &str {
    let mut rest = column.trim_start();
    for keyword in ["SELECT", "DISTINCT", "ALL"] {
        if rest.len() > keyword.len()
            && rest.is_char_boundary(keyword.len())
            && rest[..keyword.len()].eq_ignore_ascii_case(keyword)
            && rest[keyword.len()..].starts_with(|c: char| c.is_whitespace())
        {
            rest = rest[keyword.len()..].trim_start();
        }
    }
    rest
}

/// If the column expression ends with a whitespace-separated quoted
/// identifier, return its inner text.
fn trailing_quoted_identifier(column: &str) -> Option<&str> {
    let trimmed = column.trim_end();
    let body = trimmed.strip_suffix('"')?;
    let open = body.rfind('"')?;
    // the quoted part must follow an expression, not be the whole column
    let before = body[..open].trim_end();
    if before.is_empty() {
        return None;
    }
    if !body[..open].ends_with(|c: char| c.is_whitespace()) {
        return None;
    }
    Some(&body[open + 1..])
}
