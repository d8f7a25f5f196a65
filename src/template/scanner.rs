use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    If,
    Elif,
    Else,
    Endif,
}

impl DirectiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveKind::If => "if",
            DirectiveKind::Elif => "elif",
            DirectiveKind::Else => "else",
            DirectiveKind::Endif => "endif",
        }
    }
}

/// One line of template text, tagged. Text lines keep their content
/// verbatim because indentation is part of the final SQL formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannedLine<'a> {
    Directive {
        kind: DirectiveKind,
        /// Raw condition text after the keyword; empty for else/endif.
        condition: &'a str,
        /// 1-based source line, for diagnostics.
        line: usize,
    },
    Text(&'a str),
}

/// Split raw template text into directive and text lines. A line is a
/// directive only when, after leading whitespace, it starts with `#`
/// followed by a keyword word; a `#` anywhere else is plain SQL text.
/// An unrecognized keyword such as `#iff` is an error, not text.
pub fn scan(text: &str) -> Result<Vec<ScannedLine<'_>>, ParseError> {
    let mut out = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw_line.trim_start();

        let Some(rest) = trimmed.strip_prefix('#') else {
            out.push(ScannedLine::Text(raw_line));
            continue;
        };

        let word_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        let word = &rest[..word_len];
        if word.is_empty() {
            // a lone `#` line is SQL text, not a directive
            out.push(ScannedLine::Text(raw_line));
            continue;
        }

        let kind = match word {
            "if" => DirectiveKind::If,
            "elif" => DirectiveKind::Elif,
            "else" => DirectiveKind::Else,
            "endif" => DirectiveKind::Endif,
            other => {
                return Err(ParseError::directive(
                    line,
                    format!("unknown directive `#{other}`"),
                ));
            }
        };

        let tail = rest[word_len..].trim();
        match kind {
            DirectiveKind::If | DirectiveKind::Elif => {
                if tail.is_empty() {
                    return Err(ParseError::directive(
                        line,
                        format!("`#{}` requires a condition", kind.as_str()),
                    ));
                }
                out.push(ScannedLine::Directive {
                    kind,
                    condition: tail,
                    line,
                });
            }
            DirectiveKind::Else | DirectiveKind::Endif => {
                // only a trailing `--` comment may follow
                if !tail.is_empty() && !tail.starts_with("--") {
                    return Err(ParseError::directive(
                        line,
                        format!("`#{}` takes no condition text", kind.as_str()),
                    ));
                }
                out.push(ScannedLine::Directive {
                    kind,
                    condition: "",
                    line,
                });
            }
        }
    }

    Ok(out)
}
