//! Tokenizer for the template grammar
//!
//! Splits source text into literal runs and the three brace constructs:
//! `{{ path | filter }}` markers, `{{#each path as |var|}}` block openers,
//! and `{{/each}}` block closers. The tokenizer is total: anything that
//! doesn't match one of those shapes exactly stays literal text, so lexing
//! can never fail and malformed input passes through untouched.

/// One lexed region of a template. Every variant keeps the exact source
/// slice so output can reproduce unprocessed input byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Literal text, passed through as-is.
    Text(&'a str),
    /// `{{ ... }}` interpolation marker; `inner` excludes the braces.
    Marker { raw: &'a str, inner: &'a str },
    /// `{{#each <path> as |<var>|}}`
    EachOpen { raw: &'a str, path: &'a str, var: &'a str },
    /// `{{/each}}` (exact, no interior whitespace)
    EachClose { raw: &'a str },
}

/// Tokenize a template. A marker is `{{`, one or more non-`}` characters,
/// then `}}`; a lone `}` or an empty interior makes the candidate literal
/// and the scan resumes one character later.
pub fn lex(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while let Some(offset) = source[pos..].find("{{") {
        let open = pos + offset;
        let Some(brace) = source[open + 2..].find('}') else {
            break;
        };
        let close = open + 2 + brace;
        if close == open + 2 || !source[close..].starts_with("}}") {
            pos = open + 1;
            continue;
        }

        let raw = &source[open..close + 2];
        let inner = &source[open + 2..close];
        if text_start < open {
            tokens.push(Token::Text(&source[text_start..open]));
        }
        tokens.push(classify(raw, inner));
        pos = close + 2;
        text_start = pos;
    }

    if text_start < source.len() {
        tokens.push(Token::Text(&source[text_start..]));
    }
    tokens
}

fn classify<'a>(raw: &'a str, inner: &'a str) -> Token<'a> {
    if inner == "/each" {
        return Token::EachClose { raw };
    }
    if let Some((path, var)) = parse_each_open(inner) {
        return Token::EachOpen { raw, path, var };
    }
    let trimmed = inner.trim();
    if trimmed.starts_with("#each") || trimmed == "/each" {
        // Reserved shape the block grammar doesn't accept (extra padding,
        // missing `as |var|`, ...). Substitution must not touch it either.
        return Token::Text(raw);
    }
    Token::Marker { raw, inner }
}

/// Parse the interior of a block opener: `#each <path> as |<var>|`, where
/// `<path>` is a run of non-whitespace and `<var>` anything but a pipe.
/// The trailing pipe must end the interior.
fn parse_each_open(inner: &str) -> Option<(&str, &str)> {
    let rest = inner.strip_prefix("#each")?;
    let after_ws = rest.trim_start();
    if after_ws.len() == rest.len() {
        return None;
    }

    let path_end = after_ws.find(char::is_whitespace)?;
    let (path, rest) = after_ws.split_at(path_end);
    let rest = rest.trim_start().strip_prefix("as")?;
    let after_ws = rest.trim_start();
    if after_ws.len() == rest.len() {
        return None;
    }

    let rest = after_ws.strip_prefix('|')?;
    let bar = rest.find('|')?;
    if bar == 0 || !rest[bar + 1..].is_empty() {
        return None;
    }
    Some((path, &rest[..bar]))
}
