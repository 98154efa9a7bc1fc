//! Fenced-segment mode
//!
//! Splits free text into `Text` and `Code` parts around triple-backtick
//! fences. Concatenating the parts gives back the input minus the fence
//! delimiters (the backticks plus the info line of the opening fence).

use crate::types::MessagePart;

/// Fence delimiter
pub(crate) const FENCE: &str = "```";

/// Split `raw` into ordered prose and code parts.
///
/// An unterminated opening fence is not a code block; it stays in the prose.
/// Empty prose between adjacent blocks is omitted.
pub fn segment(raw: &str) -> Vec<MessagePart> {
    let mut parts = Vec::new();
    let mut rest = raw;

    while let Some(open) = rest.find(FENCE) {
        let after_open = &rest[open + FENCE.len()..];
        let Some(close) = after_open.find(FENCE) else {
            break;
        };

        push_text(&mut parts, &rest[..open]);
        let (language_hint, content) = split_info_line(&after_open[..close]);
        parts.push(MessagePart::code(content, language_hint));

        rest = &after_open[close + FENCE.len()..];
    }

    push_text(&mut parts, rest);
    parts
}

/// Remove fence delimiter lines, keeping everything between them.
///
/// Used for responses that are expected to be nothing but code.
pub fn strip_fences(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.trim_start().starts_with(FENCE))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn push_text(parts: &mut Vec<MessagePart>, text: &str) {
    if !text.is_empty() {
        parts.push(MessagePart::text(text));
    }
}

/// Separate a block body into `(language_hint, content)`.
///
/// The info line is only consumed when it is empty or a single tag token and
/// is terminated by a newline; otherwise the whole body is content.
fn split_info_line(body: &str) -> (&str, &str) {
    match body.find('\n') {
        Some(nl) => match info_token(&body[..nl]) {
            Some(tag) => (tag, &body[nl + 1..]),
            None => ("", body),
        },
        None => ("", body),
    }
}

/// The language tag on an opening fence line, `Some("")` when the line is blank.
pub(crate) fn info_token(line: &str) -> Option<&str> {
    let token = line.trim();
    let valid = token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '#' | '-' | '_' | '.'));
    valid.then_some(token)
}
