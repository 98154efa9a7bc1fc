//! Labeled-field and labeled-list modes
//!
//! Responses shaped like:
//!
//! ```text
//! Error Type: NullPointerException
//! Likely Cause: dereferencing a null field
//! Solutions:
//! - Check for null
//! - Initialize the field
//! ```
//!
//! A missing label is not a failure: fields fall back to `NOT_AVAILABLE` and
//! lists come back empty.

use crate::types::ErrorDiagnosis;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Sentinel value for a label that is absent from the response
pub const NOT_AVAILABLE: &str = "Not available";

/// Labels used by the error-diagnosis response
pub const ERROR_TYPE_LABEL: &str = "Error Type:";
pub const LIKELY_CAUSE_LABEL: &str = "Likely Cause:";
pub const SOLUTIONS_LABEL: &str = "Solutions:";

/// `- item`, `* item`, `• item`, `+ item`, `1. item`, `1) item`
static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*•+]|\d+[.)])\s+(.*)$").expect("bullet pattern is valid"));

/// Value on the line of the first occurrence of `label`.
pub fn parse_labeled_field(raw: &str, label: &str) -> String {
    let Some(end) = locate_label(raw, label) else {
        return NOT_AVAILABLE.to_string();
    };

    let rest = &raw[end..];
    let line = rest.split('\n').next().unwrap_or_default();
    let value = strip_emphasis(line);

    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value
    }
}

/// Values for every label, keyed by the label itself.
pub fn parse_labeled_fields<'a>(raw: &str, labels: &[&'a str]) -> HashMap<&'a str, String> {
    labels
        .iter()
        .map(|label| (*label, parse_labeled_field(raw, label)))
        .collect()
}

/// Bullet items following the heading `label`.
///
/// Collection stops at the first non-bullet line (the next heading or prose).
/// Blank lines between bullets are skipped, and indented lines continue the
/// previous item.
pub fn parse_labeled_list(raw: &str, label: &str) -> Vec<String> {
    let Some(end) = locate_label(raw, label) else {
        return Vec::new();
    };

    // Skip the remainder of the heading line
    let mut lines = raw[end..].split('\n');
    lines.next();

    let mut items: Vec<String> = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(item) = bullet_item(line) {
            if !item.is_empty() {
                items.push(item);
            }
            continue;
        }

        let indented = line.starts_with(char::is_whitespace);
        match items.last_mut() {
            Some(previous) if indented => {
                previous.push(' ');
                previous.push_str(&strip_emphasis(line));
            }
            _ => break,
        }
    }

    items
}

/// Every bullet or numbered line anywhere in `raw`, in order.
pub fn parse_list_items(raw: &str) -> Vec<String> {
    raw.lines()
        .filter_map(bullet_item)
        .filter(|item| !item.is_empty())
        .collect()
}

/// Error-diagnosis record from a labeled response.
///
/// Never fails: absent labels become sentinels or an empty list.
pub fn parse_error_diagnosis(raw: &str) -> ErrorDiagnosis {
    ErrorDiagnosis {
        error_type: parse_labeled_field(raw, ERROR_TYPE_LABEL),
        cause: parse_labeled_field(raw, LIKELY_CAUSE_LABEL),
        solutions: parse_labeled_list(raw, SOLUTIONS_LABEL),
    }
}

/// Byte offset just past the earliest match of `label`.
///
/// Also accepts the colon outside bold markup (`**Error Type**:`).
fn locate_label(raw: &str, label: &str) -> Option<usize> {
    let mut candidates = vec![label.to_string()];
    if let Some(stem) = label.strip_suffix(':') {
        candidates.push(format!("{}**:", stem));
        candidates.push(format!("{}__:", stem));
    }

    candidates
        .iter()
        .filter(|candidate| !candidate.is_empty())
        .filter_map(|candidate| raw.find(candidate.as_str()).map(|at| (at, candidate.len())))
        .min_by_key(|(at, _)| *at)
        .map(|(at, len)| at + len)
}

fn bullet_item(line: &str) -> Option<String> {
    BULLET_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| strip_emphasis(m.as_str()))
}

/// Remove bold markers and surrounding inline markup.
///
/// Underscore emphasis (`__x__`, `_x_`) is only removed as a pair wrapping
/// the whole value, so identifiers such as `snake_case` survive.
fn strip_emphasis(text: &str) -> String {
    let stripped = text.replace("**", "");
    let mut value = stripped
        .trim()
        .trim_matches(|c| c == '*' || c == '`')
        .trim();

    for marker in ["__", "_"] {
        if value.len() > 2 * marker.len() && value.starts_with(marker) && value.ends_with(marker)
        {
            value = value[marker.len()..value.len() - marker.len()].trim();
        }
    }

    value.to_string()
}
