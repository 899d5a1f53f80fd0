// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment variable string format (§3, §6): `KEY=VALUE` segments
//! separated by `;`, with backslash escaping `\;`, `\=`, `\\`.

use crate::error::ConfigError;
use std::collections::HashSet;

/// Parse the single-line environment encoding into ordered key/value pairs.
///
/// An empty key is a decode error. Duplicate keys are forbidden (§3
/// invariant). Segments and keys/values are *not* trimmed beyond what the
/// escaping rules dictate — callers that need outer-quote/whitespace
/// trimming (the argument decoder) do that before calling this function.
pub fn parse_environment(s: &str) -> Result<Vec<(String, String)>, ConfigError> {
    let mut pairs = Vec::new();
    let mut seen = HashSet::new();

    for segment in split_unescaped(s, ';') {
        if segment.is_empty() {
            continue;
        }
        let (raw_key, raw_value) = match split_unescaped_first(&segment, '=') {
            Some(parts) => parts,
            None => (segment, String::new()),
        };
        let key = unescape(&raw_key);
        let value = unescape(&raw_value);
        if key.is_empty() {
            return Err(ConfigError::InvalidEnvironment(format!(
                "empty key in segment {:?}",
                raw_key
            )));
        }
        if !seen.insert(key.clone()) {
            return Err(ConfigError::DuplicateEnvironmentKey(key));
        }
        pairs.push((key, value));
    }

    Ok(pairs)
}

/// Encode ordered key/value pairs back into the single-line escaped format.
///
/// `parse_environment(encode_environment(pairs)) == pairs` for any input
/// accepted by `parse_environment` (round-trip property, §8).
pub fn encode_environment(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", escape(k), escape(v)))
        .collect::<Vec<_>>()
        .join(";")
}

/// Escape `\`, `;`, and `=` with a leading backslash.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' | ';' | '=' => {
                out.push('\\');
                out.push(c);
            }
            other => out.push(other),
        }
    }
    out
}

/// Reverse of [`escape`]: `\;`, `\=`, `\\` decode to their literal character;
/// any other backslash is left as a literal backslash, since those are "the
/// only meaningful escapes" (§3).
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some(&next) if matches!(next, ';' | '=' | '\\') => {
                    out.push(next);
                    chars.next();
                }
                _ => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Split `s` on unescaped occurrences of `delim`, returning the (still
/// escaped) segments.
fn split_unescaped(s: &str, delim: char) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            current.push(c);
            if let Some(&next) = chars.peek() {
                current.push(next);
                chars.next();
            }
        } else if c == delim {
            segments.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    segments.push(current);
    segments
}

/// Split the first unescaped occurrence of `delim`, returning both halves
/// still escaped, or `None` if `delim` does not occur unescaped.
fn split_unescaped_first(s: &str, delim: char) -> Option<(String, String)> {
    let mut head = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            head.push(c);
            if let Some(&next) = chars.peek() {
                head.push(next);
                chars.next();
            }
        } else if c == delim {
            let tail: String = chars.collect();
            return Some((head, tail));
        } else {
            head.push(c);
        }
    }
    None
}

/// Double any backslash that appears immediately before a line break, so
/// that human-entered multi-line values round-trip through the single-line
/// encoding (§6).
pub fn normalize_trailing_backslashes_before_newline(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && matches!(chars.peek(), Some('\n') | Some('\r')) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
