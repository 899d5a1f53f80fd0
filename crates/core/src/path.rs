// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path validation (C4): classify paths as absolute/existing/safe.
//!
//! Both operations are total — they report `false`/`Err` rather than
//! panicking on malformed input.

use std::path::{Path, PathBuf};

/// What kind of filesystem entry a validated path is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
}

/// Characters that are never valid in a Windows path component.
const RESERVED_CHARS: &[char] = &['<', '>', '"', '|', '?', '*'];

/// `true` iff `p` is non-empty, contains no `..` segments, contains no
/// OS-reserved invalid characters, is absolute, and normalises without
/// error.
pub fn is_valid_path(p: &str) -> bool {
    if p.is_empty() {
        return false;
    }
    if p.chars().any(|c| RESERVED_CHARS.contains(&c)) {
        return false;
    }
    let path = Path::new(p);
    if !path.is_absolute() {
        return false;
    }
    if path
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return false;
    }
    true
}

/// Expand `%VAR%` references against the process environment. Returns an
/// error if, after expansion, any `%...%` sequence remains unresolved —
/// expansion is strict.
pub fn expand_env_vars(p: &str) -> Result<String, String> {
    let mut out = String::with_capacity(p.len());
    let mut rest = p;
    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end) => {
                let name = &after[..end];
                if name.is_empty() {
                    // `%%` is a literal percent.
                    out.push('%');
                } else {
                    match std::env::var(name) {
                        Ok(value) => out.push_str(&value),
                        Err(_) => {
                            return Err(format!("unresolved variable reference: %{}%", name))
                        }
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                return Err(format!(
                    "unresolved variable reference: unterminated %...% in {:?}",
                    p
                ))
            }
        }
    }
    out.push_str(rest);
    if out.contains('%') {
        return Err(format!("unresolved variable reference remains in {:?}", out));
    }
    Ok(out)
}

/// Expand `%VAR%` references, then check that the resulting path exists and
/// matches `kind`. Never panics; all failure modes return `false` or an
/// error string describing why.
pub fn validate_exists(p: &str, kind: PathKind) -> Result<bool, String> {
    let expanded = expand_env_vars(p)?;
    let path = PathBuf::from(&expanded);
    let exists = match kind {
        PathKind::File => path.is_file(),
        PathKind::Directory => path.is_dir(),
    };
    Ok(exists)
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
