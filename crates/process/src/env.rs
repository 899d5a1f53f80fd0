// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Child environment construction: `%VAR%` expansion against the ambient
//! (service account) environment, layered with the service definition's own
//! pairs (§4.5 step 2 — service-defined pairs win on collision).

use std::collections::HashMap;

/// Expands every `%NAME%` reference in `value` using `ambient`. A reference
/// to a name absent from `ambient` is left untouched (unlike the strict
/// path-validator expansion in `servy_core::path`, an unresolved child
/// environment reference is not an error — it simply passes through for the
/// target process to interpret, matching how `cmd.exe` leaves unknown
/// `%FOO%` references unexpanded).
pub fn expand_var_refs(value: &str, ambient: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                match ambient.get(name) {
                    Some(resolved) => out.push_str(resolved),
                    None => out.push_str(&rest[start..start + 2 + end]),
                }
                rest = &after[end + 1..];
            }
            _ => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Builds the child's effective environment: start from `ambient`, then
/// apply `service_defined` (each value `%VAR%`-expanded against `ambient`),
/// overwriting on key collision.
pub fn layer_environment(
    ambient: &[(String, String)],
    service_defined: &[(String, String)],
) -> Vec<(String, String)> {
    let lookup: HashMap<String, String> = ambient.iter().cloned().collect();
    let mut result = ambient.to_vec();

    for (key, value) in service_defined {
        let expanded = expand_var_refs(value, &lookup);
        match result.iter_mut().find(|(k, _)| k == key) {
            Some(existing) => existing.1 = expanded,
            None => result.push((key.clone(), expanded)),
        }
    }
    result
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
