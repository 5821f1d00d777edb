// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Mapping configuration keys to Rust identifiers.
//!
//! The rule, applied in order:
//!
//! 1. Every character outside `[A-Za-z0-9_]` becomes `_`.
//! 2. A leading digit gets a `_` prefix.
//! 3. A Rust keyword gets a `_` suffix.
//!
//! Keys that are empty or contain no ASCII alphanumeric character are
//! rejected. Sibling collisions are detected by the compiler.

use heck::ToUpperCamelCase;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Plain ASCII identifier.
    static ref IDENT_REGEX: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Strict, reserved and contextual keywords that cannot be used as field names.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "union", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Whether `name` is a Rust keyword.
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Whether `name` can be used verbatim as a field or type name.
pub fn is_valid_identifier(name: &str) -> bool {
    IDENT_REGEX.is_match(name) && !is_keyword(name) && name != "_"
}

/// Turn a mapping key into a field identifier.
///
/// Returns the reason on failure.
pub fn sanitize_key(key: &str) -> Result<String, String> {
    if key.is_empty() {
        return Err("empty key".to_string());
    }
    if !key.chars().any(|c| c.is_ascii_alphanumeric()) {
        return Err("no ASCII alphanumeric characters".to_string());
    }
    if is_valid_identifier(key) {
        return Ok(key.to_string());
    }

    let mut ident: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if is_keyword(&ident) {
        ident.push('_');
    }

    Ok(ident)
}

/// Type name of a nested group: the parent type followed by the member in UpperCamelCase.
pub fn nested_type_name(parent: &str, member_ident: &str) -> String {
    format!("{}{}", parent, member_ident.to_upper_camel_case())
}
