//! Identifier sanitization: JSON keys → snake_case field names, key/option
//! strings → PascalCase message and service names, package validation.

use once_cell::sync::Lazy;
use regex::Regex;

/// Words the proto grammar claims for itself; field names must not collide.
pub const RESERVED_WORDS: &[&str] = &[
    "message", "service", "rpc", "returns", "option", "import", "package",
    "enum", "repeated", "optional", "required", "reserved", "extensions",
    "extend", "oneof", "map", "public", "syntax", "true", "false", "to", "max",
];

pub const DEFAULT_PACKAGE: &str = "com.example.api";

pub static PACKAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_.]*[a-z0-9]$").unwrap());

pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.iter().any(|w| w.eq_ignore_ascii_case(word))
}

/// Sanitized snake_case field name plus whether a reserved-word rename
/// happened (the caller records the warning with its own context).
pub struct FieldName {
    pub name: String,
    pub renamed_reserved: bool,
}

pub fn field_name(key: &str) -> FieldName {
    let mut out = String::with_capacity(key.len() + 2);
    let mut prev_underscore = true; // swallow leading separators
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            if !prev_underscore {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_underscore = false;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
            prev_underscore = false;
        } else if !prev_underscore {
            out.push('_');
            prev_underscore = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }

    if !out.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
        out = format!("field_{out}");
    }

    if is_reserved(&out) {
        return FieldName { name: format!("{out}_field"), renamed_reserved: true };
    }
    FieldName { name: out, renamed_reserved: false }
}

/// PascalCase a key or user-supplied name; strips anything the proto grammar
/// would reject. Returns `None` when nothing usable survives.
pub fn message_name(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut upper_next = true;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            if upper_next {
                out.push(c.to_ascii_uppercase());
                upper_next = false;
            } else {
                out.push(c);
            }
        } else {
            upper_next = true;
        }
    }
    // strip a leading digit run; message names must start with a letter
    let trimmed: String = out.chars().skip_while(|c| c.is_ascii_digit()).collect();
    if trimmed.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
        Some(trimmed)
    } else {
        None
    }
}

/// Lowercase-dotted package name, or `None` if the input fails the format.
pub fn package_name(raw: &str) -> Option<String> {
    if PACKAGE_RE.is_match(raw) { Some(raw.to_string()) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_keys_become_snake_case() {
        assert_eq!(field_name("userId").name, "user_id");
        assert_eq!(field_name("createdAt").name, "created_at");
        assert_eq!(field_name("HTMLBody").name, "h_t_m_l_body");
        assert_eq!(field_name("already_snake").name, "already_snake");
    }

    #[test]
    fn reserved_keys_get_field_suffix() {
        let f = field_name("message");
        assert_eq!(f.name, "message_field");
        assert!(f.renamed_reserved);
        let f = field_name("Syntax");
        assert_eq!(f.name, "syntax_field");
        assert!(f.renamed_reserved);
    }

    #[test]
    fn hostile_keys_are_prefixed() {
        assert_eq!(field_name("123abc").name, "field_123abc");
        assert_eq!(field_name("__weird__").name, "weird");
        assert_eq!(field_name("a b-c").name, "a_b_c");
    }

    #[test]
    fn message_names_are_pascal_cased() {
        assert_eq!(message_name("user_settings").as_deref(), Some("UserSettings"));
        assert_eq!(message_name("profile").as_deref(), Some("Profile"));
        assert_eq!(message_name("order items").as_deref(), Some("OrderItems"));
        assert_eq!(message_name("123"), None);
        assert_eq!(message_name("!!!"), None);
    }

    #[test]
    fn package_names_must_be_lowercase_dotted() {
        assert!(package_name("com.example.api").is_some());
        assert!(package_name("single").is_some());
        assert!(package_name("Com.Example").is_none());
        assert!(package_name("ends.with.").is_none());
        assert!(package_name("").is_none());
    }
}
