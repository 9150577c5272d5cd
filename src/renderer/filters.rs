use minijinja::Environment;
use regex::Regex;
use std::sync::OnceLock;

// Re-export the case conversion functions used as filters
pub use cruet::case::{
    camel::to_camel_case, kebab::to_kebab_case, pascal::to_pascal_case,
    screaming_snake::to_screaming_snake_case, snake::to_snake_case,
};

/// Turns an arbitrary value into a valid Terraform identifier.
///
/// Runs of characters outside `[A-Za-z0-9_-]` collapse to a single `_`, and a
/// leading `_` is added when the result would not start with a letter or `_`.
///
/// # Arguments
/// * `val` - The string to sanitise
pub fn tf_identifier(val: &str) -> String {
    static INVALID: OnceLock<Regex> = OnceLock::new();
    let invalid = INVALID.get_or_init(|| {
        Regex::new(r"[^A-Za-z0-9_-]+").unwrap_or_else(|e| panic!("static pattern: {e}"))
    });

    let sanitised = invalid.replace_all(val, "_");
    match sanitised.chars().next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => sanitised.into_owned(),
        _ => format!("_{sanitised}"),
    }
}

pub fn register(env: &mut Environment<'static>) {
    env.add_filter("camel_case", to_camel_case);
    env.add_filter("kebab_case", to_kebab_case);
    env.add_filter("pascal_case", to_pascal_case);
    env.add_filter("screaming_snake_case", to_screaming_snake_case);
    env.add_filter("snake_case", to_snake_case);
    env.add_filter("tf_identifier", tf_identifier);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_valid_identifiers() {
        assert_eq!(tf_identifier("web_server-1"), "web_server-1");
    }

    #[test]
    fn collapses_invalid_runs() {
        assert_eq!(tf_identifier("my app.prod"), "my_app_prod");
        assert_eq!(tf_identifier("a  /  b"), "a_b");
    }

    #[test]
    fn prefixes_leading_digit_or_empty() {
        assert_eq!(tf_identifier("123abc"), "_123abc");
        assert_eq!(tf_identifier(""), "_");
    }
}
