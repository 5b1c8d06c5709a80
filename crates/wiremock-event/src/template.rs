//! Placeholder substitution for stub-definition files.
//!
//! Placeholders use the `${key}` syntax. The key is everything between `${`
//! and the next `}`, taken literally (no trimming, no nested lookups).
//!
//! # Example
//!
//! ```json
//! {
//!   "request": { "method": "GET", "url": "/api/orders" },
//!   "response": { "status": 200, "fixedDelayMilliseconds": ${delay} }
//! }
//! ```
//!
//! Substitution is a single left-to-right pass: inserted values are never
//! scanned again, so a value that itself looks like `${other}` stays literal.

use crate::settings::Replacements;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

/// Regex for matching placeholders: `${delay}`, `${order.status}`, etc.
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new(r"\$\{([^}]*)\}").expect("placeholder regex is valid"))
}

/// Replace every `${key}` whose key is present in `replacements`.
///
/// Placeholders with unknown keys are left untouched. Borrows the input when
/// nothing was replaced.
pub fn substitute<'a>(text: &'a str, replacements: &Replacements) -> Cow<'a, str> {
    if replacements.is_empty() {
        return Cow::Borrowed(text);
    }

    get_placeholder_regex().replace_all(text, |caps: &Captures| {
        let key = caps.get(1).map_or("", |m| m.as_str());
        match replacements.get(key) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        }
    })
}

/// List the placeholder keys referenced in `text`, in order of appearance.
pub fn placeholders(text: &str) -> Vec<&str> {
    get_placeholder_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Keys referenced in `text` that have no value in `replacements`.
pub fn unresolved<'a>(text: &'a str, replacements: &Replacements) -> Vec<&'a str> {
    let mut keys: Vec<&str> = placeholders(text)
        .into_iter()
        .filter(|key| replacements.get(key).is_none())
        .collect();
    keys.sort_unstable();
    keys.dedup();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, &str)]) -> Replacements {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_substitute_single_placeholder() {
        let text = r#"{"response": {"fixedDelayMilliseconds": ${delay}}}"#;
        let result = substitute(text, &table(&[("delay", "500")]));
        assert_eq!(result, r#"{"response": {"fixedDelayMilliseconds": 500}}"#);
    }

    #[test]
    fn test_substitute_every_occurrence() {
        let result = substitute("${a}-${b}-${a}", &table(&[("a", "1"), ("b", "2")]));
        assert_eq!(result, "1-2-1");
    }

    #[test]
    fn test_substitute_unknown_key_left_verbatim() {
        let result = substitute("${delay} ${status}", &table(&[("delay", "10")]));
        assert_eq!(result, "10 ${status}");
    }

    #[test]
    fn test_substitute_without_placeholders_is_identity() {
        let text = r#"{"request": {"url": "/health"}}"#;
        let result = substitute(text, &table(&[("delay", "10"), ("status", "503")]));
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, text);
    }

    #[test]
    fn test_substitute_empty_table_borrows() {
        let result = substitute("${delay}", &Replacements::new());
        assert!(matches!(result, Cow::Borrowed("${delay}")));
    }

    #[test]
    fn test_substitute_is_single_pass() {
        let replacements = table(&[("a", "${b}"), ("b", "boom")]);
        let once = substitute("value=${a}", &replacements).into_owned();
        assert_eq!(once, "value=${b}");

        // A self-referencing value must not expand on a second run either.
        let self_ref = table(&[("a", "${a}")]);
        let first = substitute("x ${a} y", &self_ref).into_owned();
        let second = substitute(&first, &self_ref).into_owned();
        assert_eq!(first, "x ${a} y");
        assert_eq!(second, first);
    }

    #[test]
    fn test_substitute_empty_value() {
        let result = substitute("[${c}]", &table(&[("c", "")]));
        assert_eq!(result, "[]");
    }

    #[test]
    fn test_substitute_keys_are_literal() {
        // Keys are not trimmed and dollar signs in values are not special.
        let result = substitute("${ a } ${a}", &table(&[("a", "$1")]));
        assert_eq!(result, "${ a } $1");
    }

    #[test]
    fn test_placeholders_in_order() {
        assert_eq!(
            placeholders("${delay} and ${status} and ${delay}"),
            vec!["delay", "status", "delay"]
        );
        assert!(placeholders("no templates here, just $ and {}").is_empty());
    }

    #[test]
    fn test_unresolved_keys() {
        let text = "${delay} ${status} ${status} ${body}";
        assert_eq!(
            unresolved(text, &table(&[("delay", "1")])),
            vec!["body", "status"]
        );
    }
}
