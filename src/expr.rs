//! Template value cleanup - from raw attribute text to a resolvable name
//!
//! Raw values carry decoration the resolver does not care about:
//! whitespace, `${...}` expansion wrappers, and binding prefixes.
//!
//! Examples:
//! - `${ count }` cleans to `count`
//! - `prop:user` cleans to `user` with prefix `prop`
//! - `${ message:greeting }` cleans to `greeting` with prefix `message`

/// Strip the expansion wrapper from a trimmed value.
///
/// Values that never open an expansion pass through trimmed. An opened
/// but unterminated expansion (`${count`) is malformed and yields `None`.
/// Text after the closing brace is discarded.
pub fn unwrap_expansion(raw: &str) -> Option<&str> {
    let value = raw.trim();
    match value.strip_prefix("${") {
        Some(inner) => inner.rfind('}').map(|end| inner[..end].trim()),
        None => Some(value),
    }
}

/// The binding prefix of a value, if it carries one.
///
/// `prop:user` has prefix `prop`. A leading colon means an empty prefix,
/// which is malformed, and a value without a colon has no prefix at all;
/// both yield `None`.
pub fn value_prefix(raw: &str) -> Option<&str> {
    let value = unwrap_expansion(raw)?;
    match value.find(':') {
        Some(idx) if idx > 0 => Some(value[..idx].trim_end()),
        _ => None,
    }
}

/// Reduce a raw template value to the bare identifier worth resolving.
///
/// Trims, unwraps a `${...}` expansion, and strips the binding prefix.
/// Malformed values (unterminated expansion, empty prefix) yield `None`.
/// The result may still be empty, e.g. for `prop:` or a blank value.
pub fn clean_value(raw: &str) -> Option<&str> {
    let value = unwrap_expansion(raw)?;
    match value.find(':') {
        Some(0) => None,
        Some(idx) => Some(value[idx + 1..].trim_start()),
        None => Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_values_pass_through() {
        assert_eq!(clean_value("count"), Some("count"));
        assert_eq!(clean_value("  count  "), Some("count"));
        assert_eq!(clean_value(""), Some(""));
        assert_eq!(clean_value("   "), Some(""));
    }

    #[test]
    fn test_expansion_unwrapping() {
        assert_eq!(clean_value("${count}"), Some("count"));
        assert_eq!(clean_value("${ count }"), Some("count"));
        assert_eq!(clean_value("  ${ count }  "), Some("count"));
        // Trailing text after the closing brace is discarded
        assert_eq!(unwrap_expansion("${count} tail"), Some("count"));
    }

    #[test]
    fn test_unterminated_expansion_is_malformed() {
        assert_eq!(clean_value("${count"), None);
        assert_eq!(clean_value("${"), None);
        assert_eq!(value_prefix("${prop:count"), None);
    }

    #[test]
    fn test_prefix_stripping() {
        assert_eq!(clean_value("prop:count"), Some("count"));
        assert_eq!(clean_value("${prop:count}"), Some("count"));
        assert_eq!(clean_value("${ prop : count }"), Some("count"));
        // Only the first colon separates the prefix
        assert_eq!(clean_value("message:a:b"), Some("a:b"));
        assert_eq!(clean_value("prop:"), Some(""));
    }

    #[test]
    fn test_empty_prefix_is_malformed() {
        assert_eq!(clean_value(":count"), None);
        assert_eq!(clean_value("${:count}"), None);
    }

    #[test]
    fn test_value_prefix() {
        assert_eq!(value_prefix("prop:count"), Some("prop"));
        assert_eq!(value_prefix("${ prop : count }"), Some("prop"));
        assert_eq!(value_prefix("count"), None);
        assert_eq!(value_prefix(":count"), None);
    }
}
