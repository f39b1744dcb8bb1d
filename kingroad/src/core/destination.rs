//! Normalization of user-entered destination and origin labels.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::types::CURRENT_LOCATION;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Trim and collapse internal whitespace runs. Returns `None` for blank input.
pub fn normalize_destination(raw: &str) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.into_owned())
    }
}

/// Normalize an optional origin, falling back to [`CURRENT_LOCATION`].
pub fn normalize_origin(raw: Option<&str>) -> String {
    raw.and_then(normalize_destination)
        .unwrap_or_else(|| CURRENT_LOCATION.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_collapses_whitespace() {
        assert_eq!(
            normalize_destination("  São   Paulo \t centro "),
            Some("São Paulo centro".to_string())
        );
    }

    #[test]
    fn blank_destination_is_rejected() {
        assert_eq!(normalize_destination(""), None);
        assert_eq!(normalize_destination(" \n\t "), None);
    }

    #[test]
    fn missing_or_blank_origin_uses_current_location() {
        assert_eq!(normalize_origin(None), CURRENT_LOCATION);
        assert_eq!(normalize_origin(Some("   ")), CURRENT_LOCATION);
        assert_eq!(normalize_origin(Some(" Rio de Janeiro ")), "Rio de Janeiro");
    }
}
