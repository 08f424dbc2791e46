//! Recipient personalization: parsing the `for` query parameter and building
//! a shareable link. Pure string handling, host-testable; the clipboard side
//! lives in the page module.

use std::borrow::Cow;

/// Extracts the recipient name from a URL query string (`?for=Mia&x=1`).
/// Accepts the string with or without its leading `?`. Returns `None` when
/// the parameter is absent, empty, or undecodable.
pub fn recipient_from_query(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    for pair in query.split('&') {
        let (key, value) = match pair.split_once('=') {
            Some(kv) => kv,
            None => (pair, ""),
        };
        if key != "for" {
            continue;
        }
        // Query strings encode spaces as '+' as well as %20.
        let value = value.replace('+', " ");
        let decoded: Cow<'_, str> = urlencoding::decode(&value).ok()?;
        let trimmed = decoded.trim();
        if trimmed.is_empty() {
            return None;
        }
        return Some(trimmed.to_owned());
    }
    None
}

/// Builds the shareable page URL, appending `?for=<name>` (percent-encoded)
/// when a recipient is set.
pub fn share_url(base: &str, recipient: Option<&str>) -> String {
    match recipient {
        Some(name) if !name.trim().is_empty() => {
            format!("{base}?for={}", urlencoding::encode(name.trim()))
        }
        _ => base.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_name() {
        assert_eq!(recipient_from_query("?for=Mia"), Some("Mia".into()));
        assert_eq!(recipient_from_query("for=Mia"), Some("Mia".into()));
    }

    #[test]
    fn absent_or_empty_is_none() {
        assert_eq!(recipient_from_query(""), None);
        assert_eq!(recipient_from_query("?mode=party"), None);
        assert_eq!(recipient_from_query("?for="), None);
        assert_eq!(recipient_from_query("?for=%20%20"), None);
    }

    #[test]
    fn percent_and_plus_decoding() {
        assert_eq!(
            recipient_from_query("?for=Anna%20Lena"),
            Some("Anna Lena".into())
        );
        assert_eq!(
            recipient_from_query("?for=Anna+Lena"),
            Some("Anna Lena".into())
        );
        assert_eq!(recipient_from_query("?for=%E2%9C%A8"), Some("✨".into()));
    }

    #[test]
    fn picks_for_among_other_params() {
        assert_eq!(
            recipient_from_query("?mode=warm&for=Sam&x=1"),
            Some("Sam".into())
        );
    }

    #[test]
    fn share_url_round_trip() {
        let url = share_url("https://example.com/wish", Some("Anna Lena"));
        assert_eq!(url, "https://example.com/wish?for=Anna%20Lena");
        let query = url.split_once('?').unwrap().1;
        assert_eq!(recipient_from_query(query), Some("Anna Lena".into()));
    }

    #[test]
    fn share_url_without_recipient_is_bare() {
        assert_eq!(share_url("https://example.com/", None), "https://example.com/");
        assert_eq!(share_url("https://example.com/", Some("  ")), "https://example.com/");
    }
}
