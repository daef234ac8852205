//! URL helpers for the page's three endpoints.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Bytes `encodeURIComponent` escapes: everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode `input` the way the browser's `encodeURIComponent` does.
///
/// Every byte of the UTF-8 encoding outside the unreserved set becomes
/// `%XX` with uppercase hex.
#[must_use]
pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Append a single `name=value` query parameter to `path`.
#[must_use]
pub fn with_query_param(path: &str, name: &str, value: &str, encode: bool) -> String {
    let sep = if path.contains('?') { '&' } else { '?' };
    if encode {
        format!("{path}{sep}{name}={}", encode_uri_component(value))
    } else {
        format!("{path}{sep}{name}={value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreserved_pass_through() {
        assert_eq!(encode_uri_component("AZaz09-_.!~*'()"), "AZaz09-_.!~*'()");
    }

    #[test]
    fn reserved_and_space_are_escaped() {
        assert_eq!(encode_uri_component("a b&c=d/e?f#g"), "a%20b%26c%3Dd%2Fe%3Ff%23g");
        assert_eq!(encode_uri_component("100%"), "100%25");
        assert_eq!(encode_uri_component("+"), "%2B");
    }

    #[test]
    fn turkish_letters_are_utf8_escaped() {
        assert_eq!(encode_uri_component("ş"), "%C5%9F");
        assert_eq!(encode_uri_component("Işık"), "I%C5%9F%C4%B1k");
    }

    #[test]
    fn query_param_separator() {
        assert_eq!(with_query_param("/feed", "q", "a b", true), "/feed?q=a%20b");
        assert_eq!(with_query_param("/feed", "q", "a b", false), "/feed?q=a b");
        assert_eq!(
            with_query_param("/feed?lang=tr", "q", "x", true),
            "/feed?lang=tr&q=x"
        );
    }
}
