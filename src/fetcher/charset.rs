//! Character-set detection for fetched pages.
//!
//! Order: byte-order mark, `charset` parameter of the `Content-Type` header,
//! `<meta>` declaration in the first kilobyte, then UTF-8.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use scraper::{Html, Selector};

const META_PRESCAN_BYTES: usize = 1024;

/// Decode a page body to text. Bytes that are invalid in the chosen
/// encoding become U+FFFD.
pub fn decode(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .or_else(|| meta_charset(body))
        .unwrap_or(UTF_8);

    // `decode` lets a BOM override the declared encoding.
    let (text, _, _) = encoding.decode(body);
    text.into_owned()
}

fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
    })
}

fn meta_charset(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(META_PRESCAN_BYTES)];
    // Every byte maps to a char in windows-1252, so ASCII markup survives.
    let (markup, _) = WINDOWS_1252.decode_without_bom_handling(head);
    let document = Html::parse_document(&markup);

    let selector = Selector::parse("meta").ok()?;
    let label = document.select(&selector).find_map(|meta| {
        let element = meta.value();
        if let Some(charset) = element.attr("charset") {
            return Some(charset.trim().to_string());
        }
        let is_content_type = element
            .attr("http-equiv")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("content-type"));
        if is_content_type {
            return element.attr("content").and_then(charset_param);
        }
        None
    })?;

    // A meta tag naming UTF-16 means UTF-8.
    Encoding::for_label(label.as_bytes()).map(|encoding| encoding.output_encoding())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LATIN1_BODY: &[u8] = b"<p>Caf\xe9 cr\xe8me</p>";

    #[test]
    fn test_utf8_by_default() {
        assert_eq!(decode("<p>Café</p>".as_bytes(), None), "<p>Café</p>");
    }

    #[test]
    fn test_header_charset() {
        let text = decode(LATIN1_BODY, Some("text/html; charset=iso-8859-1"));
        assert_eq!(text, "<p>Café crème</p>");
    }

    #[test]
    fn test_header_charset_quoted_and_cased() {
        let text = decode(LATIN1_BODY, Some("text/html; Charset=\"ISO-8859-1\""));
        assert_eq!(text, "<p>Café crème</p>");
    }

    #[test]
    fn test_meta_charset() {
        let mut body = b"<html><head><meta charset=\"windows-1252\"></head><body>".to_vec();
        body.extend_from_slice(LATIN1_BODY);
        let text = decode(&body, Some("text/html"));
        assert!(text.ends_with("<p>Café crème</p>"));
    }

    #[test]
    fn test_meta_http_equiv() {
        let mut body = b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=latin1\">"
            .to_vec();
        body.extend_from_slice(LATIN1_BODY);
        assert!(decode(&body, None).ends_with("<p>Café crème</p>"));
    }

    #[test]
    fn test_header_wins_over_meta() {
        let body = "<meta charset=\"iso-8859-1\"><p>Café</p>".as_bytes();
        let text = decode(body, Some("text/html; charset=utf-8"));
        assert!(text.ends_with("<p>Café</p>"));
    }

    #[test]
    fn test_unknown_label_falls_back_to_utf8() {
        let text = decode("<p>Café</p>".as_bytes(), Some("text/html; charset=bogus"));
        assert_eq!(text, "<p>Café</p>");
    }

    #[test]
    fn test_bom_overrides_declaration() {
        let mut body = vec![0xEF, 0xBB, 0xBF];
        body.extend_from_slice("<p>Café</p>".as_bytes());
        let text = decode(&body, Some("text/html; charset=iso-8859-1"));
        assert_eq!(text, "<p>Café</p>");
    }

    #[test]
    fn test_undeclared_invalid_utf8_is_replaced() {
        assert_eq!(decode(b"caf\xe9", None), "caf\u{fffd}");
    }
}
