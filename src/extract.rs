//! Splitting a classified body into candidate entries.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::detect::Encoding;
use crate::error::DecodeError;

/// Split a body into trimmed, non-empty lines, decoding it first if it is
/// base64. Line order follows the source text.
pub fn extract(body: &str, encoding: Encoding) -> Result<Vec<String>, DecodeError> {
    match encoding {
        Encoding::Base64 => {
            let bytes = STANDARD.decode(body.trim())?;
            let text = String::from_utf8(bytes)?;
            Ok(split_lines(&text))
        }
        Encoding::Raw => Ok(split_lines(body)),
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::classify;

    #[test]
    fn raw_lines_are_trimmed() {
        let lines = extract("  vless://x \r\n\nfoo\n\tvmess://y\n", Encoding::Raw).unwrap();
        assert_eq!(lines, vec!["vless://x", "foo", "vmess://y"]);
    }

    #[test]
    fn base64_body_is_decoded() {
        let text = "vmess://y\n\nss://z\r\n";
        let body = STANDARD.encode(text);
        let encoding = classify(&body);
        let lines = extract(&body, encoding).unwrap();
        let expected: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        assert_eq!(lines, expected);
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let body = STANDARD.encode([0xff, 0xfe, 0xfd]);
        let err = extract(&body, Encoding::Base64).unwrap_err();
        assert!(matches!(err, DecodeError::Utf8(_)));
    }

    #[test]
    fn empty_body_has_no_entries() {
        assert!(extract("", Encoding::Raw).unwrap().is_empty());
    }
}
