use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

use crate::{FailureKind, FetchError, FetchOutput};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static str,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed {encoding} input")]
    Malformed { encoding: &'static str },
}

impl From<DecodeError> for FetchError {
    fn from(err: DecodeError) -> Self {
        FetchError::new(FailureKind::Decode, err.to_string())
    }
}

/// Decodes a response body: BOM, then the Content-Type charset, then detection.
pub fn decode_text(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedText, DecodeError> {
    if bytes.is_empty() {
        return Ok(DecodedText {
            text: String::new(),
            encoding: UTF_8.name(),
        });
    }
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_with(&bytes[bom_len..], encoding);
    }
    if let Some(encoding) = content_type
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return decode_with(bytes, encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

/// Decoded body of `output`, as used by every text endpoint.
pub(crate) fn body_text(output: &FetchOutput) -> Result<String, FetchError> {
    let decoded = decode_text(&output.bytes, output.metadata.content_type.as_deref())?;
    Ok(decoded.text)
}

fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']).to_string())
    })
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> Result<DecodedText, DecodeError> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(DecodeError::Malformed {
            encoding: encoding.name(),
        });
    }
    Ok(DecodedText {
        text: text.into_owned(),
        encoding: encoding.name(),
    })
}

#[cfg(test)]
mod tests {
    use super::{charset_label, decode_text, DecodeError};

    #[test]
    fn charset_parameter_is_case_insensitive() {
        assert_eq!(
            charset_label("text/html; Charset=\"ISO-8859-1\""),
            Some("ISO-8859-1".to_string())
        );
        assert_eq!(charset_label("text/html"), None);
    }

    #[test]
    fn header_charset_is_honoured() {
        let decoded = decode_text(b"caf\xe9", Some("text/html; charset=iso-8859-1")).unwrap();
        assert_eq!(decoded.text, "café");
        assert_eq!(decoded.encoding, "windows-1252");
    }

    #[test]
    fn bom_wins_over_header() {
        let decoded = decode_text(b"\xef\xbb\xbfok", Some("text/html; charset=iso-8859-1")).unwrap();
        assert_eq!(decoded.text, "ok");
        assert_eq!(decoded.encoding, "UTF-8");
    }

    #[test]
    fn truncated_utf8_is_an_error() {
        assert_eq!(
            decode_text(b"ab\xc3", Some("text/html; charset=utf-8")),
            Err(DecodeError::Malformed { encoding: "UTF-8" })
        );
    }
}
