/// Format a backend response for the result panel.
///
/// The declared content type decides the branch: anything containing
/// `application/json` is parsed as an arbitrary JSON value and
/// re-serialized with 2-space indentation (object key order preserved as
/// received); everything else — including a missing content-type header —
/// passes through unchanged. HTTP status is deliberately not part of the
/// decision.
///
/// A body that claims to be JSON but fails to parse returns `Err`; callers
/// ignore the error and leave the displayed result unchanged.
pub fn format_response(
    content_type: Option<&str>,
    body: &str,
) -> Result<String, serde_json::Error> {
    match content_type {
        Some(ct) if ct.contains("application/json") => {
            let value: serde_json::Value = serde_json::from_str(body)?;
            serde_json::to_string_pretty(&value)
        }
        _ => Ok(body.to_string()),
    }
}

/// Percent-encode a query parameter value (RFC 3986 unreserved set kept).
pub fn encode_query_value(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => {
                out.push('%');
                out.push_str(&format!("{:02X}", b));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_pretty_printed_two_space() {
        let got = format_response(Some("application/json"), r#"{"a":1,"b":[2,3]}"#).unwrap();
        assert_eq!(got, "{\n  \"a\": 1,\n  \"b\": [\n    2,\n    3\n  ]\n}");
    }

    #[test]
    fn test_json_key_order_preserved() {
        let got = format_response(Some("application/json"), r#"{"b":2,"a":1}"#).unwrap();
        assert_eq!(got, "{\n  \"b\": 2,\n  \"a\": 1\n}");
    }

    #[test]
    fn test_order_scenario() {
        let body = r#"{"order_uid":"b563feb7b2b84b6test","status":"delivered"}"#;
        let got = format_response(Some("application/json; charset=utf-8"), body).unwrap();
        assert_eq!(
            got,
            "{\n  \"order_uid\": \"b563feb7b2b84b6test\",\n  \"status\": \"delivered\"\n}"
        );
    }

    #[test]
    fn test_plain_text_passthrough() {
        let got = format_response(Some("text/plain"), "order not found").unwrap();
        assert_eq!(got, "order not found");
    }

    #[test]
    fn test_missing_content_type_passthrough() {
        let got = format_response(None, "raw body").unwrap();
        assert_eq!(got, "raw body");
    }

    #[test]
    fn test_malformed_json_is_err() {
        assert!(format_response(Some("application/json"), "not json {").is_err());
    }

    #[test]
    fn test_encode_query_value() {
        assert_eq!(encode_query_value("a b&c"), "a%20b%26c");
        assert_eq!(encode_query_value("b563feb7b2b84b6test"), "b563feb7b2b84b6test");
        assert_eq!(encode_query_value(""), "");
        assert_eq!(encode_query_value("=?#/"), "%3D%3F%23%2F");
        // Multibyte input encodes per UTF-8 byte
        assert_eq!(encode_query_value("é"), "%C3%A9");
    }
}
