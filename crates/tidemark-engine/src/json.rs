//! Minimal-suffix completion of truncated JSON text.
//!
//! Streamed widget payloads routinely arrive cut off mid-string or mid-number.
//! [`complete`] scans a possibly-truncated JSON value and appends the shortest
//! suffix that makes it parse, or backtracks to the last point that was valid
//! when the truncated kind is not allowed to be completed. It is total: any
//! input produces some output without panicking, and for every prefix of a
//! valid JSON document of an allowed kind the output is valid JSON.

/// Set of JSON value kinds permitted to be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allow(u8);

impl Allow {
    pub const STRING: Allow = Allow(1 << 0);
    pub const NUMBER: Allow = Allow(1 << 1);
    pub const ARRAY: Allow = Allow(1 << 2);
    pub const OBJECT: Allow = Allow(1 << 3);
    pub const NULL: Allow = Allow(1 << 4);
    pub const BOOLEAN: Allow = Allow(1 << 5);
    pub const ALL: Allow = Allow(0b11_1111);

    pub const fn contains(self, other: Allow) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Allow {
    type Output = Allow;

    fn bitor(self, rhs: Allow) -> Allow {
        Allow(self.0 | rhs.0)
    }
}

/// Completes `json` into a valid document, honoring the allow set.
///
/// Returns the empty string for empty input. Already-complete values are
/// returned unchanged (trailing garbage past the first value is dropped).
pub fn complete(json: &str, allow: Allow) -> String {
    if json.is_empty() {
        return String::new();
    }
    let (end, completion) = complete_any(json, 0, allow);
    match completion {
        Some(suffix) => format!("{}{}", &json[..end], suffix),
        None => json[..end].to_string(),
    }
}

/// Position the scan stopped at, plus the suffix to append (if any).
type Outcome = (usize, Option<String>);

fn skip_ws(json: &str, mut at: usize) -> usize {
    let bytes = json.as_bytes();
    while at < bytes.len() && matches!(bytes[at], b' ' | b'\t' | b'\n' | b'\r') {
        at += 1;
    }
    at
}

fn complete_any(json: &str, start: usize, allow: Allow) -> Outcome {
    let at = skip_ws(json, start);
    let bytes = json.as_bytes();
    if at >= bytes.len() {
        return (start, None);
    }
    match bytes[at] {
        b'{' => complete_object(json, at, allow),
        b'[' => complete_array(json, at, allow),
        b'"' => complete_string(json, at, allow),
        b'-' => match bytes.get(at + 1) {
            Some(b'I') => complete_literal(json, at, "-Infinity", allow.contains(Allow::NUMBER)),
            Some(_) => complete_number(json, at, allow),
            None => (at, None),
        },
        b'0'..=b'9' => complete_number(json, at, allow),
        b't' => complete_literal(json, at, "true", allow.contains(Allow::BOOLEAN)),
        b'f' => complete_literal(json, at, "false", allow.contains(Allow::BOOLEAN)),
        b'n' => complete_literal(json, at, "null", allow.contains(Allow::NULL)),
        b'I' => complete_literal(json, at, "Infinity", allow.contains(Allow::NUMBER)),
        b'N' => complete_literal(json, at, "NaN", allow.contains(Allow::NUMBER)),
        _ => (at, None),
    }
}

fn complete_string(json: &str, start: usize, allow: Allow) -> Outcome {
    let bytes = json.as_bytes();
    if bytes.get(start) != Some(&b'"') {
        return (start, None);
    }
    let mut at = start + 1;
    // where to cut if the input ends inside an escape sequence
    let mut safe_end = None;
    while at < bytes.len() {
        match bytes[at] {
            b'"' => return (at + 1, None),
            b'\\' => match bytes.get(at + 1) {
                None => {
                    safe_end = Some(at);
                    break;
                }
                Some(b'u') => {
                    if at + 6 <= bytes.len() {
                        at += 6;
                    } else {
                        safe_end = Some(at);
                        break;
                    }
                }
                Some(_) => at += 2,
            },
            _ => at += 1,
        }
    }
    if allow.contains(Allow::STRING) {
        (safe_end.unwrap_or(bytes.len()), Some("\"".to_string()))
    } else {
        (start, None)
    }
}

fn complete_number(json: &str, start: usize, allow: Allow) -> Outcome {
    let bytes = json.as_bytes();
    let mut end = start;
    while end < bytes.len() && matches!(bytes[end], b'0'..=b'9' | b'.' | b'-' | b'+' | b'e' | b'E')
    {
        end += 1;
    }
    // strip trailing sign/decimal/exponent characters with no digits after them
    let mut modified = false;
    while end > start && matches!(bytes[end - 1], b'.' | b'-' | b'+' | b'e' | b'E') {
        modified = true;
        end -= 1;
    }
    if modified || end == bytes.len() {
        if allow.contains(Allow::NUMBER) {
            (end, Some(String::new()))
        } else {
            (start, None)
        }
    } else {
        (end, None)
    }
}

fn complete_literal(json: &str, start: usize, literal: &str, allowed: bool) -> Outcome {
    let bytes = json.as_bytes();
    let expected = literal.as_bytes();
    let mut matched = 0;
    while start + matched < bytes.len()
        && matched < expected.len()
        && bytes[start + matched] == expected[matched]
    {
        matched += 1;
    }
    if matched == expected.len() {
        return (start + matched, None);
    }
    // only a strict prefix cut off by the end of input may be completed
    if start + matched == bytes.len() && matched > 0 && allowed {
        return (start, Some(literal.to_string()));
    }
    (start, None)
}

fn complete_array(json: &str, start: usize, allow: Allow) -> Outcome {
    let bytes = json.as_bytes();
    if bytes.get(start) != Some(&b'[') {
        return (start, None);
    }
    let mut current = start + 1;
    let mut last_comma: Option<usize> = None;
    let mut last_element_end: Option<usize> = None;
    while current < bytes.len() {
        current = skip_ws(json, current);
        if current >= bytes.len() {
            break;
        }
        if bytes[current] == b']' {
            return (current + 1, None);
        }
        let (element_end, completion) = complete_any(json, current, allow);
        if let Some(suffix) = completion {
            return if allow.contains(Allow::ARRAY) {
                (element_end, Some(suffix + "]"))
            } else {
                (start, None)
            };
        }
        if element_end == current {
            // trailing element cannot be parsed or completed: drop it and
            // close one level up from the previous fully-closed element
            return if allow.contains(Allow::ARRAY) {
                (last_element_end.unwrap_or(start + 1), Some("]".to_string()))
            } else {
                (start, None)
            };
        }
        last_comma = None;
        last_element_end = Some(element_end);
        current = skip_ws(json, element_end);
        if current >= bytes.len() {
            break;
        }
        if bytes[current] == b',' {
            last_comma = Some(current);
            current += 1;
        }
    }
    if allow.contains(Allow::ARRAY) {
        (last_comma.unwrap_or(current), Some("]".to_string()))
    } else {
        (start, None)
    }
}

fn complete_object(json: &str, start: usize, allow: Allow) -> Outcome {
    let bytes = json.as_bytes();
    if bytes.get(start) != Some(&b'{') {
        return (start, None);
    }
    let mut current = start + 1;
    let mut last_comma: Option<usize> = Some(current);
    while current < bytes.len() {
        current = skip_ws(json, current);
        if current >= bytes.len() {
            break;
        }
        if bytes[current] == b'}' {
            return (current + 1, None);
        }
        let (key_end, key_completion) = complete_string(json, current, allow);
        if key_completion.is_some() {
            // cut off mid-key: back out to the start of the pair and close
            return if allow.contains(Allow::OBJECT) {
                (last_comma.unwrap_or(start + 1), Some("}".to_string()))
            } else {
                (start, None)
            };
        }
        current = skip_ws(json, key_end);
        if current >= bytes.len() {
            break;
        }
        if bytes[current] != b':' {
            return (last_comma.unwrap_or(start + 1), None);
        }
        current += 1;
        current = skip_ws(json, current);
        if current >= bytes.len() {
            break;
        }
        let (value_end, completion) = complete_any(json, current, allow);
        if let Some(suffix) = completion {
            return if allow.contains(Allow::OBJECT) {
                (value_end, Some(suffix + "}"))
            } else {
                (start, None)
            };
        }
        if value_end == current {
            return if allow.contains(Allow::OBJECT) {
                (last_comma.unwrap_or(start + 1), Some("}".to_string()))
            } else {
                (start, None)
            };
        }
        if value_end >= bytes.len() {
            last_comma = None;
        }
        current = skip_ws(json, value_end);
        if current >= bytes.len() {
            break;
        }
        if bytes[current] == b',' {
            last_comma = Some(current);
            current += 1;
        }
    }
    if allow.contains(Allow::OBJECT) {
        (last_comma.unwrap_or(current), Some("}".to_string()))
    } else {
        (start, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "")]
    #[case("\"hello\"", "\"hello\"")]
    #[case("\"hello", "\"hello\"")]
    #[case("\"esc\\", "\"esc\"")]
    #[case("\"u\\u00", "\"u\"")]
    #[case("tru", "true")]
    #[case("fals", "false")]
    #[case("nul", "null")]
    #[case("Na", "NaN")]
    #[case("-Inf", "-Infinity")]
    #[case("42", "42")]
    #[case("-12.5e", "-12.5")]
    #[case("3.", "3")]
    #[case("[1, 2]", "[1, 2]")]
    #[case("[1, 2", "[1, 2]")]
    #[case("[1, ", "[1]")]
    #[case("[", "[]")]
    #[case("[\"a\", \"b", "[\"a\", \"b\"]")]
    #[case("[true, fal", "[true, false]")]
    #[case("{", "{}")]
    #[case("{\"a\"", "{}")]
    #[case("{\"a\": ", "{}")]
    #[case("{\"a\": 1", "{\"a\": 1}")]
    #[case("{\"a\": 1, \"b", "{\"a\": 1}")]
    #[case("{\"a\": tru", "{\"a\": true}")]
    #[case("{\"a\": [1, 2, \"x", "{\"a\": [1, 2, \"x\"]}")]
    #[case("{\"a\": [1, {\"b\"", "{\"a\": [1, {}]}")]
    #[case("  ", "")]
    fn test_complete_all_kinds(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(complete(input, Allow::ALL), expected);
    }

    #[rstest]
    #[case("tru", Allow::NULL, "")]
    #[case("nul", Allow::NULL, "null")]
    #[case("\"x", Allow::NUMBER, "")]
    #[case("123", Allow::STRING, "")]
    #[case("123", Allow::NUMBER, "123")]
    fn test_disallowed_kinds_are_not_completed(
        #[case] input: &str,
        #[case] allow: Allow,
        #[case] expected: &str,
    ) {
        assert_eq!(complete(input, allow), expected);
    }

    #[test]
    fn test_disallowed_trailing_element_backtracks() {
        // drop the truncated string and close after the last closed element
        let allow = Allow::ARRAY | Allow::NUMBER;
        assert_eq!(complete("[1, \"x", allow), "[1]");
        assert_eq!(complete("[\"x", allow), "[]");
    }

    #[test]
    fn test_completed_prefixes_parse() {
        let document = r#"{"name": "acme", "points": [{"v": 1.5, "t": "now"}, {"v": 2}]}"#;
        for (end, _) in document.char_indices().skip(1) {
            let completed = complete(&document[..end], Allow::ALL);
            assert!(
                serde_json::from_str::<serde_json::Value>(&completed).is_ok(),
                "prefix {:?} completed to invalid JSON {:?}",
                &document[..end],
                completed
            );
        }
    }

    #[test]
    fn test_garbage_input_terminates() {
        // output validity is only promised for prefixes of valid JSON, but
        // the scan must always terminate
        let _ = complete("[@", Allow::ALL);
        let _ = complete("{@}", Allow::ALL);
        let _ = complete("@@", Allow::ALL);
    }
}
