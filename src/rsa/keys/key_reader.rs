use std::collections::HashMap;
use std::mem;

use lazy_static::lazy_static;
use num_bigint::BigUint;
use num_traits::Zero;
use regex::Regex;

use crate::rsa::keys::{KeyError, RsaKey};

lazy_static! {
    /// `name:` optionally followed by an inline decimal value. Only the
    /// leading decimal run counts, so `publicExponent: 65537 (0x10001)`
    /// yields 65537.
    static ref FIELD_HEADER: Regex = Regex::new(r"^(?P<name>[^: \t]+):(\s*(?P<value>\d+))?").unwrap();
    /// Trimmed body of a continuation line: colon-separated hex bytes.
    static ref HEX_RUN: Regex = Regex::new(r"^[0-9A-Fa-f:]+$").unwrap();
}

/// Scanner state for the header / continuation line format.
enum ScanState {
    AwaitingHeader,
    Accumulating { name: String, buf: String, line: usize },
}

/// Parse a textual key dump (openssl `-text` style) into the
/// (modulus, publicExponent, privateExponent) triple.
pub fn parse_key_dump(text: &str) -> Result<RsaKey, KeyError> {
    let mut fields: HashMap<String, BigUint> = HashMap::new();
    let mut state = ScanState::AwaitingHeader;
    let mut seen_header = false;

    for (idx, raw) in text.lines().enumerate() {
        let lineno = idx + 1;
        if let Some(caps) = FIELD_HEADER.captures(raw) {
            seen_header = true;
            // The Private-Key banner is skipped without disturbing an
            // open field.
            if &caps["name"] == "Private-Key" {
                continue;
            }
            if let ScanState::Accumulating { name, buf, line } =
                mem::replace(&mut state, ScanState::AwaitingHeader)
            {
                fields.insert(name, hex_tokens_to_int(&buf, line)?);
            }
            let name = caps["name"].to_string();
            match caps.name("value") {
                Some(value) => {
                    let value = value.as_str().parse::<BigUint>().map_err(|e| {
                        KeyError::MalformedInput {
                            line: lineno,
                            reason: format!("bad decimal value: {}", e),
                        }
                    })?;
                    fields.insert(name, value);
                }
                None => {
                    state = ScanState::Accumulating {
                        name,
                        buf: String::new(),
                        line: lineno,
                    }
                }
            }
        } else if is_continuation(raw) {
            let body = raw.trim();
            if !HEX_RUN.is_match(body) {
                return Err(KeyError::MalformedInput {
                    line: lineno,
                    reason: format!("invalid hex digits in `{}'", body),
                });
            }
            match &mut state {
                ScanState::Accumulating { buf, .. } => buf.push_str(body),
                ScanState::AwaitingHeader => {
                    if !seen_header {
                        return Err(KeyError::MalformedInput {
                            line: lineno,
                            reason: "continuation data before any field header".to_string(),
                        });
                    }
                    // Orphan line after an inline-valued field, ignored.
                }
            }
        }
        // Anything else (blank lines, unindented prose) is ignored.
    }

    if let ScanState::Accumulating { name, buf, line } = state {
        fields.insert(name, hex_tokens_to_int(&buf, line)?);
    }

    Ok(RsaKey {
        n: fields
            .remove("modulus")
            .ok_or(KeyError::MissingField("modulus"))?,
        e: fields
            .remove("publicExponent")
            .ok_or(KeyError::MissingField("publicExponent"))?,
        d: fields
            .remove("privateExponent")
            .ok_or(KeyError::MissingField("privateExponent"))?,
    })
}

fn is_continuation(line: &str) -> bool {
    line.chars().next().map_or(false, |c| c.is_whitespace()) && !line.trim().is_empty()
}

/// Split accumulated continuation text on `:`, drop leading zero
/// tokens, and parse the remainder as one big-endian hex integer.
fn hex_tokens_to_int(raw: &str, line: usize) -> Result<BigUint, KeyError> {
    let tokens: Vec<&str> = raw.split(':').collect();
    let mut first = 0;
    while first < tokens.len() && (tokens[first] == "00" || tokens[first] == "0") {
        first += 1;
    }
    let joined: String = tokens[first..].concat();
    if joined.is_empty() {
        return Ok(BigUint::zero());
    }
    BigUint::parse_bytes(joined.as_bytes(), 16).ok_or_else(|| KeyError::MalformedInput {
        line,
        reason: "invalid hex digits in field value".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_DUMP: &str = "\
Private-Key: (64 bit)
modulus:
    00:e3:b0:c4:42:98:fc:1c:15
publicExponent: 65537 (0x10001)
privateExponent:
    0d:ea:db:ee:f0:12:34:01
";

    fn hex(s: &str) -> BigUint {
        BigUint::parse_bytes(s.as_bytes(), 16).unwrap()
    }

    #[test]
    fn parses_sample_dump() {
        let key = parse_key_dump(SAMPLE_DUMP).unwrap();
        assert_eq!(key.n, hex("e3b0c44298fc1c15"));
        assert_eq!(key.e, BigUint::from(65537u32));
        assert_eq!(key.d, hex("0deadbeef0123401"));
    }

    #[test]
    fn leading_zero_tokens_are_stripped() {
        let plain = "\
modulus:
    c0:ff:ee
publicExponent: 3
privateExponent: 7
";
        let padded = "\
modulus:
    00:00:0:c0:ff:ee
publicExponent: 3
privateExponent: 7
";
        let a = parse_key_dump(plain).unwrap();
        let b = parse_key_dump(padded).unwrap();
        assert_eq!(a.n, hex("c0ffee"));
        assert_eq!(a, b);
    }

    #[test]
    fn inline_decimal_consumes_no_continuation() {
        // A hex line following an inline-valued field is an orphan; the
        // field keeps its decimal value and the orphan is dropped.
        let dump = "\
publicExponent: 65537 (0x10001)
    ab:cd
modulus:
    12:34
privateExponent: 1
";
        let key = parse_key_dump(dump).unwrap();
        assert_eq!(key.e, BigUint::from(65537u32));
        assert_eq!(key.n, hex("1234"));
    }

    #[test]
    fn value_wraps_across_lines() {
        let dump = "\
modulus:
    00:c3:a1:
    5e:77
publicExponent: 17
privateExponent: 5
";
        let key = parse_key_dump(dump).unwrap();
        assert_eq!(key.n, hex("c3a15e77"));
    }

    #[test]
    fn private_key_banner_does_not_close_open_field() {
        let dump = "\
modulus:
    12:34
Private-Key: (64 bit)
    56:78
publicExponent: 3
privateExponent: 7
";
        let key = parse_key_dump(dump).unwrap();
        assert_eq!(key.n, hex("12345678"));
    }

    #[test]
    fn missing_field_is_reported_by_name() {
        let dump = "\
modulus:
    12:34
publicExponent: 65537
";
        assert_eq!(
            parse_key_dump(dump),
            Err(KeyError::MissingField("privateExponent"))
        );
        assert_eq!(parse_key_dump(""), Err(KeyError::MissingField("modulus")));
    }

    #[test]
    fn continuation_before_header_is_malformed() {
        let err = parse_key_dump("    ab:cd\nmodulus: 3\n").unwrap_err();
        match err {
            KeyError::MalformedInput { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn non_hex_continuation_is_malformed() {
        let dump = "\
modulus:
    zz:yy
publicExponent: 3
privateExponent: 7
";
        let err = parse_key_dump(dump).unwrap_err();
        match err {
            KeyError::MalformedInput { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn all_zero_tokens_parse_to_zero() {
        let dump = "\
modulus:
    00:00
publicExponent: 3
privateExponent: 7
";
        let key = parse_key_dump(dump).unwrap();
        assert_eq!(key.n, BigUint::zero());
    }
}
