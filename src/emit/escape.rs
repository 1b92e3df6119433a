//! Literal escaping for emitted Rust source.
//!
//! Payloads become byte-string literals, names become string literals. The
//! escaping is minimal and fixed so identical inputs always emit identical
//! bytes.

use std::fmt::Write;

/// Render bytes as a Rust byte-string literal (`b"..."`).
///
/// Printable ASCII passes through; everything else is `\xNN` (plus the
/// usual short escapes), keeping text assets readable in the output.
pub fn byte_string_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 3);
    out.push_str("b\"");
    for &b in bytes {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\x{b:02x}");
            }
        }
    }
    out.push('"');
    out
}

/// Render a name as a Rust string literal.
pub fn str_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_string_literal_printable() {
        assert_eq!(byte_string_literal(b"abc 123"), r#"b"abc 123""#);
    }

    #[test]
    fn test_byte_string_literal_escapes() {
        assert_eq!(
            byte_string_literal(b"a\"b\\c\nd"),
            r#"b"a\"b\\c\nd""#
        );
        assert_eq!(byte_string_literal(&[0x1f, 0x8b, 0x00]), r#"b"\x1f\x8b\x00""#);
    }

    #[test]
    fn test_str_literal() {
        assert_eq!(str_literal("in/file name"), r#""in/file name""#);
        assert_eq!(str_literal(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(str_literal(r"back\slash"), r#""back\\slash""#);
    }

    #[test]
    fn test_literals_are_deterministic() {
        let bytes = [0u8, 255, 64, 10];
        assert_eq!(byte_string_literal(&bytes), byte_string_literal(&bytes));
    }
}
