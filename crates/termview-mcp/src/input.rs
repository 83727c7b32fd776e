//! Input unescaping for the write tool.
//!
//! Callers send input as text; literal two-character escapes are
//! translated to their control-byte equivalents before reaching the
//! PTY, so a client can say `"ls\r"` without embedding raw bytes in
//! JSON.

/// Translate literal escapes in caller-supplied text to control bytes.
///
/// Recognized: `\r`, `\n`, `\t`, `\e`, `\\`, and `\xHH` hex escapes.
/// Malformed `\x` sequences and unknown escapes pass through unchanged;
/// they are not an error at this layer.
pub fn unescape(input: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut buf = [0u8; 4];
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }

        match chars.peek() {
            Some('r') => {
                chars.next();
                out.push(b'\r');
            }
            Some('n') => {
                chars.next();
                out.push(b'\n');
            }
            Some('t') => {
                chars.next();
                out.push(b'\t');
            }
            Some('e') => {
                chars.next();
                out.push(0x1b);
            }
            Some('\\') => {
                chars.next();
                out.push(b'\\');
            }
            Some('x') => {
                // Consume only when both hex digits are present.
                let mut ahead = chars.clone();
                ahead.next();
                let hi = ahead.next().and_then(|c| c.to_digit(16));
                let lo = ahead.next().and_then(|c| c.to_digit(16));
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        chars = ahead;
                        out.push((hi * 16 + lo) as u8);
                    }
                    _ => out.push(b'\\'),
                }
            }
            _ => out.push(b'\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(unescape("ls -la"), b"ls -la");
    }

    #[test]
    fn test_control_escapes() {
        assert_eq!(unescape("a\\rb\\nc\\td"), b"a\rb\nc\td");
    }

    #[test]
    fn test_escape_key() {
        assert_eq!(unescape("\\e[A"), b"\x1b[A");
    }

    #[test]
    fn test_hex_escapes() {
        assert_eq!(unescape("\\x03"), b"\x03");
        assert_eq!(unescape("\\x1b[2J"), b"\x1b[2J");
        assert_eq!(unescape("\\xFF"), [0xff]);
    }

    #[test]
    fn test_malformed_hex_left_untouched() {
        assert_eq!(unescape("\\x"), b"\\x");
        assert_eq!(unescape("\\xZ9"), b"\\xZ9");
        assert_eq!(unescape("\\x4"), b"\\x4");
    }

    #[test]
    fn test_unknown_escape_left_untouched() {
        assert_eq!(unescape("\\q"), b"\\q");
    }

    #[test]
    fn test_double_backslash() {
        assert_eq!(unescape("a\\\\n"), b"a\\n");
    }

    #[test]
    fn test_unicode_passes_through() {
        assert_eq!(unescape("héllo"), "héllo".as_bytes());
    }

    #[test]
    fn test_trailing_backslash() {
        assert_eq!(unescape("abc\\"), b"abc\\");
    }
}
