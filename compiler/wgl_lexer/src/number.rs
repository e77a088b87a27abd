//! Numeric literal parsing for pp-number tokens.
//!
//! Accepted forms:
//! - decimal `[1-9][0-9]*`, octal `0[0-7]*`, hex `0[xX][0-9a-fA-F]+`, each
//!   with an optional `u`/`U` suffix
//! - floats `1.`, `.5`, `1.5`, `1e3`, `1.5e-3`, with an optional `f`/`F` suffix

use wgl_ir::TokenKind;

/// Parse pp-number text into a literal token, `None` when malformed.
pub(crate) fn parse_number(text: &str) -> Option<TokenKind> {
    let bytes = text.as_bytes();
    let is_hex = bytes.len() > 1 && bytes[0] == b'0' && matches!(bytes[1], b'x' | b'X');
    if !is_hex && text.contains(['.', 'e', 'E']) {
        return parse_float(text);
    }
    parse_int(text, is_hex)
}

fn parse_float(text: &str) -> Option<TokenKind> {
    let body = text
        .strip_suffix('f')
        .or_else(|| text.strip_suffix('F'))
        .unwrap_or(text);
    let valid_chars = body
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !valid_chars {
        return None;
    }
    let value: f64 = body.parse().ok()?;
    value.is_finite().then(|| TokenKind::float(value))
}

fn parse_int(text: &str, is_hex: bool) -> Option<TokenKind> {
    let (digits, unsigned) = match text.strip_suffix(['u', 'U']) {
        Some(digits) => (digits, true),
        None => (text, false),
    };
    let (digits, radix) = if is_hex {
        (&digits[2..], 16)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (&digits[1..], 8)
    } else {
        (digits, 10)
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let value = u32::from_str_radix(digits, radix).ok()?;
    if unsigned {
        return Some(TokenKind::UInt(value));
    }
    if radix == 10 {
        i32::try_from(value).ok().map(TokenKind::Int)
    } else {
        // Hex and octal literals may spell any 32-bit pattern.
        Some(TokenKind::Int(i32::from_ne_bytes(value.to_ne_bytes())))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(parse_number("0"), Some(TokenKind::Int(0)));
        assert_eq!(parse_number("42"), Some(TokenKind::Int(42)));
        assert_eq!(parse_number("017"), Some(TokenKind::Int(15)));
        assert_eq!(parse_number("0x1F"), Some(TokenKind::Int(31)));
        assert_eq!(parse_number("0xFFFFFFFF"), Some(TokenKind::Int(-1)));
        assert_eq!(parse_number("7u"), Some(TokenKind::UInt(7)));
    }

    #[test]
    fn test_floats() {
        assert_eq!(parse_number("1.5"), Some(TokenKind::float(1.5)));
        assert_eq!(parse_number("1."), Some(TokenKind::float(1.0)));
        assert_eq!(parse_number(".25"), Some(TokenKind::float(0.25)));
        assert_eq!(parse_number("2e3"), Some(TokenKind::float(2000.0)));
        assert_eq!(parse_number("1.5e-1f"), Some(TokenKind::float(0.15)));
    }

    #[test]
    fn test_malformed() {
        assert_eq!(parse_number("08"), None);
        assert_eq!(parse_number("0x"), None);
        assert_eq!(parse_number("1.0e"), None);
        assert_eq!(parse_number("1.0.0"), None);
        assert_eq!(parse_number("12abc"), None);
        assert_eq!(parse_number("2147483648"), None);
        assert_eq!(parse_number("1e999"), None);
    }
}
