//! Comment removal.
//!
//! Comments are blanked out before tokenizing rather than lexed as tokens.
//! Every comment byte becomes a space except newlines, which are kept, so
//! offsets and line numbers in the stripped text match the source.

use std::borrow::Cow;

/// Outcome of [`strip_comments`].
pub(crate) struct Stripped<'a> {
    pub text: Cow<'a, str>,
    /// Offset of a `/*` that is never closed.
    pub unterminated: Option<usize>,
}

/// Replace `//` and `/* */` comments with whitespace.
pub(crate) fn strip_comments(source: &str) -> Stripped<'_> {
    let bytes = source.as_bytes();
    if !source.contains("//") && !source.contains("/*") {
        return Stripped {
            text: Cow::Borrowed(source),
            unterminated: None,
        };
    }

    let mut out = Vec::with_capacity(bytes.len());
    let mut unterminated = None;
    let mut i = 0;
    while i < bytes.len() {
        match (bytes[i], bytes.get(i + 1)) {
            (b'/', Some(b'/')) => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    out.push(b' ');
                    i += 1;
                }
            }
            (b'/', Some(b'*')) => {
                let start = i;
                out.extend_from_slice(b"  ");
                i += 2;
                let mut closed = false;
                while i < bytes.len() {
                    if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                        out.extend_from_slice(b"  ");
                        i += 2;
                        closed = true;
                        break;
                    }
                    out.push(if bytes[i] == b'\n' { b'\n' } else { b' ' });
                    i += 1;
                }
                if !closed {
                    unterminated = Some(start);
                }
            }
            (byte, _) => {
                out.push(byte);
                i += 1;
            }
        }
    }

    // Only ASCII bytes were written in place of comment bytes, and every
    // non-comment byte is copied whole, so multi-byte characters survive.
    let text = String::from_utf8(out).map_or_else(
        |err| Cow::Owned(String::from_utf8_lossy(err.as_bytes()).into_owned()),
        Cow::Owned,
    );
    Stripped { text, unterminated }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_no_comments_borrows() {
        let stripped = strip_comments("float x;\n");
        assert!(matches!(stripped.text, Cow::Borrowed(_)));
        assert_eq!(stripped.unterminated, None);
    }

    #[test]
    fn test_line_comment() {
        let stripped = strip_comments("a // b\nc");
        assert_eq!(stripped.text, "a     \nc");
    }

    #[test]
    fn test_block_comment_keeps_newlines() {
        let source = "a /* x\ny */ b";
        let stripped = strip_comments(source);
        assert_eq!(stripped.text, "a     \n     b");
        assert_eq!(stripped.text.len(), source.len());
    }

    #[test]
    fn test_unterminated_block_comment() {
        let stripped = strip_comments("a /* never closed");
        assert_eq!(stripped.unterminated, Some(2));
    }

    #[test]
    fn test_comment_with_unicode() {
        let source = "x // é\ny";
        let stripped = strip_comments(source);
        assert_eq!(stripped.text.len(), source.len());
        assert!(stripped.text.ends_with("\ny"));
    }
}
