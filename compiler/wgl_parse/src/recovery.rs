//! Error recovery for the parser.
//!
//! After an error the parser skips to a synchronization point and carries on,
//! so one bad statement does not hide the errors after it.

use wgl_ir::TokenKind;

use crate::cursor::Cursor;

/// Where to resume after a parse error.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum RecoverySet {
    /// Inside a compound statement: resume after the next `;`, or before the
    /// `}` that closes the enclosing block.
    Statement,
    /// At file scope: resume after the next `;` or `}`.
    Declaration,
}

/// Skip tokens until the recovery point. Returns `false` if `Eof` was reached.
pub fn synchronize(cursor: &mut Cursor<'_>, recovery: RecoverySet) -> bool {
    let mut depth = 0usize;
    while !cursor.is_at_end() {
        match cursor.current_kind() {
            TokenKind::LBrace => depth += 1,
            TokenKind::RBrace if depth > 0 => depth -= 1,
            TokenKind::RBrace => {
                if recovery == RecoverySet::Declaration {
                    cursor.advance();
                }
                return true;
            }
            TokenKind::Semicolon if depth == 0 => {
                cursor.advance();
                return true;
            }
            _ => {}
        }
        cursor.advance();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wgl_ir::{Span, Token, TokenList};

    fn list(kinds: &[TokenKind]) -> TokenList {
        let mut list = TokenList::new();
        for kind in kinds {
            list.push(Token::new(*kind, Span::DUMMY));
        }
        list.push(Token::new(TokenKind::Eof, Span::DUMMY));
        list
    }

    #[test]
    fn test_statement_stops_after_semicolon() {
        let tokens = list(&[TokenKind::Comma, TokenKind::Semicolon, TokenKind::Return]);
        let mut cursor = Cursor::new(&tokens);
        assert!(synchronize(&mut cursor, RecoverySet::Statement));
        assert_eq!(cursor.current_kind(), TokenKind::Return);
    }

    #[test]
    fn test_statement_stops_before_closing_brace() {
        let tokens = list(&[TokenKind::Comma, TokenKind::RBrace]);
        let mut cursor = Cursor::new(&tokens);
        assert!(synchronize(&mut cursor, RecoverySet::Statement));
        assert_eq!(cursor.current_kind(), TokenKind::RBrace);
    }

    #[test]
    fn test_declaration_skips_nested_blocks() {
        let tokens = list(&[
            TokenKind::LBrace,
            TokenKind::Semicolon,
            TokenKind::RBrace,
            TokenKind::RBrace,
            TokenKind::Struct,
        ]);
        let mut cursor = Cursor::new(&tokens);
        assert!(synchronize(&mut cursor, RecoverySet::Declaration));
        assert_eq!(cursor.current_kind(), TokenKind::Struct);
    }

    #[test]
    fn test_reports_eof() {
        let tokens = list(&[TokenKind::Comma]);
        let mut cursor = Cursor::new(&tokens);
        assert!(!synchronize(&mut cursor, RecoverySet::Statement));
    }
}
