use num_enum::TryFromPrimitive;
use strum_macros::Display;

// Order matters: the parser's rule table is indexed by `tokentype as u8`.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, Display)]
#[repr(u8)]
pub enum TokenType {
    // Single-character tokens.
    #[strum(serialize = "(")] LeftParen,
    #[strum(serialize = ")")] RightParen,
    #[strum(serialize = "{")] LeftBrace,
    #[strum(serialize = "}")] RightBrace,
    #[strum(serialize = "[")] LeftBracket,
    #[strum(serialize = "]")] RightBracket,
    #[strum(serialize = ",")] Comma,
    #[strum(serialize = ";")] Semicolon,
    #[strum(serialize = "+")] Plus,
    #[strum(serialize = "-")] Minus,
    #[strum(serialize = "*")] Star,
    #[strum(serialize = "/")] Slash,
    #[strum(serialize = "<")] Less,
    #[strum(serialize = ">")] Greater,

    // One or two character tokens.
    #[strum(serialize = "!")] Bang,
    #[strum(serialize = "!=")] BangEqual,
    #[strum(serialize = "=")] Equal,
    #[strum(serialize = "==")] EqualEqual,

    // Literals.
    #[strum(serialize = "IDENT")] Identifier,
    #[strum(serialize = "INT")] Integer,
    #[strum(serialize = "STRING")] String,

    // Keywords.
    #[strum(serialize = "FUNCTION")] Fn,
    #[strum(serialize = "LET")] Let,
    #[strum(serialize = "TRUE")] True,
    #[strum(serialize = "FALSE")] False,
    #[strum(serialize = "IF")] If,
    #[strum(serialize = "ELSE")] Else,
    #[strum(serialize = "RETURN")] Return,

    #[strum(serialize = "EOF")] EOF,
    #[strum(serialize = "ILLEGAL")] Illegal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub tokentype: TokenType,
    pub literal: String,
}

#[cfg(test)]
mod token_tests {
    use crate::token::TokenType;

    #[test]
    fn operators_render_as_source_text() {
        assert_eq!(format!("{}", TokenType::EqualEqual), "==");
        assert_eq!(format!("{}", TokenType::BangEqual), "!=");
        assert_eq!(format!("{}", TokenType::Plus), "+");
        assert_eq!(format!("{}", TokenType::LeftBracket), "[");
    }

    #[test]
    fn named_kinds_render_uppercase() {
        assert_eq!(format!("{}", TokenType::Identifier), "IDENT");
        assert_eq!(format!("{}", TokenType::Integer), "INT");
        assert_eq!(format!("{}", TokenType::Fn), "FUNCTION");
        assert_eq!(format!("{}", TokenType::Illegal), "ILLEGAL");
    }
}
