use crate::token::{Token, TokenType};
use phf::phf_map;
use std::iter::Peekable;
use std::str::CharIndices;

// Note: current becomes self.iter.peek()?.0
pub struct Lexer<'a> {
    source: &'a str,
    iter: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Lexer<'a> {
        Lexer {
            source,
            iter: source.char_indices().peekable(),
        }
    }

    // Returns EOF forever once the source is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let (start, c) = match self.iter.next() {
            None => {
                return Token {
                    tokentype: TokenType::EOF,
                    literal: String::new(),
                }
            }
            Some(x) => x,
        };
        match c {
            '(' => self.token(TokenType::LeftParen, start),
            ')' => self.token(TokenType::RightParen, start),
            '{' => self.token(TokenType::LeftBrace, start),
            '}' => self.token(TokenType::RightBrace, start),
            '[' => self.token(TokenType::LeftBracket, start),
            ']' => self.token(TokenType::RightBracket, start),
            ',' => self.token(TokenType::Comma, start),
            ';' => self.token(TokenType::Semicolon, start),
            '+' => self.token(TokenType::Plus, start),
            '-' => self.token(TokenType::Minus, start),
            '*' => self.token(TokenType::Star, start),
            '/' => self.token(TokenType::Slash, start),
            '<' => self.token(TokenType::Less, start),
            '>' => self.token(TokenType::Greater, start),
            '=' => {
                if self.next_if('=') {
                    self.token(TokenType::EqualEqual, start)
                } else {
                    self.token(TokenType::Equal, start)
                }
            }
            '!' => {
                if self.next_if('=') {
                    self.token(TokenType::BangEqual, start)
                } else {
                    self.token(TokenType::Bang, start)
                }
            }
            '"' => self.string(start),
            '0'..='9' => self.number(start),
            'a'..='z' | 'A'..='Z' | '_' => self.identifier(start),
            _ => self.token(TokenType::Illegal, start),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some((_, c)) = self.iter.peek() {
            match c {
                ' ' | '\t' | '\n' | '\r' => {
                    self.iter.next();
                }
                _ => break,
            }
        }
    }

    fn current(&mut self) -> usize {
        match self.iter.peek() {
            None => self.source.len(),
            Some((idx, _)) => *idx,
        }
    }

    fn token(&mut self, tokentype: TokenType, start: usize) -> Token {
        let current = self.current();
        Token {
            tokentype,
            literal: self.source[start..current].to_string(),
        }
    }

    fn next_if(&mut self, expected: char) -> bool {
        if let Some((_, c)) = self.iter.peek() {
            if *c == expected {
                self.iter.next();
                return true;
            }
        }
        false
    }

    fn identifier(&mut self, start: usize) -> Token {
        while let Some((_, c)) = self.iter.peek() {
            match c {
                'a'..='z' | 'A'..='Z' | '_' => {
                    self.iter.next();
                }
                _ => break,
            }
        }
        let current = self.current();
        let text = &self.source[start..current];
        match KEYWORDS.get(text) {
            Some(keyword) => Token {
                tokentype: *keyword,
                literal: text.to_string(),
            },
            None => Token {
                tokentype: TokenType::Identifier,
                literal: text.to_string(),
            },
        }
    }

    fn number(&mut self, start: usize) -> Token {
        while let Some((_, c)) = self.iter.peek() {
            match c {
                '0'..='9' => {
                    self.iter.next();
                }
                _ => break,
            }
        }
        self.token(TokenType::Integer, start)
    }

    // No escape sequences; an unterminated string takes the rest of the input.
    fn string(&mut self, start: usize) -> Token {
        while let Some((_, c)) = self.iter.peek() {
            match c {
                '"' => break,
                _ => {
                    self.iter.next();
                }
            }
        }
        let end = self.current();
        self.next_if('"');
        Token {
            tokentype: TokenType::String,
            literal: self.source[start + 1..end].to_string(),
        }
    }
}

static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "fn" => TokenType::Fn,
    "let" => TokenType::Let,
    "true" => TokenType::True,
    "false" => TokenType::False,
    "if" => TokenType::If,
    "else" => TokenType::Else,
    "return" => TokenType::Return,
};
