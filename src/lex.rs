use std::fmt::Display;

use miette::{Diagnostic, Error, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
#[error("Unexpected token '{token}'")]
#[diagnostic(help("symbols may only contain letters, digits and `_+-*/\\=<>!&`"))]
pub struct SingleTokenError {
    #[source_code]
    src: NamedSource<String>,

    #[label("this character")]
    bad_bit: SourceSpan,

    pub token: char,
}

impl SingleTokenError {
    pub fn line(&self) -> usize {
        self.src.inner()[..=self.bad_bit.offset()].lines().count()
    }
}

#[derive(Error, Debug, Diagnostic)]
#[error("Unexpected end of input")]
#[diagnostic(help(
    "The input ended unexpectedly, possibly due to a missing closing brace or parenthesis."
))]
pub struct Eof {
    #[source_code]
    src: NamedSource<String>,

    #[label("closing delimiter expected here")]
    bad_line: SourceSpan,

    pub expected: char,
}

impl Eof {
    pub fn build(lexer: &Lexer<'_>, expected: char) -> Self {
        Eof {
            src: lexer.named_source(),
            bad_line: SourceSpan::from(lexer.whole.len()..lexer.whole.len()),
            expected,
        }
    }

    pub fn line(&self) -> usize {
        self.src.inner().lines().count().max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'de> {
    pub kind: TokenKind,
    pub literal: &'de str,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Number,
    Symbol,
}

impl TokenKind {
    /// The closing token matching an opening bracket.
    pub fn terminator(self) -> Option<TokenKind> {
        match self {
            TokenKind::LeftParen => Some(TokenKind::RightParen),
            TokenKind::LeftBrace => Some(TokenKind::RightBrace),
            _ => None,
        }
    }

    pub fn as_char(self) -> Option<char> {
        match self {
            TokenKind::LeftParen => Some('('),
            TokenKind::RightParen => Some(')'),
            TokenKind::LeftBrace => Some('{'),
            TokenKind::RightBrace => Some('}'),
            TokenKind::Number | TokenKind::Symbol => None,
        }
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self.literal;
        match self.kind {
            TokenKind::LeftParen => write!(f, "LEFT_PAREN {lit}"),
            TokenKind::RightParen => write!(f, "RIGHT_PAREN {lit}"),
            TokenKind::LeftBrace => write!(f, "LEFT_BRACE {lit}"),
            TokenKind::RightBrace => write!(f, "RIGHT_BRACE {lit}"),
            TokenKind::Number => write!(f, "NUMBER {lit}"),
            TokenKind::Symbol => write!(f, "SYMBOL {lit}"),
        }
    }
}

pub fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '_' | '+' | '-' | '*' | '/' | '\\' | '=' | '<' | '>' | '!' | '&'
        )
}

pub struct Lexer<'de> {
    filename: Option<&'de str>,
    whole: &'de str,
    rest: &'de str,
    pub byte: usize,
    peeked: Option<Result<Token<'de>, Error>>,
}

impl<'de> Lexer<'de> {
    pub fn new(filename: Option<&'de str>, input: &'de str) -> Self {
        Lexer {
            filename,
            whole: input,
            rest: input,
            byte: 0,
            peeked: None,
        }
    }

    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.filename.unwrap_or("<stdin>"), self.whole.to_string())
    }

    pub fn peek(&mut self) -> Option<&Result<Token<'de>, Error>> {
        if self.peeked.is_some() {
            return self.peeked.as_ref();
        }
        self.peeked = self.next();
        self.peeked.as_ref()
    }
}

impl<'de> Iterator for Lexer<'de> {
    type Item = Result<Token<'de>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(peeked) = self.peeked.take() {
            return Some(peeked);
        }
        loop {
            let mut chars = self.rest.chars();
            let c = chars.next()?;
            let offset = self.byte;
            let literal = &self.rest[..c.len_utf8()];
            let cur = self.rest;
            self.rest = chars.as_str();
            self.byte += c.len_utf8();

            enum Start {
                Number,
                Symbol,
            }

            let process = |kind: TokenKind| {
                Some(Ok(Token {
                    kind,
                    literal,
                    offset,
                }))
            };

            let started = match c {
                '(' => return process(TokenKind::LeftParen),
                ')' => return process(TokenKind::RightParen),
                '{' => return process(TokenKind::LeftBrace),
                '}' => return process(TokenKind::RightBrace),
                '0'..='9' => Start::Number,
                '-' if self.rest.starts_with(|c: char| c.is_ascii_digit()) => Start::Number,
                c if is_symbol_char(c) => Start::Symbol,
                ' ' | '\r' | '\t' | '\n' => continue, // Skip whitespace
                c => {
                    return Some(Err(SingleTokenError {
                        src: self.named_source(),
                        bad_bit: SourceSpan::from(offset..self.byte),
                        token: c,
                    }
                    .into()));
                }
            };

            let end = match started {
                // the sign, if any, is already consumed: scan digits after it
                Start::Number => {
                    c.len_utf8()
                        + self
                            .rest
                            .find(|c: char| !c.is_ascii_digit())
                            .unwrap_or(self.rest.len())
                }
                Start::Symbol => cur.find(|c| !is_symbol_char(c)).unwrap_or(cur.len()),
            };

            let literal = &cur[..end];
            let extra_bytes = literal.len() - c.len_utf8();
            self.byte += extra_bytes;
            self.rest = &self.rest[extra_bytes..];

            let kind = match started {
                Start::Number => TokenKind::Number,
                Start::Symbol => TokenKind::Symbol,
            };

            return Some(Ok(Token {
                kind,
                literal,
                offset,
            }));
        }
    }
}
