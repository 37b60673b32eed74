use std::fmt::Display;

use miette::{Diagnostic, Error, NamedSource, SourceSpan};
use thiserror::Error;

use crate::{
    Lexer,
    lex::{Eof, Token, TokenKind},
};

#[derive(Error, Debug, Diagnostic)]
#[error("expected one or more expressions")]
#[diagnostic(help("enter a number, a symbol, or a bracketed expression"))]
pub struct EmptyInput {
    #[source_code]
    src: NamedSource<String>,

    #[label("nothing to evaluate")]
    at: SourceSpan,
}

#[derive(Error, Debug, Diagnostic)]
#[error("unexpected closing delimiter `{found}`")]
pub struct UnexpectedDelimiter {
    #[source_code]
    src: NamedSource<String>,

    #[label("this delimiter")]
    bad_bit: SourceSpan,

    pub found: char,

    #[help]
    help: Option<String>,
}

/// Grammar rule a node was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Root,
    Number,
    Symbol,
    SExpr,
    QExpr,
    /// A bracket token kept from the source text.
    Delimiter,
    /// Zero-width start/end of input marker around the root's children.
    Anchor,
}

impl Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tag::Root => write!(f, ">"),
            Tag::Number => write!(f, "number"),
            Tag::Symbol => write!(f, "symbol"),
            Tag::SExpr => write!(f, "sexpr"),
            Tag::QExpr => write!(f, "qexpr"),
            Tag::Delimiter => write!(f, "char"),
            Tag::Anchor => write!(f, "anchor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ast<'de> {
    pub tag: Tag,
    pub contents: &'de str,
    pub offset: usize,
    pub children: Vec<Ast<'de>>,
}

impl<'de> Ast<'de> {
    pub fn leaf(tag: Tag, contents: &'de str, offset: usize) -> Self {
        Ast {
            tag,
            contents,
            offset,
            children: Vec::new(),
        }
    }

    fn from_token(tag: Tag, token: Token<'de>) -> Self {
        Ast::leaf(tag, token.literal, token.offset)
    }

    /// Pure syntax with no value of its own: brackets and anchors.
    pub fn is_syntax(&self) -> bool {
        matches!(self.tag, Tag::Delimiter | Tag::Anchor)
    }

    fn fmt_indented(&self, f: &mut std::fmt::Formatter<'_>, depth: usize) -> std::fmt::Result {
        let indent = "  ".repeat(depth);
        if self.children.is_empty() && self.tag != Tag::Root {
            writeln!(f, "{indent}{}: '{}'", self.tag, self.contents)?;
        } else {
            writeln!(f, "{indent}{}", self.tag)?;
        }
        for child in &self.children {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl Display for Ast<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_indented(f, 0)
    }
}

pub struct Parser<'de> {
    whole: &'de str,
    lexer: Lexer<'de>,
}

impl<'de> Parser<'de> {
    pub fn new(filename: Option<&'de str>, whole: &'de str) -> Self {
        Parser {
            whole,
            lexer: Lexer::new(filename, whole),
        }
    }

    /// Parses a whole line: one or more expressions anchored at both ends.
    pub fn parse(mut self) -> Result<Ast<'de>, Error> {
        let mut children = vec![Ast::leaf(Tag::Anchor, "", 0)];
        while self.lexer.peek().is_some() {
            children.push(self.parse_expr()?);
        }

        if children.len() == 1 {
            return Err(EmptyInput {
                src: self.lexer.named_source(),
                at: SourceSpan::from(self.whole.len()..self.whole.len()),
            }
            .into());
        }

        children.push(Ast::leaf(Tag::Anchor, "", self.whole.len()));
        Ok(Ast {
            tag: Tag::Root,
            contents: "",
            offset: 0,
            children,
        })
    }

    fn parse_expr(&mut self) -> Result<Ast<'de>, Error> {
        let token = match self.lexer.next() {
            Some(Ok(token)) => token,
            Some(Err(e)) => return Err(e),
            None => return Err(Eof::build(&self.lexer, ')').into()),
        };

        match token.kind {
            TokenKind::Number => Ok(Ast::from_token(Tag::Number, token)),
            TokenKind::Symbol => Ok(Ast::from_token(Tag::Symbol, token)),
            TokenKind::LeftParen | TokenKind::LeftBrace => self.parse_list(token),
            TokenKind::RightParen | TokenKind::RightBrace => {
                Err(self.unexpected_delimiter(token, None).into())
            }
        }
    }

    fn parse_list(&mut self, open: Token<'de>) -> Result<Ast<'de>, Error> {
        let (tag, terminator) = match open.kind {
            TokenKind::LeftParen => (Tag::SExpr, TokenKind::RightParen),
            _ => (Tag::QExpr, TokenKind::RightBrace),
        };

        let mut children = vec![Ast::from_token(Tag::Delimiter, open)];
        loop {
            let next = self.lexer.peek().map(|token| token.as_ref().ok().copied());
            match next {
                None => {
                    let expected = terminator.as_char().unwrap_or(')');
                    return Err(Eof::build(&self.lexer, expected).into());
                }
                Some(Some(token)) if token.kind == terminator => {
                    self.lexer.next();
                    children.push(Ast::from_token(Tag::Delimiter, token));
                    break;
                }
                Some(Some(token))
                    if matches!(token.kind, TokenKind::RightParen | TokenKind::RightBrace) =>
                {
                    return Err(self.unexpected_delimiter(token, Some(open)).into());
                }
                Some(_) => children.push(self.parse_expr()?),
            }
        }

        Ok(Ast {
            tag,
            contents: "",
            offset: open.offset,
            children,
        })
    }

    fn unexpected_delimiter(
        &self,
        token: Token<'de>,
        open: Option<Token<'de>>,
    ) -> UnexpectedDelimiter {
        let help = open.and_then(|open| {
            let close = open.kind.terminator()?.as_char()?;
            Some(format!(
                "`{}` opened at byte {} must be closed with `{close}`",
                open.literal, open.offset
            ))
        });
        UnexpectedDelimiter {
            src: self.lexer.named_source(),
            bad_bit: SourceSpan::from(token.offset..token.offset + token.literal.len()),
            found: token.literal.chars().next().unwrap_or(')'),
            help,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn tags(ast: &Ast<'_>) -> Vec<Tag> {
        ast.children.iter().map(|child| child.tag).collect()
    }

    #[test]
    fn root_is_anchored() {
        let ast = Parser::new(None, "+ 1 2").parse().expect("parses");
        assert_eq!(ast.tag, Tag::Root);
        assert_eq!(
            tags(&ast),
            vec![Tag::Anchor, Tag::Symbol, Tag::Number, Tag::Number, Tag::Anchor]
        );
    }

    #[test]
    fn nested_lists_keep_delimiters() {
        let ast = Parser::new(None, "(head {1 (2)})").parse().expect("parses");
        let sexpr = &ast.children[1];
        assert_eq!(sexpr.tag, Tag::SExpr);
        assert_eq!(
            tags(sexpr),
            vec![Tag::Delimiter, Tag::Symbol, Tag::QExpr, Tag::Delimiter]
        );
        let qexpr = &sexpr.children[2];
        assert_eq!(qexpr.children[0].contents, "{");
        assert_eq!(qexpr.children[3].contents, "}");
        assert_eq!(qexpr.children[2].tag, Tag::SExpr);
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = Parser::new(None, "   ").parse().expect_err("nothing to parse");
        assert!(err.downcast_ref::<EmptyInput>().is_some());
    }

    #[test]
    fn empty_brackets_are_fine() {
        let ast = Parser::new(None, "() {}").parse().expect("parses");
        assert_eq!(
            tags(&ast),
            vec![Tag::Anchor, Tag::SExpr, Tag::QExpr, Tag::Anchor]
        );
    }

    #[test]
    fn unclosed_list() {
        let err = Parser::new(None, "(+ 1 {2").parse().expect_err("unclosed");
        let eof = err.downcast_ref::<Eof>().expect("eof");
        assert_eq!(eof.expected, '}');
        assert_eq!(eof.line(), 1);
    }

    #[test]
    fn stray_closing_delimiter() {
        let err = Parser::new(None, "1 )").parse().expect_err("stray");
        let err = err
            .downcast_ref::<UnexpectedDelimiter>()
            .expect("unexpected delimiter");
        assert_eq!(err.found, ')');
    }

    #[test]
    fn mismatched_closing_delimiter() {
        let err = Parser::new(None, "(1 2}").parse().expect_err("mismatch");
        let err = err
            .downcast_ref::<UnexpectedDelimiter>()
            .expect("unexpected delimiter");
        assert_eq!(err.found, '}');
    }

    #[test]
    fn lex_errors_propagate() {
        let err = Parser::new(None, "(+ 1 $)").parse().expect_err("bad char");
        assert!(err.downcast_ref::<crate::lex::SingleTokenError>().is_some());
    }

    #[test]
    fn display_tree() {
        let ast = Parser::new(None, "(- 5)").parse().expect("parses");
        assert_eq!(
            ast.to_string(),
            ">\n  anchor: ''\n  sexpr\n    char: '('\n    symbol: '-'\n    number: '5'\n    char: ')'\n  anchor: ''\n"
        );
    }
}
