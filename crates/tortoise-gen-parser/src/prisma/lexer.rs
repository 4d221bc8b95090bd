//! Prisma schema tokens, produced with logos.

use logos::Logos;

use crate::error::ParseError;
use crate::span::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
// Plain `//` comments; `///` is a doc comment and kept as a token.
#[logos(skip r"//([^/\n][^\n]*)?")]
pub enum Token {
    #[regex(r"///[^\n]*", |lex| lex.slice()[3..].trim().to_string())]
    DocComment(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| {
        let s = lex.slice();
        unescape_string(&s[1..s.len() - 1])
    })]
    String(String),

    /// Kept as written so integer and decimal literals survive unchanged.
    #[regex(r"-?[0-9]+(\.[0-9]+)?", |lex| lex.slice().to_string())]
    Number(String),

    #[token("@@")]
    DoubleAt,
    #[token("@")]
    At,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("=")]
    Equals,
    #[token("?")]
    Question,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
}

impl Token {
    /// Short description used in parse errors.
    pub fn describe(&self) -> String {
        match self {
            Token::DocComment(_) => "doc comment".to_string(),
            Token::Ident(name) => format!("'{}'", name),
            Token::String(value) => format!("string \"{}\"", value),
            Token::Number(value) => format!("number {}", value),
            Token::DoubleAt => "'@@'".to_string(),
            Token::At => "'@'".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Colon => "':'".to_string(),
            Token::Equals => "'='".to_string(),
            Token::Question => "'?'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
        }
    }
}

fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }

    result
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Tokenize a whole schema. Unrecognized input is an error.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, ParseError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span: Span = lexer.span().into();
        match result {
            Ok(token) => tokens.push(SpannedToken { token, span }),
            Err(()) => {
                let err = ParseError::new(
                    format!("unexpected character sequence '{}'", lexer.slice()),
                    span,
                );
                return Err(if lexer.slice().starts_with('"') {
                    err.with_hint("string literals must be closed on the same line")
                } else {
                    err
                });
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_field_line() {
        assert_eq!(
            tokens("id Int @id @default(autoincrement())"),
            vec![
                Token::Ident("id".into()),
                Token::Ident("Int".into()),
                Token::At,
                Token::Ident("id".into()),
                Token::At,
                Token::Ident("default".into()),
                Token::LParen,
                Token::Ident("autoincrement".into()),
                Token::LParen,
                Token::RParen,
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_comments() {
        let toks = tokens("// plain\n/// documented\n////   four\nmodel //\n");
        assert_eq!(
            toks,
            vec![
                Token::DocComment("documented".into()),
                Token::DocComment("/   four".into()),
                Token::Ident("model".into()),
            ]
        );
    }

    #[test]
    fn test_literals() {
        let toks = tokens(r#"@default("a \"b\"") 42 -1 3.50 Post[] User? @@map"#);
        assert!(toks.contains(&Token::String("a \"b\"".into())));
        assert!(toks.contains(&Token::Number("42".into())));
        assert!(toks.contains(&Token::Number("-1".into())));
        assert!(toks.contains(&Token::Number("3.50".into())));
        assert!(toks.contains(&Token::LBracket));
        assert!(toks.contains(&Token::Question));
        assert_eq!(toks.last(), Some(&Token::Ident("map".into())));
        assert!(toks.contains(&Token::DoubleAt));
    }

    #[test]
    fn test_invalid_character_is_an_error() {
        let err = tokenize("model User { id Int # }").unwrap_err();
        assert!(err.message.contains("'#'"));
        assert_eq!(err.span, Span::new(20, 21));
    }
}
