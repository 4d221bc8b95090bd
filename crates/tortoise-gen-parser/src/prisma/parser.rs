//! Recursive descent parser for Prisma schema documents.

use crate::error::ParseError;
use crate::prisma::ast::*;
use crate::prisma::lexer::{SpannedToken, Token, tokenize};
use crate::span::{Span, Spanned};

pub struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    /// Where "unexpected end of input" points.
    eof: Span,
}

/// Parse a whole schema document.
pub fn parse(source: &str) -> Result<Document, ParseError> {
    Parser::new(source)?.parse_document()
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        Ok(Self {
            tokens: tokenize(source)?,
            pos: 0,
            eof: Span::new(source.len(), source.len()),
        })
    }

    pub fn parse_document(&mut self) -> Result<Document, ParseError> {
        let mut blocks = Vec::new();

        loop {
            let documentation = self.take_docs();
            if self.peek().is_none() {
                break;
            }

            let keyword = self.expect_ident()?;
            let block = match keyword.value.as_str() {
                "datasource" => Block::Datasource(self.parse_key_value_block()?),
                "generator" => Block::Generator(self.parse_key_value_block()?),
                "model" => Block::Model(self.parse_model(documentation)?),
                "enum" => Block::Enum(self.parse_enum(documentation)?),
                "type" | "view" => {
                    let name = self.expect_ident()?;
                    self.skip_braced()?;
                    Block::Other {
                        keyword: keyword.value,
                        name,
                    }
                }
                other => {
                    return Err(ParseError::new(
                        format!("expected a block keyword, found '{}'", other),
                        keyword.span,
                    )
                    .with_hint("blocks start with model, enum, datasource or generator"));
                }
            };
            blocks.push(block);
        }

        Ok(Document { blocks })
    }

    fn parse_key_value_block(&mut self) -> Result<KeyValueBlock, ParseError> {
        let name = self.expect_ident()?;
        self.expect_token(Token::LBrace)?;

        let mut properties = Vec::new();
        loop {
            self.take_docs();
            if self.eat(&Token::RBrace) {
                break;
            }
            let key = self.expect_ident()?;
            self.expect_token(Token::Equals)?;
            let value = self.parse_expr()?;
            properties.push(Property { key, value });
        }

        Ok(KeyValueBlock { name, properties })
    }

    fn parse_model(&mut self, documentation: Option<String>) -> Result<ModelBlock, ParseError> {
        let name = self.expect_ident()?;
        self.expect_token(Token::LBrace)?;

        let mut fields = Vec::new();
        let mut attributes = Vec::new();
        loop {
            let docs = self.take_docs();
            match self.peek().map(|t| &t.token) {
                Some(Token::RBrace) => {
                    self.advance();
                    break;
                }
                Some(Token::DoubleAt) => attributes.push(self.parse_attribute()?),
                Some(Token::Ident(_)) => fields.push(self.parse_field(docs)?),
                _ => return Err(self.unexpected("a field, a block attribute or '}'")),
            }
        }

        Ok(ModelBlock {
            name,
            documentation,
            fields,
            attributes,
        })
    }

    fn parse_field(&mut self, documentation: Option<String>) -> Result<FieldDecl, ParseError> {
        let name = self.expect_ident()?;
        let type_name = self.expect_ident()?;

        let mut unsupported = None;
        if type_name.value == "Unsupported" && self.eat(&Token::LParen) {
            unsupported = Some(self.expect_string()?);
            self.expect_token(Token::RParen)?;
        }

        let arity = if self.eat(&Token::LBracket) {
            self.expect_token(Token::RBracket)?;
            Arity::List
        } else if self.eat(&Token::Question) {
            Arity::Optional
        } else {
            Arity::Required
        };

        let mut attributes = Vec::new();
        while matches!(self.peek().map(|t| &t.token), Some(Token::At)) {
            attributes.push(self.parse_attribute()?);
        }

        let span = name.span.merge(self.previous_span());
        Ok(FieldDecl {
            name,
            field_type: TypeRef {
                name: type_name,
                arity,
                unsupported,
            },
            attributes,
            documentation,
            span,
        })
    }

    fn parse_enum(&mut self, documentation: Option<String>) -> Result<EnumBlock, ParseError> {
        let name = self.expect_ident()?;
        self.expect_token(Token::LBrace)?;

        let mut values = Vec::new();
        let mut attributes = Vec::new();
        loop {
            let docs = self.take_docs();
            match self.peek().map(|t| &t.token) {
                Some(Token::RBrace) => {
                    self.advance();
                    break;
                }
                Some(Token::DoubleAt) => attributes.push(self.parse_attribute()?),
                Some(Token::Ident(_)) => {
                    let value_name = self.expect_ident()?;
                    let mut value_attributes = Vec::new();
                    while matches!(self.peek().map(|t| &t.token), Some(Token::At)) {
                        value_attributes.push(self.parse_attribute()?);
                    }
                    values.push(EnumValueDecl {
                        name: value_name,
                        documentation: docs,
                        attributes: value_attributes,
                    });
                }
                _ => return Err(self.unexpected("an enum value or '}'")),
            }
        }

        Ok(EnumBlock {
            name,
            documentation,
            values,
            attributes,
        })
    }

    /// `@name`, `@@name`, `@db.Type`, each with optional arguments.
    fn parse_attribute(&mut self) -> Result<Attribute, ParseError> {
        let start = self.next_token()?;
        if !matches!(start.token, Token::At | Token::DoubleAt) {
            return Err(ParseError::new(
                format!("expected an attribute, found {}", start.token.describe()),
                start.span,
            ));
        }

        let first = self.expect_ident().map_err(|e| {
            e.with_hint("attributes look like @unique, @default(0) or @@map(\"table\")")
        })?;
        let mut name = first.value;
        let mut name_span = first.span;
        while self.eat(&Token::Dot) {
            let part = self.expect_ident()?;
            name.push('.');
            name.push_str(&part.value);
            name_span = name_span.merge(part.span);
        }

        let arguments = if self.eat(&Token::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };

        Ok(Attribute {
            name: Spanned::new(name, name_span),
            arguments,
            span: start.span.merge(self.previous_span()),
        })
    }

    /// Arguments after an opening parenthesis, through the closing one.
    fn parse_arguments(&mut self) -> Result<Vec<Argument>, ParseError> {
        let mut arguments = Vec::new();

        loop {
            if self.eat(&Token::RParen) {
                break;
            }

            let named = matches!(self.peek().map(|t| &t.token), Some(Token::Ident(_)))
                && matches!(self.peek_nth(1).map(|t| &t.token), Some(Token::Colon));
            let name = if named {
                let name = self.expect_ident()?;
                self.expect_token(Token::Colon)?;
                Some(name.value)
            } else {
                None
            };
            let value = self.parse_expr()?;
            arguments.push(Argument { name, value });

            if !self.eat(&Token::Comma) {
                self.expect_token(Token::RParen)?;
                break;
            }
        }

        Ok(arguments)
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let tok = self.next_token()?;
        match tok.token {
            Token::String(s) => Ok(Expr::String(s)),
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::Ident(ident) => match ident.as_str() {
                "true" => Ok(Expr::Boolean(true)),
                "false" => Ok(Expr::Boolean(false)),
                _ if self.eat(&Token::LParen) => Ok(Expr::Function {
                    name: ident,
                    arguments: self.parse_arguments()?,
                }),
                _ => Ok(Expr::Constant(ident)),
            },
            Token::LBracket => {
                let mut items = Vec::new();
                loop {
                    if self.eat(&Token::RBracket) {
                        break;
                    }
                    items.push(self.parse_expr()?);
                    if !self.eat(&Token::Comma) {
                        self.expect_token(Token::RBracket)?;
                        break;
                    }
                }
                Ok(Expr::Array(items))
            }
            other => Err(ParseError::new(
                format!("expected a value, found {}", other.describe()),
                tok.span,
            )),
        }
    }

    fn skip_braced(&mut self) -> Result<(), ParseError> {
        self.expect_token(Token::LBrace)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.next_token()?.token {
                Token::LBrace => depth += 1,
                Token::RBrace => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }

    /// Consume consecutive doc comments, joined by newlines.
    fn take_docs(&mut self) -> Option<String> {
        let mut lines = Vec::new();
        while let Some(SpannedToken {
            token: Token::DocComment(line),
            ..
        }) = self.peek()
        {
            lines.push(line.clone());
            self.advance();
        }

        let joined = lines.join("\n");
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, n: usize) -> Option<&SpannedToken> {
        self.tokens.get(self.pos + n)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span)
            .unwrap_or_default()
    }

    fn next_token(&mut self) -> Result<SpannedToken, ParseError> {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| ParseError::new("unexpected end of input", self.eof))?;
        self.pos += 1;
        Ok(tok)
    }

    /// Consume the next token if it equals `expected`.
    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek().is_some_and(|t| &t.token == expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_token(&mut self, expected: Token) -> Result<Span, ParseError> {
        let tok = self.next_token()?;
        if tok.token == expected {
            Ok(tok.span)
        } else {
            Err(ParseError::new(
                format!(
                    "expected {}, found {}",
                    expected.describe(),
                    tok.token.describe()
                ),
                tok.span,
            ))
        }
    }

    fn expect_ident(&mut self) -> Result<Spanned<String>, ParseError> {
        let tok = self.next_token()?;
        match tok.token {
            Token::Ident(name) => Ok(Spanned::new(name, tok.span)),
            other => Err(ParseError::new(
                format!("expected an identifier, found {}", other.describe()),
                tok.span,
            )),
        }
    }

    fn expect_string(&mut self) -> Result<String, ParseError> {
        let tok = self.next_token()?;
        match tok.token {
            Token::String(value) => Ok(value),
            other => Err(ParseError::new(
                format!("expected a string, found {}", other.describe()),
                tok.span,
            )),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(tok) => ParseError::new(
                format!("expected {}, found {}", expected, tok.token.describe()),
                tok.span,
            ),
            None => ParseError::new(
                format!("expected {}, found end of input", expected),
                self.eof,
            ),
        }
    }
}
