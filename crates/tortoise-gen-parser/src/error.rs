use thiserror::Error;

use crate::span::{Span, offset_to_line_col};

/// Error while tokenizing or parsing schema text.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub hint: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Render the error with the offending source line and a caret under it.
    pub fn format_with_source(&self, source: &str) -> String {
        let (line, col) = offset_to_line_col(source, self.span.start);
        let mut result = format!("error: {}\n", self.message);
        result.push_str(&format!("  --> line {}:{}\n", line, col));

        if let Some(source_line) = source.lines().nth(line - 1) {
            result.push_str(&format!("   |\n{:3}| {}\n   |", line, source_line));

            for _ in 0..col {
                result.push(' ');
            }
            result.push('^');

            let span_len = self.span.width();
            if span_len > 1 {
                let room = (source_line.chars().count() + 1).saturating_sub(col);
                for _ in 1..span_len.min(room) {
                    result.push('~');
                }
            }
            result.push('\n');
        }

        if let Some(hint) = &self.hint {
            result.push_str(&format!("   = hint: {}\n", hint));
        }

        result
    }
}

/// Error while turning a parsed Prisma document into a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LowerError {
    #[error("'{0} {1}' blocks are not supported")]
    UnsupportedBlock(String, String),
    #[error("field {0}.{1} has unknown type '{2}'")]
    UnknownType(String, String, String),
    #[error("field {0}.{1} uses an Unsupported(\"{2}\") type")]
    UnsupportedType(String, String, String),
    #[error("field {0}.{1} is a scalar list, which has no Tortoise field")]
    ScalarList(String, String),
    #[error("model '{0}' declares a composite primary key (@@id)")]
    CompositeId(String),
    #[error("relation {0}.{1} spans more than one column")]
    CompositeRelation(String, String),
    #[error("relation {0}.{1} declares fields but no references")]
    MissingReferences(String, String),
    #[error("relation {0}.{1} names '{2}' in fields, which is not a scalar field of '{0}'")]
    UnknownForeignKeyField(String, String, String),
    #[error("relation {0}.{1} has no opposite relation field on '{2}'")]
    MissingOppositeRelation(String, String, String),
    #[error("relation {0}.{1} to '{2}' is an implicit many-to-many relation")]
    ManyToMany(String, String, String),
    #[error("relation {0}.{1} is a list but declares its foreign key fields")]
    ListWithForeignKey(String, String),
    #[error("relation {0}.{1} has unknown referential action '{2}'")]
    InvalidReferentialAction(String, String, String),
    #[error("{0}: invalid argument for @{1}")]
    InvalidAttributeArgument(String, String),
}

/// Any error produced while reading Prisma schema text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrismaError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Lower(#[from] LowerError),
}

impl PrismaError {
    /// Render the error; parse errors include the source location.
    pub fn format_with_source(&self, source: &str) -> String {
        match self {
            PrismaError::Parse(e) => e.format_with_source(source),
            PrismaError::Lower(e) => format!("error: {}\n", e),
        }
    }
}
