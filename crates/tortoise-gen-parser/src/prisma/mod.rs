//! Prisma schema language: lexer, parser and lowering into [`Schema`].
//!
//! Only the subset that maps onto Tortoise models is accepted. Constructs the
//! generator cannot express (composite keys, scalar lists, implicit
//! many-to-many relations) are rejected rather than silently dropped.
//!
//! [`Schema`]: tortoise_gen_core::Schema

pub mod ast;
pub mod lexer;
pub mod lower;
pub mod parser;

pub use lower::{GeneratorBlock, PrismaSchema, lower};
pub use parser::parse;

use crate::error::PrismaError;

/// Parse and lower Prisma schema text.
pub fn parse_schema(source: &str) -> Result<PrismaSchema, PrismaError> {
    let document = parse(source)?;
    Ok(lower(&document)?)
}
