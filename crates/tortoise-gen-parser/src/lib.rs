//! Readers for tortoise-gen inputs: Prisma schema text and the outline of
//! hand-written Python extension modules.
//!
//! ```rust
//! use tortoise_gen_parser::parse_schema;
//!
//! let parsed = parse_schema(
//!     r#"
//! model Tag {
//!   id   Int    @id @default(autoincrement())
//!   name String @unique
//! }
//! "#,
//! )
//! .unwrap();
//! assert_eq!(parsed.schema.entities[0].name, "Tag");
//! ```

pub mod error;
pub mod extension;
pub mod prisma;
pub mod span;

pub use error::{LowerError, ParseError, PrismaError};
pub use extension::scan_outline;
pub use prisma::{GeneratorBlock, PrismaSchema, parse_schema};
pub use span::{Span, Spanned};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_carries_source_location() {
        let source = "model User {\n  id Int @id\n  name String @default(\n}";
        let err = parse_schema(source).unwrap_err();
        assert!(matches!(err, PrismaError::Parse(_)));

        let formatted = err.format_with_source(source);
        assert!(formatted.contains("line 4:1"), "{formatted}");
        assert!(formatted.contains("expected a value, found '}'"));
    }

    #[test]
    fn test_generator_block_without_models() {
        let parsed = parse_schema(
            "generator client {\n  provider = \"tortoise-gen\"\n}\n",
        )
        .unwrap();
        assert!(parsed.schema.entities.is_empty());
        assert_eq!(parsed.generators[0].provider.as_deref(), Some("tortoise-gen"));
        assert_eq!(parsed.generators[0].options().count(), 0);
    }
}
