pub mod error;
pub mod extension;
pub mod schema;
pub mod validate;

pub use error::SchemaError;
pub use extension::{ConfigBlock, ExtensionClass, ExtensionModule};
pub use schema::{
    ComplexFieldType, DefaultGenerator, DefaultValue, EntityDef, EnumDef, FieldDef, FieldType,
    ReferenceAction, RelationDef, RelationKind, ReverseRelation, ScalarType, Schema,
};
pub use validate::validate_schema;
