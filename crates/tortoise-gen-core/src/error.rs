use thiserror::Error;

/// Schema-validation errors. Each is detected before any output is produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("duplicate entity name: {0}")]
    DuplicateEntityName(String),
    #[error("duplicate enum name: {0}")]
    DuplicateEnumName(String),
    #[error("name '{0}' is declared both as an enum and as an entity")]
    EnumEntityNameClash(String),
    #[error("enum '{0}' has no values")]
    EmptyEnum(String),
    #[error("enum '{0}' has duplicate value: '{1}'")]
    DuplicateEnumValue(String, String),
    #[error("entity '{0}' declares '{1}' more than once (names are compared case-insensitively)")]
    DuplicateFieldName(String, String),
    #[error("reverse relation '{1}' from '{2}' collides with a declared member of '{0}'")]
    ReverseRelationNameClash(String, String, String),
    #[error("entity '{0}' must have a primary key")]
    MissingPrimaryKey(String),
    #[error("entity '{0}' declares more than one primary key: {1}")]
    MultiplePrimaryKeys(String, String),
    #[error("relation references undeclared entity: {0}.{1} -> {2}")]
    RelationTargetNotFound(String, String, String),
    #[error("relation references non-existent field: {0}.{1} -> {2}.{3}")]
    RelationTargetFieldNotFound(String, String, String, String),
    #[error("relation {0}.{1} uses set-null on delete but is not nullable")]
    SetNullOnRequiredRelation(String, String),
    #[error("field {0}.{1} references undeclared enum '{2}'")]
    UnknownEnum(String, String, String),
    #[error("field {0}.{1} has default '{2}' which is not a value of enum '{3}'")]
    InvalidEnumDefault(String, String, String, String),
    #[error("field {0}.{1} uses autoincrement but is not an integer")]
    AutoincrementOnNonInteger(String, String),
}
