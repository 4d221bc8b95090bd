use thiserror::Error;

/// Errors found while rendering; reported before anything is written.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("'{first}' and '{second}' both become class '{name}'")]
    ClassNameCollision {
        name: String,
        first: String,
        second: String,
    },
    #[error("{entity}: '{first}' and '{second}' both become attribute '{name}'")]
    MemberNameCollision {
        entity: String,
        name: String,
        first: String,
        second: String,
    },
    #[error("{owner}: '{name}' is not a usable Python identifier")]
    InvalidIdentifier { owner: String, name: String },
}
