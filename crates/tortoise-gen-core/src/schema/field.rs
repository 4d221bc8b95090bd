use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::{
    default::DefaultValue,
    names::{EnumName, FieldName},
};

fn is_false(value: &bool) -> bool {
    !*value
}

/// A scalar column declaration on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct FieldDef {
    pub name: FieldName,
    pub r#type: FieldType,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub primary_key: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    /// Refreshed with the current time on every save.
    #[serde(default, skip_serializing_if = "is_false")]
    pub updated_at: bool,
    /// Column name when it differs from the field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDef {
    /// Create a required, non-unique field without a default.
    pub fn new(name: impl Into<FieldName>, r#type: FieldType) -> Self {
        Self {
            name: name.into(),
            r#type,
            nullable: false,
            primary_key: false,
            unique: false,
            default: None,
            updated_at: false,
            db_name: None,
            description: None,
        }
    }

    /// Required on create: not nullable and nothing fills it in.
    pub fn is_required(&self) -> bool {
        !self.nullable && self.default.is_none()
    }

    pub fn is_autoincrement(&self) -> bool {
        self.default.as_ref().is_some_and(|d| d.is_autoincrement())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", untagged)]
pub enum FieldType {
    Scalar(ScalarType),
    Complex(ComplexFieldType),
}

impl FieldType {
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            FieldType::Scalar(ScalarType::Int) | FieldType::Scalar(ScalarType::BigInt)
        )
    }

    pub fn is_datetime(&self) -> bool {
        matches!(self, FieldType::Scalar(ScalarType::DateTime))
    }

    /// Name of the referenced enum, if this is an enum-typed field.
    pub fn enum_name(&self) -> Option<&str> {
        match self {
            FieldType::Complex(ComplexFieldType::Enum { name }) => Some(name),
            _ => None,
        }
    }

    /// Type name as written in the schema language.
    pub fn schema_name(&self) -> &str {
        match self {
            FieldType::Scalar(ty) => ty.schema_name(),
            FieldType::Complex(ComplexFieldType::Varchar { .. }) => "String",
            FieldType::Complex(ComplexFieldType::Decimal { .. }) => "Decimal",
            FieldType::Complex(ComplexFieldType::Enum { name }) => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    // Numeric types
    Int,
    BigInt,
    Float,
    Decimal,

    Boolean,
    String,
    DateTime,
    Json,
    Bytes,
}

impl ScalarType {
    pub fn schema_name(&self) -> &'static str {
        match self {
            ScalarType::Int => "Int",
            ScalarType::BigInt => "BigInt",
            ScalarType::Float => "Float",
            ScalarType::Decimal => "Decimal",
            ScalarType::Boolean => "Boolean",
            ScalarType::String => "String",
            ScalarType::DateTime => "DateTime",
            ScalarType::Json => "Json",
            ScalarType::Bytes => "Bytes",
        }
    }

    pub fn from_schema_name(name: &str) -> Option<Self> {
        match name {
            "Int" => Some(ScalarType::Int),
            "BigInt" => Some(ScalarType::BigInt),
            "Float" => Some(ScalarType::Float),
            "Decimal" => Some(ScalarType::Decimal),
            "Boolean" => Some(ScalarType::Boolean),
            "String" => Some(ScalarType::String),
            "DateTime" => Some(ScalarType::DateTime),
            "Json" => Some(ScalarType::Json),
            "Bytes" => Some(ScalarType::Bytes),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ComplexFieldType {
    Varchar { length: u32 },
    Decimal { precision: u32, scale: u32 },
    Enum { name: EnumName },
}
