use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::names::EnumName;

/// A string enumeration referenced by enum-typed fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct EnumDef {
    pub name: EnumName,
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EnumDef {
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}
