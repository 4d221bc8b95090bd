use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default value of a field.
///
/// Generators are evaluated by the runtime field implementation; literals are
/// emitted as constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    Generator(DefaultGenerator),
    Literal(serde_json::Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DefaultGenerator {
    Autoincrement,
    Now,
    Uuid,
    Cuid,
    DbGenerated,
}

impl DefaultGenerator {
    /// Name of the generator function in the schema language.
    pub fn function_name(&self) -> &'static str {
        match self {
            DefaultGenerator::Autoincrement => "autoincrement",
            DefaultGenerator::Now => "now",
            DefaultGenerator::Uuid => "uuid",
            DefaultGenerator::Cuid => "cuid",
            DefaultGenerator::DbGenerated => "dbgenerated",
        }
    }

    pub fn from_function_name(name: &str) -> Option<Self> {
        match name {
            "autoincrement" => Some(DefaultGenerator::Autoincrement),
            "now" => Some(DefaultGenerator::Now),
            "uuid" => Some(DefaultGenerator::Uuid),
            "cuid" => Some(DefaultGenerator::Cuid),
            "dbgenerated" => Some(DefaultGenerator::DbGenerated),
            _ => None,
        }
    }
}

impl DefaultValue {
    pub fn generator(&self) -> Option<DefaultGenerator> {
        match self {
            DefaultValue::Generator(g) => Some(*g),
            DefaultValue::Literal(_) => None,
        }
    }

    pub fn is_autoincrement(&self) -> bool {
        self.generator() == Some(DefaultGenerator::Autoincrement)
    }
}
