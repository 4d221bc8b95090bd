use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::{field::FieldDef, names::EntityName, relation::RelationDef};

/// A table-like concept mapped to one generated class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct EntityDef {
    pub name: EntityName,
    /// Table name override; the entity name is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<RelationDef>,
}

impl EntityDef {
    pub fn new(name: impl Into<EntityName>) -> Self {
        Self {
            name: name.into(),
            table: None,
            description: None,
            fields: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn table_name(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn relation(&self, name: &str) -> Option<&RelationDef> {
        self.relations.iter().find(|r| r.name == name)
    }

    /// The primary-key field. Validation guarantees exactly one.
    pub fn primary_key(&self) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.primary_key)
    }

    /// Names of all declared fields and relations, in declaration order.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .map(|f| f.name.as_str())
            .chain(self.relations.iter().map(|r| r.name.as_str()))
    }
}
