use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tortoise_gen_naming::{build_related_name, foreign_key_column};

use crate::schema::{
    names::{EntityName, FieldName},
    reference::ReferenceAction,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    OneToOne,
    ForeignKey,
}

/// A forward relation owned by the entity holding the foreign-key column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct RelationDef {
    pub name: FieldName,
    pub kind: RelationKind,
    pub target: EntityName,
    #[serde(default)]
    pub nullable: bool,
    /// Foreign-key column on the owning entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_field: Option<String>,
    /// Referenced field on the target; the target's primary key when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_field: Option<FieldName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<ReferenceAction>,
    /// Name of the reverse accessor on the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RelationDef {
    pub fn new(name: impl Into<FieldName>, kind: RelationKind, target: impl Into<EntityName>) -> Self {
        Self {
            name: name.into(),
            kind,
            target: target.into(),
            nullable: false,
            source_field: None,
            to_field: None,
            on_delete: None,
            related_name: None,
            description: None,
        }
    }

    /// Foreign-key column, derived from the relation name when not declared.
    pub fn source_column(&self) -> String {
        self.source_field
            .clone()
            .unwrap_or_else(|| foreign_key_column(&self.name))
    }

    /// Reverse accessor name, derived from the owner and relation name when
    /// not declared.
    pub fn reverse_name(&self, source_entity: &str) -> String {
        self.related_name
            .clone()
            .unwrap_or_else(|| build_related_name(source_entity, &self.name))
    }

    pub fn is_one_to_one(&self) -> bool {
        self.kind == RelationKind::OneToOne
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_column_defaults_to_suffix_convention() {
        let rel = RelationDef::new("author", RelationKind::ForeignKey, "User");
        assert_eq!(rel.source_column(), "author_id");

        let explicit = RelationDef {
            source_field: Some("authorId".into()),
            ..rel
        };
        assert_eq!(explicit.source_column(), "authorId");
    }

    #[test]
    fn reverse_name_defaults_to_owner_and_relation() {
        let rel = RelationDef::new("user", RelationKind::ForeignKey, "User");
        assert_eq!(rel.reverse_name("Post"), "post_user");

        let named = RelationDef {
            related_name: Some("posts".into()),
            ..rel
        };
        assert_eq!(named.reverse_name("Post"), "posts");
    }

    #[test]
    fn deserialize_minimal_relation() {
        let rel: RelationDef = serde_json::from_value(serde_json::json!({
            "name": "successor",
            "kind": "one_to_one",
            "target": "User",
            "nullable": true,
            "on_delete": "set_null"
        }))
        .unwrap();
        assert!(rel.is_one_to_one());
        assert!(rel.nullable);
        assert_eq!(rel.on_delete, Some(ReferenceAction::SetNull));
        assert_eq!(rel.to_field, None);
    }
}
