pub mod default;
pub mod entity;
pub mod enum_def;
pub mod field;
pub mod names;
pub mod reference;
pub mod relation;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use default::{DefaultGenerator, DefaultValue};
pub use entity::EntityDef;
pub use enum_def::EnumDef;
pub use field::{ComplexFieldType, FieldDef, FieldType, ScalarType};
pub use names::{EntityName, EnumName, FieldName};
pub use reference::ReferenceAction;
pub use relation::{RelationDef, RelationKind};

/// The whole schema: enums and entities in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<EnumDef>,
    pub entities: Vec<EntityDef>,
}

/// A reverse accessor, computed from a forward relation declared on another
/// entity (or on the same one, for self relations).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReverseRelation<'a> {
    pub source: &'a EntityDef,
    pub relation: &'a RelationDef,
}

impl ReverseRelation<'_> {
    pub fn name(&self) -> String {
        self.relation.reverse_name(&self.source.name)
    }

    /// A foreign-key is seen as a collection from its target; a one-to-one as
    /// a single optional object.
    pub fn is_collection(&self) -> bool {
        self.relation.kind == RelationKind::ForeignKey
    }
}

impl Schema {
    pub fn entity(&self, name: &str) -> Option<&EntityDef> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Reverse accessors of `entity`, ordered by the owning entity's position
    /// and then by relation declaration order.
    pub fn reverse_relations(&self, entity: &str) -> Vec<ReverseRelation<'_>> {
        self.entities
            .iter()
            .flat_map(|source| {
                source
                    .relations
                    .iter()
                    .filter(move |rel| rel.target == entity)
                    .map(move |relation| ReverseRelation { source, relation })
            })
            .collect()
    }

    /// The target field a relation points at: its declared `to_field`, or the
    /// target's primary key.
    pub fn relation_target_field(&self, relation: &RelationDef) -> Option<&FieldDef> {
        let target = self.entity(&relation.target)?;
        match &relation.to_field {
            Some(name) => target.field(name),
            None => target.primary_key(),
        }
    }
}
