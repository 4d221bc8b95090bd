use std::collections::HashSet;

use crate::error::SchemaError;
use crate::schema::{DefaultValue, EntityDef, FieldDef, ReferenceAction, Schema};

/// Validate a schema before generation.
/// Checks for:
/// - Duplicate entity and enum names, and enums named like entities
/// - Empty enums and duplicate enum values
/// - Duplicate field/relation names within an entity (case-insensitive)
/// - Missing or multiple primary keys
/// - Enum-typed fields referencing undeclared enums or invalid enum defaults
/// - Autoincrement on non-integer fields
/// - Relations referencing undeclared entities or non-existent target fields
/// - Set-null deletion on non-nullable relations
/// - Reverse relation names colliding with declared members
pub fn validate_schema(schema: &Schema) -> Result<(), SchemaError> {
    let mut entity_names = HashSet::new();
    for entity in &schema.entities {
        if !entity_names.insert(entity.name.as_str()) {
            return Err(SchemaError::DuplicateEntityName(entity.name.clone()));
        }
    }

    let mut enum_names = HashSet::new();
    for enum_def in &schema.enums {
        if !enum_names.insert(enum_def.name.as_str()) {
            return Err(SchemaError::DuplicateEnumName(enum_def.name.clone()));
        }
        if entity_names.contains(enum_def.name.as_str()) {
            return Err(SchemaError::EnumEntityNameClash(enum_def.name.clone()));
        }
        if enum_def.values.is_empty() {
            return Err(SchemaError::EmptyEnum(enum_def.name.clone()));
        }
        let mut seen = HashSet::new();
        for value in &enum_def.values {
            if !seen.insert(value.as_str()) {
                return Err(SchemaError::DuplicateEnumValue(
                    enum_def.name.clone(),
                    value.clone(),
                ));
            }
        }
    }

    for entity in &schema.entities {
        validate_entity(entity, schema)?;
    }

    // Relations are checked once every entity is known to be well formed, so
    // reverse accessors can be computed safely.
    for entity in &schema.entities {
        validate_relations(entity, schema)?;
    }

    for entity in &schema.entities {
        validate_reverse_names(entity, schema)?;
    }

    Ok(())
}

fn validate_entity(entity: &EntityDef, schema: &Schema) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for name in entity.member_names() {
        if !seen.insert(name.to_lowercase()) {
            return Err(SchemaError::DuplicateFieldName(
                entity.name.clone(),
                name.to_string(),
            ));
        }
    }

    let pk_fields: Vec<&str> = entity
        .fields
        .iter()
        .filter(|f| f.primary_key)
        .map(|f| f.name.as_str())
        .collect();
    match pk_fields.len() {
        0 => return Err(SchemaError::MissingPrimaryKey(entity.name.clone())),
        1 => {}
        _ => {
            return Err(SchemaError::MultiplePrimaryKeys(
                entity.name.clone(),
                pk_fields.join(", "),
            ));
        }
    }

    for field in &entity.fields {
        validate_field(field, &entity.name, schema)?;
    }

    Ok(())
}

fn validate_field(field: &FieldDef, entity_name: &str, schema: &Schema) -> Result<(), SchemaError> {
    if let Some(enum_name) = field.r#type.enum_name() {
        let enum_def = schema.enum_def(enum_name).ok_or_else(|| {
            SchemaError::UnknownEnum(
                entity_name.to_string(),
                field.name.clone(),
                enum_name.to_string(),
            )
        })?;

        if let Some(DefaultValue::Literal(value)) = &field.default {
            let value = value
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string());
            if !enum_def.contains(&value) {
                return Err(SchemaError::InvalidEnumDefault(
                    entity_name.to_string(),
                    field.name.clone(),
                    value,
                    enum_name.to_string(),
                ));
            }
        }
    }

    if field.is_autoincrement() && !field.r#type.is_integer() {
        return Err(SchemaError::AutoincrementOnNonInteger(
            entity_name.to_string(),
            field.name.clone(),
        ));
    }

    Ok(())
}

fn validate_relations(entity: &EntityDef, schema: &Schema) -> Result<(), SchemaError> {
    for relation in &entity.relations {
        let target = schema.entity(&relation.target).ok_or_else(|| {
            SchemaError::RelationTargetNotFound(
                entity.name.clone(),
                relation.name.clone(),
                relation.target.clone(),
            )
        })?;

        if schema.relation_target_field(relation).is_none() {
            let field = relation
                .to_field
                .clone()
                .unwrap_or_else(|| "<primary key>".to_string());
            return Err(SchemaError::RelationTargetFieldNotFound(
                entity.name.clone(),
                relation.name.clone(),
                target.name.clone(),
                field,
            ));
        }

        if relation.on_delete == Some(ReferenceAction::SetNull) && !relation.nullable {
            return Err(SchemaError::SetNullOnRequiredRelation(
                entity.name.clone(),
                relation.name.clone(),
            ));
        }
    }

    Ok(())
}

fn validate_reverse_names(entity: &EntityDef, schema: &Schema) -> Result<(), SchemaError> {
    let mut seen: HashSet<String> = entity.member_names().map(str::to_lowercase).collect();

    for reverse in schema.reverse_relations(&entity.name) {
        let name = reverse.name();
        if !seen.insert(name.to_lowercase()) {
            return Err(SchemaError::ReverseRelationNameClash(
                entity.name.clone(),
                name,
                reverse.source.name.clone(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{
        ComplexFieldType, DefaultGenerator, EnumDef, FieldType, RelationDef, RelationKind,
        ScalarType,
    };
    use rstest::rstest;
    use serde_json::json;

    fn field(name: &str, ty: ScalarType) -> FieldDef {
        FieldDef::new(name, FieldType::Scalar(ty))
    }

    fn pk(name: &str) -> FieldDef {
        let mut f = field(name, ScalarType::Int);
        f.primary_key = true;
        f.default = Some(DefaultValue::Generator(DefaultGenerator::Autoincrement));
        f
    }

    fn entity(name: &str, fields: Vec<FieldDef>, relations: Vec<RelationDef>) -> EntityDef {
        EntityDef {
            fields,
            relations,
            ..EntityDef::new(name)
        }
    }

    fn role_enum() -> EnumDef {
        EnumDef {
            name: "Role".into(),
            values: vec!["USER".into(), "ADMIN".into()],
            description: None,
        }
    }

    fn valid_schema() -> Schema {
        let mut role = FieldDef::new(
            "role",
            FieldType::Complex(ComplexFieldType::Enum { name: "Role".into() }),
        );
        role.default = Some(DefaultValue::Literal(json!("USER")));

        let mut email = field("email", ScalarType::String);
        email.unique = true;

        let mut user_rel = RelationDef::new("user", RelationKind::ForeignKey, "User");
        user_rel.nullable = true;
        user_rel.on_delete = Some(ReferenceAction::SetNull);
        user_rel.related_name = Some("posts".into());

        Schema {
            enums: vec![role_enum()],
            entities: vec![
                entity("User", vec![pk("id"), email, role], vec![]),
                entity("Post", vec![pk("id")], vec![user_rel]),
            ],
        }
    }

    #[test]
    fn valid_schema_passes() {
        assert_eq!(validate_schema(&valid_schema()), Ok(()));
    }

    #[test]
    fn empty_schema_passes() {
        assert_eq!(validate_schema(&Schema::default()), Ok(()));
    }

    #[test]
    fn duplicate_entity_name_fails() {
        let mut schema = valid_schema();
        schema.entities.push(entity("User", vec![pk("id")], vec![]));
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::DuplicateEntityName("User".into()))
        );
    }

    #[test]
    fn enum_named_like_entity_fails() {
        let mut schema = valid_schema();
        schema.enums.push(EnumDef {
            name: "Post".into(),
            values: vec!["A".into()],
            description: None,
        });
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::EnumEntityNameClash("Post".into()))
        );
    }

    #[rstest]
    #[case(vec![], SchemaError::EmptyEnum("Role".into()))]
    #[case(vec!["A", "A"], SchemaError::DuplicateEnumValue("Role".into(), "A".into()))]
    fn malformed_enum_fails(#[case] values: Vec<&str>, #[case] expected: SchemaError) {
        let mut schema = valid_schema();
        schema.enums[0].values = values.into_iter().map(String::from).collect();
        assert_eq!(validate_schema(&schema), Err(expected));
    }

    #[rstest]
    #[case("email")]
    #[case("Email")]
    #[case("EMAIL")]
    fn duplicate_field_name_is_case_insensitive(#[case] name: &str) {
        let mut schema = valid_schema();
        schema.entities[0].fields.push(field(name, ScalarType::String));
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::DuplicateFieldName("User".into(), name.into()))
        );
    }

    #[test]
    fn relation_sharing_a_field_name_fails() {
        let mut schema = valid_schema();
        schema.entities[1].fields.push(field("User", ScalarType::Int));
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::DuplicateFieldName("Post".into(), "user".into()))
        );
    }

    #[test]
    fn missing_primary_key_fails() {
        let mut schema = valid_schema();
        schema.entities[1].fields[0].primary_key = false;
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::MissingPrimaryKey("Post".into()))
        );
    }

    #[test]
    fn multiple_primary_keys_fail() {
        let mut schema = valid_schema();
        schema.entities[1].fields.push(pk("uid"));
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::MultiplePrimaryKeys("Post".into(), "id, uid".into()))
        );
    }

    #[test]
    fn unknown_enum_fails() {
        let mut schema = valid_schema();
        schema.enums.clear();
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::UnknownEnum("User".into(), "role".into(), "Role".into()))
        );
    }

    #[test]
    fn enum_default_outside_values_fails() {
        let mut schema = valid_schema();
        schema.entities[0].fields[2].default = Some(DefaultValue::Literal(json!("ROOT")));
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::InvalidEnumDefault(
                "User".into(),
                "role".into(),
                "ROOT".into(),
                "Role".into()
            ))
        );
    }

    #[test]
    fn autoincrement_on_string_fails() {
        let mut schema = valid_schema();
        schema.entities[0].fields[1].default =
            Some(DefaultValue::Generator(DefaultGenerator::Autoincrement));
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::AutoincrementOnNonInteger("User".into(), "email".into()))
        );
    }

    #[test]
    fn undeclared_relation_target_fails() {
        let mut schema = valid_schema();
        schema.entities[1].relations[0].target = "Account".into();
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::RelationTargetNotFound(
                "Post".into(),
                "user".into(),
                "Account".into()
            ))
        );
    }

    #[test]
    fn relation_to_missing_field_fails() {
        let mut schema = valid_schema();
        schema.entities[1].relations[0].to_field = Some("uuid".into());
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::RelationTargetFieldNotFound(
                "Post".into(),
                "user".into(),
                "User".into(),
                "uuid".into()
            ))
        );
    }

    #[test]
    fn set_null_on_required_relation_fails() {
        let mut schema = valid_schema();
        schema.entities[1].relations[0].nullable = false;
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::SetNullOnRequiredRelation("Post".into(), "user".into()))
        );
    }

    #[test]
    fn reverse_name_colliding_with_field_fails() {
        let mut schema = valid_schema();
        schema.entities[0].fields.push(field("posts", ScalarType::Json));
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::ReverseRelationNameClash(
                "User".into(),
                "posts".into(),
                "Post".into()
            ))
        );
    }

    #[test]
    fn two_reverse_relations_with_the_same_name_fail() {
        let mut schema = valid_schema();
        let mut editor = RelationDef::new("editor", RelationKind::ForeignKey, "User");
        editor.related_name = Some("posts".into());
        schema.entities[1].relations.push(editor);
        assert!(matches!(
            validate_schema(&schema),
            Err(SchemaError::ReverseRelationNameClash(..))
        ));
    }
}
