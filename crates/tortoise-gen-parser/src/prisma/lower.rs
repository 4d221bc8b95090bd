//! Lowering of a parsed Prisma document into the generator's schema model.

use std::collections::HashMap;

use serde_json::{Number, Value};
use tortoise_gen_core::{
    ComplexFieldType, DefaultGenerator, DefaultValue, EntityDef, EnumDef, FieldDef, FieldType,
    ReferenceAction, RelationDef, RelationKind, ScalarType, Schema,
};
use tracing::{debug, warn};

use crate::error::LowerError;
use crate::prisma::ast::*;

/// Result of reading a Prisma document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrismaSchema {
    pub schema: Schema,
    pub generators: Vec<GeneratorBlock>,
}

/// A `generator` block. Options are every property other than the ones
/// Prisma itself interprets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorBlock {
    pub name: String,
    pub provider: Option<String>,
    pub output: Option<String>,
    pub options: Vec<(String, String)>,
}

impl GeneratorBlock {
    pub fn options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

const ENGINE_PROPERTIES: &[&str] = &[
    "provider",
    "output",
    "binaryTargets",
    "previewFeatures",
    "engineType",
];

enum TypeKind<'a> {
    Scalar(ScalarType),
    Enum(&'a str),
    Model(&'a ModelBlock),
}

struct Context<'a> {
    models: Vec<&'a ModelBlock>,
    enums: Vec<&'a EnumBlock>,
}

impl<'a> Context<'a> {
    fn model(&self, name: &str) -> Option<&'a ModelBlock> {
        self.models.iter().copied().find(|m| m.name.value == name)
    }

    fn resolve(&self, owner: &ModelBlock, field: &FieldDecl) -> Result<TypeKind<'a>, LowerError> {
        let type_ref = &field.field_type;
        if let Some(db_type) = &type_ref.unsupported {
            return Err(LowerError::UnsupportedType(
                owner.name.value.clone(),
                field.name.value.clone(),
                db_type.clone(),
            ));
        }

        let name = type_ref.name.value.as_str();
        if let Some(scalar) = ScalarType::from_schema_name(name) {
            return Ok(TypeKind::Scalar(scalar));
        }
        if let Some(enum_block) = self.enums.iter().copied().find(|e| e.name.value == name) {
            return Ok(TypeKind::Enum(&enum_block.name.value));
        }
        if let Some(model) = self.model(name) {
            return Ok(TypeKind::Model(model));
        }
        Err(LowerError::UnknownType(
            owner.name.value.clone(),
            field.name.value.clone(),
            name.to_string(),
        ))
    }
}

/// Turn a parsed document into a schema plus its generator blocks.
pub fn lower(document: &Document) -> Result<PrismaSchema, LowerError> {
    let mut context = Context {
        models: Vec::new(),
        enums: Vec::new(),
    };
    let mut generators = Vec::new();

    for block in &document.blocks {
        match block {
            Block::Model(model) => context.models.push(model),
            Block::Enum(enum_block) => context.enums.push(enum_block),
            Block::Generator(generator) => generators.push(lower_generator(generator)),
            Block::Datasource(datasource) => {
                debug!(name = %datasource.name.value, "datasource block ignored");
            }
            Block::Other { keyword, name } => {
                return Err(LowerError::UnsupportedBlock(
                    keyword.clone(),
                    name.value.clone(),
                ));
            }
        }
    }

    let enums = context.enums.iter().map(|e| lower_enum(e)).collect();
    let entities = context
        .models
        .iter()
        .map(|m| lower_model(&context, m))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PrismaSchema {
        schema: Schema { enums, entities },
        generators,
    })
}

fn lower_generator(block: &KeyValueBlock) -> GeneratorBlock {
    let text = |key: &str| block.property(key).and_then(Expr::to_option_string);

    let options = block
        .properties
        .iter()
        .filter(|p| !ENGINE_PROPERTIES.contains(&p.key.value.as_str()))
        .filter_map(|p| match p.value.to_option_string() {
            Some(value) => Some((p.key.value.clone(), value)),
            None => {
                warn!(
                    generator = %block.name.value,
                    option = %p.key.value,
                    "generator option is not a plain value; ignored"
                );
                None
            }
        })
        .collect();

    GeneratorBlock {
        name: block.name.value.clone(),
        provider: text("provider"),
        output: text("output"),
        options,
    }
}

fn lower_enum(block: &EnumBlock) -> EnumDef {
    for attr in &block.attributes {
        warn!(enum_name = %block.name.value, attribute = %attr.name.value, "enum attribute ignored");
    }
    let values = block
        .values
        .iter()
        .map(|v| {
            if v.attributes.iter().any(|a| a.name.value == "map") {
                warn!(
                    enum_name = %block.name.value,
                    value = %v.name.value,
                    "@map on enum values is ignored; the value name is used"
                );
            }
            v.name.value.clone()
        })
        .collect();

    EnumDef {
        name: block.name.value.clone(),
        values,
        description: block.documentation.clone(),
    }
}

fn lower_model(context: &Context<'_>, model: &ModelBlock) -> Result<EntityDef, LowerError> {
    let entity_name = model.name.value.clone();
    let mut entity = EntityDef::new(entity_name.clone());
    entity.description = model.documentation.clone();

    for attr in &model.attributes {
        match attr.name.value.as_str() {
            "map" => {
                let table = string_argument(attr, &entity_name)?;
                entity.table = Some(table);
            }
            "id" => return Err(LowerError::CompositeId(entity_name)),
            other => warn!(model = %entity_name, attribute = %other, "block attribute ignored"),
        }
    }

    // Scalar fields that back a relation; the ORM declares these itself.
    let mut foreign_keys: HashMap<&str, &str> = HashMap::new();
    for field in &model.fields {
        let names = field
            .attribute("relation")
            .and_then(|a| a.argument("fields", false))
            .and_then(Expr::as_constant_list)
            .unwrap_or_default();
        for name in names {
            foreign_keys.insert(name, &field.name.value);
        }
    }

    for field in &model.fields {
        let r#type = match context.resolve(model, field)? {
            TypeKind::Model(target) => {
                if let Some(relation) = lower_relation(context, model, field, target)? {
                    entity.relations.push(relation);
                }
                continue;
            }
            TypeKind::Scalar(scalar) => FieldType::Scalar(scalar),
            TypeKind::Enum(name) => FieldType::Complex(ComplexFieldType::Enum {
                name: name.to_string(),
            }),
        };

        if field.field_type.arity == Arity::List {
            return Err(LowerError::ScalarList(entity_name, field.name.value.clone()));
        }
        if let Some(relation) = foreign_keys.get(field.name.value.as_str()) {
            debug!(
                model = %entity_name,
                field = %field.name.value,
                relation = %relation,
                "foreign key field folded into relation"
            );
            continue;
        }
        entity.fields.push(lower_field(model, field, r#type)?);
    }

    Ok(entity)
}

fn lower_field(
    model: &ModelBlock,
    field: &FieldDecl,
    mut r#type: FieldType,
) -> Result<FieldDef, LowerError> {
    let owner = format!("{}.{}", model.name.value, field.name.value);

    let mut def = FieldDef::new(field.name.value.clone(), r#type.clone());
    def.nullable = field.field_type.arity == Arity::Optional;
    def.description = field.documentation.clone();

    for attr in &field.attributes {
        match attr.name.value.as_str() {
            "id" => def.primary_key = true,
            "unique" => def.unique = true,
            "updatedAt" => def.updated_at = true,
            "map" => def.db_name = Some(string_argument(attr, &owner)?),
            "default" => {
                let expr = attr.argument("value", true).ok_or_else(|| {
                    LowerError::InvalidAttributeArgument(owner.clone(), "default".into())
                })?;
                def.default = lower_default(expr, &owner)?;
            }
            "db.VarChar" | "db.Char" if r#type == FieldType::Scalar(ScalarType::String) => {
                let length = attr.positional(0).and_then(Expr::as_u32).ok_or_else(|| {
                    LowerError::InvalidAttributeArgument(owner.clone(), attr.name.value.clone())
                })?;
                r#type = FieldType::Complex(ComplexFieldType::Varchar { length });
            }
            "db.Decimal" if r#type == FieldType::Scalar(ScalarType::Decimal) => {
                let precision = attr.positional(0).and_then(Expr::as_u32);
                let scale = attr.positional(1).and_then(Expr::as_u32);
                let (Some(precision), Some(scale)) = (precision, scale) else {
                    return Err(LowerError::InvalidAttributeArgument(
                        owner,
                        attr.name.value.clone(),
                    ));
                };
                r#type = FieldType::Complex(ComplexFieldType::Decimal { precision, scale });
            }
            other if other.starts_with("db.") => {
                debug!(field = %owner, attribute = %other, "native type attribute ignored");
            }
            other => warn!(field = %owner, attribute = %other, "field attribute ignored"),
        }
    }

    def.r#type = r#type;
    Ok(def)
}

fn lower_default(expr: &Expr, owner: &str) -> Result<Option<DefaultValue>, LowerError> {
    let value = match expr {
        Expr::Function { name, .. } => match DefaultGenerator::from_function_name(name) {
            Some(generator) => return Ok(Some(DefaultValue::Generator(generator))),
            None => {
                warn!(field = %owner, function = %name, "unsupported default function; ignored");
                return Ok(None);
            }
        },
        Expr::String(s) => Value::String(s.clone()),
        Expr::Constant(c) => Value::String(c.clone()),
        Expr::Boolean(b) => Value::Bool(*b),
        Expr::Number(n) => parse_number(n).ok_or_else(|| {
            LowerError::InvalidAttributeArgument(owner.to_string(), "default".into())
        })?,
        Expr::Array(_) => {
            warn!(field = %owner, "list default ignored");
            return Ok(None);
        }
    };
    Ok(Some(DefaultValue::Literal(value)))
}

fn parse_number(text: &str) -> Option<Value> {
    if let Ok(int) = text.parse::<i64>() {
        return Some(Value::Number(int.into()));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn lower_relation(
    context: &Context<'_>,
    model: &ModelBlock,
    field: &FieldDecl,
    target: &ModelBlock,
) -> Result<Option<RelationDef>, LowerError> {
    let entity_name = &model.name.value;
    let field_name = &field.name.value;
    let owner = format!("{}.{}", entity_name, field_name);
    let attr = field.attribute("relation");
    let relation_name = attr
        .and_then(|a| a.argument("name", true))
        .and_then(Expr::as_str);

    let opposite = find_opposite(model, field, target, relation_name).ok_or_else(|| {
        LowerError::MissingOppositeRelation(
            entity_name.clone(),
            field_name.clone(),
            target.name.value.clone(),
        )
    })?;

    let Some(fields) = attr.and_then(|a| a.argument("fields", false)) else {
        // Back-relation side: the forward side owns the foreign key.
        let opposite_owns_key = opposite
            .attribute("relation")
            .is_some_and(|a| a.argument("fields", false).is_some());
        if !opposite_owns_key {
            if field.field_type.arity == Arity::List && opposite.field_type.arity == Arity::List {
                return Err(LowerError::ManyToMany(
                    entity_name.clone(),
                    field_name.clone(),
                    target.name.value.clone(),
                ));
            }
            return Err(LowerError::MissingReferences(
                entity_name.clone(),
                field_name.clone(),
            ));
        }
        debug!(field = %owner, "back-relation field; reverse accessor is derived");
        return Ok(None);
    };

    if field.field_type.arity == Arity::List {
        return Err(LowerError::ListWithForeignKey(
            entity_name.clone(),
            field_name.clone(),
        ));
    }

    let invalid = || LowerError::InvalidAttributeArgument(owner.clone(), "relation".into());
    let fields = fields.as_constant_list().ok_or_else(invalid)?;
    let references = attr
        .and_then(|a| a.argument("references", false))
        .ok_or_else(|| LowerError::MissingReferences(entity_name.clone(), field_name.clone()))?
        .as_constant_list()
        .ok_or_else(invalid)?;
    let ([fk_name], [reference]) = (fields.as_slice(), references.as_slice()) else {
        return Err(LowerError::CompositeRelation(
            entity_name.clone(),
            field_name.clone(),
        ));
    };

    let fk = model
        .field(fk_name)
        .filter(|f| !matches!(context.resolve(model, f), Ok(TypeKind::Model(_)) | Err(_)))
        .ok_or_else(|| {
            LowerError::UnknownForeignKeyField(
                entity_name.clone(),
                field_name.clone(),
                fk_name.to_string(),
            )
        })?;

    let on_delete = match attr
        .and_then(|a| a.argument("onDelete", false))
        .map(|e| e.as_constant().ok_or_else(invalid))
        .transpose()?
    {
        Some(action) => Some(ReferenceAction::parse(action).ok_or_else(|| {
            LowerError::InvalidReferentialAction(
                entity_name.clone(),
                field_name.clone(),
                action.to_string(),
            )
        })?),
        None => None,
    };
    if attr.is_some_and(|a| a.argument("onUpdate", false).is_some()) {
        debug!(field = %owner, "onUpdate has no ORM counterpart; ignored");
    }

    let source_field = match fk.attribute("map") {
        Some(map) => string_argument(map, &owner)?,
        None => fk.name.value.clone(),
    };

    let kind = if opposite.field_type.arity == Arity::List {
        RelationKind::ForeignKey
    } else {
        RelationKind::OneToOne
    };

    let mut relation = RelationDef::new(field_name.clone(), kind, target.name.value.clone());
    relation.nullable = field.field_type.arity == Arity::Optional;
    relation.source_field = Some(source_field);
    relation.to_field = Some(reference.to_string());
    relation.on_delete = on_delete;
    relation.related_name = Some(opposite.name.value.clone());
    relation.description = field.documentation.clone();
    Ok(Some(relation))
}

/// The field on `target` pointing back at `model` through the same relation.
fn find_opposite<'a>(
    model: &ModelBlock,
    field: &FieldDecl,
    target: &'a ModelBlock,
    relation_name: Option<&str>,
) -> Option<&'a FieldDecl> {
    let self_relation = model.name.value == target.name.value;
    target.fields.iter().find(|candidate| {
        candidate.field_type.name.value == model.name.value
            && !(self_relation && candidate.name.value == field.name.value)
            && candidate
                .attribute("relation")
                .and_then(|a| a.argument("name", true))
                .and_then(Expr::as_str)
                == relation_name
    })
}

fn string_argument(attr: &Attribute, owner: &str) -> Result<String, LowerError> {
    attr.argument("name", true)
        .and_then(Expr::as_str)
        .map(str::to_string)
        .ok_or_else(|| LowerError::InvalidAttributeArgument(owner.to_string(), attr.name.value.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prisma::parse_schema;
    use crate::error::PrismaError;
    use serde_json::json;

    const SCHEMA: &str = r#"
generator tortoise {
  provider = "tortoise-gen"
  output   = "./generated"
  appName  = "app"
  createPyPackageInitFile = false
  previewFeatures = ["fullTextSearch"]
}

/// model comment
model User {
  /// field comment
  id          Int      @id @default(autoincrement())
  email       String   @unique
  weight      Float?
  is18        Boolean?
  name        String?  @db.VarChar(80)
  wallet      Decimal  @db.Decimal(10, 4)
  successorId Int?     @unique
  successor   User?    @relation("UserSuccessor", fields: [successorId], references: [id])
  predecessor User?    @relation("UserSuccessor")
  role        Role     @default(USER)
  posts       Post[]
  biography   Json     @default("{}")
  createdAt   DateTime @default(now())
  updatedAt   DateTime @updatedAt @map("updated")

  @@map("users")
}

model Post {
  id       Int   @id @default(autoincrement())
  authorId Int?  @map("author")
  user     User? @relation(fields: [authorId], references: [id], onDelete: SetNull)
}

enum Role {
  USER
  ADMIN
}
"#;

    fn lowered() -> PrismaSchema {
        parse_schema(SCHEMA).unwrap()
    }

    fn lower_err(source: &str) -> LowerError {
        match parse_schema(source).unwrap_err() {
            PrismaError::Lower(err) => err,
            other => panic!("expected lowering error, got {other:?}"),
        }
    }

    #[test]
    fn test_generator_options_exclude_engine_properties() {
        let generators = lowered().generators;
        assert_eq!(generators.len(), 1);
        let generator = &generators[0];
        assert_eq!(generator.name, "tortoise");
        assert_eq!(generator.provider.as_deref(), Some("tortoise-gen"));
        assert_eq!(generator.output.as_deref(), Some("./generated"));
        assert_eq!(
            generator.options().collect::<Vec<_>>(),
            vec![("appName", "app"), ("createPyPackageInitFile", "false")]
        );
    }

    #[test]
    fn test_scalar_fields() {
        let schema = lowered().schema;
        let user = schema.entity("User").unwrap();

        assert_eq!(user.table.as_deref(), Some("users"));
        assert_eq!(user.description.as_deref(), Some("model comment"));

        let names: Vec<_> = user.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "id", "email", "weight", "is18", "name", "wallet", "role", "biography",
                "createdAt", "updatedAt"
            ]
        );

        let id = user.field("id").unwrap();
        assert!(id.primary_key);
        assert!(id.is_autoincrement());
        assert_eq!(id.description.as_deref(), Some("field comment"));

        assert!(user.field("email").unwrap().unique);
        assert!(user.field("weight").unwrap().nullable);
        assert_eq!(
            user.field("name").unwrap().r#type,
            FieldType::Complex(ComplexFieldType::Varchar { length: 80 })
        );
        assert_eq!(
            user.field("wallet").unwrap().r#type,
            FieldType::Complex(ComplexFieldType::Decimal {
                precision: 10,
                scale: 4
            })
        );

        let role = user.field("role").unwrap();
        assert_eq!(role.r#type.enum_name(), Some("Role"));
        assert_eq!(role.default, Some(DefaultValue::Literal(json!("USER"))));

        assert_eq!(
            user.field("biography").unwrap().default,
            Some(DefaultValue::Literal(json!("{}")))
        );
        assert_eq!(
            user.field("createdAt").unwrap().default,
            Some(DefaultValue::Generator(DefaultGenerator::Now))
        );
        let updated = user.field("updatedAt").unwrap();
        assert!(updated.updated_at);
        assert_eq!(updated.db_name.as_deref(), Some("updated"));
    }

    #[test]
    fn test_self_relation_is_one_to_one() {
        let schema = lowered().schema;
        let user = schema.entity("User").unwrap();

        assert_eq!(user.relations.len(), 1);
        let successor = &user.relations[0];
        assert_eq!(successor.name, "successor");
        assert_eq!(successor.kind, RelationKind::OneToOne);
        assert!(successor.nullable);
        assert_eq!(successor.source_field.as_deref(), Some("successorId"));
        assert_eq!(successor.to_field.as_deref(), Some("id"));
        assert_eq!(successor.related_name.as_deref(), Some("predecessor"));
        assert!(user.field("successorId").is_none());
    }

    #[test]
    fn test_foreign_key_relation_uses_mapped_column() {
        let schema = lowered().schema;
        let post = schema.entity("Post").unwrap();

        assert_eq!(post.fields.len(), 1);
        let user = post.relation("user").unwrap();
        assert_eq!(user.kind, RelationKind::ForeignKey);
        assert_eq!(user.source_field.as_deref(), Some("author"));
        assert_eq!(user.on_delete, Some(ReferenceAction::SetNull));
        assert_eq!(user.related_name.as_deref(), Some("posts"));

        let reverse: Vec<_> = schema
            .reverse_relations("User")
            .iter()
            .map(|r| r.name())
            .collect();
        assert_eq!(reverse, vec!["predecessor", "posts"]);
    }

    #[test]
    fn test_enums() {
        let schema = lowered().schema;
        assert_eq!(schema.enums.len(), 1);
        assert_eq!(schema.enums[0].values, vec!["USER", "ADMIN"]);
    }

    #[test]
    fn test_literal_defaults() {
        let schema = parse_schema(
            r#"model Counter {
  id    BigInt  @id
  hits  Int     @default(0)
  ratio Float   @default(0.5)
  on    Boolean @default(true)
  tag   String  @default("a")
  uid   String  @default(uuid())
  cuid  String  @default(cuid())
  seq   Int     @default(sequence())
}"#,
        )
        .unwrap()
        .schema;
        let counter = schema.entity("Counter").unwrap();
        let default = |name: &str| counter.field(name).unwrap().default.clone();

        assert_eq!(default("hits"), Some(DefaultValue::Literal(json!(0))));
        assert_eq!(default("ratio"), Some(DefaultValue::Literal(json!(0.5))));
        assert_eq!(default("on"), Some(DefaultValue::Literal(json!(true))));
        assert_eq!(default("tag"), Some(DefaultValue::Literal(json!("a"))));
        assert_eq!(
            default("uid"),
            Some(DefaultValue::Generator(DefaultGenerator::Uuid))
        );
        assert_eq!(
            default("cuid"),
            Some(DefaultValue::Generator(DefaultGenerator::Cuid))
        );
        assert_eq!(default("seq"), None);
    }

    #[test]
    fn test_rejects_composite_id() {
        let err = lower_err(
            "model Like {\n  a Int\n  b Int\n  @@id([a, b])\n}",
        );
        assert_eq!(err, LowerError::CompositeId("Like".into()));
    }

    #[test]
    fn test_rejects_scalar_list() {
        let err = lower_err("model Tag {\n  id Int @id\n  names String[]\n}");
        assert_eq!(err, LowerError::ScalarList("Tag".into(), "names".into()));
    }

    #[test]
    fn test_rejects_unknown_type() {
        let err = lower_err("model Tag {\n  id Uuid @id\n}");
        assert_eq!(
            err,
            LowerError::UnknownType("Tag".into(), "id".into(), "Uuid".into())
        );
    }

    #[test]
    fn test_rejects_unsupported_type() {
        let err = lower_err("model Place {\n  id Int @id\n  geo Unsupported(\"point\")\n}");
        assert_eq!(
            err,
            LowerError::UnsupportedType("Place".into(), "geo".into(), "point".into())
        );
    }

    #[test]
    fn test_rejects_many_to_many() {
        let err = lower_err(
            "model Post {\n  id Int @id\n  tags Tag[]\n}\nmodel Tag {\n  id Int @id\n  posts Post[]\n}",
        );
        assert_eq!(
            err,
            LowerError::ManyToMany("Post".into(), "tags".into(), "Tag".into())
        );
    }

    #[test]
    fn test_rejects_missing_opposite() {
        let err = lower_err(
            "model Post {\n  id Int @id\n  userId Int\n  user User @relation(fields: [userId], references: [id])\n}\nmodel User {\n  id Int @id\n}",
        );
        assert_eq!(
            err,
            LowerError::MissingOppositeRelation("Post".into(), "user".into(), "User".into())
        );
    }

    #[test]
    fn test_rejects_composite_relation() {
        let err = lower_err(
            "model Post {\n  id Int @id\n  a Int\n  b Int\n  user User @relation(fields: [a, b], references: [x, y])\n}\nmodel User {\n  id Int @id\n  posts Post[]\n}",
        );
        assert_eq!(
            err,
            LowerError::CompositeRelation("Post".into(), "user".into())
        );
    }

    #[test]
    fn test_rejects_unknown_referential_action() {
        let err = lower_err(
            "model Post {\n  id Int @id\n  userId Int\n  user User @relation(fields: [userId], references: [id], onDelete: Explode)\n}\nmodel User {\n  id Int @id\n  posts Post[]\n}",
        );
        assert_eq!(
            err,
            LowerError::InvalidReferentialAction("Post".into(), "user".into(), "Explode".into())
        );
    }

    #[test]
    fn test_rejects_type_blocks() {
        let err = lower_err("type Address {\n  street String\n}");
        assert_eq!(
            err,
            LowerError::UnsupportedBlock("type".into(), "Address".into())
        );
    }
}
