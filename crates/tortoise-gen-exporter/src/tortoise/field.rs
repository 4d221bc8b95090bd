//! Declarations and docstring lines for fields, relations and reverse
//! accessors.

use serde_json::Value;
use tortoise_gen_core::{
    ComplexFieldType, DefaultGenerator, DefaultValue, FieldDef, FieldType, ReferenceAction,
    RelationDef, ReverseRelation, ScalarType,
};
use tortoise_gen_naming::{build_model_reference, to_screaming_snake_case};
use tracing::{debug, warn};

use crate::naming::Naming;
use crate::python::{string_literal, value_literal};
use crate::tortoise::{RenderContext, UsedImports};

fn field_class(r#type: &FieldType) -> &'static str {
    match r#type {
        FieldType::Scalar(ty) => match ty {
            ScalarType::Int => "IntField",
            ScalarType::BigInt => "BigIntField",
            ScalarType::Float => "FloatField",
            ScalarType::Decimal => "DecimalField",
            ScalarType::Boolean => "BooleanField",
            ScalarType::String => "CharField",
            ScalarType::DateTime => "DatetimeField",
            ScalarType::Json => "JSONField",
            ScalarType::Bytes => "BinaryField",
        },
        FieldType::Complex(ty) => match ty {
            ComplexFieldType::Varchar { .. } => "CharField",
            ComplexFieldType::Decimal { .. } => "DecimalField",
            ComplexFieldType::Enum { .. } => "CharEnumField",
        },
    }
}

fn is_string(r#type: &FieldType) -> bool {
    matches!(
        r#type,
        FieldType::Scalar(ScalarType::String) | FieldType::Complex(ComplexFieldType::Varchar { .. })
    )
}

fn type_args(ctx: &RenderContext<'_>, r#type: &FieldType) -> Vec<String> {
    let defaults = ctx.config.field_defaults();
    match r#type {
        FieldType::Scalar(ScalarType::String) => {
            vec![format!("max_length={}", defaults.string_max_length)]
        }
        FieldType::Scalar(ScalarType::Decimal) => vec![
            format!("max_digits={}", defaults.decimal_max_digits),
            format!("decimal_places={}", defaults.decimal_places),
        ],
        FieldType::Complex(ComplexFieldType::Varchar { length }) => {
            vec![format!("max_length={}", length)]
        }
        FieldType::Complex(ComplexFieldType::Decimal { precision, scale }) => vec![
            format!("max_digits={}", precision),
            format!("decimal_places={}", scale),
        ],
        FieldType::Complex(ComplexFieldType::Enum { name }) => {
            vec![format!("enum_type={}", ctx.naming.class_name(name))]
        }
        FieldType::Scalar(_) => Vec::new(),
    }
}

/// Python expression for a literal default.
fn literal_default(naming: &Naming, field: &FieldDef, value: &Value) -> String {
    match (&field.r#type, value) {
        (FieldType::Complex(ComplexFieldType::Enum { name }), Value::String(member)) => {
            format!("{}.{}", naming.class_name(name), member)
        }
        (FieldType::Scalar(ScalarType::Json), Value::String(text)) => {
            match serde_json::from_str::<Value>(text) {
                Ok(parsed) => value_literal(&parsed),
                Err(_) => string_literal(text),
            }
        }
        (ty, Value::String(text)) if ty.is_integer() => match text.parse::<i64>() {
            Ok(n) => n.to_string(),
            Err(_) => string_literal(text),
        },
        _ => value_literal(value),
    }
}

/// Text shown after `- default:` in the docstring.
pub(crate) fn default_doc(naming: &Naming, field: &FieldDef) -> Option<String> {
    field.default.as_ref().map(|default| match default {
        DefaultValue::Generator(generator) => format!("{}()", generator.function_name()),
        DefaultValue::Literal(value) => literal_default(naming, field, value),
    })
}

fn default_args(
    ctx: &RenderContext<'_>,
    owner: &str,
    field: &FieldDef,
    imports: &mut UsedImports,
) -> Vec<String> {
    let Some(default) = &field.default else {
        return Vec::new();
    };

    match default {
        // The ORM generates integer primary keys by default.
        DefaultValue::Generator(DefaultGenerator::Autoincrement) if field.primary_key => Vec::new(),
        DefaultValue::Generator(DefaultGenerator::Autoincrement) => vec!["generated=True".into()],
        DefaultValue::Generator(DefaultGenerator::DbGenerated) => vec!["generated=True".into()],
        // `auto_now` below already stamps creation.
        DefaultValue::Generator(DefaultGenerator::Now) if field.updated_at && field.r#type.is_datetime() => {
            Vec::new()
        }
        DefaultValue::Generator(DefaultGenerator::Now) if field.r#type.is_datetime() => {
            vec!["auto_now_add=True".into()]
        }
        DefaultValue::Generator(DefaultGenerator::Uuid) if is_string(&field.r#type) => {
            imports.uuid = true;
            vec!["default=lambda: str(uuid.uuid4())".into()]
        }
        DefaultValue::Generator(generator) => {
            warn!(
                field = %owner,
                default = %generator.function_name(),
                "default has no Tortoise counterpart for this field type; documented only"
            );
            Vec::new()
        }
        DefaultValue::Literal(value) => {
            let literal = literal_default(&ctx.naming, field, value);
            // Mutable JSON defaults are built per instance.
            if matches!(field.r#type, FieldType::Scalar(ScalarType::Json))
                && literal.starts_with(['[', '{'])
            {
                vec![format!("default=lambda: {}", literal)]
            } else {
                vec![format!("default={}", literal)]
            }
        }
    }
}

/// `name = fields.XField(...)` for a scalar field.
pub(crate) fn field_declaration(
    ctx: &RenderContext<'_>,
    entity: &str,
    field: &FieldDef,
    py_name: &str,
    imports: &mut UsedImports,
) -> String {
    let owner = format!("{}.{}", entity, field.name);
    let mut args: Vec<String> = Vec::new();

    if let Some(column) = &field.db_name {
        args.push(format!("source_field={}", string_literal(column)));
    }

    if field.primary_key {
        args.push("pk=True".into());
        if field.r#type.is_integer() && !field.is_autoincrement() {
            args.push("generated=False".into());
        }
    }

    args.extend(type_args(ctx, &field.r#type));
    args.extend(default_args(ctx, &owner, field, imports));

    if field.updated_at {
        if field.r#type.is_datetime() {
            args.push("auto_now=True".into());
        } else {
            warn!(field = %owner, "updated-at on a non-datetime field ignored");
        }
    }
    if field.unique {
        args.push("unique=True".into());
    }
    if field.nullable {
        args.push("null=True".into());
    }
    if let Some(description) = &field.description {
        args.push(format!("description={}", string_literal(description)));
    }

    debug!(field = %owner, attribute = %py_name, "field rendered");
    format!(
        "{} = fields.{}({})",
        py_name,
        field_class(&field.r#type),
        args.join(", ")
    )
}

fn on_delete_constant(action: ReferenceAction) -> String {
    format!("fields.{}", to_screaming_snake_case(action.as_str()))
}

/// Annotated `fields.ForeignKeyField` / `fields.OneToOneField` declaration.
pub(crate) fn relation_declaration(
    ctx: &RenderContext<'_>,
    entity: &str,
    relation: &RelationDef,
    py_name: &str,
    imports: &mut UsedImports,
) -> String {
    let naming = &ctx.naming;
    let target_class = naming.class_name(&relation.target);
    let (field_fn, annotation) = if relation.is_one_to_one() {
        ("OneToOneField", "OneToOneRelation")
    } else {
        ("ForeignKeyField", "ForeignKeyRelation")
    };

    let mut args = vec![
        format!("source_field={}", string_literal(&relation.source_column())),
        format!(
            "model_name={}",
            string_literal(&build_model_reference(&ctx.config.app_name, &target_class))
        ),
    ];

    let to_field = ctx
        .schema
        .relation_target_field(relation)
        .map(|f| f.name.as_str())
        .or(relation.to_field.as_deref());
    if let Some(to_field) = to_field {
        args.push(format!(
            "to_field={}",
            string_literal(&naming.value_name(to_field))
        ));
    }

    args.push(format!(
        "related_name={}",
        string_literal(&naming.value_name(&relation.reverse_name(entity)))
    ));
    if let Some(action) = relation.on_delete.filter(|a| *a != ReferenceAction::NoAction) {
        args.push(format!("on_delete={}", on_delete_constant(action)));
    }
    if relation.nullable {
        args.push("null=True".into());
    }
    if let Some(description) = &relation.description {
        args.push(format!("description={}", string_literal(description)));
    }

    imports.typing = true;
    debug!(relation = %format!("{}.{}", entity, relation.name), target = %relation.target, "relation rendered");
    format!(
        "{}: fields.{}[typing.Union[{}, typing.Any]] = fields.{}({})",
        py_name,
        annotation,
        string_literal(&target_class),
        field_fn,
        args.join(", ")
    )
}

/// Annotation-only reverse accessor.
pub(crate) fn reverse_declaration(naming: &Naming, reverse: &ReverseRelation<'_>, py_name: &str) -> String {
    let annotation = if reverse.is_collection() {
        "ReverseRelation"
    } else {
        "BackwardOneToOneRelation"
    };
    format!(
        "{}: fields.{}[{}]",
        py_name,
        annotation,
        string_literal(&naming.class_name(&reverse.source.name))
    )
}

fn emoji(r#type: &FieldType) -> &'static str {
    match r#type {
        FieldType::Scalar(ScalarType::Int | ScalarType::BigInt | ScalarType::Float | ScalarType::Decimal)
        | FieldType::Complex(ComplexFieldType::Decimal { .. }) => "🔟",
        FieldType::Scalar(ScalarType::Boolean) => "✅",
        FieldType::Scalar(ScalarType::String) | FieldType::Complex(ComplexFieldType::Varchar { .. }) => "🆎",
        FieldType::Scalar(ScalarType::DateTime) => "🕑",
        FieldType::Scalar(ScalarType::Bytes) => "💾",
        _ => "🪢",
    }
}

const RELATION_EMOJI: &str = "🪢";

fn doc_line(emoji: &str, required: bool, name: &str, type_label: &str) -> String {
    format!(
        "- {} {}{} [{}]",
        emoji,
        if required { "*" } else { "" },
        name,
        type_label
    )
}

fn push_description(lines: &mut Vec<String>, description: Option<&str>) {
    if let Some(description) = description {
        lines.push(format!("  - doc: {}", description.replace('\n', " ")));
    }
}

pub(crate) fn field_doc(naming: &Naming, field: &FieldDef) -> Vec<String> {
    let mut head = doc_line(
        emoji(&field.r#type),
        field.is_required(),
        &field.name,
        &format!(
            "{}{}",
            field.r#type.schema_name(),
            if field.nullable { "?" } else { "" }
        ),
    );
    if field.primary_key {
        head.push_str(" 🔑");
    }
    if field.unique {
        head.push_str(" 📌");
    }

    let mut lines = vec![head];
    if let Some(default) = default_doc(naming, field) {
        lines.push(format!("  - default: {}", default));
    }
    push_description(&mut lines, field.description.as_deref());
    lines
}

pub(crate) fn relation_doc(relation: &RelationDef) -> Vec<String> {
    let mut lines = vec![doc_line(
        RELATION_EMOJI,
        !relation.nullable,
        &relation.name,
        &format!(
            "{}{}",
            relation.target,
            if relation.nullable { "?" } else { "" }
        ),
    )];
    push_description(&mut lines, relation.description.as_deref());
    lines
}

pub(crate) fn reverse_doc(reverse: &ReverseRelation<'_>) -> Vec<String> {
    vec![doc_line(RELATION_EMOJI, false, &reverse.name(), &reverse.source.name)]
}
