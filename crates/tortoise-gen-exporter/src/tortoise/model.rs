use tortoise_gen_core::{EntityDef, ExtensionClass, FieldDef, RelationDef, ReverseRelation};
use tortoise_gen_naming::foreign_key_attribute;
use tracing::{debug, info, warn};

use crate::error::ExportError;
use crate::naming::{NameRegistry, check_identifier};
use crate::python::{INDENT, push_docstring, string_literal};
use crate::tortoise::field::{
    field_declaration, field_doc, relation_declaration, relation_doc, reverse_declaration,
    reverse_doc,
};
use crate::tortoise::{EXTENSION_ALIAS, RenderContext, UsedImports};

enum Member<'a> {
    Field(&'a FieldDef),
    Relation(&'a RelationDef),
    Reverse(ReverseRelation<'a>),
}

/// A class member and the Python attribute it becomes.
struct NamedMember<'a> {
    py_name: String,
    member: Member<'a>,
}

impl NamedMember<'_> {
    fn label(&self) -> String {
        match &self.member {
            Member::Field(f) => f.name.clone(),
            Member::Relation(r) => r.name.clone(),
            Member::Reverse(r) => format!(
                "{} (reverse of {}.{})",
                r.name(),
                r.source.name,
                r.relation.name
            ),
        }
    }
}

/// Fields, then forward relations, then reverse accessors, with their
/// Python names checked for clashes.
fn collect_members<'a>(
    ctx: &RenderContext<'a>,
    entity: &'a EntityDef,
) -> Result<Vec<NamedMember<'a>>, ExportError> {
    let naming = &ctx.naming;
    let mut members: Vec<NamedMember<'a>> = Vec::new();
    members.extend(entity.fields.iter().map(|f| NamedMember {
        py_name: naming.value_name(&f.name),
        member: Member::Field(f),
    }));
    members.extend(entity.relations.iter().map(|r| NamedMember {
        py_name: naming.value_name(&r.name),
        member: Member::Relation(r),
    }));
    members.extend(
        ctx.schema
            .reverse_relations(&entity.name)
            .into_iter()
            .map(|r| NamedMember {
                py_name: naming.value_name(&r.name()),
                member: Member::Reverse(r),
            }),
    );

    let mut registry = NameRegistry::default();
    let mut claim = |name: &str, label: String| match registry.claim(name, &label) {
        Some(first) => Err(ExportError::MemberNameCollision {
            entity: entity.name.clone(),
            name: name.to_string(),
            first,
            second: label,
        }),
        None => Ok(()),
    };

    for member in &members {
        check_identifier(&entity.name, &member.py_name)?;
        claim(&member.py_name, member.label())?;
        // The ORM adds `<relation>_id` next to every forward relation.
        if let Member::Relation(relation) = &member.member {
            claim(
                &foreign_key_attribute(&member.py_name),
                format!("{} (key attribute)", relation.name),
            )?;
        }
    }

    Ok(members)
}

pub(crate) fn render_model(
    ctx: &RenderContext<'_>,
    entity: &EntityDef,
    class_name: &str,
    imports: &mut UsedImports,
) -> Result<Vec<String>, ExportError> {
    let members = collect_members(ctx, entity)?;
    let extension = ctx.extension_class(class_name);
    info!(entity = %entity.name, class = %class_name, members = members.len(), "rendering model");

    let bases = match extension {
        Some(ext) => {
            imports.extension = true;
            format!("{}.{}, Model", EXTENSION_ALIAS, ext.name)
        }
        None => "Model".to_string(),
    };
    let mut lines = vec![format!("class {}({}):", class_name, bases)];

    let mut doc = Vec::new();
    if let Some(description) = &entity.description {
        doc.push(description.clone());
        doc.push(String::new());
    }
    doc.push("fields:".to_string());
    for named in &members {
        doc.extend(match &named.member {
            Member::Field(f) => field_doc(&ctx.naming, f),
            Member::Relation(r) => relation_doc(r),
            Member::Reverse(r) => reverse_doc(r),
        });
    }
    push_docstring(&mut lines, INDENT, &doc);

    for named in &members {
        if let Some(ext) = extension.filter(|e| e.declares(&named.py_name)) {
            warn!(
                entity = %entity.name,
                attribute = %named.py_name,
                extension = %ext.name,
                "hand-written attribute overrides the generated one"
            );
            continue;
        }
        let line = match &named.member {
            Member::Field(f) => field_declaration(ctx, &entity.name, f, &named.py_name, imports),
            Member::Relation(r) => {
                relation_declaration(ctx, &entity.name, r, &named.py_name, imports)
            }
            Member::Reverse(r) => reverse_declaration(&ctx.naming, r, &named.py_name),
        };
        lines.push(format!("{INDENT}{line}"));
    }

    lines.push(String::new());
    lines.extend(meta_block(entity, extension));

    if extension.is_some_and(|e| e.declares("__str__")) {
        debug!(entity = %entity.name, "hand-written __str__ kept");
    } else {
        let pk = entity
            .primary_key()
            .map(|f| ctx.naming.value_name(&f.name))
            .unwrap_or_else(|| "pk".to_string());
        lines.push(String::new());
        lines.push(format!("{INDENT}def __str__(self) -> str:"));
        lines.push(format!(
            "{INDENT}{INDENT}return f'{}<{{self.{}}}>'",
            class_name, pk
        ));
    }

    Ok(lines)
}

/// Nested `Meta`. It subclasses the hand-written `Meta` when there is one and
/// leaves out the keys that one defines.
fn meta_block(entity: &EntityDef, extension: Option<&ExtensionClass>) -> Vec<String> {
    let inherited = extension.and_then(|ext| ext.block("Meta").map(|meta| (ext, meta)));

    let mut lines = vec![match inherited {
        Some((ext, _)) => format!("{INDENT}class Meta({}.{}.Meta):", EXTENSION_ALIAS, ext.name),
        None => format!("{INDENT}class Meta:"),
    }];

    if inherited.is_some_and(|(_, meta)| meta.defines("table")) {
        warn!(entity = %entity.name, "hand-written Meta.table overrides the schema table name");
    } else {
        lines.push(format!(
            "{INDENT}{INDENT}table = {}",
            string_literal(entity.table_name())
        ));
    }

    if lines.len() == 1 {
        lines.push(format!("{INDENT}{INDENT}pass"));
    }
    lines
}
