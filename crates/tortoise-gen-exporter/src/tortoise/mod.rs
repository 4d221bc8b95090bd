//! Tortoise ORM module rendering.
//!
//! One module holds every enum and model of the schema, in declaration order:
//! enums first, then models. Output depends only on the schema, the config
//! and the extension outline, so rendering twice yields identical text.

pub mod enums;
pub mod field;
pub mod model;

use tortoise_gen_config::GeneratorConfig;
use tortoise_gen_core::{ExtensionClass, ExtensionModule, Schema};
use tracing::{debug, warn};

use crate::error::ExportError;
use crate::naming::{NameRegistry, Naming, check_identifier};
use crate::python::string_literal;

use self::enums::render_enum;
use self::model::render_model;

pub const GENERATOR_NAME: &str = "tortoise-gen";
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Alias the hand-written module is imported under.
pub const EXTENSION_ALIAS: &str = "_extension";

/// Module-level names the generated file binds itself.
const RESERVED_NAMES: &[&str] = &["Enum", "Model", "fields", "typing", "uuid", EXTENSION_ALIAS];

/// Imports requested while rendering class bodies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UsedImports {
    pub typing: bool,
    pub uuid: bool,
    pub enums: bool,
    pub extension: bool,
}

/// Everything a class renderer needs to look up.
pub(crate) struct RenderContext<'a> {
    pub schema: &'a Schema,
    pub config: &'a GeneratorConfig,
    pub naming: Naming,
    pub extension: Option<&'a ExtensionModule>,
}

impl<'a> RenderContext<'a> {
    pub fn extension_class(&self, class_name: &str) -> Option<&'a ExtensionClass> {
        self.extension.and_then(|module| module.class(class_name))
    }
}

/// Render the models module for `schema`.
pub fn render_module(
    schema: &Schema,
    config: &GeneratorConfig,
    extension: Option<&ExtensionModule>,
) -> Result<String, ExportError> {
    let ctx = RenderContext {
        schema,
        config,
        naming: Naming::new(config),
        extension,
    };

    let class_names = class_names(&ctx)?;
    let (enum_names, model_names) = class_names.split_at(schema.enums.len());
    warn_unmatched_extension(&ctx, model_names);

    let mut imports = UsedImports::default();
    let mut blocks = Vec::with_capacity(class_names.len());
    for (enum_def, name) in schema.enums.iter().zip(enum_names) {
        imports.enums = true;
        blocks.push(render_enum(enum_def, name)?);
    }
    for (entity, name) in schema.entities.iter().zip(model_names) {
        blocks.push(render_model(&ctx, entity, name, &mut imports)?);
    }
    debug!(?imports, "imports collected");

    let mut lines = header_lines();
    lines.push(String::new());
    lines.extend(import_lines(&imports, extension));
    for block in blocks {
        lines.push(String::new());
        lines.push(String::new());
        lines.extend(block);
    }
    lines.push(String::new());
    lines.push(String::new());
    let exported: Vec<String> = class_names.iter().map(|n| string_literal(n)).collect();
    lines.push(format!("__all__ = [{}]", exported.join(", ")));

    let mut module = lines.join("\n");
    module.push('\n');
    Ok(module)
}

/// Class names of enums then entities, checked for clashes with each other
/// and with the module's own imports.
fn class_names(ctx: &RenderContext<'_>) -> Result<Vec<String>, ExportError> {
    let mut registry = NameRegistry::default();
    for name in RESERVED_NAMES {
        registry.claim(name, &format!("import {}", name));
    }

    let declared = ctx
        .schema
        .enums
        .iter()
        .map(|e| e.name.as_str())
        .chain(ctx.schema.entities.iter().map(|e| e.name.as_str()));

    let mut names = Vec::new();
    for original in declared {
        let class_name = ctx.naming.class_name(original);
        check_identifier(original, &class_name)?;
        if let Some(first) = registry.claim(&class_name, original) {
            return Err(ExportError::ClassNameCollision {
                name: class_name,
                first,
                second: original.to_string(),
            });
        }
        names.push(class_name);
    }
    Ok(names)
}

fn warn_unmatched_extension(ctx: &RenderContext<'_>, model_names: &[String]) {
    let Some(module) = ctx.extension else {
        return;
    };
    for class in &module.classes {
        if !model_names.contains(&class.name) {
            warn!(
                module = %module.module,
                class = %class.name,
                "hand-written class matches no model and is not composed"
            );
        }
    }
}

fn header_lines() -> Vec<String> {
    vec![
        "__doc__ = '''".to_string(),
        format!(
            "This file is generated by {} ({}).",
            GENERATOR_NAME, GENERATOR_VERSION
        ),
        "Please do not modify it directly.".to_string(),
        "'''".to_string(),
    ]
}

fn import_lines(imports: &UsedImports, extension: Option<&ExtensionModule>) -> Vec<String> {
    let mut lines = Vec::new();
    if imports.typing {
        lines.push("import typing".to_string());
    }
    if imports.uuid {
        lines.push("import uuid".to_string());
    }
    if imports.enums {
        lines.push("from enum import Enum".to_string());
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }

    lines.push("from tortoise import fields".to_string());
    lines.push("from tortoise.models import Model".to_string());

    if let Some(module) = extension.filter(|_| imports.extension) {
        lines.push(String::new());
        lines.push(format!("import {} as {}", module.module, EXTENSION_ALIAS));
    }
    lines
}
