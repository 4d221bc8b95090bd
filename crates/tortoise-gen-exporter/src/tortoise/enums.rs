use tortoise_gen_core::EnumDef;

use crate::error::ExportError;
use crate::naming::check_identifier;
use crate::python::{INDENT, push_docstring, string_literal};

/// `class <Enum>(str, Enum)` whose members are their own names.
pub(crate) fn render_enum(enum_def: &EnumDef, class_name: &str) -> Result<Vec<String>, ExportError> {
    for value in &enum_def.values {
        check_identifier(&enum_def.name, value)?;
    }

    let mut doc = Vec::new();
    if let Some(description) = &enum_def.description {
        doc.push(description.clone());
        doc.push(String::new());
    }
    doc.extend(enum_def.values.iter().map(|v| format!("- {}", v)));

    let mut lines = vec![format!("class {}(str, Enum):", class_name)];
    push_docstring(&mut lines, INDENT, &doc);
    for value in &enum_def.values {
        lines.push(format!("{INDENT}{} = {}", value, string_literal(value)));
    }
    Ok(lines)
}
