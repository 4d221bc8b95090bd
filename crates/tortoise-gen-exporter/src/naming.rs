use std::collections::BTreeMap;

use tortoise_gen_config::GeneratorConfig;
use tortoise_gen_naming::{to_pascal_case, to_snake_case};

use crate::error::ExportError;
use crate::python::is_identifier;

/// Python names for schema names, following the configured casing.
#[derive(Debug, Clone, Copy)]
pub struct Naming {
    pascal_classes: bool,
    snake_values: bool,
}

impl Naming {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            pascal_classes: config.class_name_pascal_case,
            snake_values: config.value_name_snake_case,
        }
    }

    pub fn class_name(&self, name: &str) -> String {
        if self.pascal_classes {
            to_pascal_case(name)
        } else {
            name.to_string()
        }
    }

    pub fn value_name(&self, name: &str) -> String {
        if self.snake_values {
            to_snake_case(name)
        } else {
            name.to_string()
        }
    }
}

/// Records converted names and reports the first pair that collides.
#[derive(Debug, Default)]
pub struct NameRegistry {
    seen: BTreeMap<String, String>,
}

impl NameRegistry {
    /// Register `converted` as the Python name of `original`. Returns the
    /// original name that already claimed it, if any.
    pub fn claim(&mut self, converted: &str, original: &str) -> Option<String> {
        match self.seen.get(converted) {
            Some(first) => Some(first.clone()),
            None => {
                self.seen.insert(converted.to_string(), original.to_string());
                None
            }
        }
    }
}

pub fn check_identifier(owner: &str, name: &str) -> Result<(), ExportError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(ExportError::InvalidIdentifier {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}
