//! Outline of a hand-written module whose classes are composed with the
//! generated models.
//!
//! Only names are recorded. The generator never rewrites the hand-written
//! module; it consults this outline to decide what to leave out of the
//! generated side.

/// A hand-written module and the classes it declares at top level.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtensionModule {
    /// Import path of the module, e.g. `prisma.base`.
    pub module: String,
    pub classes: Vec<ExtensionClass>,
}

impl ExtensionModule {
    pub fn new(module: impl Into<String>, classes: Vec<ExtensionClass>) -> Self {
        Self {
            module: module.into(),
            classes,
        }
    }

    pub fn class(&self, name: &str) -> Option<&ExtensionClass> {
        self.classes.iter().find(|c| c.name == name)
    }
}

/// A hand-written class: its directly declared attributes and methods, and
/// its nested configuration blocks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtensionClass {
    pub name: String,
    pub attributes: Vec<String>,
    pub blocks: Vec<ConfigBlock>,
}

impl ExtensionClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether the class declares `attr` directly, as a value, a method or a
    /// nested block.
    pub fn declares(&self, attr: &str) -> bool {
        self.attributes.iter().any(|a| a == attr) || self.block(attr).is_some()
    }

    pub fn block(&self, name: &str) -> Option<&ConfigBlock> {
        self.blocks.iter().find(|b| b.name == name)
    }
}

/// A nested configuration class such as `Meta` or `PydanticMeta`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigBlock {
    pub name: String,
    pub keys: Vec<String>,
}

impl ConfigBlock {
    pub fn defines(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }
}
