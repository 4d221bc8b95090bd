//! Syntax tree of a Prisma schema document.

use crate::span::{Span, Spanned};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Datasource(KeyValueBlock),
    Generator(KeyValueBlock),
    Model(ModelBlock),
    Enum(EnumBlock),
    /// A block kind the generator has no mapping for (`type`, `view`, ...).
    Other { keyword: String, name: Spanned<String> },
}

/// `datasource` and `generator` blocks: `key = value` lines.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValueBlock {
    pub name: Spanned<String>,
    pub properties: Vec<Property>,
}

impl KeyValueBlock {
    pub fn property(&self, key: &str) -> Option<&Expr> {
        self.properties
            .iter()
            .find(|p| p.key.value == key)
            .map(|p| &p.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: Spanned<String>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelBlock {
    pub name: Spanned<String>,
    pub documentation: Option<String>,
    pub fields: Vec<FieldDecl>,
    /// `@@` attributes.
    pub attributes: Vec<Attribute>,
}

impl ModelBlock {
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name.value == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name.value == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: Spanned<String>,
    pub field_type: TypeRef,
    pub attributes: Vec<Attribute>,
    pub documentation: Option<String>,
    pub span: Span,
}

impl FieldDecl {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name.value == name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Required,
    Optional,
    List,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub name: Spanned<String>,
    pub arity: Arity,
    /// Database type of an `Unsupported("...")` field.
    pub unsupported: Option<String>,
}

/// `@name(args)` or `@@name(args)`. Native types keep their prefix,
/// e.g. `db.VarChar`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Spanned<String>,
    pub arguments: Vec<Argument>,
    pub span: Span,
}

impl Attribute {
    /// The argument called `name`, or the first positional argument when
    /// `name` is the attribute's default argument.
    pub fn argument(&self, name: &str, positional: bool) -> Option<&Expr> {
        self.arguments
            .iter()
            .find(|a| a.name.as_deref() == Some(name))
            .or_else(|| {
                positional
                    .then(|| self.arguments.iter().find(|a| a.name.is_none()))
                    .flatten()
            })
            .map(|a| &a.value)
    }

    pub fn positional(&self, index: usize) -> Option<&Expr> {
        self.arguments
            .iter()
            .filter(|a| a.name.is_none())
            .nth(index)
            .map(|a| &a.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Option<String>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    String(String),
    Number(String),
    Boolean(bool),
    /// A bare identifier: an enum value or a referential action.
    Constant(String),
    Function { name: String, arguments: Vec<Argument> },
    Array(Vec<Expr>),
}

impl Expr {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&str> {
        match self {
            Expr::Constant(s) => Some(s),
            _ => None,
        }
    }

    /// Names listed in an array of constants, such as `fields: [authorId]`.
    pub fn as_constant_list(&self) -> Option<Vec<&str>> {
        match self {
            Expr::Array(items) => items.iter().map(Expr::as_constant).collect(),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Expr::Number(n) => n.parse().ok(),
            _ => None,
        }
    }

    /// Text form used for generator options, which are plain strings.
    pub fn to_option_string(&self) -> Option<String> {
        match self {
            Expr::String(s) | Expr::Number(s) | Expr::Constant(s) => Some(s.clone()),
            Expr::Boolean(b) => Some(b.to_string()),
            Expr::Function { .. } | Expr::Array(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumBlock {
    pub name: Spanned<String>,
    pub documentation: Option<String>,
    pub values: Vec<EnumValueDecl>,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueDecl {
    pub name: Spanned<String>,
    pub documentation: Option<String>,
    pub attributes: Vec<Attribute>,
}
