use std::path::Path;

#[cfg(feature = "cli")]
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Supported schema source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "cli", derive(ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SchemaFormat {
    /// Prisma schema language.
    Prisma,
    Json,
    Yaml,
}

impl Default for SchemaFormat {
    fn default() -> Self {
        SchemaFormat::Prisma
    }
}

impl SchemaFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("prisma") => Some(SchemaFormat::Prisma),
            Some("json") => Some(SchemaFormat::Json),
            Some("yaml") | Some("yml") => Some(SchemaFormat::Yaml),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SchemaFormat;
    use std::path::Path;

    #[test]
    fn default_is_prisma() {
        assert_eq!(SchemaFormat::default(), SchemaFormat::Prisma);
    }

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(
            SchemaFormat::from_path(Path::new("prisma/schema.prisma")),
            Some(SchemaFormat::Prisma)
        );
        assert_eq!(
            SchemaFormat::from_path(Path::new("schema.json")),
            Some(SchemaFormat::Json)
        );
        assert_eq!(
            SchemaFormat::from_path(Path::new("schema.yml")),
            Some(SchemaFormat::Yaml)
        );
        assert_eq!(SchemaFormat::from_path(Path::new("schema.txt")), None);
        assert_eq!(SchemaFormat::from_path(Path::new("schema")), None);
    }
}
