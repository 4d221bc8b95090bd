pub mod config;
pub mod schema_format;

pub use config::{CONFIG_FILE_NAME, ConfigError, ExtensionConfig, FieldDefaults, GeneratorConfig};
pub use schema_format::SchemaFormat;

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;

    #[test]
    fn default_values_are_standard_paths() {
        let cfg = GeneratorConfig::default();
        assert_eq!(cfg.schema_path(), Path::new("prisma/schema.prisma"));
        assert_eq!(cfg.output_dir(), Path::new("prisma/generated"));
        assert_eq!(cfg.models_path(), PathBuf::from("prisma/generated/models.py"));
    }

    #[test]
    fn overrides_work_via_struct_update() {
        let cfg = GeneratorConfig {
            schema: PathBuf::from("db/schema.yaml"),
            output_dir: PathBuf::from("app/generated"),
            ..Default::default()
        };

        assert_eq!(cfg.schema_path(), Path::new("db/schema.yaml"));
        assert_eq!(
            SchemaFormat::from_path(cfg.schema_path()),
            Some(SchemaFormat::Yaml)
        );
        assert_eq!(cfg.init_path(), PathBuf::from("app/generated/__init__.py"));
    }

    #[test]
    fn config_serializes_camel_case() {
        let json = serde_json::to_value(GeneratorConfig::default()).unwrap();
        assert_eq!(json["modelsFile"], "models.py");
        assert_eq!(json["createPyPackageInitFile"], true);
        assert_eq!(json["fieldDefaults"]["stringMaxLength"], 255);
        assert!(json.get("extension").is_none());
    }
}
