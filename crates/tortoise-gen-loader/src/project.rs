use anyhow::Result;
use tortoise_gen_config::GeneratorConfig;
use tortoise_gen_core::{ExtensionModule, Schema};

use crate::extension::load_extension;
use crate::schema::{apply_generator_block, load_schema, load_schema_as};

/// Everything needed to render: the effective config, the validated schema
/// and the optional extension outline.
#[derive(Debug, Clone)]
pub struct Project {
    pub config: GeneratorConfig,
    pub schema: Schema,
    pub extension: Option<ExtensionModule>,
}

/// Load the schema named by `config`, overlay its generator block and read
/// the extension module.
pub fn load_project(mut config: GeneratorConfig) -> Result<Project> {
    let schema_path = config.schema_path().to_path_buf();
    let loaded = match config.resolved_schema_format() {
        Some(format) => load_schema_as(&schema_path, format)?,
        None => load_schema(&schema_path)?,
    };
    apply_generator_block(&mut config, &loaded.generators, &schema_path)?;
    let extension = load_extension(&config)?;

    Ok(Project {
        config,
        schema: loaded.schema,
        extension,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use tortoise_gen_config::{ExtensionConfig, SchemaFormat};

    #[test]
    fn load_project_combines_sources() {
        let tmp = tempdir().unwrap();
        let schema = tmp.path().join("schema.prisma");
        fs::write(
            &schema,
            "generator tortoise {\n  provider = \"tortoise-gen\"\n  modelsFile = \"db.py\"\n}\n\nmodel Tag {\n  id Int @id\n}\n",
        )
        .unwrap();
        let base = tmp.path().join("base.py");
        fs::write(&base, "class Tag:\n    pass\n").unwrap();

        let project = load_project(GeneratorConfig {
            schema: schema.clone(),
            extension: Some(ExtensionConfig {
                path: base,
                module: "app.base".into(),
            }),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(project.config.models_file, "db.py");
        assert!(project.schema.entity("Tag").is_some());
        assert!(project.extension.unwrap().class("Tag").is_some());
    }

    #[test]
    fn load_project_honours_schema_format() {
        let tmp = tempdir().unwrap();
        let schema = tmp.path().join("schema.txt");
        fs::write(&schema, "entities:\n  - name: Tag\n    fields:\n      - name: id\n        type: int\n        primary_key: true\n").unwrap();

        let project = load_project(GeneratorConfig {
            schema,
            schema_format: Some(SchemaFormat::Yaml),
            ..Default::default()
        })
        .unwrap();
        assert!(project.schema.entity("Tag").is_some());
    }

    #[test]
    fn load_project_fails_on_missing_schema() {
        let tmp = tempdir().unwrap();
        let err = load_project(GeneratorConfig {
            schema: tmp.path().join("schema.prisma"),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("read schema file"));
    }
}
