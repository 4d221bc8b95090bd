use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tortoise_gen_config::{GeneratorConfig, SchemaFormat};
use tortoise_gen_core::{Schema, validate_schema};
use tortoise_gen_parser::{GeneratorBlock, parse_schema};
use tracing::{debug, info};

/// A validated schema and the generator blocks declared next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSchema {
    pub schema: Schema,
    /// Always empty for JSON and YAML sources.
    pub generators: Vec<GeneratorBlock>,
}

/// Read, parse and validate a schema file. The format follows the extension.
pub fn load_schema(path: &Path) -> Result<LoadedSchema> {
    let format = SchemaFormat::from_path(path).ok_or_else(|| {
        anyhow!(
            "unrecognized schema file extension: {} (expected .prisma, .json, .yaml or .yml)",
            path.display()
        )
    })?;
    load_schema_as(path, format)
}

/// Read, parse and validate a schema file in the given format.
pub fn load_schema_as(path: &Path, format: SchemaFormat) -> Result<LoadedSchema> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("read schema file: {}", path.display()))?;

    let loaded = match format {
        SchemaFormat::Prisma => {
            let parsed = parse_schema(&content)
                .map_err(|e| anyhow!("{}", e.format_with_source(&content).trim_end()))
                .with_context(|| format!("parse Prisma schema: {}", path.display()))?;
            LoadedSchema {
                schema: parsed.schema,
                generators: parsed.generators,
            }
        }
        SchemaFormat::Json => LoadedSchema {
            schema: serde_json::from_str(&content)
                .with_context(|| format!("parse JSON schema: {}", path.display()))?,
            generators: Vec::new(),
        },
        SchemaFormat::Yaml => LoadedSchema {
            schema: serde_yaml::from_str(&content)
                .with_context(|| format!("parse YAML schema: {}", path.display()))?,
            generators: Vec::new(),
        },
    };

    validate_schema(&loaded.schema).map_err(|e| anyhow!("schema validation failed: {}", e))?;

    info!(
        path = %path.display(),
        entities = loaded.schema.entities.len(),
        enums = loaded.schema.enums.len(),
        "schema loaded"
    );
    Ok(loaded)
}

/// Overlay the options of the schema's generator block onto `config`.
///
/// The block named by `config.generator` is used, or else the first block
/// whose provider mentions `tortoise`. `output` is relative to the schema
/// file's directory.
pub fn apply_generator_block(
    config: &mut GeneratorConfig,
    generators: &[GeneratorBlock],
    schema_path: &Path,
) -> Result<()> {
    let block = match &config.generator {
        Some(name) => Some(
            generators
                .iter()
                .find(|g| &g.name == name)
                .ok_or_else(|| anyhow!("generator block '{}' not found in schema", name))?,
        ),
        None => generators.iter().find(|g| {
            g.provider
                .as_deref()
                .is_some_and(|provider| provider.contains("tortoise"))
        }),
    };

    let Some(block) = block else {
        debug!("no generator block applies; using config as is");
        return Ok(());
    };

    config
        .apply_options(block.options())
        .with_context(|| format!("generator block '{}'", block.name))?;
    if let Some(output) = &block.output {
        let base = schema_path.parent().unwrap_or_else(|| Path::new(""));
        config.output_dir = base.join(output);
    }

    debug!(generator = %block.name, output = %config.output_dir.display(), "generator block applied");
    Ok(())
}
