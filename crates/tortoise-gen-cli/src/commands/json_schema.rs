use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use schemars::schema_for;
use tortoise_gen_config::GeneratorConfig;
use tortoise_gen_core::Schema;

pub fn cmd_json_schema(out: PathBuf) -> Result<()> {
    if !out.exists() {
        fs::create_dir_all(&out).with_context(|| format!("create dir {}", out.display()))?;
    }

    let schema_path = out.join("schema.schema.json");
    let config_path = out.join("config.schema.json");
    write_schema(&schema_path, &schema_for!(Schema))?;
    write_schema(&config_path, &schema_for!(GeneratorConfig))?;

    println!("{}", "Wrote schemas:".bright_cyan().bold());
    println!("  {}", schema_path.display());
    println!("  {}", config_path.display());
    Ok(())
}

fn write_schema(path: &Path, schema: &schemars::Schema) -> Result<()> {
    let text = serde_json::to_string_pretty(schema)
        .with_context(|| format!("serialize {}", path.display()))?;
    fs::write(path, text).with_context(|| format!("write {}", path.display()))
}
