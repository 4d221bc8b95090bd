use std::path::PathBuf;

use anyhow::{Result, anyhow};
use colored::Colorize;
use tortoise_gen_config::SchemaFormat;
use tortoise_gen_exporter::render_files;
use tortoise_gen_loader::{load_config_or_default, load_project};
use tracing::info;

use crate::utils::{WriteOutcome, write_files};

#[derive(Debug, Default)]
pub struct GenerateArgs {
    pub schema: Option<PathBuf>,
    pub format: Option<SchemaFormat>,
    pub out: Option<PathBuf>,
    pub dry_run: bool,
}

pub fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let mut config = load_config_or_default(None)?;
    if let Some(schema) = args.schema {
        config.schema = schema;
    }
    if args.format.is_some() {
        config.schema_format = args.format;
    }

    let mut project = load_project(config)?;
    if let Some(out) = args.out {
        project.config.output_dir = out;
    }

    let files = render_files(&project.schema, &project.config, project.extension.as_ref())
        .map_err(|e| anyhow!("render models: {}", e))?;

    if args.dry_run {
        if let Some(models) = files.first() {
            print!("{}", models.contents);
        }
        return Ok(());
    }

    for (path, outcome) in write_files(&files)? {
        match outcome {
            WriteOutcome::Written => {
                info!(path = %path.display(), "written");
                println!("{} {}", "Generated".bright_green(), path.display());
            }
            WriteOutcome::Kept => {
                println!("{} {} (exists)", "Kept".yellow(), path.display());
            }
        }
    }
    Ok(())
}
