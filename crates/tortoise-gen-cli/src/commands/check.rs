use anyhow::{Result, anyhow};
use colored::Colorize;
use tortoise_gen_config::SchemaFormat;
use tortoise_gen_exporter::render_module;
use tortoise_gen_loader::{load_config_or_default, load_project};

#[derive(Debug, Default)]
pub struct CheckArgs {
    pub format: Option<SchemaFormat>,
}

pub fn cmd_check(args: CheckArgs) -> Result<()> {
    let mut config = load_config_or_default(None)?;
    if args.format.is_some() {
        config.schema_format = args.format;
    }
    let project = load_project(config)?;
    render_module(&project.schema, &project.config, project.extension.as_ref())
        .map_err(|e| anyhow!("render models: {}", e))?;

    let config = &project.config;
    println!("{}", "Configuration:".bright_cyan().bold());
    println!(
        "  {} {}",
        "Schema:".cyan(),
        config.schema_path().display().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Models module:".cyan(),
        config.models_path().display().to_string().bright_white()
    );
    println!("  {} {}", "App name:".cyan(), config.app_name.bright_white());
    if let Some(extension) = &project.extension {
        println!(
            "  {} {} ({} classes)",
            "Extension:".cyan(),
            extension.module.bright_white(),
            extension.classes.len()
        );
    }
    println!();
    println!(
        "{} {} enums, {} models",
        "Schema OK:".bright_green().bold(),
        project.schema.enums.len().to_string().bright_yellow(),
        project.schema.entities.len().to_string().bright_yellow()
    );
    Ok(())
}
