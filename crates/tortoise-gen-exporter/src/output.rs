use std::path::PathBuf;

use tortoise_gen_config::GeneratorConfig;
use tortoise_gen_core::{ExtensionModule, Schema};

use crate::error::ExportError;
use crate::tortoise::render_module;

/// What to do when the target file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    Overwrite,
    /// Leave an existing file untouched.
    CreateIfAbsent,
}

/// A rendered file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: String,
    pub policy: WritePolicy,
}

/// Render every file of the output package. Nothing is written here, so a
/// failure leaves the output directory as it was.
pub fn render_files(
    schema: &Schema,
    config: &GeneratorConfig,
    extension: Option<&ExtensionModule>,
) -> Result<Vec<OutputFile>, ExportError> {
    let mut files = vec![OutputFile {
        path: config.models_path(),
        contents: render_module(schema, config, extension)?,
        policy: WritePolicy::Overwrite,
    }];

    if config.create_py_package_init_file {
        files.push(OutputFile {
            path: config.init_path(),
            contents: String::new(),
            policy: WritePolicy::CreateIfAbsent,
        });
    }
    Ok(files)
}
