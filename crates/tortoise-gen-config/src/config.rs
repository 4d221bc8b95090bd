use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::SchemaFormat;

/// Name of the project config file.
pub const CONFIG_FILE_NAME: &str = "tortoise-gen.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no such generator option: {0}")]
    UnknownOption(String),
    #[error("generator option '{0}' expects true or false, got '{1}'")]
    InvalidBool(String, String),
}

/// Hand-written module composed with the generated models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionConfig {
    /// Path of the Python source file, read to discover its classes.
    pub path: PathBuf,
    /// Import path used by the generated module, e.g. `prisma.base`.
    pub module: String,
}

/// Declaration sizes used when the schema does not specify a native type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefaults {
    #[serde(default = "default_string_max_length")]
    pub string_max_length: u32,
    #[serde(default = "default_decimal_max_digits")]
    pub decimal_max_digits: u32,
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

fn default_string_max_length() -> u32 {
    255
}

fn default_decimal_max_digits() -> u32 {
    12
}

fn default_decimal_places() -> u32 {
    2
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            string_max_length: default_string_max_length(),
            decimal_max_digits: default_decimal_max_digits(),
            decimal_places: default_decimal_places(),
        }
    }
}

/// Top-level tortoise-gen configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Schema file to read.
    #[serde(default = "default_schema_path")]
    pub schema: PathBuf,
    /// Format of `schema`. Detected from its extension when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_format: Option<SchemaFormat>,
    /// Directory the generated package is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_models_file")]
    pub models_file: String,
    /// ORM app label used in relation references (`<app>.<Model>`).
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_true")]
    pub class_name_pascal_case: bool,
    #[serde(default = "default_true")]
    pub value_name_snake_case: bool,
    #[serde(default = "default_true")]
    pub create_py_package_init_file: bool,
    /// Name of the schema generator block whose options overlay this config.
    /// When absent, the first block whose provider mentions `tortoise` is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<ExtensionConfig>,
    #[serde(default)]
    pub field_defaults: FieldDefaults,
}

fn default_schema_path() -> PathBuf {
    PathBuf::from("prisma/schema.prisma")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("prisma/generated")
}

fn default_models_file() -> String {
    "models.py".to_string()
}

fn default_app_name() -> String {
    "models".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            schema: default_schema_path(),
            schema_format: None,
            output_dir: default_output_dir(),
            models_file: default_models_file(),
            app_name: default_app_name(),
            class_name_pascal_case: true,
            value_name_snake_case: true,
            create_py_package_init_file: true,
            generator: None,
            extension: None,
            field_defaults: FieldDefaults::default(),
        }
    }
}

impl GeneratorConfig {
    /// Path of the schema file.
    pub fn schema_path(&self) -> &Path {
        &self.schema
    }

    /// Declared schema format, else the one implied by the file extension.
    pub fn resolved_schema_format(&self) -> Option<SchemaFormat> {
        self.schema_format.or_else(|| SchemaFormat::from_path(&self.schema))
    }

    /// Directory the generated package is written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Full path of the generated models module.
    pub fn models_path(&self) -> PathBuf {
        self.output_dir.join(&self.models_file)
    }

    /// Full path of the package marker file.
    pub fn init_path(&self) -> PathBuf {
        self.output_dir.join("__init__.py")
    }

    pub fn extension(&self) -> Option<&ExtensionConfig> {
        self.extension.as_ref()
    }

    pub fn field_defaults(&self) -> &FieldDefaults {
        &self.field_defaults
    }

    /// Overlay options declared in the schema's generator block.
    ///
    /// `provider`, `output` and the engine options are not generator options
    /// and are handled by the caller.
    pub fn apply_options<'a, I>(&mut self, options: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in options {
            match key {
                "modelsFile" => self.models_file = value.to_string(),
                "appName" => self.app_name = value.to_string(),
                "classNamePascalCase" => self.class_name_pascal_case = parse_bool(key, value)?,
                "valueNameSnakeCase" => self.value_name_snake_case = parse_bool(key, value)?,
                "createPyPackageInitFile" => {
                    self.create_py_package_init_file = parse_bool(key, value)?
                }
                _ => return Err(ConfigError::UnknownOption(key.to_string())),
            }
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ConfigError::InvalidBool(key.to_string(), other.to_string())),
    }
}
