pub mod config;
pub mod extension;
pub mod project;
pub mod schema;

pub use config::{load_config, load_config_from_path, load_config_or_default};
pub use extension::load_extension;
pub use project::{Project, load_project};
pub use schema::{LoadedSchema, apply_generator_block, load_schema, load_schema_as};
