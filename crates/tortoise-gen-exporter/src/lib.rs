//! Render a validated schema as a Python module of Tortoise ORM models.
//!
//! Rendering is pure: [`render_files`] returns the file set in memory and the
//! caller decides how to write it.

pub mod error;
pub mod naming;
pub mod output;
pub mod python;
pub mod tortoise;

pub use error::ExportError;
pub use output::{OutputFile, WritePolicy, render_files};
pub use tortoise::{GENERATOR_NAME, GENERATOR_VERSION, render_module};
