pub mod check;
pub mod generate;
pub mod init;
pub mod json_schema;

pub use check::{CheckArgs, cmd_check};
pub use generate::{GenerateArgs, cmd_generate};
pub use init::cmd_init;
pub use json_schema::cmd_json_schema;
