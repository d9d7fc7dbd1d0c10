//! Configuration loader and schema types.
//!
//! Settings come from an optional TOML file and `TRYZA__*` environment
//! variables, layered over struct defaults.

mod load;
mod paths;
mod schema;

pub use paths::{BaseDir, CONFIG_PATH_VAR, config_file};
pub use schema::*;
