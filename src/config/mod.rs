//! Configuration loading and validation
//!
//! Archives can be opened either from a TOML configuration file or from a
//! bare root directory, in which case a default configuration is synthesized.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{ArchiveConfig, Config, IndexConfig};
pub use validation::validate;
