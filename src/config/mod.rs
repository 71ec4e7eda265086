//! Generator configuration
//!
//! Three layers, later ones winning:
//! 1. Built-in defaults
//! 2. Config file (policygen.toml)
//! 3. CLI flags

mod defaults;
mod effective;
mod merge;

pub use defaults::BuiltinDefaults;
pub use effective::{ConfigError, ConfigOrigin, ConfigOverrides, ConfigSource, GeneratorConfig};
pub use merge::{merge_layer, merge_layers};

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "policygen.toml";
