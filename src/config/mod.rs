//! Configuration loading and parsing for tau.
//!
//! This module handles:
//! - TOML config file parsing
//! - Rule priority ordering
//! - Default config location and the starter template

pub mod parser;
pub mod paths;
pub mod types;

pub use parser::{load_config, parse_config_file, parse_config_str};
pub use paths::{default_config_path, generate_init_template, write_init_config};
pub use types::{Config, LoadedConfig, NamedRule, RuleEntry, RuleSpec};
