//! Tau - rename files by regex rules and run a templated command on the result.
//!
//! This library provides the core functionality for tau, including:
//! - Configuration file parsing and rule ordering
//! - First-match-wins rule matching over file basenames
//! - Command template splitting, `$source`/`$target` substitution and execution
//! - A driver for single-file and batch runs
//!
//! # Example
//!
//! ```no_run
//! use tau_cli::config::{default_config_path, parse_config_file};
//! use tau_cli::driver::{Driver, Job, Mode};
//! use tau_cli::exec::{ExecOptions, Executor};
//! use tau_cli::rules::RuleTable;
//!
//! let config = parse_config_file(&default_config_path().unwrap()).unwrap();
//! let rules = RuleTable::compile(&config).unwrap();
//!
//! let transformed = rules.transform("/downloads/notes.txt.bak").unwrap();
//! println!("{} -> {}", transformed.rule, transformed.new_name);
//!
//! let executor = Executor::new(ExecOptions::default());
//! let driver = Driver::new(&rules, executor, Mode::Batch);
//! let report = driver
//! 	.run(&[Job::new("notes.txt.bak", "mv -i $source $target")])
//! 	.unwrap();
//! println!("{} failed", report.failed());
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod exec;
pub mod logging;
pub mod rules;

pub use error::{Result, TauError};
