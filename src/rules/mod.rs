//! Rule matching and renaming for tau.
//!
//! This module handles:
//! - Compiling configured rules into an ordered table
//! - First-match-wins search over a file's basename
//! - Transform template expansion and checks

pub mod matcher;
pub mod template;

pub use matcher::{CompiledRule, RuleTable, Transformed, basename};
pub use template::{TemplateIssue, expand, lint_template, validate_target};
