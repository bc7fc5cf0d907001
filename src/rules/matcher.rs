use crate::config::types::{Config, RuleSpec};
use crate::error::{Result, TauError};
use crate::rules::template::{expand, lint_template, validate_target};
use regex::{Captures, Regex};
use std::path::Path;

/// A compiled rule ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledRule {
	/// Rule name from the config.
	pub name: String,

	/// Compiled matcher regex.
	pub regex: Regex,

	/// Transform template applied to the match.
	pub transform: String,
}

/// The outcome of a successful transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
	/// Name of the rule that matched.
	pub rule: String,

	/// The new basename.
	pub new_name: String,
}

impl CompiledRule {
	/// Compile a rule from its config form.
	///
	/// Template issues are logged as warnings; only a bad regex is an error.
	pub fn from_spec(spec: &RuleSpec) -> Result<Self> {
		let regex = Regex::new(&spec.matcher).map_err(|source| TauError::InvalidRegex {
			rule: spec.name.clone(),
			pattern: spec.matcher.clone(),
			source,
		})?;

		for issue in lint_template(&regex, &spec.transform) {
			tracing::warn!(rule = %spec.name, "transform {:?}: {issue}", spec.transform);
		}

		Ok(CompiledRule {
			name: spec.name.clone(),
			regex,
			transform: spec.transform.clone(),
		})
	}

	/// Expand this rule's template for a match of its regex.
	pub fn expand(&self, captures: &Captures<'_>) -> String {
		expand(captures, &self.transform)
	}
}

/// Rules in the order they are tried. Immutable once compiled.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
	rules: Vec<CompiledRule>,
}

impl RuleTable {
	/// Compile every rule in a config, in priority order.
	///
	/// Fails on the first rule whose pattern does not compile.
	pub fn compile(config: &Config) -> Result<Self> {
		Self::from_specs(&config.ordered_rules())
	}

	/// Compile rules from specs, keeping their order.
	pub fn from_specs(specs: &[RuleSpec]) -> Result<Self> {
		let rules = specs
			.iter()
			.map(CompiledRule::from_spec)
			.collect::<Result<Vec<_>>>()?;
		Ok(RuleTable { rules })
	}

	pub fn rules(&self) -> &[CompiledRule] {
		&self.rules
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// Find the first rule whose regex is found in `basename`.
	pub fn find_match<'r, 'h>(
		&'r self,
		basename: &'h str,
	) -> Option<(&'r CompiledRule, Captures<'h>)> {
		self.rules
			.iter()
			.find_map(|rule| rule.regex.captures(basename).map(|caps| (rule, caps)))
	}

	/// Compute the new name for `path`.
	///
	/// Only the basename takes part in matching, and the result never contains a directory.
	pub fn transform(&self, path: &str) -> Result<Transformed> {
		if path.is_empty() {
			return Err(TauError::EmptyPath);
		}

		let trimmed = basename(path);
		tracing::debug!("{path:?} trimmed to {trimmed:?}");

		let (rule, captures) = self.find_match(trimmed).ok_or_else(|| TauError::NoMatch {
			path: path.to_string(),
		})?;

		let new_name = rule.expand(&captures);
		validate_target(&new_name).map_err(|reason| TauError::InvalidTarget {
			rule: rule.name.clone(),
			path: path.to_string(),
			new_name: new_name.clone(),
			reason,
		})?;

		tracing::info!(
			rule = %rule.name,
			"matched {trimmed:?} against rule {:?}. New name: {new_name:?}",
			rule.name
		);

		Ok(Transformed {
			rule: rule.name.clone(),
			new_name,
		})
	}
}

/// The final component of `path`, or the whole path if it has none (`/`, `..`).
pub fn basename(path: &str) -> &str {
	Path::new(path)
		.file_name()
		.and_then(|name| name.to_str())
		.unwrap_or(path)
}
