use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

/// Top-level configuration from a `tau.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// Default command template for batch mode when none is given on the command line.
	#[serde(default)]
	pub command: Option<String>,

	/// Overrides whether an empty command is skipped (true) or rejected (false).
	/// When unset, batch mode skips and single-file mode rejects.
	#[serde(default)]
	pub allow_empty_command: Option<bool>,

	/// Ordered rules. These are tried first, in declaration order.
	#[serde(default)]
	pub rules: Vec<RuleEntry>,

	/// Rules declared as named top-level tables.
	/// Tried after `rules`, by ascending priority and then by name.
	#[serde(flatten)]
	pub named: BTreeMap<String, NamedRule>,
}

/// An entry of the `[[rules]]` array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RuleEntry {
	/// Rule name. Defaults to `rules[N]` (1-based position).
	pub name: Option<String>,

	/// Regex searched for in the file's basename.
	#[serde(alias = "Matcher")]
	pub matcher: String,

	/// New name, with `$1`, `${name}` etc. referring to capture groups and `$$` for `$`.
	#[serde(alias = "Transform")]
	pub transform: String,
}

/// A rule declared as `[name]` with `Matcher`/`Transform` keys.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NamedRule {
	#[serde(alias = "Matcher")]
	pub matcher: String,

	#[serde(alias = "Transform")]
	pub transform: String,

	/// Lower values are tried first.
	#[serde(default, alias = "Priority")]
	pub priority: i64,
}

/// A rule in effective priority order, ready to be compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
	pub name: String,
	pub matcher: String,
	pub transform: String,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

impl RuleEntry {
	fn resolved_name(&self, index: usize) -> String {
		self.name
			.clone()
			.unwrap_or_else(|| format!("rules[{}]", index + 1))
	}
}

impl Config {
	/// All rules in the order they are tried.
	///
	/// `[[rules]]` entries come first in declaration order, followed by named tables
	/// sorted by `(priority, name)`.
	pub fn ordered_rules(&self) -> Vec<RuleSpec> {
		let listed = self.rules.iter().enumerate().map(|(i, entry)| RuleSpec {
			name: entry.resolved_name(i),
			matcher: entry.matcher.clone(),
			transform: entry.transform.clone(),
		});

		// BTreeMap iteration is already sorted by name, and the sort is stable.
		let mut named: Vec<_> = self.named.iter().collect();
		named.sort_by_key(|(_, rule)| rule.priority);
		let named = named.into_iter().map(|(name, rule)| RuleSpec {
			name: name.clone(),
			matcher: rule.matcher.clone(),
			transform: rule.transform.clone(),
		});

		listed.chain(named).collect()
	}

	/// Total number of rules across both forms.
	pub fn rule_count(&self) -> usize {
		self.rules.len() + self.named.len()
	}

	/// Validate that rule names are unique.
	pub fn validate(&self) -> Result<(), crate::error::TauError> {
		let mut seen = HashSet::new();
		for spec in self.ordered_rules() {
			if !seen.insert(spec.name.clone()) {
				return Err(crate::error::TauError::DuplicateRule { name: spec.name });
			}
		}
		Ok(())
	}
}
